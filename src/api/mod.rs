// API module
//
// This module contains the HTTP boundary over the ledger

pub mod handlers;
pub mod routes;

// Re-export main components for easier access
pub use routes::configure_routes;
