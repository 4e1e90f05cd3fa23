// Blockchain module
//
// This module contains the core ledger implementation including:
// - Block structure and canonical hashing
// - Transaction structure
// - Chain and pending-pool service
// - Proof-of-useful-work search and verification
// - Audit log collaborator

pub mod audit;
pub mod block;
pub mod chain;
pub mod transaction;
pub mod work;

// Re-export main components for easier access
pub use audit::{AuditError, AuditRecord, AuditStore};
pub use block::Block;
pub use chain::{validate, Blockchain, BlockchainError};
pub use transaction::Transaction;
pub use work::{WorkChallenge, WorkError, WorkProof, DEFAULT_MAX_ATTEMPTS};
