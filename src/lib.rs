//! A single-process blockchain whose blocks are minted against proof of
//! useful work: bounded, verifiable matrix-multiplication workloads rather
//! than arbitrary hash grinding.
//!
//! The [`blockchain`] module holds the ledger, the work engine, and the
//! audit-log collaborator; [`api`] is the HTTP boundary over them.

pub mod api;
pub mod blockchain;
