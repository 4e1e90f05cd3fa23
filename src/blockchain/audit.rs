use std::path::Path;

use serde::{Deserialize, Serialize};
use sled::{Db, Tree};
use thiserror::Error;
use utoipa::ToSchema;

/// Errors that can occur while talking to the audit store
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

/// A transaction mirrored to the audit log
///
/// `block_index` records the block the transaction was destined for at the
/// time it was accepted into the pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuditRecord {
    /// Monotonic record id assigned by the store
    pub id: u64,

    /// Sender's name
    pub sender: String,

    /// Receiver's name
    pub receiver: String,

    /// Amount being transferred
    pub amount: f64,

    /// Index of the block the transaction will belong to
    pub block_index: u64,
}

/// Append-only audit log for accepted transactions
///
/// Plays the role of an external relational transaction table: the ledger
/// mirrors every accepted transaction here, best effort, and the listing
/// endpoint reads it back. Chain state itself is never persisted.
pub struct AuditStore {
    /// The database instance
    db: Db,

    /// Tree for transaction records
    records: Tree,
}

impl std::fmt::Debug for AuditStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditStore").finish()
    }
}

impl AuditStore {
    /// Opens the audit store
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the database directory
    ///
    /// # Returns
    ///
    /// A new AuditStore instance
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AuditError> {
        let db = sled::open(path)?;
        let records = db.open_tree("audit_records")?;

        Ok(Self { db, records })
    }

    /// Appends a transaction record to the log
    ///
    /// # Arguments
    ///
    /// * `sender` - The sender's name
    /// * `receiver` - The receiver's name
    /// * `amount` - The transferred amount
    /// * `block_index` - The block the transaction will belong to
    ///
    /// # Returns
    ///
    /// The stored record with its assigned id
    pub fn append_record(
        &self,
        sender: &str,
        receiver: &str,
        amount: f64,
        block_index: u64,
    ) -> Result<AuditRecord, AuditError> {
        let record = AuditRecord {
            id: self.db.generate_id()?,
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            amount,
            block_index,
        };

        let value = bincode::serialize(&record)
            .map_err(|e| AuditError::SerializationError(e.to_string()))?;

        // Big-endian keys keep the tree iterating in insertion order
        self.records.insert(record.id.to_be_bytes(), value)?;
        self.db.flush()?;

        Ok(record)
    }

    /// Fetches every record in the log, oldest first
    pub fn fetch_all_records(&self) -> Result<Vec<AuditRecord>, AuditError> {
        let mut records = Vec::new();

        for entry in self.records.iter() {
            let (_, value) = entry?;
            let record: AuditRecord = bincode::deserialize(&value)
                .map_err(|e| AuditError::DeserializationError(e.to_string()))?;

            records.push(record);
        }

        Ok(records)
    }
}
