use std::path::Path;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use super::audit::{AuditError, AuditRecord, AuditStore};
use super::block::Block;
use super::transaction::Transaction;

/// Number of leading zero hex characters a proof must carry
pub const DEFAULT_DIFFICULTY: u32 = 1;

/// Reward credited to the miner on every minted block
pub const DEFAULT_REWARD: f64 = 10.0;

/// Errors that can occur during ledger operations
#[derive(Debug, Error)]
pub enum BlockchainError {
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Audit store error: {0}")]
    AuditError(#[from] AuditError),

    #[error("Audit store is not configured")]
    AuditDisabled,
}

/// Chain and pending pool, guarded together
///
/// The two collections form one shared resource: a transaction added while a
/// mint is in flight must land either in the minted block or in the next
/// one, never both and never neither. A single lock over the pair makes each
/// mint one atomic transition.
#[derive(Debug)]
struct ChainState {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
}

/// Represents the blockchain
///
/// Owns the append-only chain, the pending-transaction pool, and the
/// consensus parameters. Proof search is NOT performed here; the work engine
/// produces proofs outside any lock and minting only records the result.
#[derive(Debug, Clone)]
pub struct Blockchain {
    /// Chain and pool behind one exclusive-access primitive
    state: Arc<RwLock<ChainState>>,

    /// Mining difficulty (number of leading zero hex characters required)
    difficulty: u32,

    /// Mining reward
    reward: f64,

    /// External audit log for accepted transactions
    audit: Option<Arc<AuditStore>>,
}

impl Blockchain {
    /// Creates a new blockchain with a genesis block
    ///
    /// # Returns
    ///
    /// A new Blockchain instance without an audit log attached
    pub fn new() -> Self {
        Self::build(DEFAULT_DIFFICULTY, DEFAULT_REWARD, None)
    }

    /// Creates a new blockchain with explicit consensus parameters
    ///
    /// # Arguments
    ///
    /// * `difficulty` - Required number of leading zero hex characters
    /// * `reward` - Reward credited per minted block
    pub fn with_params(difficulty: u32, reward: f64) -> Self {
        Self::build(difficulty, reward, None)
    }

    /// Creates a new blockchain with a genesis block and an audit log
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the audit store directory
    ///
    /// # Returns
    ///
    /// A new Blockchain instance mirroring accepted transactions to the store
    pub fn with_audit<P: AsRef<Path>>(path: P) -> Result<Self, BlockchainError> {
        let store = AuditStore::open(path)?;

        Ok(Self::build(
            DEFAULT_DIFFICULTY,
            DEFAULT_REWARD,
            Some(Arc::new(store)),
        ))
    }

    fn build(difficulty: u32, reward: f64, audit: Option<Arc<AuditStore>>) -> Self {
        Blockchain {
            state: Arc::new(RwLock::new(ChainState {
                chain: vec![Block::genesis()],
                pending: Vec::new(),
            })),
            difficulty,
            reward,
            audit,
        }
    }

    /// Gets the mining difficulty
    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Gets the mining reward
    pub fn reward(&self) -> f64 {
        self.reward
    }

    /// Gets the last block in the chain
    ///
    /// Always defined: the chain is never empty after construction.
    pub fn last_block(&self) -> Block {
        let state = self.state.read().unwrap();
        state.chain.last().unwrap().clone()
    }

    /// Gets a snapshot of the entire chain
    pub fn get_chain(&self) -> Vec<Block> {
        self.state.read().unwrap().chain.clone()
    }

    /// Gets a snapshot of the pending transactions
    pub fn pending_transactions(&self) -> Vec<Transaction> {
        self.state.read().unwrap().pending.clone()
    }

    /// Adds a new transaction to the pending pool
    ///
    /// The transaction is mirrored to the audit log after it is pooled. The
    /// mirroring is best effort: on audit failure the transaction REMAINS in
    /// the pool and the error is returned so the caller can distinguish
    /// "accepted and logged" from "accepted, log unavailable". Nothing is
    /// rolled back.
    ///
    /// # Arguments
    ///
    /// * `sender` - The sender's name
    /// * `receiver` - The receiver's name
    /// * `amount` - The amount to transfer
    ///
    /// # Returns
    ///
    /// Result with the index of the block that will include this transaction
    pub fn add_transaction(
        &self,
        sender: &str,
        receiver: &str,
        amount: f64,
    ) -> Result<u64, BlockchainError> {
        if sender.trim().is_empty() {
            return Err(BlockchainError::InvalidTransaction(
                "sender must not be empty".to_string(),
            ));
        }
        if receiver.trim().is_empty() {
            return Err(BlockchainError::InvalidTransaction(
                "receiver must not be empty".to_string(),
            ));
        }
        if !amount.is_finite() {
            return Err(BlockchainError::InvalidTransaction(format!(
                "amount must be finite, got {}",
                amount
            )));
        }

        let block_index = {
            let mut state = self.state.write().unwrap();
            state.pending.push(Transaction::new(sender, receiver, amount));
            (state.chain.len() + 1) as u64
        };

        // Audit I/O happens outside the lock
        if let Some(audit) = &self.audit {
            audit.append_record(sender, receiver, amount, block_index)?;
        }

        Ok(block_index)
    }

    /// Mints a new block from the pending pool
    ///
    /// Drains the pool, appends the reward transaction, stamps the next
    /// index and the current time, and appends the block to the chain as
    /// one atomic transition under the write lock. The presented proof is
    /// recorded as-is; whether it meets the difficulty was already decided
    /// by the work engine, and this method never fails.
    ///
    /// # Arguments
    ///
    /// * `proof` - The proof of useful work found by the caller
    /// * `previous_hash` - The digest of the current tail block
    ///
    /// # Returns
    ///
    /// The newly minted block
    pub fn mint_block(&self, proof: String, previous_hash: String) -> Block {
        let mut state = self.state.write().unwrap();

        let mut transactions = std::mem::take(&mut state.pending);
        transactions.push(Transaction::reward(self.reward));

        let block = Block::new(
            (state.chain.len() + 1) as u64,
            transactions,
            proof,
            previous_hash,
        );

        state.chain.push(block.clone());
        block
    }

    /// Validates the chain's hash linkage
    ///
    /// # Returns
    ///
    /// true if every block's previous_hash matches its predecessor's digest
    pub fn is_valid(&self) -> bool {
        validate(&self.state.read().unwrap().chain)
    }

    /// Fetches all records from the audit log
    pub fn audit_records(&self) -> Result<Vec<AuditRecord>, BlockchainError> {
        match &self.audit {
            Some(audit) => Ok(audit.fetch_all_records()?),
            None => Err(BlockchainError::AuditDisabled),
        }
    }
}

/// Walks a chain verifying hash linkage
///
/// For every block after the first, the recorded previous_hash must equal
/// the predecessor's digest; the walk stops at the first mismatch. A
/// one-block chain is trivially valid. Proofs of historical blocks are NOT
/// re-checked against the difficulty; this walk covers linkage only.
pub fn validate(chain: &[Block]) -> bool {
    for i in 1..chain.len() {
        if chain[i].previous_hash != chain[i - 1].digest() {
            return false;
        }
    }

    true
}
