use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;

use super::transaction::Transaction;

/// Version tag leading the canonical encoding, bumped if the layout ever changes
const ENCODING_VERSION: u8 = 1;

/// Proof sentinel carried by the genesis block
pub const GENESIS_PROOF: &str = "0";

/// Previous-hash sentinel carried by the genesis block
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Represents a block in the chain
///
/// Created exactly once and never mutated afterward. `index` is the block's
/// 1-based position in the chain.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Block {
    /// Index of the block in the chain, starting at 1
    pub index: u64,

    /// Timestamp when the block was created
    #[schema(value_type = String, example = "2023-01-01T12:00:00Z")]
    pub timestamp: DateTime<Utc>,

    /// List of transactions included in this block
    pub transactions: Vec<Transaction>,

    /// Proof of useful work presented for this block
    pub proof: String,

    /// Digest of the previous block
    pub previous_hash: String,
}

impl Block {
    /// Creates a new block stamped with the current time
    ///
    /// # Arguments
    ///
    /// * `index` - The 1-based index of the block in the chain
    /// * `transactions` - The list of transactions to include in the block
    /// * `proof` - The proof of useful work
    /// * `previous_hash` - The digest of the previous block
    ///
    /// # Returns
    ///
    /// A new Block instance
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        proof: String,
        previous_hash: String,
    ) -> Self {
        Block {
            index,
            timestamp: Utc::now(),
            transactions,
            proof,
            previous_hash,
        }
    }

    /// Creates the genesis block (first block in the chain)
    pub fn genesis() -> Self {
        Block::new(
            1,
            Vec::new(),
            GENESIS_PROOF.to_string(),
            GENESIS_PREVIOUS_HASH.to_string(),
        )
    }

    /// Produces the canonical byte encoding of the block
    ///
    /// Fixed field order (index, timestamp, transactions, proof,
    /// previous_hash) with fixed-width little-endian numerics and
    /// length-prefixed strings, so the digest is stable across runs and
    /// across independently written validators. Amounts are encoded as
    /// their IEEE-754 bit pattern, never as display text.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();

        bytes.push(ENCODING_VERSION);
        bytes.extend_from_slice(&self.index.to_le_bytes());
        bytes.extend_from_slice(&self.timestamp.timestamp_millis().to_le_bytes());

        bytes.extend_from_slice(&(self.transactions.len() as u32).to_le_bytes());
        for transaction in &self.transactions {
            push_str(&mut bytes, &transaction.sender);
            push_str(&mut bytes, &transaction.receiver);
            bytes.extend_from_slice(&transaction.amount.to_bits().to_le_bytes());
        }

        push_str(&mut bytes, &self.proof);
        push_str(&mut bytes, &self.previous_hash);

        bytes
    }

    /// Calculates the digest of the block
    ///
    /// # Returns
    ///
    /// The SHA-256 hash of the block's canonical encoding as a hexadecimal string
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Appends a length-prefixed UTF-8 string to the canonical encoding
fn push_str(bytes: &mut Vec<u8>, value: &str) {
    bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
    bytes.extend_from_slice(value.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_block() -> Block {
        let mut block = Block::new(
            1,
            vec![Transaction::new("Alice", "Bob", 5.0)],
            "abc".to_string(),
            "0".to_string(),
        );
        // Pin the timestamp so the encoding is reproducible
        block.timestamp = DateTime::from_timestamp_millis(1_600_000_000_000).unwrap();
        block
    }

    #[test]
    fn test_genesis_block() {
        let genesis = Block::genesis();

        assert_eq!(genesis.index, 1);
        assert_eq!(genesis.proof, "0");
        assert_eq!(genesis.previous_hash, "0");
        assert!(genesis.transactions.is_empty());
    }

    #[test]
    fn test_digest_format() {
        let block = fixed_block();

        let digest = block.digest();
        assert_eq!(digest.len(), 64); // SHA-256 hash is 64 characters in hex
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_digest_deterministic() {
        let block = fixed_block();

        assert_eq!(block.digest(), block.digest());
        assert_eq!(block.digest(), fixed_block().digest());
    }

    #[test]
    fn test_canonical_bytes_layout() {
        let block = fixed_block();
        let bytes = block.canonical_bytes();

        assert_eq!(bytes.len(), 57);
        assert_eq!(bytes[0], 1); // encoding version
        assert_eq!(&bytes[1..9], &1u64.to_le_bytes());
        assert_eq!(&bytes[9..17], &1_600_000_000_000i64.to_le_bytes());
        assert_eq!(&bytes[17..21], &1u32.to_le_bytes()); // transaction count
        assert_eq!(&bytes[21..25], &5u32.to_le_bytes());
        assert_eq!(&bytes[25..30], b"Alice");
        assert_eq!(&bytes[30..34], &3u32.to_le_bytes());
        assert_eq!(&bytes[34..37], b"Bob");
        assert_eq!(&bytes[37..45], &5.0f64.to_bits().to_le_bytes());
        assert_eq!(&bytes[45..49], &3u32.to_le_bytes());
        assert_eq!(&bytes[49..52], b"abc");
        assert_eq!(&bytes[52..56], &1u32.to_le_bytes());
        assert_eq!(&bytes[56..57], b"0");
    }

    #[test]
    fn test_digest_changes_with_transaction_amount() {
        let block = fixed_block();
        let mut tampered = block.clone();
        tampered.transactions[0].amount = 500.0;

        assert_ne!(block.digest(), tampered.digest());
    }

    #[test]
    fn test_digest_changes_with_each_field() {
        let block = fixed_block();

        let mut other = block.clone();
        other.index = 2;
        assert_ne!(block.digest(), other.digest());

        let mut other = block.clone();
        other.timestamp = DateTime::from_timestamp_millis(1_600_000_000_001).unwrap();
        assert_ne!(block.digest(), other.digest());

        let mut other = block.clone();
        other.proof = "abd".to_string();
        assert_ne!(block.digest(), other.digest());

        let mut other = block.clone();
        other.previous_hash = "1".to_string();
        assert_ne!(block.digest(), other.digest());
    }
}
