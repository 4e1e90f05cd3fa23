use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Sender recorded on every reward transaction.
pub const REWARD_SENDER: &str = "Network";

/// Receiver recorded on every reward transaction.
pub const REWARD_RECEIVER: &str = "Miner";

/// Represents a transfer recorded on the ledger
///
/// A transaction is mutable only while it sits in the pending pool; once
/// embedded in a block it is never touched again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    /// Sender's name
    pub sender: String,

    /// Receiver's name
    pub receiver: String,

    /// Amount being transferred
    pub amount: f64,
}

impl Transaction {
    /// Creates a new transaction
    ///
    /// # Arguments
    ///
    /// * `sender` - The sender's name
    /// * `receiver` - The receiver's name
    /// * `amount` - The amount to transfer
    ///
    /// # Returns
    ///
    /// A new Transaction instance
    pub fn new(sender: impl Into<String>, receiver: impl Into<String>, amount: f64) -> Self {
        Transaction {
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
        }
    }

    /// Creates the synthetic reward transaction appended to every minted block
    ///
    /// # Arguments
    ///
    /// * `amount` - The reward amount
    ///
    /// # Returns
    ///
    /// A new Transaction from the network to the miner
    pub fn reward(amount: f64) -> Self {
        Transaction {
            sender: REWARD_SENDER.to_string(),
            receiver: REWARD_RECEIVER.to_string(),
            amount,
        }
    }

    /// Checks if the transaction is a reward transaction
    pub fn is_reward(&self) -> bool {
        self.sender == REWARD_SENDER && self.receiver == REWARD_RECEIVER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_transaction() {
        let transaction = Transaction::new("Alice", "Bob", 5.0);

        assert_eq!(transaction.sender, "Alice");
        assert_eq!(transaction.receiver, "Bob");
        assert_eq!(transaction.amount, 5.0);
        assert!(!transaction.is_reward());
    }

    #[test]
    fn test_reward_transaction() {
        let transaction = Transaction::reward(10.0);

        assert_eq!(transaction.sender, "Network");
        assert_eq!(transaction.receiver, "Miner");
        assert_eq!(transaction.amount, 10.0);
        assert!(transaction.is_reward());
    }

    #[test]
    fn test_serialization() {
        let transaction = Transaction::new("Alice", "Bob", 5.0);

        let json = serde_json::to_string(&transaction).unwrap();
        assert_eq!(json, r#"{"sender":"Alice","receiver":"Bob","amount":5.0}"#);

        let deserialized: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(transaction, deserialized);
    }
}
