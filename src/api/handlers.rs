use actix_web::{web, HttpResponse, Responder};
use log::warn;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::blockchain::{
    AuditRecord, Block, Blockchain, BlockchainError, Transaction, WorkChallenge,
    DEFAULT_MAX_ATTEMPTS,
};

/// Data structure for the shared ledger state
pub type BlockchainData = web::Data<Blockchain>;

/// Response for the chain endpoint
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ChainResponse {
    /// The length of the chain
    pub length: usize,

    /// The blocks in the chain
    pub chain: Vec<Block>,

    /// Whether the chain's hash linkage holds
    pub is_valid: bool,
}

/// Request for the transaction endpoint
#[derive(Serialize, Deserialize, ToSchema)]
pub struct TransactionRequest {
    /// The sender's name
    pub sender: String,

    /// The receiver's name
    pub receiver: String,

    /// The amount to transfer
    pub amount: f64,
}

/// Response for the transaction endpoint
#[derive(Serialize, Deserialize, ToSchema)]
pub struct TransactionResponse {
    /// The message
    pub message: String,

    /// The index of the block that will include this transaction
    pub block_index: u64,
}

/// Request for the mine endpoint
#[derive(Serialize, Deserialize, ToSchema)]
pub struct MineRequest {
    /// Side length of the matrices multiplied as useful work
    pub matrix_size: usize,

    /// Base seed for the deterministic workload
    pub seed: u64,
}

/// Response for the mine endpoint
#[derive(Serialize, Deserialize, ToSchema)]
pub struct MineResponse {
    /// The message
    pub message: String,

    /// The newly minted block
    pub block: Block,

    /// Wall-clock seconds spent on the winning matrix product
    pub work_time: f64,

    /// Attempt number that produced the accepted proof
    pub attempt: u32,
}

/// Get the full chain
///
/// Returns the entire chain and its validity status
#[utoipa::path(
    get,
    path = "/api/v1/chain",
    responses(
        (status = 200, description = "Chain retrieved successfully", body = ChainResponse)
    )
)]
pub async fn get_chain(blockchain: BlockchainData) -> impl Responder {
    let chain = blockchain.get_chain();
    let is_valid = blockchain.is_valid();

    let response = ChainResponse {
        length: chain.len(),
        chain,
        is_valid,
    };

    HttpResponse::Ok().json(response)
}

/// Get all pending transactions
///
/// Returns all transactions waiting to be included in a block
#[utoipa::path(
    get,
    path = "/api/v1/transactions/pending",
    responses(
        (status = 200, description = "Pending transactions retrieved successfully", body = Vec<Transaction>)
    )
)]
pub async fn get_pending_transactions(blockchain: BlockchainData) -> impl Responder {
    let transactions = blockchain.pending_transactions();
    HttpResponse::Ok().json(transactions)
}

/// Create a new transaction
///
/// Adds a new transaction to the pending pool and mirrors it to the audit log
#[utoipa::path(
    post,
    path = "/api/v1/transactions/new",
    request_body = TransactionRequest,
    responses(
        (status = 201, description = "Transaction created successfully", body = TransactionResponse),
        (status = 400, description = "Invalid transaction data"),
        (status = 503, description = "Transaction accepted but audit store unavailable")
    )
)]
pub async fn new_transaction(
    blockchain: BlockchainData,
    transaction_req: web::Json<TransactionRequest>,
) -> impl Responder {
    match blockchain.add_transaction(
        &transaction_req.sender,
        &transaction_req.receiver,
        transaction_req.amount,
    ) {
        Ok(block_index) => {
            let response = TransactionResponse {
                message: format!("Transaction will be added to Block {}", block_index),
                block_index,
            };

            HttpResponse::Created().json(response)
        }
        Err(err @ BlockchainError::InvalidTransaction(_)) => {
            HttpResponse::BadRequest().json(serde_json::json!({
                "error": format!("Failed to add transaction: {}", err)
            }))
        }
        // The transaction is pooled at this point; only the audit mirror failed
        Err(err) => {
            warn!("transaction accepted but audit append failed: {}", err);

            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "error": format!("Transaction accepted but not audited: {}", err)
            }))
        }
    }
}

/// Mine a new block
///
/// Searches for a proof of useful work and, on success, mints a block with
/// all pending transactions
#[utoipa::path(
    post,
    path = "/api/v1/mine",
    request_body = MineRequest,
    responses(
        (status = 200, description = "Block mined successfully", body = MineResponse),
        (status = 400, description = "Invalid parameters, or difficulty unmet within the attempt budget"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn mine_block(
    blockchain: BlockchainData,
    mine_req: web::Json<MineRequest>,
) -> impl Responder {
    let challenge = match WorkChallenge::new(
        mine_req.matrix_size,
        mine_req.seed,
        blockchain.difficulty(),
        DEFAULT_MAX_ATTEMPTS,
    ) {
        Ok(challenge) => challenge,
        Err(err) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": format!("Invalid task input: {}", err)
            }));
        }
    };

    // The search is CPU-bound: run it on the blocking pool, outside any
    // ledger lock. Only the final mint takes exclusive access.
    let outcome = web::block(move || challenge.search()).await;

    match outcome {
        Ok(Some(work)) => {
            let previous_hash = blockchain.last_block().digest();
            let block = blockchain.mint_block(work.proof, previous_hash);

            HttpResponse::Ok().json(MineResponse {
                message: "Block mined successfully".to_string(),
                block,
                work_time: work.elapsed.as_secs_f64(),
                attempt: work.attempt,
            })
        }
        Ok(None) => HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Useful work failed to meet difficulty after multiple attempts"
        })),
        Err(err) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Mining worker failed: {}", err)
        })),
    }
}

/// List audited transactions
///
/// Returns every transaction recorded in the external audit log
#[utoipa::path(
    get,
    path = "/api/v1/transactions",
    responses(
        (status = 200, description = "Audited transactions retrieved successfully", body = Vec<AuditRecord>),
        (status = 503, description = "Audit store unavailable")
    )
)]
pub async fn list_transactions(blockchain: BlockchainData) -> impl Responder {
    match blockchain.audit_records() {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(err) => {
            warn!("audit store read failed: {}", err);

            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "error": format!("Audit store unavailable: {}", err)
            }))
        }
    }
}

/// Check if the chain is valid
///
/// Validates the hash linkage of the entire chain
#[utoipa::path(
    get,
    path = "/api/v1/validate",
    responses(
        (status = 200, description = "Chain validation status", body = bool)
    )
)]
pub async fn validate_chain(blockchain: BlockchainData) -> impl Responder {
    let is_valid = blockchain.is_valid();
    HttpResponse::Ok().json(is_valid)
}
