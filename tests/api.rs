use actix_web::http::StatusCode;
use actix_web::{test, web, App};

use pouw_chain::api;
use pouw_chain::api::handlers::{ChainResponse, MineResponse, TransactionResponse};
use pouw_chain::blockchain::Blockchain;

// Difficulty 0 makes mining deterministic: attempt 0 always qualifies.
fn zero_difficulty_ledger() -> web::Data<Blockchain> {
    web::Data::new(Blockchain::with_params(0, 10.0))
}

#[actix_web::test]
async fn submit_mine_and_inspect_chain() {
    let blockchain = zero_difficulty_ledger();
    let app = test::init_service(
        App::new()
            .app_data(blockchain.clone())
            .configure(api::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/transactions/new")
        .set_json(serde_json::json!({"sender": "Alice", "receiver": "Bob", "amount": 5.0}))
        .to_request();
    let submitted: TransactionResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(submitted.block_index, 2);

    let req = test::TestRequest::post()
        .uri("/api/v1/mine")
        .set_json(serde_json::json!({"matrix_size": 2, "seed": 42}))
        .to_request();
    let mined: MineResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(mined.block.index, 2);
    assert_eq!(mined.attempt, 0);
    assert!(mined.work_time >= 0.0);

    // The submitted transaction plus the miner reward
    assert_eq!(mined.block.transactions.len(), 2);
    assert_eq!(mined.block.transactions[0].sender, "Alice");
    assert_eq!(mined.block.transactions[1].sender, "Network");
    assert_eq!(mined.block.transactions[1].receiver, "Miner");
    assert_eq!(mined.block.transactions[1].amount, 10.0);

    let req = test::TestRequest::get().uri("/api/v1/chain").to_request();
    let chain: ChainResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(chain.length, 2);
    assert!(chain.is_valid);
    assert_eq!(chain.chain[1].previous_hash, chain.chain[0].digest());

    let req = test::TestRequest::get().uri("/api/v1/validate").to_request();
    let valid: bool = test::call_and_read_body_json(&app, req).await;
    assert!(valid);

    let req = test::TestRequest::get()
        .uri("/api/v1/transactions/pending")
        .to_request();
    let pending: Vec<serde_json::Value> = test::call_and_read_body_json(&app, req).await;
    assert!(pending.is_empty());
}

#[actix_web::test]
async fn mine_rejects_degenerate_matrix_size() {
    let app = test::init_service(
        App::new()
            .app_data(zero_difficulty_ledger())
            .configure(api::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/mine")
        .set_json(serde_json::json!({"matrix_size": 0, "seed": 1}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn transaction_rejects_blank_sender() {
    let app = test::init_service(
        App::new()
            .app_data(zero_difficulty_ledger())
            .configure(api::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/transactions/new")
        .set_json(serde_json::json!({"sender": "", "receiver": "Bob", "amount": 5.0}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn audit_listing_unavailable_without_store() {
    let app = test::init_service(
        App::new()
            .app_data(zero_difficulty_ledger())
            .configure(api::configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/transactions")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}
