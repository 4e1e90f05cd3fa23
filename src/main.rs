use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use log::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use pouw_chain::api;
use pouw_chain::blockchain::{self, Blockchain};

// Initialize the ledger, attaching the transaction audit store when it opens
fn initialize_blockchain() -> Blockchain {
    let data_dir = "data/audit";

    std::fs::create_dir_all(data_dir).unwrap_or_else(|e| {
        warn!("Failed to create data directory: {}", e);
    });

    match Blockchain::with_audit(data_dir) {
        Ok(blockchain) => {
            info!("Opened transaction audit store at {}", data_dir);
            blockchain
        }
        Err(err) => {
            warn!("Failed to open audit store: {}", err);
            warn!("Continuing without transaction auditing");

            Blockchain::new()
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::get_chain,
        api::handlers::get_pending_transactions,
        api::handlers::new_transaction,
        api::handlers::mine_block,
        api::handlers::list_transactions,
        api::handlers::validate_chain
    ),
    components(
        schemas(
            blockchain::Block,
            blockchain::Transaction,
            blockchain::AuditRecord,
            api::handlers::ChainResponse,
            api::handlers::TransactionRequest,
            api::handlers::TransactionResponse,
            api::handlers::MineRequest,
            api::handlers::MineResponse
        )
    ),
    tags(
        (name = "blockchain", description = "Proof-of-useful-work ledger endpoints")
    ),
    info(
        title = "Proof-of-Useful-Work Blockchain API",
        version = "1.0.0",
        description = "A single-chain ledger accepting blocks against verifiable matrix-multiplication work"
    )
)]
struct ApiDoc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let blockchain = web::Data::new(initialize_blockchain());

    info!("Starting HTTP server at http://localhost:8080");

    // Start HTTP server
    HttpServer::new(move || {
        // Configure CORS
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        // Configure OpenAPI documentation
        let openapi = ApiDoc::openapi();

        App::new()
            .wrap(middleware::Logger::default())
            .wrap(cors)
            .app_data(blockchain.clone())
            // API routes
            .configure(api::configure_routes)
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind(("127.0.0.1", 8080))?
    .run()
    .await
}
