//! catalog Service - Product Catalog

use catalog::api::build_router;
use catalog::infrastructure::migrations::migrations;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    bootstrap::run_http("config", &migrations(), |infra| async move {
        info!("Initializing catalog service...");
        build_router(infra.postgres_pool(), infra.token_service())
    })
    .await
}
