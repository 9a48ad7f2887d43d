use checkout_hex::application::checkout_service::CheckoutService;
use checkout_hex::config::Config;
use checkout_hex::inbound::http::{HttpServer, HttpServerConfig};
use checkout_repo::{build_repo, Repo};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for SERVER_PORT / DATABASE_URL / PROMO_CODES when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string()))
        .init();

    let config = Config::from_env()?;
    tracing::info!(promo_codes = config.promo_codes.len(), "configuration loaded");

    let repo: Repo = build_repo(config.database_url.as_deref()).await?;
    let service = CheckoutService::new(repo, config.promo_codes);

    let server_cfg = HttpServerConfig {
        port: config.server_port.clone(),
    };

    let http = HttpServer::new(service, server_cfg).await?;
    http.run().await
}
