use std::net::SocketAddr;

use bargain_bazaar_backend::{config::AppConfig, db, router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let config = AppConfig::load()?;
    log::info!(
        "Configuration loaded (port {}, pool size {})",
        config.port,
        config.db_pool_size
    );

    let pool = db::init_pool(&config.database_url, config.db_pool_size)?;
    db::check_connectivity(&pool)?;

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    log::info!("Starting server on {}", addr);

    let app = router(AppState { config, pool });
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app.into_make_service()).await?;

    Ok(())
}
