mod config;

use std::sync::Arc;

use tracing::info;

use painter_api::seed::seed_default_users;
use painter_api::{AppStateInner, build_router};
use painter_db::Database;

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "painter=debug,painter_api=debug,painter_db=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = ServerConfig::from_env()?;

    // Init database
    let db = Arc::new(Database::open(&config.db_path)?);
    let state = AppStateInner::new(db);

    // Seed demo accounts before accepting traffic
    let users = state.users.clone();
    tokio::task::spawn_blocking(move || seed_default_users(&users)).await??;

    let app = build_router(state, config.cors_origin.clone());

    info!("Painter server listening on {}", config.addr);
    info!("Allowing cross-origin requests from {:?}", config.cors_origin);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
