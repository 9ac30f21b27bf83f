use std::net::SocketAddr;

use axum::Router;
use common::utils::logging::init_logging_from_env;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::ServerState;
use service::runtime;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Router for a ready state; shared by `run` and the HTTP tests.
pub fn build_app(state: ServerState, cfg: &configs::AppConfig) -> Router {
    routes::build_router(state, build_cors(), &cfg.media.root, cfg.media.max_upload_bytes)
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = configs::AppConfig::load_or_env()?;

    runtime::ensure_env(&cfg.media.root).await?;

    // DB connection
    let db_cfg = models::db::DatabaseConfig::from(&cfg.database);
    let db = models::db::connect_with_config(&db_cfg).await?;
    if cfg.database.auto_migrate {
        migration::Migrator::up(&db, None).await?;
        info!("migrations applied");
    }

    let state = ServerState::from_config(db, &cfg)?;
    let app = build_app(state, &cfg);

    // Bind and serve
    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, media_root = %cfg.media.root, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
