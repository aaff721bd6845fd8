mod config;

use std::sync::Arc;

use anyhow::Context;
use axum::http::{Method, header::CONTENT_TYPE};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use herald_api::AppStateInner;
use herald_dispatch::{DispatchEngine, StaticDirectory, UserDirectory};
use herald_store::FileLogStore;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "herald=debug,herald_api=debug,herald_dispatch=debug,herald_store=debug,tower_http=debug"
                        .into()
                }),
        )
        .init();

    let config = Config::from_env()?;

    let directory: Arc<dyn UserDirectory> = match &config.directory_path {
        Some(path) => Arc::new(StaticDirectory::load_json(path)?),
        None => {
            info!("Using built-in subscriber directory");
            Arc::new(StaticDirectory::builtin())
        }
    };
    let store = Arc::new(FileLogStore::new(config.log_path.clone()));
    let engine = DispatchEngine::new(directory, store).with_default_notifiers();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    let app = herald_api::router(AppStateInner::new(engine))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    info!("Herald listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
