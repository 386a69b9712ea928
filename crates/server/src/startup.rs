use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;
use service::runtime;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Prepare the data directory, open both collections and build the router.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    runtime::ensure_data_dir(&cfg.storage.data_dir).await?;
    let state = AppState::from_config(&cfg.storage).await?;
    Ok(routes::build_router(state, build_cors()))
}

/// Public entry: build the app and run the HTTP server until Ctrl+C.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let app = build_app(&cfg).await?;

    let addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| StartupError::InvalidConfig(format!("cannot bind {addr}: {e}")))?;
    info!(
        %addr,
        users = %cfg.storage.users_path().display(),
        tweets = %cfg.storage.tweets_path().display(),
        password_scheme = ?cfg.storage.password_scheme,
        "starting server"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Any(e.into()))?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}
