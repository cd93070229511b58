use std::{net::SocketAddr, sync::Arc};

use axum::{http::HeaderName, Router};
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, ServerState};
use service::{
    realtime::ConnectionRegistry,
    runtime,
    users::{FileUserStore, HttpSeedSource, UserRepository},
};

/// Permissive CORS that also lets browsers read the identity header.
pub fn build_cors(cfg: &AppConfig) -> anyhow::Result<CorsLayer> {
    let exposed = HeaderName::from_bytes(cfg.headers.user_header.as_bytes())?;
    Ok(CorsLayer::very_permissive().expose_headers([exposed]))
}

fn load_bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Wire the users store, registry and router for `cfg`.
pub fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let seed = Arc::new(HttpSeedSource::new(cfg.storage.seed_url.clone()));
    let users: Arc<dyn UserRepository> = FileUserStore::new(&cfg.storage.users_file, seed);
    let state = ServerState::new(users, ConnectionRegistry::new(), &cfg.assets.title);
    let cors = build_cors(cfg)?;
    routes::build_router(state, cfg, cors)
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!(service = "server", event = "shutdown_signal", "received Ctrl+C, shutting down");
    }
}

/// Public entry: build the app for `cfg` and run the HTTP server until Ctrl+C
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    runtime::ensure_env(&cfg.assets.dir, &cfg.storage.users_file).await?;
    let app = build_app(&cfg)?;

    let addr = load_bind_addr(&cfg)?;
    info!(
        %addr,
        users_file = %cfg.storage.users_file,
        seed_url = %cfg.storage.seed_url,
        sockets = cfg.sockets.enabled,
        "starting server"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_from_config() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "0.0.0.0".into();
        cfg.server.port = 9001;
        let addr = load_bind_addr(&cfg).expect("addr");
        assert_eq!(addr.port(), 9001);
        assert!(addr.ip().is_unspecified());
    }

    #[test]
    fn build_app_rejects_invalid_header_name() {
        let mut cfg = AppConfig::default();
        cfg.headers.user_header = "bad header".into();
        assert!(build_app(&cfg).is_err());
    }
}
