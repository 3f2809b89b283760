use std::{future::Future, net::SocketAddr};

use axum::http::{HeaderValue, Method};
use axum::Router;
use configs::{AppConfig, CorsConfig};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};
use service::{
    file::extension_store::ExtensionStore, runtime, services::extension_service::ExtensionService,
};

/// CORS for the web form: one configured origin, or any origin when unset.
pub fn build_cors(cfg: &CorsConfig) -> Result<CorsLayer, StartupError> {
    let origin = match cfg.allowed_origin.as_deref() {
        None => AllowOrigin::from(Any),
        Some(origin) => {
            let value = HeaderValue::from_str(origin)
                .map_err(|e| StartupError::InvalidConfig(format!("cors.allowed_origin {origin:?}: {e}")))?;
            AllowOrigin::exact(value)
        }
    };
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any))
}

/// Open the data file (seeding it if missing) and wire the service.
pub async fn build_state(cfg: &AppConfig) -> Result<ServerState, StartupError> {
    let data_file = &cfg.storage.data_file;
    runtime::ensure_env(data_file)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    let store = ExtensionStore::new(data_file.clone())
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    info!(data_file = %store.path().display(), "blocklist store ready");
    Ok(ServerState { extensions: ExtensionService::new(store) })
}

/// Build the complete application from configuration.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let state = build_state(cfg).await?;
    let cors = build_cors(&cfg.cors)?;
    Ok(routes::build_router(state, cors))
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Serve until `shutdown` resolves.
pub async fn run_with_shutdown<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app(&cfg).await?;
    let addr = bind_addr(&cfg)?;
    info!(%addr, origin = cfg.cors.allowed_origin.as_deref().unwrap_or("*"), "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("server stopped");
    Ok(())
}

/// Public entry: build the app and run the HTTP server until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    run_with_shutdown(cfg, async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C, shutting down");
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_origin_when_unset() {
        assert!(build_cors(&CorsConfig::default()).is_ok());
    }

    #[test]
    fn exact_origin_must_be_a_header_value() {
        let ok = CorsConfig { allowed_origin: Some("http://localhost:5173".into()) };
        assert!(build_cors(&ok).is_ok());
        let bad = CorsConfig { allowed_origin: Some("http://bad\norigin".into()) };
        assert!(matches!(build_cors(&bad), Err(StartupError::InvalidConfig(_))));
    }

    #[test]
    fn bind_addr_joins_host_and_port() -> anyhow::Result<()> {
        let mut cfg = AppConfig::default();
        cfg.server.host = "127.0.0.1".into();
        cfg.server.port = 3000;
        assert_eq!(bind_addr(&cfg)?.to_string(), "127.0.0.1:3000");
        Ok(())
    }

    #[tokio::test]
    async fn shutdown_signal_stops_the_server() -> anyhow::Result<()> {
        let mut cfg = AppConfig::default();
        cfg.server.host = "127.0.0.1".into();
        cfg.server.port = 0;
        let dir = std::env::temp_dir().join(format!("startup_test_{}", uuid::Uuid::new_v4()));
        cfg.storage.data_file = dir.join("data.json");

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(run_with_shutdown(cfg, async {
            let _ = rx.await;
        }));
        let _ = tx.send(());

        let result = tokio::time::timeout(std::time::Duration::from_secs(10), handle).await??;
        assert!(result.is_ok());
        let _ = tokio::fs::remove_dir_all(dir).await;
        Ok(())
    }
}
