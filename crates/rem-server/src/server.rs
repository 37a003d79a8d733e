use tokio::net::TcpListener;

use rem_engine::RemEngine;
use rem_loader::{DatasetLoader, JsonFileLoader};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::{AppState, SharedEngine};

/// REM mock server.
pub struct RemServer {
    state: AppState,
}

impl RemServer {
    /// A server loading its dataset sources from the filesystem.
    ///
    /// Resolves `data_dir` now; the sources themselves are read when a
    /// session is first initialized.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let sources = config.dataset_sources()?;
        let engine = RemEngine::with_loader(Box::new(JsonFileLoader) as Box<dyn DatasetLoader>)
            .configure(sources);
        Ok(Self::with_engine(config, engine))
    }

    /// A server around a preconfigured engine.
    pub fn with_engine(config: ServerConfig, engine: SharedEngine) -> Self {
        Self {
            state: AppState::new(config, engine),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.state.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Start serving requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let addr = self.state.config.bind_addr;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(
            "REM server listening on {} (api prefix '{}', {} dataset source(s))",
            listener.local_addr()?,
            self.state.config.normalized_prefix(),
            self.state.engine.default_dataset().len()
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
