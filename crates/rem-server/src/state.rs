use std::sync::Arc;

use rem_engine::RemEngine;
use rem_loader::DatasetLoader;
use rem_session::SessionRegistry;

use crate::config::ServerConfig;

/// Engine type the server runs, with the loader chosen at startup.
pub type SharedEngine = RemEngine<Box<dyn DatasetLoader>>;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SharedEngine>,
    pub sessions: Arc<SessionRegistry>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig, engine: SharedEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            sessions: Arc::new(SessionRegistry::new()),
            config: Arc::new(config),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("sources", &self.engine.default_dataset())
            .field("sessions", &self.sessions.len())
            .field("config", &self.config)
            .finish()
    }
}
