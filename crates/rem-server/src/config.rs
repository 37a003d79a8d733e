use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use rem_engine::DEFAULT_LIMIT;

use crate::error::{ServerError, ServerResult};

/// Server settings, read from a TOML file. Missing keys take defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Path prefix of the REST routes, e.g. `/api`. Empty mounts them at
    /// the root.
    pub api_prefix: String,
    /// Dataset sources, loaded in order.
    pub datasets: Vec<PathBuf>,
    /// Directory whose `*.json` files are loaded after `datasets`.
    pub data_dir: Option<PathBuf>,
    pub cookie_name: String,
    /// Page size when a list request has no usable `limit`.
    pub default_limit: usize,
    /// Sessions idle this long are dropped.
    pub session_idle_secs: u64,
    /// Send permissive CORS headers.
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 1337)),
            api_prefix: "/api".into(),
            datasets: Vec::new(),
            data_dir: None,
            cookie_name: "remserver".into(),
            default_limit: DEFAULT_LIMIT,
            session_idle_secs: 3600,
            cors: true,
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Read a TOML config file.
    ///
    /// Relative dataset paths are resolved against the file's directory.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&text)?;
        if let Some(base) = path.parent() {
            config.datasets = config
                .datasets
                .into_iter()
                .map(|dataset| base.join(dataset))
                .collect();
            config.data_dir = config.data_dir.map(|dir| base.join(dir));
        }
        Ok(config)
    }

    /// Every dataset source: `datasets` followed by the files found in
    /// `data_dir`.
    pub fn dataset_sources(&self) -> ServerResult<Vec<PathBuf>> {
        let mut sources = self.datasets.clone();
        if let Some(dir) = &self.data_dir {
            sources.extend(rem_loader::discover_sources(dir)?);
        }
        Ok(sources)
    }

    /// The API prefix with a leading slash and no trailing slash; empty
    /// when routes are mounted at the root.
    pub fn normalized_prefix(&self) -> String {
        let trimmed = self.api_prefix.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }

    pub fn session_idle(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.session_idle_secs).unwrap_or(i64::MAX))
    }
}
