use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::discover::dataset_name;
use crate::error::{LoaderError, LoaderResult};
use crate::traits::{DatasetLoader, LoadedDataset};

/// Serves preset JSON values keyed by source path.
///
/// Intended for tests and embedding. Paths not registered are reported as
/// unreadable, exactly like a missing file.
#[derive(Clone, Debug, Default)]
pub struct InMemoryLoader {
    sources: HashMap<PathBuf, Value>,
}

impl InMemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `value` as the content of `path`.
    pub fn with_source(mut self, path: impl Into<PathBuf>, value: Value) -> Self {
        self.sources.insert(path.into(), value);
        self
    }
}

impl DatasetLoader for InMemoryLoader {
    fn load(&self, source: &Path) -> LoaderResult<LoadedDataset> {
        let unreadable = |reason: &str| LoaderError::SourceUnreadable {
            path: source.to_path_buf(),
            reason: reason.to_string(),
        };
        let value = self
            .sources
            .get(source)
            .cloned()
            .ok_or_else(|| unreadable("no such source"))?;
        let name = dataset_name(source).ok_or_else(|| unreadable("no file name"))?;
        Ok(LoadedDataset { name, value })
    }
}
