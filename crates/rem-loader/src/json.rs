use std::fs;
use std::path::Path;

use crate::discover::dataset_name;
use crate::error::{LoaderError, LoaderResult};
use crate::traits::{DatasetLoader, LoadedDataset};

/// Loads dataset sources from JSON files on disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonFileLoader;

impl JsonFileLoader {
    pub fn new() -> Self {
        Self
    }
}

impl DatasetLoader for JsonFileLoader {
    fn load(&self, source: &Path) -> LoaderResult<LoadedDataset> {
        let unreadable = |reason: String| LoaderError::SourceUnreadable {
            path: source.to_path_buf(),
            reason,
        };

        let metadata = fs::metadata(source).map_err(|e| unreadable(e.to_string()))?;
        if !metadata.is_file() {
            return Err(unreadable("not a regular file".into()));
        }
        let name = dataset_name(source).ok_or_else(|| unreadable("no file name".into()))?;
        let content = fs::read_to_string(source).map_err(|e| unreadable(e.to_string()))?;
        let value = serde_json::from_str(&content).map_err(|e| LoaderError::Parse {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;

        tracing::debug!(source = %source.display(), dataset = %name, "loaded dataset source");
        Ok(LoadedDataset { name, value })
    }
}
