use std::path::Path;

use serde_json::Value;

use crate::error::LoaderResult;

/// A loaded source: the dataset name it derives and its parsed content.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedDataset {
    pub name: String,
    pub value: Value,
}

/// Resolves dataset sources to parsed JSON.
pub trait DatasetLoader: Send + Sync {
    /// Load one source.
    ///
    /// Fails with [`LoaderError::SourceUnreadable`](crate::LoaderError::SourceUnreadable)
    /// if the source is absent or unreadable.
    fn load(&self, source: &Path) -> LoaderResult<LoadedDataset>;
}

impl<L: DatasetLoader + ?Sized> DatasetLoader for Box<L> {
    fn load(&self, source: &Path) -> LoaderResult<LoadedDataset> {
        (**self).load(source)
    }
}

impl<L: DatasetLoader + ?Sized> DatasetLoader for std::sync::Arc<L> {
    fn load(&self, source: &Path) -> LoaderResult<LoadedDataset> {
        (**self).load(source)
    }
}
