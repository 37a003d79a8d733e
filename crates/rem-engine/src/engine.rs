use std::path::PathBuf;

use rem_loader::{DatasetLoader, JsonFileLoader, LoadedDataset};
use rem_session::SessionStore;
use rem_types::{json_kind, Dataset, Draft, Item, ItemId, RootBlob};

use crate::error::{EngineError, EngineResult};
use crate::page::{paginate, Page, PageRequest};

/// Session key under which the root blob is stored.
pub const ROOT_KEY: &str = "remserver";

/// The mock store engine.
///
/// Holds only configuration: the list of dataset sources and the loader
/// that resolves them. Session state is passed into every call, so one
/// engine serves any number of sessions.
#[derive(Clone, Debug)]
pub struct RemEngine<L = JsonFileLoader> {
    sources: Vec<PathBuf>,
    loader: L,
}

impl RemEngine<JsonFileLoader> {
    /// An engine reading sources from the filesystem.
    pub fn new() -> Self {
        Self::with_loader(JsonFileLoader)
    }
}

impl Default for RemEngine<JsonFileLoader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: DatasetLoader> RemEngine<L> {
    pub fn with_loader(loader: L) -> Self {
        Self {
            sources: Vec::new(),
            loader,
        }
    }

    /// Set the sources `init` loads. No I/O happens here.
    pub fn configure<I, P>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    /// The configured sources.
    pub fn default_dataset(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    // ---- Lifecycle ----

    /// Load every configured source into a fresh root blob without touching
    /// any session.
    ///
    /// Sources deriving the same dataset name replace earlier ones.
    pub fn load_root(&self) -> EngineResult<RootBlob> {
        let mut blob = RootBlob::new();
        for source in &self.sources {
            let LoadedDataset { name, value } = self.loader.load(source)?;
            let found = json_kind(&value);
            let dataset = Dataset::from_value(value).ok_or_else(|| EngineError::InvalidSource {
                path: source.clone(),
                found,
            })?;
            if blob.insert(name.as_str(), dataset).is_some() {
                tracing::warn!(dataset = %name, source = %source.display(), "dataset name loaded twice, keeping the later source");
            }
        }
        Ok(blob)
    }

    /// Fill the session with the configured datasets, replacing whatever it
    /// held before.
    ///
    /// On error nothing is written and prior session state is kept.
    pub fn init<S: SessionStore + ?Sized>(&self, session: &S) -> EngineResult<()> {
        let blob = self.load_root().inspect_err(|e| {
            tracing::warn!(error = %e, "session init failed");
        })?;
        tracing::info!(datasets = blob.len(), "session initiated with default datasets");
        self.write_blob(session, blob);
        Ok(())
    }

    /// Whether the session has been initialized, whatever it holds.
    pub fn has_dataset<S: SessionStore + ?Sized>(&self, session: &S) -> bool {
        session.has(ROOT_KEY)
    }

    // ---- Dataset level ----

    /// The named dataset, or an empty one if the session or name is unknown.
    pub fn get_dataset<S: SessionStore + ?Sized>(&self, session: &S, name: &str) -> Dataset {
        self.read_blob(session).take(name).unwrap_or_default()
    }

    /// Replace the named dataset in the session's root blob.
    ///
    /// Every mutation goes through here.
    pub fn save_dataset<S: SessionStore + ?Sized>(&self, session: &S, name: &str, dataset: Dataset) {
        let mut blob = self.read_blob(session);
        blob.insert(name, dataset);
        self.write_blob(session, blob);
    }

    /// One page of the named dataset.
    pub fn list<S: SessionStore + ?Sized>(
        &self,
        session: &S,
        name: &str,
        request: PageRequest,
    ) -> Page {
        paginate(&self.get_dataset(session, name), request)
    }

    // ---- Item level ----

    /// First item in the dataset whose integer id equals `id`.
    pub fn get_item<S: SessionStore + ?Sized>(
        &self,
        session: &S,
        name: &str,
        id: ItemId,
    ) -> Option<Item> {
        self.get_dataset(session, name).find(id).cloned()
    }

    /// Append `draft` under the next free id and return the stored item.
    pub fn add_item<S: SessionStore + ?Sized>(&self, session: &S, name: &str, draft: Draft) -> Item {
        let mut dataset = self.get_dataset(session, name);
        let item = draft.into_item(dataset.next_id());
        dataset.push(item.clone());
        self.save_dataset(session, name, dataset);
        tracing::debug!(dataset = name, id = %item.id(), "added item");
        item
    }

    /// Store `draft` under `id`, replacing an existing item in place or
    /// appending a new one. Any `id` inside the draft is overwritten.
    pub fn upsert_item<S: SessionStore + ?Sized>(
        &self,
        session: &S,
        name: &str,
        id: ItemId,
        draft: Draft,
    ) -> Item {
        let mut dataset = self.get_dataset(session, name);
        let item = draft.into_item(id);
        let replaced = dataset.upsert(item.clone());
        self.save_dataset(session, name, dataset);
        tracing::debug!(dataset = name, %id, replaced, "upserted item");
        item
    }

    /// Remove the first item with `id`. The dataset is written back whether
    /// or not anything matched. Returns `true` if an item was removed.
    pub fn delete_item<S: SessionStore + ?Sized>(&self, session: &S, name: &str, id: ItemId) -> bool {
        let mut dataset = self.get_dataset(session, name);
        let removed = dataset.remove(id).is_some();
        self.save_dataset(session, name, dataset);
        tracing::debug!(dataset = name, %id, removed, "deleted item");
        removed
    }

    // ---- Root blob I/O ----

    fn read_blob<S: SessionStore + ?Sized>(&self, session: &S) -> RootBlob {
        session
            .get(ROOT_KEY)
            .map(RootBlob::from_value_lossy)
            .unwrap_or_default()
    }

    fn write_blob<S: SessionStore + ?Sized>(&self, session: &S, blob: RootBlob) {
        session.set(ROOT_KEY, blob.into_value());
    }
}
