//! Dataset source loading for the REM server.
//!
//! A dataset source is a JSON file. Loading one yields the dataset name
//! (the file stem, `books.json` → `books`) and the parsed JSON value.
//!
//! All loaders implement [`DatasetLoader`]:
//!
//! - [`JsonFileLoader`]: reads sources from the filesystem
//! - [`InMemoryLoader`]: serves preset values, for tests and embedding
//!
//! [`discover_sources`] lists the `*.json` files of a fixtures directory.

pub mod discover;
pub mod error;
pub mod json;
pub mod memory;
pub mod traits;

pub use discover::{dataset_name, discover_sources};
pub use error::{LoaderError, LoaderResult};
pub use json::JsonFileLoader;
pub use memory::InMemoryLoader;
pub use traits::{DatasetLoader, LoadedDataset};
