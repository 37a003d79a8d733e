//! Foundation types for the REM (REST mock) server.
//!
//! Every other `rem-*` crate depends on `rem-types`. The types here replace
//! duck-typed `id` lookups on loose JSON with a small sum type:
//!
//! # Key Types
//!
//! - [`ItemId`]: Integer identifier of a stored item
//! - [`Draft`]: Raw JSON object payload pending id assignment
//! - [`Item`]: Validated record whose `id` field is an integer
//! - [`Entry`]: Element of a dataset: an [`Item`] or a preserved raw value
//! - [`Dataset`]: Ordered collection of entries
//! - [`RootBlob`]: Per-session mapping from dataset name to [`Dataset`]

pub mod dataset;
pub mod error;
pub mod item;

pub use dataset::{Dataset, RootBlob};
pub use error::{json_kind, TypeError};
pub use item::{Draft, Entry, Item, ItemId, ID_FIELD};
