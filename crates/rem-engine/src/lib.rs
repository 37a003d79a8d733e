//! The REM mock store engine.
//!
//! [`RemEngine`] owns the dataset and item semantics of the mock server but
//! holds no session state itself. Every operation takes the caller's
//! [`SessionStore`](rem_session::SessionStore) and does a full
//! read-modify-write of the root blob stored under [`ROOT_KEY`].
//!
//! # Rules
//!
//! 1. `init` is the only fallible operation. It loads every configured
//!    source before writing anything, so a bad source leaves the session
//!    untouched.
//! 2. Missing data is never an error: unknown datasets read as empty,
//!    unknown items as `None`, deleting an unknown id is a no-op.
//! 3. `add_item` assigns `max(id) + 1` (1 for an empty dataset).
//! 4. `upsert_item` forces the caller's id, replacing in place or appending.
//! 5. Ids match strictly by type: the string `"3"` never matches `3`.

pub mod engine;
pub mod error;
pub mod page;

pub use engine::{RemEngine, ROOT_KEY};
pub use error::{EngineError, EngineResult};
pub use page::{paginate, Page, PageRequest, DEFAULT_LIMIT, DEFAULT_OFFSET};

pub use rem_types::{Dataset, Draft, Entry, Item, ItemId, RootBlob};
