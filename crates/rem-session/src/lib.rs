//! Session-scoped storage for the REM server.
//!
//! Each client of the mock server owns one session. A session holds a
//! small key-value store; the engine keeps its whole state under a single
//! key in it and rewrites that value on every mutation.
//!
//! # Modules
//!
//! - [`traits`]: The [`SessionStore`] trait (`has` / `get` / `set`)
//! - [`memory`]: [`InMemorySessionStore`], a `HashMap` behind a `RwLock`
//! - [`session`]: [`SessionId`] and [`Session`], one client's store plus
//!   its single-writer gate
//! - [`registry`]: [`SessionRegistry`], all live sessions of a server
//!
//! # Design Rules
//!
//! 1. Sessions never share state. Dropping a session drops its data.
//! 2. One request at a time mutates a session (hold [`Session::lock`]).
//! 3. Store operations are infallible; absent keys read as `None`.

pub mod error;
pub mod memory;
pub mod registry;
pub mod session;
pub mod traits;

pub use error::{SessionError, SessionResult};
pub use memory::InMemorySessionStore;
pub use registry::SessionRegistry;
pub use session::{Session, SessionGuard, SessionId};
pub use traits::SessionStore;
