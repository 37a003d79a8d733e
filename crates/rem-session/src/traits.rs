use serde_json::Value;

/// Key-value store scoped to one session.
///
/// Values are opaque JSON. Implementations must satisfy:
/// - `set` replaces any previous value under the key wholesale.
/// - `get` returns a copy; mutating it does not affect the store until it
///   is written back with `set`.
/// - `has` is true iff `set` was called for the key, whatever the value.
pub trait SessionStore: Send + Sync {
    /// Check whether a value exists under `key`.
    fn has(&self, key: &str) -> bool;

    /// Read the value under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key`.
    fn set(&self, key: &str, value: Value);
}

impl<S: SessionStore + ?Sized> SessionStore for &S {
    fn has(&self, key: &str) -> bool {
        (**self).has(key)
    }

    fn get(&self, key: &str) -> Option<Value> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Value) {
        (**self).set(key, value)
    }
}
