//! Persisted key-value storage abstraction

/// Synchronous string storage in the manner of browser local storage.
///
/// Reads of absent or unreadable keys yield `None`. Writes never fail from the
/// caller's point of view; implementations log and drop storage errors.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
}
