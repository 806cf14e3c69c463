use crate::errors::CoreError;

/// Abstract per-user persistent store backing the watchlist, portfolio,
/// and alert collections.
///
/// Values are opaque strings (in practice, JSON-serialized collections).
/// Each user's state lives under its own namespace; the core never reads
/// or writes across namespaces. Any backend (file, embedded database,
/// remote call) can implement this without touching core logic.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, CoreError>;

    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), CoreError>;

    fn remove(&self, namespace: &str, key: &str) -> Result<(), CoreError>;
}
