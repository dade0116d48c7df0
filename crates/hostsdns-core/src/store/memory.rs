// # Memory Record Store
//
// In-memory implementation of RecordStore.
//
// ## Purpose
//
// Holds hosts-file text in memory. Used by tests to exercise the
// provider without a real file, and by the daemon for dry runs where
// the host's own hosts file must stay untouched.
//
// ## Failure Injection
//
// Loads and saves can be switched to fail so callers can exercise their
// error paths.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::Error;
use crate::hosts::HostsFile;
use crate::traits::record_store::RecordStore;

/// In-memory record store
///
/// Cloning yields a handle to the same underlying text.
///
/// # Example
///
/// ```rust
/// use hostsdns_core::store::MemoryRecordStore;
/// use hostsdns_core::traits::RecordStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryRecordStore::with_contents("10.0.0.1 a.lan\n");
///
///     let file = store.load().await?;
///     assert_eq!(file.endpoints().len(), 1);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    inner: Arc<RwLock<String>>,
    fail_load: Arc<AtomicBool>,
    fail_save: Arc<AtomicBool>,
    save_count: Arc<AtomicUsize>,
}

impl MemoryRecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `contents`
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(contents.into())),
            ..Self::default()
        }
    }

    /// Current text of the store
    pub async fn contents(&self) -> String {
        self.inner.read().await.clone()
    }

    /// Replace the text of the store
    pub async fn set_contents(&self, contents: impl Into<String>) {
        *self.inner.write().await = contents.into();
    }

    /// Make subsequent loads fail (or succeed again)
    pub fn fail_loads(&self, fail: bool) {
        self.fail_load.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent saves fail (or succeed again)
    pub fn fail_saves(&self, fail: bool) {
        self.fail_save.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn load(&self) -> Result<HostsFile, Error> {
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(Error::store("memory store: load failure injected"));
        }
        let guard = self.inner.read().await;
        Ok(HostsFile::parse(&guard))
    }

    async fn save(&self, file: &HostsFile) -> Result<(), Error> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(Error::store("memory store: save failure injected"));
        }
        *self.inner.write().await = file.render();
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryRecordStore::with_contents("10.0.0.1 a.lan\n");

        let mut file = store.load().await.unwrap();
        assert_eq!(file.endpoints().len(), 1);

        file = HostsFile::parse("10.0.0.2 b.lan\n10.0.0.3 c.lan\n");
        store.save(&file).await.unwrap();

        assert_eq!(store.contents().await, "10.0.0.2 b.lan\n10.0.0.3 c.lan\n");
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_clones_share_state() {
        let store = MemoryRecordStore::new();
        let handle = store.clone();

        store.set_contents("10.0.0.1 a.lan\n").await;
        assert_eq!(handle.load().await.unwrap().endpoints().len(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_failure_injection() {
        let store = MemoryRecordStore::with_contents("10.0.0.1 a.lan\n");

        store.fail_loads(true);
        assert!(matches!(store.load().await, Err(Error::Store(_))));
        store.fail_loads(false);
        tokio_test::assert_ok!(store.load().await);

        store.fail_saves(true);
        let err = store.save(&HostsFile::default()).await.unwrap_err();
        assert!(err.to_string().contains("save failure"));
        assert_eq!(store.contents().await, "10.0.0.1 a.lan\n");
        assert_eq!(store.save_count(), 0);
    }
}
