// # Record Store Trait
//
// Defines the interface to the medium holding the hosts file.
//
// ## Purpose
//
// The provider never touches the filesystem directly. It loads the
// current document, reconciles it in memory, and saves the result, so
// the reconciliation logic can be exercised against an in-memory store.
//
// ## Implementations
//
// - File-based: the real hosts file (`HostsFileStore`)
// - Memory: tests and dry runs (`MemoryRecordStore`)
//
// ## Usage
//
// ```rust,ignore
// use hostsdns_core::RecordStore;
//
// let store = /* RecordStore implementation */;
// let file = store.load().await?;
// for endpoint in file.endpoints() {
//     println!("{} -> {:?}", endpoint.dns_name, endpoint.targets);
// }
// store.save(&file).await?;
// ```

use async_trait::async_trait;

use crate::hosts::HostsFile;

/// Trait for record store implementations
///
/// Implementations hold no cached view of the document: every `load`
/// reads the medium again, and every `save` replaces its entire content.
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
/// Serializing load-modify-save cycles is the caller's job.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read the full document
    ///
    /// # Returns
    ///
    /// - `Ok(HostsFile)`: The current document
    /// - `Err(Error)`: The medium could not be read
    async fn load(&self) -> Result<HostsFile, crate::Error>;

    /// Replace the full document
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The new document is persisted
    /// - `Err(Error)`: Storage error; the previous content is left as it
    ///   was where the implementation can guarantee it
    async fn save(&self, file: &HostsFile) -> Result<(), crate::Error>;

    /// Human-readable location of the store, for logging
    fn describe(&self) -> String;
}
