// # Record Store Implementations
//
// This module provides implementations of the RecordStore trait and the
// constructor that picks one from configuration.

pub mod file;
pub mod memory;

pub use file::HostsFileStore;
pub use memory::MemoryRecordStore;

use crate::config::RecordStoreConfig;
use crate::traits::RecordStore;

/// Build the record store described by `config`
pub fn build_store(config: &RecordStoreConfig) -> Box<dyn RecordStore> {
    match config {
        RecordStoreConfig::File { path, write_mode } => {
            Box::new(HostsFileStore::new(path, *write_mode))
        }
        RecordStoreConfig::Memory { initial } => {
            Box::new(MemoryRecordStore::with_contents(initial.clone()))
        }
    }
}
