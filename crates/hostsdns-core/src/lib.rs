// # hostsdns-core
//
// Core library for the hosts-file external-dns webhook provider.
//
// ## Architecture Overview
//
// This library provides everything except the HTTP surface:
// - **Endpoint / Changes / DomainFilter**: The external-dns wire model
// - **HostsFile**: Line-preserving hosts-file document and reconciliation
// - **RecordStore**: Trait for loading and saving the document
// - **HostsProvider**: Answers records / apply / adjust requests
//
// ## Design Principles
//
// 1. **No cached state**: Every request reads the store again
// 2. **Whole-file rewrite**: Changes are applied by rewriting every line
// 3. **Byte preservation**: Lines not touched by a delete are written back verbatim
// 4. **Library-first**: The daemon and the webhook crate are thin layers on top

pub mod config;
pub mod endpoint;
pub mod error;
pub mod hosts;
pub mod provider;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use config::{RecordStoreConfig, WebhookConfig, WriteMode};
pub use endpoint::{Changes, DomainFilter, Endpoint, MEDIA_TYPE, RECORD_TYPE_A};
pub use error::{Error, Result};
pub use hosts::{ApplyOutcome, HostsFile, HostsLine};
pub use provider::HostsProvider;
pub use store::{HostsFileStore, MemoryRecordStore, build_store};
pub use traits::RecordStore;
