//! Core traits for the hosts-file provider
//!
//! - [`RecordStore`]: Load and save the hosts document

pub mod record_store;

pub use record_store::RecordStore;
