//! Shared fixtures for contract tests
//!
//! Providers here are backed by the in-memory store so that the
//! reconciliation contract can be checked without touching a real file.

#![allow(dead_code)]

use hostsdns_core::{Endpoint, HostsProvider, MemoryRecordStore};

/// A realistic hosts file: loopback block, comments, a malformed line,
/// multi-host lines and an inline comment
pub const SAMPLE_HOSTS: &str = "\
127.0.0.1\tlocalhost
::1\tlocalhost ip6-localhost ip6-loopback

# managed by external-dns
10.0.0.10  api.lan   api-v2.lan
10.0.0.11\tdb.lan # primary database
orphan-token
   10.0.0.12 cache.lan
";

/// Provider over a memory store holding `contents`, plus a handle to the
/// store for assertions
pub fn provider_with(contents: &str) -> (HostsProvider, MemoryRecordStore) {
    let store = MemoryRecordStore::with_contents(contents);
    (HostsProvider::new(Box::new(store.clone())), store)
}

/// Endpoint as the controller sends it for a create
pub fn create(name: &str, targets: &[&str]) -> Endpoint {
    Endpoint {
        dns_name: name.to_string(),
        targets: targets.iter().map(|t| t.to_string()).collect(),
        ..Endpoint::default()
    }
}

/// Endpoint as the controller sends it for a delete
pub fn delete(name: &str) -> Endpoint {
    Endpoint {
        dns_name: name.to_string(),
        ..Endpoint::default()
    }
}

/// Hostnames (in order) of a list of endpoints
pub fn names(endpoints: &[Endpoint]) -> Vec<String> {
    endpoints.iter().map(|e| e.dns_name.clone()).collect()
}
