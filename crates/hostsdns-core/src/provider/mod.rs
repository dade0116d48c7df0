//! Hosts-file provider
//!
//! The HostsProvider answers the four questions the external-dns
//! controller asks a webhook provider:
//!
//! - Which domains do you accept? ([`HostsProvider::domain_filter`])
//! - Which records exist? ([`HostsProvider::records`])
//! - Apply this change set ([`HostsProvider::apply_changes`])
//! - Adjust these endpoints ([`HostsProvider::adjust_endpoints`])
//!
//! ## Flow
//!
//! ```text
//!          Changes
//!             │
//!             ▼
//! ┌──────────────────────┐   load    ┌─────────────┐
//! │    HostsProvider     │◄──────────│ RecordStore │
//! │ (HostsFile::apply)   │──────────►│             │
//! └──────────────────────┘   save    └─────────────┘
//! ```
//!
//! Nothing is cached between calls. Every request reads the store again.

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::endpoint::{Changes, DomainFilter, Endpoint};
use crate::error::Result;
use crate::hosts::ApplyOutcome;
use crate::traits::RecordStore;

/// external-dns provider backed by a hosts file
///
/// ## Concurrency
///
/// `apply_changes` calls on one provider are serialized so that two
/// concurrent requests cannot lose each other's edits. Other processes
/// writing the same file are not coordinated with; the last writer wins.
pub struct HostsProvider {
    /// Where the hosts document lives
    store: Box<dyn RecordStore>,

    /// Filter advertised during negotiation
    domain_filter: DomainFilter,

    /// Held for the whole load-apply-save cycle
    write_lock: Mutex<()>,
}

impl HostsProvider {
    /// Create a provider over `store` that accepts every domain
    pub fn new(store: Box<dyn RecordStore>) -> Self {
        Self {
            store,
            domain_filter: DomainFilter::unrestricted(),
            write_lock: Mutex::new(()),
        }
    }

    /// Advertise a different domain filter
    pub fn with_domain_filter(mut self, domain_filter: DomainFilter) -> Self {
        self.domain_filter = domain_filter;
        self
    }

    /// Describe the backing store (for logging)
    pub fn store_description(&self) -> String {
        self.store.describe()
    }

    /// Domain filter sent to the controller during negotiation
    pub fn domain_filter(&self) -> DomainFilter {
        self.domain_filter.clone()
    }

    /// All records currently in the hosts file, in file order
    pub async fn records(&self) -> Result<Vec<Endpoint>> {
        let file = self.store.load().await?;
        let endpoints = file.endpoints();
        debug!(
            "Read {} endpoint(s) from {}",
            endpoints.len(),
            self.store.describe()
        );
        Ok(endpoints)
    }

    /// Apply a change set by rewriting the hosts file
    ///
    /// Deletes drop whole lines, creates append one line each (see
    /// [`crate::hosts`] for the exact policy). `update_old`/`update_new`
    /// are not applied.
    ///
    /// # Errors
    ///
    /// Returns a store error when the file cannot be read or written. If
    /// the load fails, nothing is written.
    pub async fn apply_changes(&self, changes: &Changes) -> Result<ApplyOutcome> {
        if changes.is_empty() {
            debug!("Empty change set; rewriting {} unchanged", self.store.describe());
        }
        if changes.has_updates() {
            debug!(
                "Ignoring {} update pair(s): updates are not applied to the hosts file",
                changes.update_new.len().max(changes.update_old.len())
            );
        }

        let _guard = self.write_lock.lock().await;

        let mut file = self.store.load().await?;
        let outcome = file.apply(changes);
        self.store.save(&file).await?;

        info!(
            "Applied changes to {}: {} line(s) removed, {} appended, {} create(s) skipped",
            self.store.describe(),
            outcome.removed_lines,
            outcome.appended_lines,
            outcome.skipped_creates
        );
        Ok(outcome)
    }

    /// Adjust endpoints before the controller plans changes
    ///
    /// Currently the identity.
    pub fn adjust_endpoints(&self, endpoints: Vec<Endpoint>) -> Vec<Endpoint> {
        endpoints
    }
}
