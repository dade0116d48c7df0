//! Hosts-file document model
//!
//! Pure functions over hosts-file text: classification of each line,
//! translation of entries into endpoints, and the line-rewrite
//! reconciliation used when applying a change set.
//!
//! ## Reconciliation policy
//!
//! Applying changes rewrites the whole file rather than patching it:
//!
//! 1. Blank, comment and malformed lines are kept verbatim.
//! 2. An entry line is dropped when any of its hostnames matches the
//!    `dnsName` of any delete. Removing a single hostname from a
//!    multi-host line is not supported.
//! 3. Each create with at least one target appends
//!    `<first target>\t<dnsName>`. Repeated creates append duplicate
//!    lines.
//! 4. A create is skipped when it has no target, or when its name or
//!    first target is not a single hosts-file field (empty, contains
//!    whitespace or control characters, or starts with `#`). Such a value
//!    would not read back as the record that was asked for.
//!
//! Lines are handled as bytes. A file that is not valid UTF-8 is still
//! readable, and its untouched lines are written back unchanged.

mod line;

pub use line::HostsLine;

use crate::endpoint::{Changes, Endpoint};

/// A hosts file held in memory, one entry per line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostsFile {
    lines: Vec<HostsLine>,
}

/// Summary of one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Entry lines removed because they named a deleted host
    pub removed_lines: usize,
    /// Lines appended for creates
    pub appended_lines: usize,
    /// Creates skipped because they had no target or could not be
    /// written as a single entry
    pub skipped_creates: usize,
}

impl ApplyOutcome {
    /// Whether the pass changed the document
    pub fn is_noop(&self) -> bool {
        self.removed_lines == 0 && self.appended_lines == 0
    }
}

impl HostsFile {
    /// Parse hosts-file text
    pub fn parse(content: &str) -> Self {
        Self::from_bytes(content.as_bytes())
    }

    /// Parse hosts-file bytes
    ///
    /// Lines are split on `\n`. A final newline does not produce an extra
    /// empty line, and a `\r` before the newline stays in the raw bytes.
    pub fn from_bytes(content: &[u8]) -> Self {
        if content.is_empty() {
            return Self::default();
        }

        let body = content.strip_suffix(b"\n").unwrap_or(content);
        Self {
            lines: body.split(|b| *b == b'\n').map(HostsLine::from_bytes).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Endpoints described by the file
    ///
    /// One `A` endpoint per (address, hostname) pair, in file order and
    /// then field order. A hostname field starting with `#` begins an
    /// inline comment and ends the line's hostname list.
    pub fn endpoints(&self) -> Vec<Endpoint> {
        self.lines
            .iter()
            .filter_map(|line| match line {
                HostsLine::Entry {
                    address, hostnames, ..
                } => Some((address, hostnames)),
                _ => None,
            })
            .flat_map(|(address, hostnames)| {
                hostnames
                    .iter()
                    .take_while(|name| !name.starts_with('#'))
                    .map(move |name| Endpoint::a_record(name.clone(), address.clone()))
            })
            .collect()
    }

    /// Apply creates and deletes to the document
    ///
    /// Update lists are not consulted.
    pub fn apply(&mut self, changes: &Changes) -> ApplyOutcome {
        let mut outcome = ApplyOutcome::default();

        let before = self.lines.len();
        self.lines.retain(|line| {
            !changes
                .delete
                .iter()
                .any(|del| line.names_host(&del.dns_name))
        });
        outcome.removed_lines = before - self.lines.len();

        for create in &changes.create {
            let Some(target) = create.first_target() else {
                tracing::debug!("Skipping create for {}: no targets", create.dns_name);
                outcome.skipped_creates += 1;
                continue;
            };

            if !is_single_field(&create.dns_name) || !is_single_field(target) {
                tracing::warn!(
                    "Skipping create for {:?} -> {:?}: not a single hosts-file field",
                    create.dns_name,
                    target
                );
                outcome.skipped_creates += 1;
                continue;
            }

            self.lines
                .push(HostsLine::parse(&format!("{}\t{}", target, create.dns_name)));
            outcome.appended_lines += 1;
        }

        outcome
    }

    /// Render the document back to bytes
    ///
    /// Every line is terminated with `\n`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for line in &self.lines {
            out.extend_from_slice(line.raw());
            out.push(b'\n');
        }
        out
    }

    /// Render the document as text
    ///
    /// Bytes that are not valid UTF-8 are replaced; use [`Self::to_bytes`]
    /// to write the file back.
    pub fn render(&self) -> String {
        String::from_utf8_lossy(&self.to_bytes()).into_owned()
    }
}

/// Whether `value` reads back as exactly one field of an entry line
fn is_single_field(value: &str) -> bool {
    !value.is_empty()
        && !value.starts_with('#')
        && !value.chars().any(|c| c.is_whitespace() || c.is_control())
}
