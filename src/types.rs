//! Core data types used throughout the flipback library
//!
//! This module contains fundamental data structures that are shared across
//! different components of the library:
//!
//! - **Baseline state**: [`BackupMetadata`] - the two-hash freshness record
//! - **Operation results**: [`ModifyOutcome`], [`ChangeReport`] - what a
//!   mutation changed and where
//! - **Collaborators**: [`LogSink`] - the audit-trail callback every
//!   operation reports through

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Sink for human-readable progress and outcome lines
///
/// Every engine operation reports each decision it takes through a
/// `LogSink` so the caller can render a full audit trail. The sink is the
/// core's only side-channel; it never prompts or prints by itself.
///
/// Any `FnMut(&str)` closure is a sink:
///
/// ```rust
/// # use flipback::LogSink;
/// let mut lines: Vec<String> = Vec::new();
/// let mut sink = |msg: &str| lines.push(msg.to_string());
/// (&mut sink as &mut dyn LogSink).log("hello");
/// assert_eq!(lines, ["hello"]);
/// ```
pub trait LogSink {
    /// Receive one human-readable message
    fn log(&mut self, message: &str);
}

impl<F: FnMut(&str)> LogSink for F {
    fn log(&mut self, message: &str) {
        self(message)
    }
}

/// Baseline metadata persisted alongside the backup artifact
///
/// `original_hash` is fixed at backup-creation time and never changes for
/// the lifetime of that backup. `modified_hash` tracks the digest of the
/// main file as of the last time this engine wrote it. The staleness and
/// revert logic depend on one invariant: immediately after any successful
/// mutate or revert, `modified_hash` equals the actual current digest of
/// the main file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupMetadata {
    /// Digest of the file at backup-creation time
    pub original_hash: String,
    /// Digest of the file as of the engine's last write
    pub modified_hash: String,
}

impl BackupMetadata {
    /// Metadata for a freshly created backup: both hashes equal
    pub fn pristine(digest: impl Into<String>) -> Self {
        let digest = digest.into();
        Self {
            original_hash: digest.clone(),
            modified_hash: digest,
        }
    }

    /// Whether the tracked file state still equals the backed-up state
    pub fn is_pristine(&self) -> bool {
        self.original_hash == self.modified_hash
    }
}

/// Report of which flags were flipped, grouped by identifier
///
/// Maps a per-node display identifier (resolved via the fallback chain in
/// [`crate::mutator`]) to the de-duplicated set of short flag labels that
/// were flipped at or under that identifier. Both maps are ordered so
/// iteration and rendering are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeReport {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl ChangeReport {
    /// Record one flipped flag under the given identifier
    pub fn record(&mut self, identifier: impl Into<String>, label: impl Into<String>) {
        self.entries
            .entry(identifier.into())
            .or_default()
            .insert(label.into());
    }

    /// Whether any flips were recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct identifiers with at least one flip
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Labels flipped under one identifier, if any
    pub fn labels(&self, identifier: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(identifier)
    }

    /// Iterate over (identifier, labels) pairs in identifier order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.entries.iter()
    }

    /// Render one audit line per identifier, e.g. `"Game: FG ✓, SR ✓"`
    pub fn summary_lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(identifier, labels)| {
                let summary = labels
                    .iter()
                    .map(|label| format!("{} ✓", label))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}: {}", identifier, summary)
            })
            .collect()
    }
}

/// Result of a modify operation
///
/// `changed` is true iff at least one flag was flipped anywhere in the
/// document. `metadata` reflects the persisted baseline after the
/// operation, with `modified_hash` updated when the file was rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyOutcome {
    /// Whether the document was rewritten
    pub changed: bool,
    /// Per-identifier record of flipped flags
    pub report: ChangeReport,
    /// Baseline metadata after the operation
    pub metadata: BackupMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pristine_metadata() {
        let meta = BackupMetadata::pristine("abc");
        assert_eq!(meta.original_hash, "abc");
        assert_eq!(meta.modified_hash, "abc");
        assert!(meta.is_pristine());
    }

    #[test]
    fn test_report_deduplicates_labels() {
        let mut report = ChangeReport::default();
        report.record("Game", "FG");
        report.record("Game", "FG");
        report.record("Game", "SR");
        assert_eq!(report.len(), 1);
        assert_eq!(report.labels("Game").unwrap().len(), 2);
    }

    #[test]
    fn test_summary_lines_sorted() {
        let mut report = ChangeReport::default();
        report.record("X", "SR");
        report.record("X", "FG");
        report.record("Game", "RR");
        assert_eq!(
            report.summary_lines(),
            vec!["Game: RR ✓".to_string(), "X: FG ✓, SR ✓".to_string()]
        );
    }

    #[test]
    fn test_log_sink_closure() {
        let mut lines: Vec<String> = Vec::new();
        {
            let mut sink = |msg: &str| lines.push(msg.to_string());
            let sink: &mut dyn LogSink = &mut sink;
            sink.log("one");
            sink.log("two");
        }
        assert_eq!(lines, ["one", "two"]);
    }
}
