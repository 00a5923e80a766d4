//! Main flipback engine implementation
//!
//! This module provides the [`Flipback`] struct, the entry point for the
//! modify and revert operations on one tracked document. It coordinates
//! the subsystems:
//!
//! - **Backup store**: owns the backup artifact and metadata record
//! - **Staleness detector**: keeps the baseline honest before mutating
//! - **Flag mutator**: the recursive flag-flipping traversal
//! - **Revert engine**: the guarded restore path
//!
//! A `Flipback` value also carries the per-session state the front end
//! needs: whether the net file state changed since the session's first
//! operation (see [`Flipback::session_changed`]).
//!
//! ## Examples
//!
//! ```rust,no_run
//! use flipback::Flipback;
//!
//! # fn main() -> flipback::Result<()> {
//! let mut engine = Flipback::new("ApplicationStorage.json");
//! let mut sink = |line: &str| println!("{line}");
//!
//! let outcome = engine.modify(&mut sink)?;
//! if outcome.changed {
//!     for (identifier, labels) in outcome.report.iter() {
//!         println!("{identifier} had {} flags flipped", labels.len());
//!     }
//! }
//!
//! // Later: put the original content back
//! engine.revert(&mut sink)?;
//! # Ok(())
//! # }
//! ```

use crate::backup::BackupStore;
use crate::baseline::ensure_fresh_backup;
use crate::error::Result;
use crate::hashing;
use crate::mutator::{self, OVERRIDE_FLAGS};
use crate::revert::restore_from_backup;
use crate::types::{BackupMetadata, LogSink, ModifyOutcome};
use crate::utils;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Engine instance for one tracked JSON document
///
/// Exactly one engine instance should act on a given file at a time; the
/// design provides no locking primitive and callers must serialize access
/// externally.
#[derive(Debug)]
pub struct Flipback {
    store: BackupStore,
    read_only_after_modify: bool,
    session_baseline: Option<String>,
}

impl Flipback {
    /// Create an engine for the given document path
    pub fn new(main_path: impl Into<PathBuf>) -> Self {
        Self {
            store: BackupStore::new(main_path),
            read_only_after_modify: false,
            session_baseline: None,
        }
    }

    /// Lock the file read-only after a mutation that changed it
    ///
    /// Mirrors the front end's "set file as read-only after modifications"
    /// option. A failure to set the attribute is logged but does not fail
    /// the mutation.
    pub fn read_only_after_modify(mut self, enabled: bool) -> Self {
        self.read_only_after_modify = enabled;
        self
    }

    /// Path of the tracked document
    pub fn main_path(&self) -> &Path {
        self.store.main_path()
    }

    /// The backup store backing this engine
    pub fn store(&self) -> &BackupStore {
        &self.store
    }

    /// Flip all recognized override flags in the document to `false`
    ///
    /// Ensures a fresh backup baseline exists, loads and parses the
    /// document, runs the flag mutator, and, if anything changed,
    /// rewrites the document pretty-printed, updates `modified_hash`, and
    /// optionally locks the file read-only. Every decision emits a line
    /// on the log sink, including an explicit notice when nothing needed
    /// changing.
    ///
    /// # Errors
    ///
    /// - [`crate::FlipbackError::Io`] if the baseline cannot be
    ///   established or the document cannot be read or written
    /// - [`crate::FlipbackError::Json`] if the document is not valid JSON
    ///   (there is nothing safe to mutate)
    pub fn modify(&mut self, log: &mut dyn LogSink) -> Result<ModifyOutcome> {
        info!("Modifying {:?}", self.store.main_path());
        self.capture_session_baseline(log);

        let mut metadata = ensure_fresh_backup(&self.store, log)?;

        let mut document = match self.load_document() {
            Ok(document) => document,
            Err(e) => {
                log.log(&format!("Error reading JSON: {}", e));
                return Err(e);
            }
        };

        let (changed, report) = mutator::clear_flags(&mut document, OVERRIDE_FLAGS);

        if changed {
            if let Err(e) = utils::write_pretty_json(self.store.main_path(), &document) {
                log.log(&format!("Error writing JSON: {}", e));
                return Err(e);
            }
            log.log("File has been updated.");

            metadata.modified_hash = hashing::file_digest(self.store.main_path(), log);
            self.store.save_metadata(&metadata)?;
        } else {
            log.log("No modifications were made. Either keys were not found or already set to False.");
        }

        for line in report.summary_lines() {
            log.log(&line);
        }

        if changed && self.read_only_after_modify {
            match utils::set_read_only(self.store.main_path(), true) {
                Ok(()) => log.log("File set to read-only."),
                Err(e) => log.log(&format!("Error setting file to read-only: {}", e)),
            }
        }

        debug!(
            "Modify of {:?} finished: changed={} identifiers={}",
            self.store.main_path(),
            changed,
            report.len()
        );
        Ok(ModifyOutcome {
            changed,
            report,
            metadata,
        })
    }

    /// Restore the document from its backup
    ///
    /// See [`crate::revert::restore_from_backup`] for the preconditions.
    pub fn revert(&mut self, log: &mut dyn LogSink) -> Result<BackupMetadata> {
        info!("Reverting {:?}", self.store.main_path());
        self.capture_session_baseline(log);
        restore_from_backup(&self.store, log)
    }

    /// Whether the file's net content differs from the session's start
    ///
    /// The baseline is the digest captured before this engine's first
    /// operation; a session whose operations cancel out (modify then
    /// revert) reports `false`. Returns `false` when no operation has run
    /// yet.
    pub fn session_changed(&mut self, log: &mut dyn LogSink) -> bool {
        match &self.session_baseline {
            None => false,
            Some(baseline) => hashing::file_digest(self.store.main_path(), log) != *baseline,
        }
    }

    fn capture_session_baseline(&mut self, log: &mut dyn LogSink) {
        if self.session_baseline.is_none() {
            self.session_baseline = Some(hashing::file_digest(self.store.main_path(), log));
        }
    }

    fn load_document(&self) -> Result<Value> {
        let raw = fs::read_to_string(self.store.main_path())?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// One-shot modify of the document at `path`
///
/// Convenience wrapper creating a throwaway [`Flipback`] engine.
pub fn modify_file(path: impl Into<PathBuf>, log: &mut dyn LogSink) -> Result<ModifyOutcome> {
    Flipback::new(path).modify(log)
}

/// One-shot revert of the document at `path`
pub fn revert_file(path: impl Into<PathBuf>, log: &mut dyn LogSink) -> Result<BackupMetadata> {
    Flipback::new(path).revert(log)
}
