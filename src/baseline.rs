//! Staleness detection for the backup baseline
//!
//! The engine's own last-known state (`modified_hash` in the metadata
//! record) is the single source of truth for freshness. Wall-clock time
//! and file modification timestamps are deliberately not consulted; they
//! are unreliable across copy and restore operations.

use crate::backup::BackupStore;
use crate::error::Result;
use crate::hashing;
use crate::types::{BackupMetadata, LogSink};
use tracing::{debug, info, warn};

/// Ensure a valid backup baseline exists for the store's main file
///
/// Decision table, evaluated in order:
///
/// 1. Backup artifact or metadata missing → create a new backup (first
///    run).
/// 2. Metadata present but unparsable → create a new backup.
/// 3. Current digest of the main file ≠ `modified_hash` → an external
///    actor changed the file since the engine last touched it; the
///    current file becomes the new baseline and the prior backup content
///    is overwritten.
/// 4. Otherwise → return the existing metadata unchanged.
///
/// Every branch that acts emits a log line naming the reason.
///
/// # Errors
///
/// Returns [`crate::FlipbackError::Io`] if a required backup cannot be
/// created.
pub fn ensure_fresh_backup(store: &BackupStore, log: &mut dyn LogSink) -> Result<BackupMetadata> {
    if !store.backup_exists() || !store.metadata_exists() {
        log.log("No backup found, creating new backup.");
        return store.create_backup(log);
    }

    let Some(metadata) = store.load_metadata() else {
        warn!("Invalid backup metadata for {:?}", store.main_path());
        log.log("Backup metadata is invalid, creating new backup.");
        return store.create_backup(log);
    };

    let current = hashing::file_digest(store.main_path(), log);
    if current != metadata.modified_hash {
        info!(
            "External update on {:?}: current {} != recorded {}",
            store.main_path(),
            current,
            metadata.modified_hash
        );
        log.log("External update detected. Updating backup to current file as new baseline.");
        return store.create_backup(log);
    }

    debug!("Backup baseline for {:?} is fresh", store.main_path());
    Ok(metadata)
}
