//! Guarded restore of the main file from its backup
//!
//! Reverting over an externally changed file would silently discard
//! changes the engine has no record of, so the restore is refused unless
//! the current digest matches the recorded `modified_hash` exactly.

use crate::backup::BackupStore;
use crate::error::{FlipbackError, Result};
use crate::hashing;
use crate::types::{BackupMetadata, LogSink};
use std::fs;
use tracing::{info, warn};

/// Restore the main file from the backup artifact
///
/// Preconditions, checked in order:
///
/// - Backup artifact and metadata must both exist (and the metadata must
///   parse), else the operation fails with
///   [`FlipbackError::NoBackup`].
/// - The current digest of the main file must equal the recorded
///   `modified_hash`, else the operation fails with
///   [`FlipbackError::ExternallyModified`]. This is a hard stop, not a
///   recoverable retry.
///
/// On success the read-only attribute is cleared (the engine may have
/// locked the file down after a prior mutation), the backup bytes are
/// copied over the main path, and `modified_hash` is reset to
/// `original_hash` so a subsequent mutate-revert-mutate cycle needs no
/// re-baselining.
pub fn restore_from_backup(store: &BackupStore, log: &mut dyn LogSink) -> Result<BackupMetadata> {
    if !store.backup_exists() || !store.metadata_exists() {
        log.log("No backup available to revert.");
        return Err(FlipbackError::NoBackup {
            path: store.main_path().to_path_buf(),
        });
    }

    let Some(mut metadata) = store.load_metadata() else {
        warn!("Metadata for {:?} exists but is unparsable", store.main_path());
        log.log("Backup metadata is invalid, cannot revert.");
        return Err(FlipbackError::NoBackup {
            path: store.main_path().to_path_buf(),
        });
    };

    let current = hashing::file_digest(store.main_path(), log);
    if current != metadata.modified_hash {
        log.log("Cannot revert: file has been externally modified since our last update.");
        return Err(FlipbackError::ExternallyModified {
            path: store.main_path().to_path_buf(),
        });
    }

    if let Err(e) = restore_bytes(store) {
        log.log(&format!("Error during revert: {}", e));
        return Err(e);
    }
    info!("Restored {:?} from {:?}", store.main_path(), store.backup_path());
    log.log("Reverted to backup.");

    metadata.modified_hash = metadata.original_hash.clone();
    store.save_metadata(&metadata)?;
    Ok(metadata)
}

fn restore_bytes(store: &BackupStore) -> Result<()> {
    // The engine itself may have set the file read-only after a mutation;
    // the restore must be able to overwrite it
    crate::utils::set_read_only(store.main_path(), false)?;
    fs::copy(store.backup_path(), store.main_path())?;
    Ok(())
}
