//! Backup artifact and metadata storage
//!
//! A [`BackupStore`] owns the path triple for one tracked document: the
//! main file, the backup artifact at `<path>.backup`, and the metadata
//! record at `<path>.backup.meta`. Both side-paths are derived purely from
//! the main path, so repeated runs locate the same baseline.
//!
//! The backup artifact is an exact byte copy of the main file at
//! creation time; the metadata record carries the two digests the
//! staleness and revert logic compare against (see
//! [`crate::types::BackupMetadata`]).

use crate::error::Result;
use crate::hashing;
use crate::types::{BackupMetadata, LogSink};
use crate::utils;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Suffix appended to the main path for the backup artifact
pub const BACKUP_SUFFIX: &str = ".backup";
/// Suffix appended to the main path for the metadata record
pub const META_SUFFIX: &str = ".backup.meta";

/// Owns the backup artifact and metadata record for one document
#[derive(Debug, Clone)]
pub struct BackupStore {
    main_path: PathBuf,
    backup_path: PathBuf,
    meta_path: PathBuf,
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

impl BackupStore {
    /// Create a store for the given main path, deriving both side-paths
    pub fn new(main_path: impl Into<PathBuf>) -> Self {
        let main_path = main_path.into();
        let backup_path = with_suffix(&main_path, BACKUP_SUFFIX);
        let meta_path = with_suffix(&main_path, META_SUFFIX);
        Self {
            main_path,
            backup_path,
            meta_path,
        }
    }

    /// Path of the tracked document
    pub fn main_path(&self) -> &Path {
        &self.main_path
    }

    /// Path of the backup artifact
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// Path of the metadata record
    pub fn meta_path(&self) -> &Path {
        &self.meta_path
    }

    /// Whether the backup artifact exists
    pub fn backup_exists(&self) -> bool {
        self.backup_path.exists()
    }

    /// Whether the metadata record exists
    pub fn metadata_exists(&self) -> bool {
        self.meta_path.exists()
    }

    /// Copy the main file to the backup side-path and persist pristine
    /// metadata for it
    ///
    /// The main file's bytes (and permission bits) are copied to the
    /// backup path, its digest is computed, and
    /// `{original_hash: d, modified_hash: d}` is written to the metadata
    /// side-path. A hash failure here would poison the stored baseline,
    /// so unlike the comparison sites it fails the operation.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FlipbackError::Io`] if the copy or either write
    /// fails.
    pub fn create_backup(&self, log: &mut dyn LogSink) -> Result<BackupMetadata> {
        match self.copy_and_record() {
            Ok(metadata) => {
                info!("Created backup of {:?} at {:?}", self.main_path, self.backup_path);
                log.log(&format!("Backup created at: {}", self.backup_path.display()));
                Ok(metadata)
            }
            Err(e) => {
                warn!("Backup creation for {:?} failed: {}", self.main_path, e);
                log.log(&format!("Error creating backup: {}", e));
                Err(e)
            }
        }
    }

    fn copy_and_record(&self) -> Result<BackupMetadata> {
        fs::copy(&self.main_path, &self.backup_path)?;
        let digest = hashing::try_file_digest(&self.main_path)?;
        let metadata = BackupMetadata::pristine(digest);
        self.save_metadata(&metadata)?;
        Ok(metadata)
    }

    /// Load the metadata record, or `None` if it is absent or unparsable
    pub fn load_metadata(&self) -> Option<BackupMetadata> {
        let raw = match fs::read_to_string(&self.meta_path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("No readable metadata at {:?}: {}", self.meta_path, e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                warn!("Unparsable metadata at {:?}: {}", self.meta_path, e);
                None
            }
        }
    }

    /// Overwrite the metadata record atomically
    pub fn save_metadata(&self, metadata: &BackupMetadata) -> Result<()> {
        let buf = serde_json::to_vec_pretty(metadata)?;
        utils::atomic_write(&self.meta_path, &buf)?;
        debug!(
            "Saved metadata for {:?}: original={} modified={}",
            self.main_path, metadata.original_hash, metadata.modified_hash
        );
        Ok(())
    }
}
