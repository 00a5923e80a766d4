//! Content digests for staleness detection
//!
//! Every freshness decision in the engine reduces to comparing SHA-256
//! digests of file content. Digests are computed in fixed-size chunks so
//! memory use stays bounded regardless of file size.
//!
//! Two entry points exist for the two kinds of call site:
//!
//! - [`try_file_digest`] propagates I/O errors and is used where a failed
//!   hash must fail the whole operation (backup creation).
//! - [`file_digest`] never fails: on I/O error it reports the cause through
//!   the log sink and returns the empty sentinel digest. Callers of this
//!   variant only ever compare digests for equality, and the sentinel can
//!   never equal a stored hex digest, so a failure always lands on the
//!   conservative "treat as changed" path.

use crate::error::Result;
use crate::types::LogSink;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{trace, warn};

/// Digest returned when hashing fails
///
/// The empty string compares unequal to every real 64-character hex
/// digest, forcing a mismatch at every comparison site.
pub const SENTINEL_DIGEST: &str = "";

/// Hash a file's content using SHA-256, propagating I/O errors
///
/// Reads the file in 8 KiB chunks and returns the digest as a
/// 64-character hexadecimal string. Hashing the same bytes twice yields
/// the same digest.
///
/// # Errors
///
/// Returns [`crate::FlipbackError::Io`] if the file cannot be opened or read.
pub fn try_file_digest(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let digest = hex::encode(hasher.finalize());
    trace!("Hashed {:?}: {}", path, digest);
    Ok(digest)
}

/// Hash a file's content, reporting failures instead of raising them
///
/// On any I/O failure the cause is sent to the log sink and
/// [`SENTINEL_DIGEST`] is returned.
pub fn file_digest(path: &Path, log: &mut dyn LogSink) -> String {
    match try_file_digest(path) {
        Ok(digest) => digest,
        Err(e) => {
            warn!("Failed to hash {:?}: {}", path, e);
            log.log(&format!("Error computing hash: {}", e));
            SENTINEL_DIGEST.to_string()
        }
    }
}

/// Hash arbitrary data using SHA-256
///
/// Convenience for small in-memory buffers; for files use
/// [`try_file_digest`] so content is streamed.
pub fn hash_data(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
