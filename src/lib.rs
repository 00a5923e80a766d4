//! # Flipback - Reversible override-flag toggling for JSON documents
//!
//! Flipback safely flips a fixed set of boolean override flags embedded
//! deep inside an arbitrarily nested JSON document, while guaranteeing
//! that the original content can always be recovered unless the document
//! was changed by some other actor after the last recorded state.
//!
//! ## Overview
//!
//! Before touching a file, the engine establishes a *baseline*: a
//! byte-for-byte backup at `<path>.backup` plus a metadata record at
//! `<path>.backup.meta` carrying two SHA-256 digests:
//!
//! - `original_hash` - the file at backup-creation time, fixed for the
//!   lifetime of that backup
//! - `modified_hash` - the file as of the engine's last write
//!
//! The engine's own last-known state is the single source of truth for
//! freshness; wall-clock time and modification timestamps are never
//! consulted. If the current digest disagrees with `modified_hash`, an
//! external actor changed the file: a mutate re-baselines on the current
//! content, while a revert refuses with a hard error rather than discard
//! changes the engine has no record of.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flipback::Flipback;
//!
//! # fn main() -> flipback::Result<()> {
//! let mut engine = Flipback::new("ApplicationStorage.json");
//! let mut sink = |line: &str| println!("{line}");
//!
//! // Flip every recognized override flag from true to false
//! let outcome = engine.modify(&mut sink)?;
//! println!("changed: {}", outcome.changed);
//!
//! // Restore the original bytes
//! engine.revert(&mut sink)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Key Concepts
//!
//! ### Flag keys
//!
//! The recognized flags live in one static ordered table
//! ([`mutator::OVERRIDE_FLAGS`]), each mapped to a short label used in
//! change reports. Keys match by exact name at any nesting depth, and
//! additionally inside a node's nested `"Application"` sub-object. Only a
//! value that is exactly `true` is ever flipped.
//!
//! ### Audit trail
//!
//! Every operation takes a [`LogSink`] and reports each decision through
//! it - backup creation, staleness notices, the per-identifier flip
//! summary, explicit no-op notices. The core never prints or prompts by
//! itself; rendering is the caller's job.
//!
//! ### Concurrency
//!
//! All operations are synchronous and blocking. Exactly one engine
//! instance should act on a given file at a time; callers serialize
//! access externally. The (file, backup, metadata) triple is written
//! sequentially, so a crash between the file write and the metadata
//! update can require one extra re-baseline on the next run.
//!
//! ## Error Handling
//!
//! All operations return `Result<T, FlipbackError>`. I/O and parse
//! failures are logged at the point of occurrence and surfaced as typed
//! errors; consistency failures get their own variants so callers can
//! distinguish "no backup" from "externally modified".
//!
//! ## Module Organization
//!
//! - [`flipback`]: the [`Flipback`] engine facade
//! - [`mutator`]: recursive flag-flipping traversal
//! - [`backup`]: backup artifact and metadata storage
//! - [`baseline`]: staleness detection
//! - [`revert`]: guarded restore
//! - [`hashing`]: streaming content digests
//! - [`types`]: shared data types
//! - [`error`]: error types and handling

// Public API modules
pub mod backup;
pub mod baseline;
pub mod error;
pub mod flipback;
pub mod hashing;
pub mod mutator;
pub mod revert;
pub mod types;

// Internal modules (not part of public API)
mod utils;

// Re-export main types for convenience
pub use backup::BackupStore;
pub use baseline::ensure_fresh_backup;
pub use error::{FlipbackError, Result};
pub use flipback::{modify_file, revert_file, Flipback};
pub use mutator::{clear_flags, NESTED_OBJECT_KEY, OVERRIDE_FLAGS};
pub use revert::restore_from_backup;
pub use types::{BackupMetadata, ChangeReport, LogSink, ModifyOutcome};
