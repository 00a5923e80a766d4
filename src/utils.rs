//! File-system helpers shared across the engine
//!
//! Small utilities with no domain knowledge: atomic writes, pretty JSON
//! serialization, and the read-only attribute handling the revert path
//! depends on.

use crate::error::Result;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Atomic file write (write to temp file then rename)
///
/// The temp file lives next to the target with `.tmp` appended to the full
/// file name, so side-paths that share a stem (`x.json`, `x.json.backup`,
/// `x.json.backup.meta`) each get a distinct temp neighbor. Either the
/// entire file is written or the previous content remains.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let mut temp_name: OsString = path.as_os_str().to_os_string();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;
    trace!("Atomically wrote {} bytes to {:?}", content.len(), path);
    Ok(())
}

/// Serialize a JSON document pretty-printed with a 4-space indent and
/// write it atomically
///
/// Key order within objects is preserved as parsed.
pub fn write_pretty_json(path: &Path, value: &Value) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    atomic_write(path, &buf)
}

/// Set or clear the read-only attribute on a file
///
/// On Unix this toggles the write permission bits, on Windows the
/// read-only file attribute.
pub fn set_read_only(path: &Path, read_only: bool) -> Result<()> {
    let mut permissions = fs::metadata(path)?.permissions();
    #[allow(clippy::permissions_set_readonly_false)]
    permissions.set_readonly(read_only);
    fs::set_permissions(path, permissions)?;
    trace!("Set read-only = {} on {:?}", read_only, path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.json");

        atomic_write(&file_path, b"{}").unwrap();
        assert_eq!(fs::read(&file_path).unwrap(), b"{}");

        // Temp neighbor is gone after the rename
        assert!(!temp_dir.path().join("test.json.tmp").exists());
    }

    #[test]
    fn test_write_pretty_json_uses_four_space_indent() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("doc.json");

        let doc: Value = serde_json::from_str(r#"{"b": 1, "a": {"c": true}}"#).unwrap();
        write_pretty_json(&file_path, &doc).unwrap();

        let written = fs::read_to_string(&file_path).unwrap();
        assert!(written.contains("\n    \"b\": 1"));
        assert!(written.contains("\n        \"c\": true"));
        // preserve_order keeps "b" before "a"
        assert!(written.find("\"b\"").unwrap() < written.find("\"a\"").unwrap());
    }

    #[test]
    fn test_set_read_only_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("locked.json");
        fs::write(&file_path, b"{}").unwrap();

        set_read_only(&file_path, true).unwrap();
        assert!(fs::metadata(&file_path).unwrap().permissions().readonly());

        set_read_only(&file_path, false).unwrap();
        assert!(!fs::metadata(&file_path).unwrap().permissions().readonly());
        fs::write(&file_path, b"{ }").unwrap();
    }
}
