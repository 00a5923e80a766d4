//! Recursive flag-flipping over parsed JSON documents
//!
//! The mutator walks an arbitrarily nested document and flips every
//! recognized override flag from `true` to `false`, collecting a
//! per-identifier [`ChangeReport`] as it goes. The traversal is a plain
//! recursive descent with type-directed dispatch over the three node
//! shapes (`Object | Array | scalar`).
//!
//! ## Flip policy
//!
//! Strictly tri-state: only a value that is exactly boolean `true` is ever
//! flipped. `false` stays `false` and non-boolean values are never touched
//! or coerced, so applying the mutator twice is idempotent by
//! construction.
//!
//! ## Identifier resolution
//!
//! A flip is recorded under a display identifier resolved per node:
//! the node's own `LocalId`, else its `DisplayName`, else `"Unknown"`.
//! Flips inside a node's nested `"Application"` sub-object prefer the
//! sub-object's `DisplayName` and fall back to the parent node's
//! `LocalId`. Empty-string fields count as absent.

use crate::types::ChangeReport;
use serde_json::{Map, Value};

/// Recognized override flags, in fixed order: JSON key → short label
pub const OVERRIDE_FLAGS: &[(&str, &str)] = &[
    ("Disable_FG_Override", "FG"),
    ("Disable_RR_Override", "RR"),
    ("Disable_SR_Override", "SR"),
    ("Disable_RR_Model_Override", "RR-M"),
    ("Disable_SR_Model_Override", "SR-M"),
];

/// Field name of the nested sub-object that gets its own direct key check
pub const NESTED_OBJECT_KEY: &str = "Application";

const ID_KEY: &str = "LocalId";
const DISPLAY_NAME_KEY: &str = "DisplayName";
const UNKNOWN_IDENTIFIER: &str = "Unknown";

/// Flip every recognized flag in the document from `true` to `false`
///
/// Returns `(changed, report)`: `changed` is true iff at least one flip
/// occurred anywhere in the tree, and the report holds one entry per
/// distinct identifier that had ≥1 flip, with a de-duplicated label set.
///
/// # Examples
///
/// ```rust
/// use flipback::mutator::{clear_flags, OVERRIDE_FLAGS};
///
/// let mut doc = serde_json::json!({
///     "LocalId": "X",
///     "Disable_SR_Override": true,
///     "Application": { "DisplayName": "Game", "Disable_FG_Override": true },
/// });
/// let (changed, report) = clear_flags(&mut doc, OVERRIDE_FLAGS);
/// assert!(changed);
/// assert!(report.labels("X").unwrap().contains("SR"));
/// assert!(report.labels("Game").unwrap().contains("FG"));
/// assert_eq!(doc["Disable_SR_Override"], false);
/// ```
pub fn clear_flags(document: &mut Value, flags: &[(&str, &str)]) -> (bool, ChangeReport) {
    let mut report = ChangeReport::default();
    let changed = walk(document, flags, &mut report);
    (changed, report)
}

fn walk(node: &mut Value, flags: &[(&str, &str)], report: &mut ChangeReport) -> bool {
    let mut changed = false;
    match node {
        Value::Object(map) => {
            for &(key, label) in flags {
                if flip_if_true(map, key) {
                    let identifier = string_field(map, ID_KEY)
                        .or_else(|| string_field(map, DISPLAY_NAME_KEY))
                        .unwrap_or_else(|| UNKNOWN_IDENTIFIER.to_string());
                    report.record(identifier, label);
                    changed = true;
                }
            }

            // Resolve the parent id before borrowing the sub-object mutably
            let parent_id = string_field(map, ID_KEY);
            if let Some(Value::Object(nested)) = map.get_mut(NESTED_OBJECT_KEY) {
                for &(key, label) in flags {
                    if flip_if_true(nested, key) {
                        let identifier = string_field(nested, DISPLAY_NAME_KEY)
                            .or_else(|| parent_id.clone())
                            .unwrap_or_else(|| UNKNOWN_IDENTIFIER.to_string());
                        report.record(identifier, label);
                        changed = true;
                    }
                }
            }

            // Recurse into every child container, including the nested
            // sub-object just handled (its flags are already false)
            for (_key, value) in map.iter_mut() {
                if value.is_object() || value.is_array() {
                    changed |= walk(value, flags, report);
                }
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                if item.is_object() || item.is_array() {
                    changed |= walk(item, flags, report);
                }
            }
        }
        _ => {}
    }
    changed
}

/// Set `key` to `false` iff it is present with value exactly `true`
fn flip_if_true(map: &mut Map<String, Value>, key: &str) -> bool {
    if matches!(map.get(key), Some(Value::Bool(true))) {
        map.insert(key.to_string(), Value::Bool(false));
        true
    } else {
        false
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(|value| value.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_end_to_end_document() {
        let mut doc = json!({
            "LocalId": "X",
            "Disable_SR_Override": true,
            "Application": {
                "DisplayName": "Game",
                "Disable_FG_Override": true,
            },
        });

        let (changed, report) = clear_flags(&mut doc, OVERRIDE_FLAGS);

        assert!(changed);
        assert_eq!(doc["Disable_SR_Override"], json!(false));
        assert_eq!(doc["Application"]["Disable_FG_Override"], json!(false));
        assert_eq!(report.len(), 2);
        assert_eq!(
            report.labels("X").unwrap().iter().collect::<Vec<_>>(),
            ["SR"]
        );
        assert_eq!(
            report.labels("Game").unwrap().iter().collect::<Vec<_>>(),
            ["FG"]
        );
    }

    #[test]
    fn test_second_application_is_noop() {
        let mut doc = json!({
            "LocalId": "X",
            "Disable_SR_Override": true,
            "Application": { "DisplayName": "Game", "Disable_FG_Override": true },
        });

        let (changed, _) = clear_flags(&mut doc, OVERRIDE_FLAGS);
        assert!(changed);

        let (changed, report) = clear_flags(&mut doc, OVERRIDE_FLAGS);
        assert!(!changed);
        assert!(report.is_empty());
    }

    #[test]
    fn test_only_literal_true_is_flipped() {
        let mut doc = json!({
            "Disable_FG_Override": false,
            "Disable_RR_Override": "true",
            "Disable_SR_Override": 1,
            "Disable_RR_Model_Override": null,
        });

        let (changed, report) = clear_flags(&mut doc, OVERRIDE_FLAGS);

        assert!(!changed);
        assert!(report.is_empty());
        assert_eq!(doc["Disable_RR_Override"], json!("true"));
        assert_eq!(doc["Disable_SR_Override"], json!(1));
    }

    #[test]
    fn test_flags_found_under_arrays_and_deep_nesting() {
        let mut doc = json!({
            "entries": [
                { "LocalId": "A", "Disable_FG_Override": true },
                [ { "DisplayName": "B", "Disable_RR_Override": true } ],
                "scalar",
                42,
            ],
            "wrapper": { "inner": { "LocalId": "C", "Disable_SR_Model_Override": true } },
        });

        let (changed, report) = clear_flags(&mut doc, OVERRIDE_FLAGS);

        assert!(changed);
        assert_eq!(report.len(), 3);
        assert!(report.labels("A").unwrap().contains("FG"));
        assert!(report.labels("B").unwrap().contains("RR"));
        assert!(report.labels("C").unwrap().contains("SR-M"));
    }

    #[test]
    fn test_identifier_prefers_local_id_over_display_name() {
        let mut doc = json!({
            "LocalId": "id-1",
            "DisplayName": "Pretty Name",
            "Disable_FG_Override": true,
        });

        let (_, report) = clear_flags(&mut doc, OVERRIDE_FLAGS);
        assert!(report.labels("id-1").is_some());
        assert!(report.labels("Pretty Name").is_none());
    }

    #[test]
    fn test_nested_identifier_prefers_display_name_over_parent_id() {
        // Nested node has only a display name; parent has only an id. The
        // nested node's own name must win.
        let mut doc = json!({
            "LocalId": "parent-id",
            "Application": { "DisplayName": "Nested", "Disable_SR_Override": true },
        });

        let (_, report) = clear_flags(&mut doc, OVERRIDE_FLAGS);
        assert!(report.labels("Nested").is_some());
        assert!(report.labels("parent-id").is_none());
    }

    #[test]
    fn test_nested_identifier_falls_back_to_parent_id() {
        let mut doc = json!({
            "LocalId": "parent-id",
            "Application": { "Disable_SR_Override": true },
        });

        let (_, report) = clear_flags(&mut doc, OVERRIDE_FLAGS);
        assert!(report.labels("parent-id").is_some());
    }

    #[test]
    fn test_unknown_identifier_when_nothing_resolves() {
        let mut doc = json!({ "Disable_RR_Override": true });

        let (_, report) = clear_flags(&mut doc, OVERRIDE_FLAGS);
        assert!(report.labels("Unknown").is_some());
    }

    #[test]
    fn test_empty_string_fields_count_as_absent() {
        let mut doc = json!({
            "LocalId": "",
            "DisplayName": "Fallback Name",
            "Disable_FG_Override": true,
        });

        let (_, report) = clear_flags(&mut doc, OVERRIDE_FLAGS);
        assert!(report.labels("Fallback Name").is_some());
    }

    #[test]
    fn test_labels_deduplicated_across_tree() {
        let mut doc = json!({
            "items": [
                { "LocalId": "X", "Disable_FG_Override": true },
                { "LocalId": "X", "Disable_FG_Override": true },
                { "LocalId": "X", "Disable_SR_Override": true },
            ],
        });

        let (_, report) = clear_flags(&mut doc, OVERRIDE_FLAGS);
        assert_eq!(report.len(), 1);
        assert_eq!(report.labels("X").unwrap().len(), 2);
    }

    #[test]
    fn test_nested_object_under_array_parent() {
        // The nested sub-object check applies at every mapping node, not
        // just the root
        let mut doc = json!([
            { "LocalId": "L", "Application": { "Disable_RR_Model_Override": true } }
        ]);

        let (changed, report) = clear_flags(&mut doc, OVERRIDE_FLAGS);
        assert!(changed);
        assert!(report.labels("L").unwrap().contains("RR-M"));
    }
}
