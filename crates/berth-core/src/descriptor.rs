//! Descriptor file reading and structural repair rules.
//!
//! A descriptor is a JSON file (`*.code-workspace`) describing one workspace:
//! a `folders` list, an opaque `settings` object, and a `meta` object carrying
//! `description` and `tags`. Files written by older tooling may carry a
//! top-level `description` instead; that legacy shape must keep working.
//!
//! This module owns three things:
//!
//! - **Reading** (`read`): classify one candidate file into a [`Workspace`]
//!   or reject it. Rejects never surface as errors; a scan simply skips them.
//! - **The starter template** (`template`): the document written for a
//!   brand-new workspace.
//! - **Backfill rules** (`backfill`): the pure structural-repair step applied
//!   by the repair pass, kept separate from file I/O so it can be tested
//!   in isolation.

use crate::error::{BerthError, Result};
use crate::types::Workspace;
use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

/// File extension recognized as a workspace descriptor.
pub const EXTENSION: &str = ".code-workspace";

/// Description written into brand-new descriptors when none is given.
pub const DEFAULT_DESCRIPTION: &str = "New workspace";

/// Check whether a file name looks like a descriptor.
pub fn matches_extension(file_name: &str) -> bool {
    file_name.ends_with(EXTENSION)
}

/// Read one descriptor file into a [`Workspace`].
///
/// Any I/O error, parse failure, non-object document, or missing file
/// metadata yields `None`; the reject is logged at debug level and never
/// aborts a walk.
pub fn read(path: &Path) -> Option<Workspace> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Skipping unreadable descriptor");
            return None;
        }
    };

    let doc: Value = match serde_json::from_str(&text) {
        Ok(doc) => doc,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Skipping malformed descriptor");
            return None;
        }
    };

    if !doc.is_object() {
        debug!(path = %path.display(), "Skipping descriptor whose document is not an object");
        return None;
    }

    let modified: DateTime<Utc> = match fs::metadata(path).and_then(|m| m.modified()) {
        Ok(modified) => modified.into(),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Skipping descriptor without timestamp");
            return None;
        }
    };

    let name = path.file_stem()?.to_string_lossy().into_owned();

    Some(
        Workspace::new(name, path, modified)
            .with_description(resolve_description(&doc))
            .with_tags(resolve_tags(&doc)),
    )
}

/// Extraction strategies for the description, tried in order; the first one
/// yielding a non-empty string wins. The order is a compatibility contract:
/// `meta.description` is preferred, the top-level `description` written by
/// older tooling is the fallback.
const DESCRIPTION_STRATEGIES: &[fn(&Value) -> Option<String>] =
    &[meta_description, legacy_description];

fn meta_description(doc: &Value) -> Option<String> {
    doc.get("meta")?.get("description")?.as_str().map(str::to_string)
}

fn legacy_description(doc: &Value) -> Option<String> {
    doc.get("description")?.as_str().map(str::to_string)
}

fn resolve_description(doc: &Value) -> String {
    DESCRIPTION_STRATEGIES
        .iter()
        .filter_map(|extract| extract(doc))
        .find(|desc| !desc.is_empty())
        .unwrap_or_default()
}

/// Tags come from `meta.tags` when it is a list whose elements are all
/// strings; anything else yields no tags at all.
fn resolve_tags(doc: &Value) -> Vec<String> {
    let items = match doc.get("meta").and_then(|m| m.get("tags")).and_then(Value::as_array) {
        Some(items) => items,
        None => return Vec::new(),
    };

    let mut tags = Vec::with_capacity(items.len());
    for item in items {
        match item.as_str() {
            Some(tag) => tags.push(tag.to_string()),
            None => return Vec::new(),
        }
    }
    tags
}

/// Produce the starter document for a brand-new descriptor.
///
/// The folder list points at the descriptor's own directory, settings start
/// empty, and an empty description falls back to [`DEFAULT_DESCRIPTION`].
pub fn template(description: &str, tags: &[String]) -> Value {
    let description = if description.is_empty() {
        DEFAULT_DESCRIPTION
    } else {
        description
    };

    json!({
        "folders": [{ "path": "." }],
        "settings": {},
        "meta": {
            "description": description,
            "tags": tags,
        }
    })
}

/// Serialize a descriptor document and write it to disk, pretty-printed.
///
/// Both the repair pass and the create-workspace flow go through here so
/// descriptors end up formatted the same way regardless of who wrote them.
pub fn write(path: &Path, doc: &Value) -> Result<()> {
    let contents = serde_json::to_string_pretty(doc)
        .map_err(|e| BerthError::descriptor(path, format!("failed to serialize: {}", e)))?;
    fs::write(path, contents)?;
    Ok(())
}

/// Backfill missing or malformed structural fields in a descriptor document.
///
/// Returns true if anything changed. Rules, applied independently:
///
/// - `folders` absent or vacant → `[{"path": "."}]`
/// - `settings` absent or not an object → `{}`
/// - `meta` absent or not an object → `{}`
/// - `meta.description` key absent → the workspace name (a present but
///   empty description is left alone)
/// - `meta.tags` absent or not a list → `[]`
///
/// Documents that are not JSON objects cannot be repaired and are left
/// untouched. Everything else in the document, `settings` included, passes
/// through unchanged.
pub fn backfill(doc: &mut Value, name: &str) -> bool {
    let root = match doc.as_object_mut() {
        Some(root) => root,
        None => return false,
    };
    let mut changed = false;

    if root.get("folders").map_or(true, is_vacant) {
        root.insert("folders".to_string(), json!([{ "path": "." }]));
        changed = true;
    }

    if !root.get("settings").map_or(false, Value::is_object) {
        root.insert("settings".to_string(), Value::Object(Map::new()));
        changed = true;
    }

    if !root.get("meta").map_or(false, Value::is_object) {
        root.insert("meta".to_string(), Value::Object(Map::new()));
        changed = true;
    }

    if let Some(meta) = root.get_mut("meta").and_then(Value::as_object_mut) {
        if !meta.contains_key("description") {
            meta.insert("description".to_string(), Value::String(name.to_string()));
            changed = true;
        }

        if !meta.get("tags").map_or(false, Value::is_array) {
            meta.insert("tags".to_string(), Value::Array(Vec::new()));
            changed = true;
        }
    }

    changed
}

/// A value that carries no usable content: null and empty placeholders left
/// behind by other tools all count as missing.
fn is_vacant(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_descriptor(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_full_descriptor() {
        let dir = TempDir::new().unwrap();
        let path = write_descriptor(
            &dir,
            "api.code-workspace",
            r#"{"folders":[{"path":"."}],"settings":{},"meta":{"description":"Backend API","tags":["go","backend"]}}"#,
        );

        let ws = read(&path).unwrap();
        assert_eq!(ws.name, "api");
        assert_eq!(ws.description, "Backend API");
        assert_eq!(ws.tags, vec!["go", "backend"]);
        assert_eq!(ws.path, path);
    }

    #[test]
    fn test_read_prefers_meta_description() {
        let dir = TempDir::new().unwrap();
        let path = write_descriptor(
            &dir,
            "a.code-workspace",
            r#"{"description":"legacy","meta":{"description":"modern"}}"#,
        );

        assert_eq!(read(&path).unwrap().description, "modern");
    }

    #[test]
    fn test_read_empty_meta_description_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = write_descriptor(
            &dir,
            "a.code-workspace",
            r#"{"description":"legacy","meta":{"description":""}}"#,
        );

        assert_eq!(read(&path).unwrap().description, "legacy");
    }

    #[test]
    fn test_read_legacy_description_only() {
        let dir = TempDir::new().unwrap();
        let path = write_descriptor(&dir, "a.code-workspace", r#"{"description":"old style"}"#);

        assert_eq!(read(&path).unwrap().description, "old style");
    }

    #[test]
    fn test_read_non_object_meta_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = write_descriptor(
            &dir,
            "a.code-workspace",
            r#"{"description":"legacy","meta":"not an object"}"#,
        );

        assert_eq!(read(&path).unwrap().description, "legacy");
    }

    #[test]
    fn test_read_no_description_anywhere() {
        let dir = TempDir::new().unwrap();
        let path = write_descriptor(&dir, "a.code-workspace", r#"{"folders":[]}"#);

        assert_eq!(read(&path).unwrap().description, "");
    }

    #[test]
    fn test_read_non_string_description_ignored() {
        let dir = TempDir::new().unwrap();
        let path = write_descriptor(
            &dir,
            "a.code-workspace",
            r#"{"meta":{"description":42},"description":"legacy"}"#,
        );

        assert_eq!(read(&path).unwrap().description, "legacy");
    }

    #[test]
    fn test_read_rejects_non_object_document() {
        let dir = TempDir::new().unwrap();
        let path = write_descriptor(&dir, "odd.code-workspace", r#"[1, 2, 3]"#);

        assert!(read(&path).is_none());
    }

    #[test]
    fn test_read_rejects_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = write_descriptor(&dir, "broken.code-workspace", "{not json");

        assert!(read(&path).is_none());
    }

    #[test]
    fn test_read_rejects_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(read(&dir.path().join("absent.code-workspace")).is_none());
    }

    #[test]
    fn test_tags_all_or_nothing() {
        let dir = TempDir::new().unwrap();
        let path = write_descriptor(
            &dir,
            "a.code-workspace",
            r#"{"meta":{"tags":["ok", 7]}}"#,
        );
        assert!(read(&path).unwrap().tags.is_empty());

        let path = write_descriptor(&dir, "b.code-workspace", r#"{"meta":{"tags":"nope"}}"#);
        assert!(read(&path).unwrap().tags.is_empty());
    }

    #[test]
    fn test_matches_extension() {
        assert!(matches_extension("api.code-workspace"));
        assert!(!matches_extension("api.code-workspace.bak"));
        assert!(!matches_extension("notes.txt"));
    }

    #[test]
    fn test_template_shape() {
        let doc = template("", &[]);
        assert_eq!(doc["folders"][0]["path"], ".");
        assert!(doc["settings"].as_object().unwrap().is_empty());
        assert_eq!(doc["meta"]["description"], DEFAULT_DESCRIPTION);
        assert_eq!(doc["meta"]["tags"].as_array().unwrap().len(), 0);

        let doc = template("My project", &["rust".to_string()]);
        assert_eq!(doc["meta"]["description"], "My project");
        assert_eq!(doc["meta"]["tags"][0], "rust");
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fresh.code-workspace");

        write(&path, &template("Fresh start", &["demo".to_string()])).unwrap();

        let ws = read(&path).unwrap();
        assert_eq!(ws.name, "fresh");
        assert_eq!(ws.description, "Fresh start");
        assert_eq!(ws.tags, vec!["demo"]);
    }

    #[test]
    fn test_backfill_complete_document_untouched() {
        let mut doc = template("done", &[]);
        let before = doc.clone();

        assert!(!backfill(&mut doc, "done"));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_backfill_empty_object() {
        let mut doc = json!({});

        assert!(backfill(&mut doc, "proj"));
        assert_eq!(doc["folders"][0]["path"], ".");
        assert!(doc["settings"].is_object());
        assert_eq!(doc["meta"]["description"], "proj");
        assert!(doc["meta"]["tags"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_backfill_vacant_folders_replaced() {
        let mut doc = json!({"folders": [], "settings": {}, "meta": {"description": "d", "tags": []}});
        assert!(backfill(&mut doc, "p"));
        assert_eq!(doc["folders"][0]["path"], ".");

        let mut doc = json!({"folders": null, "settings": {}, "meta": {"description": "d", "tags": []}});
        assert!(backfill(&mut doc, "p"));
        assert_eq!(doc["folders"][0]["path"], ".");
    }

    #[test]
    fn test_backfill_keeps_populated_folders() {
        let mut doc =
            json!({"folders": [{"path": "../src"}], "settings": {}, "meta": {"description": "d", "tags": []}});

        assert!(!backfill(&mut doc, "p"));
        assert_eq!(doc["folders"][0]["path"], "../src");
    }

    #[test]
    fn test_backfill_keeps_present_empty_description() {
        let mut doc = json!({"folders": [{"path": "."}], "settings": {}, "meta": {"description": "", "tags": []}});

        assert!(!backfill(&mut doc, "p"));
        assert_eq!(doc["meta"]["description"], "");
    }

    #[test]
    fn test_backfill_replaces_wrong_typed_fields() {
        let mut doc = json!({"folders": [{"path": "."}], "settings": "oops", "meta": {"description": "d", "tags": "oops"}});

        assert!(backfill(&mut doc, "p"));
        assert!(doc["settings"].as_object().unwrap().is_empty());
        assert!(doc["meta"]["tags"].as_array().unwrap().is_empty());
        // The good fields were not disturbed.
        assert_eq!(doc["meta"]["description"], "d");
    }

    #[test]
    fn test_backfill_passes_settings_through() {
        let mut doc = json!({"settings": {"editor.formatOnSave": true}});

        assert!(backfill(&mut doc, "p"));
        assert_eq!(doc["settings"]["editor.formatOnSave"], true);
    }

    #[test]
    fn test_backfill_non_object_document() {
        let mut doc = json!([1, 2, 3]);
        assert!(!backfill(&mut doc, "p"));
        assert_eq!(doc, json!([1, 2, 3]));
    }

    #[test]
    fn test_backfill_idempotent() {
        let mut doc = json!({"meta": "junk"});

        assert!(backfill(&mut doc, "p"));
        assert!(!backfill(&mut doc, "p"));
    }
}
