//! One-shot structural repair over the current snapshot.
//!
//! The repair pass re-reads every descriptor the catalog knows about and
//! backfills missing structure per the rules in [`descriptor::backfill`].
//! Structurally complete files are left byte-for-byte untouched. Files that
//! cannot be read, parsed, or written back are counted and skipped; one bad
//! file never aborts the pass.

use crate::descriptor;
use crate::types::{Catalog, Workspace};
use rayon::prelude::*;
use serde_json::Value;
use std::fs;
use tracing::{debug, info};

/// Tallies produced by a repair pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Files rewritten with backfilled structure.
    pub modified: usize,

    /// Files that could not be read, parsed, or written back.
    pub failed: usize,
}

impl RepairReport {
    fn merge(self, other: RepairReport) -> RepairReport {
        RepairReport {
            modified: self.modified + other.modified,
            failed: self.failed + other.failed,
        }
    }
}

/// Repair every descriptor in `catalog`, returning the modified/failed tallies.
///
/// Running the pass twice in a row modifies nothing the second time.
pub fn run(catalog: &Catalog) -> RepairReport {
    let report = catalog
        .workspaces()
        .par_iter()
        .map(repair_one)
        .reduce(RepairReport::default, RepairReport::merge);

    info!(
        modified = report.modified,
        failed = report.failed,
        total = catalog.len(),
        "Repair pass finished"
    );
    report
}

fn repair_one(workspace: &Workspace) -> RepairReport {
    let path = &workspace.path;

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Repair could not read file");
            return RepairReport { modified: 0, failed: 1 };
        }
    };

    let mut doc: Value = match serde_json::from_str(&text) {
        Ok(doc) => doc,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Repair could not parse file");
            return RepairReport { modified: 0, failed: 1 };
        }
    };

    // The scan only admits object documents, so anything else means the
    // file changed shape after the snapshot was taken.
    if !doc.is_object() {
        debug!(path = %path.display(), "Repair found a non-object document");
        return RepairReport { modified: 0, failed: 1 };
    }

    if !descriptor::backfill(&mut doc, &workspace.name) {
        return RepairReport::default();
    }

    match descriptor::write(path, &doc) {
        Ok(()) => {
            debug!(path = %path.display(), "Repaired descriptor");
            RepairReport { modified: 1, failed: 0 }
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Repair could not write file");
            RepairReport { modified: 0, failed: 1 }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    const COMPLETE: &str =
        r#"{"folders":[{"path":"."}],"settings":{},"meta":{"description":"done","tags":[]}}"#;

    fn make_workspace(dir: &TempDir, name: &str, contents: &str) -> Workspace {
        let path = dir.path().join(format!("{}.code-workspace", name));
        fs::write(&path, contents).unwrap();
        Workspace::new(name, path, Utc::now())
    }

    #[test]
    fn test_repair_backfills_incomplete_files() {
        let dir = TempDir::new().unwrap();
        let complete = make_workspace(&dir, "good", COMPLETE);
        let bare = make_workspace(&dir, "bare", "{}");
        let catalog = Catalog::build(1, vec![complete, bare.clone()]);

        let report = run(&catalog);
        assert_eq!(report, RepairReport { modified: 1, failed: 0 });

        let doc: Value = serde_json::from_str(&fs::read_to_string(&bare.path).unwrap()).unwrap();
        assert_eq!(doc["meta"]["description"], "bare");
        assert_eq!(doc["folders"][0]["path"], ".");
    }

    #[test]
    fn test_repair_leaves_complete_files_byte_identical() {
        let dir = TempDir::new().unwrap();
        // Deliberately minified; a rewrite would reformat it.
        let ws = make_workspace(&dir, "good", COMPLETE);
        let catalog = Catalog::build(1, vec![ws.clone()]);

        let report = run(&catalog);
        assert_eq!(report.modified, 0);
        assert_eq!(fs::read_to_string(&ws.path).unwrap(), COMPLETE);
    }

    #[test]
    fn test_repair_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let ws = make_workspace(&dir, "partial", r#"{"folders":[],"settings":"x"}"#);
        let catalog = Catalog::build(1, vec![ws]);

        assert_eq!(run(&catalog).modified, 1);
        assert_eq!(run(&catalog).modified, 0);
    }

    #[test]
    fn test_repair_skips_bad_files_without_aborting() {
        let dir = TempDir::new().unwrap();
        let fixable = make_workspace(&dir, "fixable", "{}");
        let broken = make_workspace(&dir, "broken", "{not json");
        let missing = Workspace::new(
            "gone",
            dir.path().join("gone.code-workspace"),
            Utc::now(),
        );
        let catalog = Catalog::build(1, vec![fixable, broken, missing]);

        let report = run(&catalog);
        assert_eq!(report, RepairReport { modified: 1, failed: 2 });
    }

    #[test]
    fn test_repair_counts_non_object_document_as_failed() {
        let dir = TempDir::new().unwrap();
        let ws = make_workspace(&dir, "odd", "[1, 2]");
        let catalog = Catalog::build(1, vec![ws.clone()]);

        let report = run(&catalog);
        assert_eq!(report, RepairReport { modified: 0, failed: 1 });
        // The file itself is not rewritten.
        assert_eq!(fs::read_to_string(&ws.path).unwrap(), "[1, 2]");
    }

    #[test]
    fn test_repair_empty_catalog() {
        assert_eq!(run(&Catalog::empty()), RepairReport::default());
    }
}
