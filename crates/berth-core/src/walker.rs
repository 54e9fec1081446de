//! Recursive descriptor discovery under a root directory.
//!
//! The walker enumerates a directory tree with an explicit stack, prunes a
//! fixed set of heavy or irrelevant directories before descending into them,
//! and hands every candidate file to the descriptor reader. It reports
//! progress incrementally and honors cooperative cancellation, which is
//! polled at directory boundaries only, so cancellation latency is bounded
//! by the size of the directory currently being listed.

use crate::descriptor;
use crate::error::{BerthError, Result};
use crate::types::Workspace;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Directory names never descended into: version-control metadata and
/// dependency/tool caches that are large and cannot contain descriptors
/// worth cataloging.
pub const EXCLUDED_DIRS: [&str; 7] = [
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "venv",
    ".tox",
    ".mypy_cache",
];

/// Progress callback cadence, in accepted entries.
const PROGRESS_EVERY: usize = 10;

/// How a walk ended.
#[derive(Debug)]
pub enum WalkOutcome {
    /// The whole tree was traversed; all accepted entries are included.
    Completed(Vec<Workspace>),

    /// The cancellation flag was observed; partial results are dropped.
    Cancelled,
}

/// Walk `root` looking for descriptor files.
///
/// A root that does not exist (or is not a directory) completes immediately
/// with an empty result; that is a valid answer, not an error. Files that
/// fail descriptor parsing are skipped silently; a directory that cannot be
/// enumerated mid-traversal aborts the walk with [`BerthError::Walk`].
///
/// `on_progress` is invoked with the running count every
/// few accepted entries. Symlinks are read when they resolve to regular
/// files; symlinked directories are never descended.
pub fn walk<F>(root: &Path, cancel: &AtomicBool, mut on_progress: F) -> Result<WalkOutcome>
where
    F: FnMut(usize),
{
    if !root.is_dir() {
        debug!(root = %root.display(), "Scan root missing, returning empty result");
        return Ok(WalkOutcome::Completed(Vec::new()));
    }

    let mut found: Vec<Workspace> = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        if cancel.load(Ordering::Relaxed) {
            debug!(root = %root.display(), "Walk cancelled");
            return Ok(WalkOutcome::Cancelled);
        }

        let entries = fs::read_dir(&dir).map_err(|e| BerthError::walk(&dir, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| BerthError::walk(&dir, e))?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            let path = entry.path();

            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            if file_type.is_dir() {
                if !EXCLUDED_DIRS.contains(&name.as_ref()) {
                    stack.push(path);
                }
                continue;
            }

            if !descriptor::matches_extension(&name) {
                continue;
            }

            // A symlink counts when it resolves to a regular file.
            if file_type.is_symlink() && !fs::metadata(&path).map_or(false, |m| m.is_file()) {
                continue;
            }

            if let Some(workspace) = descriptor::read(&path) {
                found.push(workspace);
                if found.len() % PROGRESS_EVERY == 0 {
                    on_progress(found.len());
                }
            }
        }
    }

    Ok(WalkOutcome::Completed(found))
}
