//! Core data types for Berth.
//!
//! This module defines the fundamental data structures shared by the scanner
//! and the filtering layer. These types are designed to be:
//!
//! - **Immutable once published**: a `Catalog` is never mutated in place
//! - **Cheap to share**: snapshots are handed out behind `Arc`
//! - **Efficient to query**: lowercase sort/match keys are pre-computed

use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A single workspace descriptor found on disk.
///
/// ## Design Notes
///
/// - `name` is the descriptor file stem (e.g. `api.code-workspace` → `api`)
/// - `name_lower` is pre-computed for fast case-insensitive matching
/// - `path` points at the descriptor file itself, not the project directory
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    /// Workspace name, derived from the descriptor file stem
    pub name: String,

    /// Pre-computed lowercase name for fast case-insensitive search
    pub name_lower: String,

    /// Full path to the descriptor file
    pub path: PathBuf,

    /// Free-text description from the descriptor metadata
    pub description: String,

    /// Last modification time of the descriptor file
    pub modified: DateTime<Utc>,

    /// Tags from the descriptor metadata (free-form strings)
    pub tags: Vec<String>,
}

impl Workspace {
    /// Create a new workspace record with an empty description and no tags.
    ///
    /// The `name_lower` field is automatically computed from `name`.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, modified: DateTime<Utc>) -> Self {
        let name = name.into();
        let name_lower = name.to_lowercase();
        Workspace {
            name,
            name_lower,
            path: path.into(),
            description: String::new(),
            modified,
            tags: Vec::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Check whether this workspace carries the given tag (case-insensitive,
    /// folded the same way the catalog's distinct tag list is)
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }

    /// The descriptor path rendered as a string, for display and matching
    pub fn path_str(&self) -> Cow<'_, str> {
        self.path.to_string_lossy()
    }

    /// Check whether this workspace's descriptor lives at `path`
    pub fn is_at(&self, path: &str) -> bool {
        self.path == Path::new(path)
    }
}

/// An immutable snapshot of the workspaces found by one completed scan.
///
/// Snapshots are replaced wholesale: a new scan always builds a brand-new
/// `Catalog`, and a previously published one stays valid for any reader
/// still holding it. Nothing here mutates after construction.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Workspaces sorted by (name, path), case-insensitive ascending
    workspaces: Vec<Workspace>,

    /// Distinct tags across all workspaces, case-insensitively sorted
    tags: Vec<String>,

    /// Generation of the scan that produced this snapshot
    generation: u64,

    /// When the scan completed
    scanned_at: DateTime<Utc>,
}

impl Catalog {
    /// Create an empty catalog (the state before any scan has completed).
    pub fn empty() -> Self {
        Catalog {
            workspaces: Vec::new(),
            tags: Vec::new(),
            generation: 0,
            scanned_at: Utc::now(),
        }
    }

    /// Build a catalog from the results of a completed scan.
    ///
    /// Entries are sorted by (name, path) case-insensitively. The sort is
    /// stable, so entries that compare equal after case-folding keep their
    /// first-encountered order. The distinct tag list is derived here, once
    /// per snapshot rather than once per query.
    pub fn build(generation: u64, mut workspaces: Vec<Workspace>) -> Self {
        workspaces.sort_by_cached_key(|w| {
            (
                w.name_lower.clone(),
                w.path.to_string_lossy().to_lowercase(),
            )
        });
        let tags = derive_tags(&workspaces);
        Catalog {
            workspaces,
            tags,
            generation,
            scanned_at: Utc::now(),
        }
    }

    /// All workspaces, in snapshot order.
    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    /// Distinct tags across the snapshot, case-insensitively sorted.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Number of workspaces in the snapshot.
    pub fn len(&self) -> usize {
        self.workspaces.len()
    }

    /// Check if the snapshot holds no workspaces.
    pub fn is_empty(&self) -> bool {
        self.workspaces.is_empty()
    }

    /// Generation of the scan that produced this snapshot (0 = never scanned).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// When the producing scan completed.
    pub fn scanned_at(&self) -> DateTime<Utc> {
        self.scanned_at
    }
}

/// Collect the distinct tags across a workspace list.
///
/// Deduplication is case-insensitive and keeps the first spelling seen.
fn derive_tags(workspaces: &[Workspace]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags: Vec<String> = Vec::new();
    for workspace in workspaces {
        for tag in &workspace.tags {
            if seen.insert(tag.to_lowercase()) {
                tags.push(tag.clone());
            }
        }
    }
    tags.sort_by_cached_key(|t| t.to_lowercase());
    tags
}
