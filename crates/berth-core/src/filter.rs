//! Pure filtering over catalog snapshots.
//!
//! This module narrows a [`Catalog`] snapshot down to the entries a caller
//! should see, combining three independent criteria:
//! - Free text, matched case-insensitively against name, description, and path
//! - A scope restricting results to the pinned or recent membership lists
//! - A tag the workspace must carry
//!
//! ## Ordering
//!
//! Filtering is stable: entries come out in snapshot order (name, then path,
//! case-insensitive) and are never re-ranked. Applying the same filter to the
//! same snapshot twice yields an identical sequence.

use crate::types::{Catalog, Workspace};

/// Which membership list to restrict results to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// No membership restriction.
    #[default]
    All,

    /// Only workspaces whose path is on the pinned list.
    Pinned,

    /// Only workspaces whose path is on the recent list.
    Recent,
}

impl Scope {
    /// Advance to the next scope, wrapping around.
    pub fn cycle(self) -> Scope {
        match self {
            Scope::All => Scope::Pinned,
            Scope::Pinned => Scope::Recent,
            Scope::Recent => Scope::All,
        }
    }

    /// Short label for status displays.
    pub fn label(&self) -> &'static str {
        match self {
            Scope::All => "all",
            Scope::Pinned => "pinned",
            Scope::Recent => "recent",
        }
    }
}

/// Combinable filter criteria. The default filter matches every entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Filter {
    /// Substring matched case-insensitively against name, description, and
    /// path. Surrounding whitespace is ignored.
    pub text: String,

    /// Membership restriction.
    pub scope: Scope,

    /// Required tag (case-insensitive); empty means no tag constraint.
    pub tag: String,
}

impl Filter {
    /// Create a filter that matches everything.
    pub fn new() -> Self {
        Filter::default()
    }

    /// Set the free-text criterion.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Restrict results to a membership scope.
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Require a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }
}

/// Apply `filter` to a snapshot, returning matching entries in snapshot order.
///
/// Criteria are checked cheapest first and short-circuit per entry: a
/// workspace that fails the text match is never tested against scope or tag.
/// `pinned` and `recent` are the externally persisted membership lists,
/// consulted only when the corresponding scope is selected.
pub fn apply(
    catalog: &Catalog,
    filter: &Filter,
    pinned: &[String],
    recent: &[String],
) -> Vec<Workspace> {
    let needle = filter.text.trim().to_lowercase();

    catalog
        .workspaces()
        .iter()
        .filter(|w| matches_text(w, &needle))
        .filter(|w| matches_scope(w, filter.scope, pinned, recent))
        .filter(|w| filter.tag.is_empty() || w.has_tag(&filter.tag))
        .cloned()
        .collect()
}

fn matches_text(workspace: &Workspace, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    workspace.name_lower.contains(needle)
        || workspace.description.to_lowercase().contains(needle)
        || workspace.path_str().to_lowercase().contains(needle)
}

fn matches_scope(workspace: &Workspace, scope: Scope, pinned: &[String], recent: &[String]) -> bool {
    let list = match scope {
        Scope::All => return true,
        Scope::Pinned => pinned,
        Scope::Recent => recent,
    };
    list.iter().any(|path| workspace.is_at(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_catalog() -> Catalog {
        let x = Workspace::new("x", "/a/x.code-workspace", Utc::now());
        let y = Workspace::new("Y", "/b/y.code-workspace", Utc::now())
            .with_description("demo")
            .with_tags(vec!["go".to_string()]);
        // Built out of order; the catalog sorts case-insensitively.
        Catalog::build(1, vec![y, x])
    }

    fn names(results: &[Workspace]) -> Vec<&str> {
        results.iter().map(|w| w.name.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_returns_snapshot_order() {
        let catalog = make_catalog();
        let results = apply(&catalog, &Filter::new(), &[], &[]);
        assert_eq!(names(&results), vec!["x", "Y"]);
    }

    #[test]
    fn test_text_matches_description() {
        let catalog = make_catalog();
        let filter = Filter::new().with_text("demo");
        assert_eq!(names(&apply(&catalog, &filter, &[], &[])), vec!["Y"]);
    }

    #[test]
    fn test_text_matches_path() {
        let catalog = make_catalog();
        let filter = Filter::new().with_text("/b/");
        assert_eq!(names(&apply(&catalog, &filter, &[], &[])), vec!["Y"]);
    }

    #[test]
    fn test_text_trimmed_and_case_insensitive() {
        let catalog = make_catalog();
        let filter = Filter::new().with_text("  DEMO  ");
        assert_eq!(names(&apply(&catalog, &filter, &[], &[])), vec!["Y"]);
    }

    #[test]
    fn test_tag_filter() {
        let catalog = make_catalog();

        let filter = Filter::new().with_tag("go");
        assert_eq!(names(&apply(&catalog, &filter, &[], &[])), vec!["Y"]);

        // Case insensitive
        let filter = Filter::new().with_tag("GO");
        assert_eq!(names(&apply(&catalog, &filter, &[], &[])), vec!["Y"]);

        let filter = Filter::new().with_tag("rust");
        assert!(apply(&catalog, &filter, &[], &[]).is_empty());
    }

    #[test]
    fn test_pinned_scope_with_empty_list() {
        let catalog = make_catalog();
        let filter = Filter::new().with_scope(Scope::Pinned);
        assert!(apply(&catalog, &filter, &[], &[]).is_empty());
    }

    #[test]
    fn test_pinned_scope_with_member() {
        let catalog = make_catalog();
        let pinned = vec!["/b/y.code-workspace".to_string()];
        let filter = Filter::new().with_scope(Scope::Pinned);
        assert_eq!(names(&apply(&catalog, &filter, &pinned, &[])), vec!["Y"]);
    }

    #[test]
    fn test_recent_scope_uses_recent_list_only() {
        let catalog = make_catalog();
        let pinned = vec!["/b/y.code-workspace".to_string()];
        let recent = vec!["/a/x.code-workspace".to_string()];
        let filter = Filter::new().with_scope(Scope::Recent);
        assert_eq!(names(&apply(&catalog, &filter, &pinned, &recent)), vec!["x"]);
    }

    #[test]
    fn test_combined_criteria() {
        let catalog = make_catalog();

        let filter = Filter::new().with_text("demo").with_tag("go");
        assert_eq!(names(&apply(&catalog, &filter, &[], &[])), vec!["Y"]);

        // Text passes for "x" but the tag check rules it out.
        let filter = Filter::new().with_text("x").with_tag("go");
        assert!(apply(&catalog, &filter, &[], &[]).is_empty());
    }

    #[test]
    fn test_apply_is_idempotent() {
        let catalog = make_catalog();
        let filter = Filter::new().with_text("demo");

        let first = apply(&catalog, &filter, &[], &[]);
        let second = apply(&catalog, &filter, &[], &[]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_filter_preserves_snapshot_order() {
        let a = Workspace::new("alpha", "/w/alpha.code-workspace", Utc::now())
            .with_description("service");
        let b = Workspace::new("beta", "/w/beta.code-workspace", Utc::now());
        let c = Workspace::new("gamma", "/w/gamma.code-workspace", Utc::now())
            .with_description("service");
        let catalog = Catalog::build(1, vec![c, b, a]);

        let filter = Filter::new().with_text("service");
        let results = apply(&catalog, &filter, &[], &[]);
        assert_eq!(names(&results), vec!["alpha", "gamma"]);
    }

    #[test]
    fn test_scope_cycle_wraps() {
        assert_eq!(Scope::All.cycle(), Scope::Pinned);
        assert_eq!(Scope::Pinned.cycle(), Scope::Recent);
        assert_eq!(Scope::Recent.cycle(), Scope::All);
    }
}
