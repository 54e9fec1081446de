//! Pinned and recently-used membership lists.
//!
//! Both lists are ordered most-relevant-first sequences of workspace paths,
//! persisted in the configuration and consulted by the filter scopes. The
//! functions here are pure: they take the current list and return the
//! updated one, leaving persistence to the caller.

/// Move `path` to the front of `list`, inserting it if absent.
///
/// Any existing occurrence is removed first, so the result never contains
/// duplicates. The result is truncated to `cap` entries, dropping the
/// least-recent from the back.
pub fn touch(list: &[String], path: &str, cap: usize) -> Vec<String> {
    let mut updated = Vec::with_capacity(list.len() + 1);
    updated.push(path.to_string());
    updated.extend(list.iter().filter(|p| p.as_str() != path).cloned());
    updated.truncate(cap);
    updated
}

/// Remove `path` from `list` if present, otherwise add it to the front.
pub fn toggle(list: &[String], path: &str, cap: usize) -> Vec<String> {
    if contains(list, path) {
        list.iter()
            .filter(|p| p.as_str() != path)
            .cloned()
            .collect()
    } else {
        touch(list, path, cap)
    }
}

/// Whether `path` is on `list`.
pub fn contains(list: &[String], path: &str) -> bool {
    list.iter().any(|p| p == path)
}
