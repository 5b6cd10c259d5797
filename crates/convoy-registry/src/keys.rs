//! Registry key-space vocabulary.
//!
//! Registry keys are filesystem-like paths (`/`-separated segments). The
//! scheduler's keys live under a `job` subtree below a configurable root
//! prefix, and the last segment of a key discriminates what kind of record
//! it is. This module holds the segment names, the path helpers, and
//! [`KeyScope`], the precomputed subtree used to decide whether a changed
//! key belongs to the scheduler at all.

/// Name of the job subtree directly below the registry root.
pub const JOB_SEGMENT: &str = "job";

/// Basename of keys recording a job's desired target.
pub const TARGET_SEGMENT: &str = "target";

/// Basename of keys recording a job's reported target state.
pub const TARGET_STATE_SEGMENT: &str = "target-state";

/// Joins a rooted base path and a segment with a single separator.
///
/// Trailing separators on `base` and leading separators on `segment` are
/// dropped, so `join("/fleet/", "/job")` and `join("/fleet", "job")` both
/// produce `/fleet/job`. An empty base is treated as the root.
#[must_use]
pub fn join(base: &str, segment: &str) -> String {
    let base = base.trim_end_matches('/');
    let segment = segment.trim_start_matches('/');
    format!("{base}/{segment}")
}

/// Returns the last path segment of `key`, ignoring trailing separators.
///
/// Returns the whole input when it contains no separator, and the empty
/// string for the bare root.
#[must_use]
pub fn basename(key: &str) -> &str {
    let trimmed = key.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some((_, base)) => base,
        None => trimmed,
    }
}

/// Tests whether `key` equals `prefix` or sits below it.
///
/// Containment respects segment boundaries: `/fleet/jobextra` is not under
/// `/fleet/job`, even though it is a string-prefix match.
#[must_use]
pub fn is_under(prefix: &str, key: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    match key.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// The job subtree of one registry root.
///
/// Built once per event stream from the configured root prefix; the root is
/// normalized (trailing separators dropped) and the `job` subtree path is
/// precomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyScope {
    root: String,
    job_subtree: String,
}

impl KeyScope {
    /// Creates a scope rooted at `root_prefix`.
    #[must_use]
    pub fn new(root_prefix: &str) -> Self {
        let root = root_prefix.trim_end_matches('/').to_string();
        let job_subtree = join(&root, JOB_SEGMENT);
        Self { root, job_subtree }
    }

    /// The normalized registry root prefix.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Full path of the job subtree under this root.
    #[must_use]
    pub fn job_subtree(&self) -> &str {
        &self.job_subtree
    }

    /// Tests whether `key` falls inside this scope's job subtree.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        is_under(&self.job_subtree, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_basic() {
        assert_eq!(join("/fleet", "job"), "/fleet/job");
        assert_eq!(join("/fleet/job", "web.service"), "/fleet/job/web.service");
    }

    #[test]
    fn test_join_normalizes_separators() {
        assert_eq!(join("/fleet/", "job"), "/fleet/job");
        assert_eq!(join("/fleet", "/job"), "/fleet/job");
        assert_eq!(join("/", "job"), "/job");
        assert_eq!(join("", "job"), "/job");
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("/fleet/job/target"), "target");
        assert_eq!(basename("/fleet/job/web.service/target-state"), "target-state");
        assert_eq!(basename("target"), "target");
        assert_eq!(basename("/fleet/job/"), "job");
        assert_eq!(basename("/"), "");
    }

    #[test]
    fn test_is_under_segment_boundary() {
        assert!(is_under("/fleet/job", "/fleet/job/target"));
        assert!(is_under("/fleet/job", "/fleet/job"));
        assert!(!is_under("/fleet/job", "/fleet/jobextra/target"));
        assert!(!is_under("/fleet/job", "/fleet"));
    }

    #[test]
    fn test_is_under_root() {
        assert!(is_under("/", "/fleet/job/target"));
        assert!(is_under("/fleet", "/fleet/machines/m1"));
    }

    #[test]
    fn test_scope_contains() {
        let scope = KeyScope::new("/fleet");
        assert!(scope.contains("/fleet/job/target"));
        assert!(scope.contains("/fleet/job/web.service/target-state"));
        assert!(!scope.contains("/fleet/jobextra/target"));
        assert!(!scope.contains("/fleet/machines/m1"));
        assert!(!scope.contains("/other/job/target"));
    }

    #[test]
    fn test_scope_normalizes_trailing_separator() {
        let scope = KeyScope::new("/fleet/");
        assert_eq!(scope.root(), "/fleet");
        assert_eq!(scope.job_subtree(), "/fleet/job");
        assert!(scope.contains("/fleet/job/target"));
    }
}
