//! Classification of raw registry changes into job events.
//!
//! The scheduler cares about exactly two kinds of change under the job
//! subtree, discriminated by the changed key's basename. Everything else
//! in the registry is noise at this layer.

use std::fmt;

use crate::keys::{self, KeyScope};
use crate::store::ChangeNotification;

/// A scheduler-relevant change observed in the registry's job subtree.
///
/// Events carry no payload; consumers re-read the registry for current
/// state. Equality is by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobEvent {
    /// A job's desired target was written or removed.
    TargetChanged,
    /// A job's reported target state was written or removed.
    TargetStateChanged,
}

impl fmt::Display for JobEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetChanged => write!(f, "job-target-change"),
            Self::TargetStateChanged => write!(f, "job-target-state-change"),
        }
    }
}

/// Classifies a change notification against a job subtree scope.
///
/// Returns `None` for absent or empty notifications, for keys outside the
/// scope's job subtree, and for keys whose basename is not a recognized
/// discriminant. Pure and total: no I/O, no error case.
#[must_use]
pub fn classify(notification: Option<&ChangeNotification>, scope: &KeyScope) -> Option<JobEvent> {
    let change = notification?;
    if change.key.is_empty() || !scope.contains(&change.key) {
        return None;
    }
    match keys::basename(&change.key) {
        keys::TARGET_STATE_SEGMENT => Some(JobEvent::TargetStateChanged),
        keys::TARGET_SEGMENT => Some(JobEvent::TargetChanged),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(key: &str) -> ChangeNotification {
        ChangeNotification {
            key: key.into(),
            index: 7,
        }
    }

    fn fleet_scope() -> KeyScope {
        KeyScope::new("/fleet")
    }

    #[test]
    fn test_basename_dispatch() {
        let scope = fleet_scope();
        assert_eq!(
            classify(Some(&change("/fleet/job/target-state")), &scope),
            Some(JobEvent::TargetStateChanged)
        );
        assert_eq!(
            classify(Some(&change("/fleet/job/target")), &scope),
            Some(JobEvent::TargetChanged)
        );
        assert_eq!(classify(Some(&change("/fleet/job/other")), &scope), None);
    }

    #[test]
    fn test_nested_job_keys_classify() {
        let scope = fleet_scope();
        assert_eq!(
            classify(Some(&change("/fleet/job/web.service/target-state")), &scope),
            Some(JobEvent::TargetStateChanged)
        );
        assert_eq!(
            classify(Some(&change("/fleet/job/web.service/target")), &scope),
            Some(JobEvent::TargetChanged)
        );
    }

    #[test]
    fn test_sibling_subtree_is_rejected() {
        let scope = fleet_scope();
        // String-prefix match but not a path-segment match.
        assert_eq!(classify(Some(&change("/fleet/jobextra/target")), &scope), None);
        assert_eq!(classify(Some(&change("/fleet/machines/target")), &scope), None);
        assert_eq!(classify(Some(&change("/other/job/target")), &scope), None);
    }

    #[test]
    fn test_absent_and_empty_notifications() {
        let scope = fleet_scope();
        assert_eq!(classify(None, &scope), None);
        assert_eq!(classify(Some(&change("")), &scope), None);
    }

    #[test]
    fn test_classification_is_stable() {
        let scope = fleet_scope();
        let notification = change("/fleet/job/target");
        for _ in 0..3 {
            assert_eq!(
                classify(Some(&notification), &scope),
                Some(JobEvent::TargetChanged)
            );
        }
    }

    #[test]
    fn test_event_display() {
        assert_eq!(JobEvent::TargetChanged.to_string(), "job-target-change");
        assert_eq!(
            JobEvent::TargetStateChanged.to_string(),
            "job-target-state-change"
        );
    }
}
