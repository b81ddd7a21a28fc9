use chrono::{DateTime, Utc};
use taskmate_core::TaskPatch;

/// An update re-runs scoring iff it touches one of the scored fields
/// (title, description, dueDate, estimatedMinutes, tags). Explicit nulls count.
pub fn needs_reclassification(patch: &TaskPatch) -> bool {
    patch.title.is_some()
        || patch.description.is_some()
        || patch.due_date.is_some()
        || patch.estimated_minutes.is_some()
        || patch.tags.is_some()
}

/// New `completedAt` after an update carrying `completed`.
///
/// `true` keeps an existing timestamp or stamps `now`; `false` clears it;
/// absent leaves it untouched.
pub fn completion_transition(
    completed_at: Option<DateTime<Utc>>,
    completed: Option<bool>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match completed {
        Some(true) => completed_at.or(Some(now)),
        Some(false) => None,
        None => completed_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn patch(json: &str) -> TaskPatch {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn content_fields_trigger_reclassification() {
        for body in [
            r#"{"title": "New title"}"#,
            r#"{"description": "more detail"}"#,
            r#"{"dueDate": "2025-04-01T10:00:00Z"}"#,
            r#"{"dueDate": null}"#,
            r#"{"estimatedMinutes": 120}"#,
            r#"{"tags": ["client"]}"#,
            r#"{"tags": [], "completed": true}"#,
        ] {
            assert!(needs_reclassification(&patch(body)), "{body}");
        }
    }

    #[test]
    fn completion_and_other_fields_do_not() {
        for body in [
            r#"{}"#,
            r#"{"completed": true}"#,
            r#"{"completed": false}"#,
            r#"{"project": "p-1"}"#,
        ] {
            assert!(!needs_reclassification(&patch(body)), "{body}");
        }
    }

    #[test]
    fn completing_stamps_now() {
        let now = Utc.with_ymd_and_hms(2025, 5, 5, 17, 0, 0).unwrap();
        assert_eq!(completion_transition(None, Some(true), now), Some(now));
    }

    #[test]
    fn completing_again_keeps_first_timestamp() {
        let now = Utc.with_ymd_and_hms(2025, 5, 5, 17, 0, 0).unwrap();
        let earlier = now - Duration::hours(3);
        assert_eq!(completion_transition(Some(earlier), Some(true), now), Some(earlier));
    }

    #[test]
    fn reopening_clears_timestamp() {
        let now = Utc.with_ymd_and_hms(2025, 5, 5, 17, 0, 0).unwrap();
        assert_eq!(completion_transition(Some(now), Some(false), now), None);
    }

    #[test]
    fn untouched_when_completed_absent() {
        let now = Utc.with_ymd_and_hms(2025, 5, 5, 17, 0, 0).unwrap();
        let earlier = now - Duration::days(1);
        assert_eq!(completion_transition(Some(earlier), None, now), Some(earlier));
    }
}
