//! Built-in scoring heuristic.
//!
//! Pure and total: used whenever the external scorer is absent or fails.
//!
//! | due date            | urgency |
//! |---------------------|---------|
//! | none                | 0.4     |
//! | already past        | 1.0     |
//! | within 24h          | 0.8     |
//! | within 72h          | 0.6     |
//! | later               | 0.3     |
//!
//! Importance starts at 0.5, becomes 0.9 for delivery-type tags or 0.3 for
//! maintenance-type tags, and gains 0.2 (capped at 1.0) for estimates of four
//! hours or more.

use chrono::{DateTime, Duration, Utc};
use taskmate_core::{PriorityLabel, ScoreResult};

use crate::input::ScoringInput;
use crate::stats::round_to;

const URGENCY_NO_DUE_DATE: f64 = 0.4;
const URGENCY_OVERDUE: f64 = 1.0;
const URGENCY_WITHIN_DAY: f64 = 0.8;
const URGENCY_WITHIN_THREE_DAYS: f64 = 0.6;
const URGENCY_LATER: f64 = 0.3;

const IMPORTANCE_BASE: f64 = 0.5;
const IMPORTANCE_HIGH: f64 = 0.9;
const IMPORTANCE_LOW: f64 = 0.3;
const LONG_TASK_MINUTES: u32 = 240;
const LONG_TASK_BONUS: f64 = 0.2;

const HIGH_IMPORTANCE_TAGS: &[&str] = &["client", "livraison", "deadline"];
const LOW_IMPORTANCE_TAGS: &[&str] = &["maintenance", "low"];

pub fn classify(input: &ScoringInput) -> ScoreResult {
    classify_at(input, Utc::now())
}

/// Classify against an explicit clock.
pub fn classify_at(input: &ScoringInput, now: DateTime<Utc>) -> ScoreResult {
    let urgency = urgency_at(input.due_date, now);
    let importance = importance(&input.tags, input.minutes());
    ScoreResult {
        urgency,
        importance,
        priority_label: label_for(urgency, importance),
    }
}

pub fn urgency_at(due_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(due) = due_date else {
        return URGENCY_NO_DUE_DATE;
    };
    let remaining = due - now;
    if remaining < Duration::zero() {
        URGENCY_OVERDUE
    } else if remaining <= Duration::hours(24) {
        URGENCY_WITHIN_DAY
    } else if remaining <= Duration::hours(72) {
        URGENCY_WITHIN_THREE_DAYS
    } else {
        URGENCY_LATER
    }
}

pub fn importance(tags: &[String], minutes: u32) -> f64 {
    let has_any = |set: &[&str]| {
        tags.iter()
            .any(|tag| set.iter().any(|wanted| tag.eq_ignore_ascii_case(wanted)))
    };

    let mut importance = if has_any(HIGH_IMPORTANCE_TAGS) {
        IMPORTANCE_HIGH
    } else if has_any(LOW_IMPORTANCE_TAGS) {
        IMPORTANCE_LOW
    } else {
        IMPORTANCE_BASE
    };

    if minutes >= LONG_TASK_MINUTES {
        importance = round_to((importance + LONG_TASK_BONUS).min(1.0), 2);
    }
    importance
}

/// First matching rule wins. `Low` is never returned here.
pub fn label_for(urgency: f64, importance: f64) -> PriorityLabel {
    if urgency >= 0.8 && importance >= 0.7 {
        PriorityLabel::Critical
    } else if urgency >= 0.7 {
        PriorityLabel::Urgent
    } else if importance >= 0.7 {
        PriorityLabel::Important
    } else {
        PriorityLabel::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap()
    }

    fn input(due_in: Option<Duration>, tags: &[&str], minutes: Option<i64>) -> ScoringInput {
        ScoringInput {
            title: "task".into(),
            due_date: due_in.map(|d| now() + d),
            estimated_minutes: minutes,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn no_due_date_is_moderately_urgent() {
        let result = classify_at(&input(None, &[], None), now());
        assert_eq!(result.urgency, 0.4);
    }

    #[test]
    fn urgency_buckets() {
        let at = |d: Duration| classify_at(&input(Some(d), &[], None), now()).urgency;
        assert_eq!(at(Duration::seconds(-1)), 1.0);
        assert_eq!(at(Duration::days(-30)), 1.0);
        assert_eq!(at(Duration::zero()), 0.8);
        assert_eq!(at(Duration::hours(24)), 0.8);
        assert_eq!(at(Duration::hours(25)), 0.6);
        assert_eq!(at(Duration::hours(72)), 0.6);
        assert_eq!(at(Duration::hours(73)), 0.3);
    }

    #[test]
    fn client_tag_is_important() {
        let result = classify_at(&input(None, &["client"], Some(30)), now());
        assert_eq!(result.importance, 0.9);
    }

    #[test]
    fn tag_match_ignores_case() {
        let result = classify_at(&input(None, &["LIVRAISON"], None), now());
        assert_eq!(result.importance, 0.9);
        let result = classify_at(&input(None, &["Maintenance"], None), now());
        assert_eq!(result.importance, 0.3);
    }

    #[test]
    fn high_tags_win_over_low_tags() {
        let result = classify_at(&input(None, &["low", "deadline"], None), now());
        assert_eq!(result.importance, 0.9);
    }

    #[test]
    fn long_task_bonus_applies_without_tags() {
        let result = classify_at(&input(None, &[], Some(300)), now());
        assert_eq!(result.importance, 0.7);
    }

    #[test]
    fn long_task_bonus_on_low_tag() {
        let result = classify_at(&input(None, &["maintenance"], Some(300)), now());
        assert_eq!(result.importance, 0.5);
    }

    #[test]
    fn long_task_bonus_is_capped() {
        let result = classify_at(&input(None, &["client"], Some(240)), now());
        assert_eq!(result.importance, 1.0);
    }

    #[test]
    fn non_positive_estimate_uses_default() {
        let result = classify_at(&input(None, &[], Some(-500)), now());
        assert_eq!(result.importance, 0.5);
    }

    #[test]
    fn label_boundaries() {
        assert_eq!(label_for(0.8, 0.7), PriorityLabel::Critical);
        assert_eq!(label_for(0.79, 0.7), PriorityLabel::Urgent);
        assert_eq!(label_for(0.7, 0.69), PriorityLabel::Urgent);
        assert_eq!(label_for(0.69, 0.7), PriorityLabel::Important);
        assert_eq!(label_for(0.6, 0.5), PriorityLabel::Normal);
        assert_eq!(label_for(1.0, 0.3), PriorityLabel::Urgent);
    }

    #[test]
    fn heuristic_never_labels_low() {
        for urgency in [0.0, 0.3, 0.4, 0.6, 0.8, 1.0] {
            for importance in [0.0, 0.3, 0.5, 0.7, 0.9, 1.0] {
                assert_ne!(label_for(urgency, importance), PriorityLabel::Low);
            }
        }
    }

    #[test]
    fn overdue_client_work_is_critical() {
        let result = classify_at(&input(Some(Duration::hours(-2)), &["client"], None), now());
        assert_eq!(result.priority_label, PriorityLabel::Critical);
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let task = input(Some(Duration::hours(30)), &["deadline"], Some(500));
        assert_eq!(classify_at(&task, now()), classify_at(&task, now()));
    }
}
