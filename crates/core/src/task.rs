use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::patch::{
    double_option, lenient_minutes, lenient_minutes_patch, lenient_string, lenient_string_patch,
    trimmed,
};

/// Estimate applied when a task carries no usable `estimatedMinutes`.
pub const DEFAULT_ESTIMATED_MINUTES: u32 = 30;

/// Single place where the estimate default is applied.
///
/// Absent, zero and negative values all become [`DEFAULT_ESTIMATED_MINUTES`].
pub fn normalize_minutes(value: Option<i64>) -> u32 {
    match value {
        Some(minutes) if minutes > 0 => u32::try_from(minutes).unwrap_or(u32::MAX),
        _ => DEFAULT_ESTIMATED_MINUTES,
    }
}

fn default_minutes() -> u32 {
    DEFAULT_ESTIMATED_MINUTES
}

/// Fresh record identifier.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Coarse priority bucket shown next to a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLabel {
    Critical,
    Urgent,
    Important,
    #[default]
    Normal,
    /// Never produced by the built-in heuristic; only set by an external scorer.
    Low,
}

impl PriorityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityLabel::Critical => "critical",
            PriorityLabel::Urgent => "urgent",
            PriorityLabel::Important => "important",
            PriorityLabel::Normal => "normal",
            PriorityLabel::Low => "low",
        }
    }
}

impl fmt::Display for PriorityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriorityLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Ok(PriorityLabel::Critical),
            "urgent" => Ok(PriorityLabel::Urgent),
            "important" => Ok(PriorityLabel::Important),
            "normal" => Ok(PriorityLabel::Normal),
            "low" => Ok(PriorityLabel::Low),
            other => Err(format!("unknown priority label '{other}'")),
        }
    }
}

/// Output of one classification: merged into the task, never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub urgency: f64,
    pub importance: f64,
    pub priority_label: PriorityLabel,
}

/// A persisted task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default = "default_minutes")]
    pub estimated_minutes: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub urgency: f64,
    #[serde(default)]
    pub importance: f64,
    #[serde(default)]
    pub priority_label: PriorityLabel,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Build a task from a create payload. Scores start at zero / `normal`
    /// until a classification is merged in.
    pub fn from_new(input: NewTask, now: DateTime<Utc>) -> Self {
        let completed = input.completed.unwrap_or(false);
        Self {
            id: new_id(),
            title: input.title.unwrap_or_default().trim().to_string(),
            description: trimmed(input.description),
            due_date: input.due_date,
            estimated_minutes: normalize_minutes(input.estimated_minutes),
            completed,
            tags: input.tags.unwrap_or_default(),
            urgency: 0.0,
            importance: 0.0,
            priority_label: PriorityLabel::Normal,
            completed_at: completed.then_some(now),
            project: input.project,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge the content fields and the `completed` flag of a patch.
    ///
    /// `completedAt` and the scores are left alone; callers own those transitions.
    pub fn apply_patch(&mut self, patch: &TaskPatch, now: DateTime<Utc>) {
        if let Some(Some(title)) = &patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = &patch.description {
            self.description = trimmed(description.clone());
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(minutes) = patch.estimated_minutes {
            self.estimated_minutes = normalize_minutes(minutes);
        }
        if let Some(tags) = &patch.tags {
            self.tags = tags.clone().unwrap_or_default();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(project) = &patch.project {
            self.project = project.clone();
        }
        self.updated_at = now;
    }

    pub fn apply_score(&mut self, score: ScoreResult) {
        self.urgency = score.urgency;
        self.importance = score.importance;
        self.priority_label = score.priority_label;
    }
}

/// Body of a create request. Every field is optional at the wire level;
/// the handler rejects a missing title.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_minutes")]
    pub estimated_minutes: Option<i64>,
    pub tags: Option<Vec<String>>,
    pub completed: Option<bool>,
    pub project: Option<String>,
}

/// Body of an update request. Outer `None` = field omitted, `Some(None)` = explicit null.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, deserialize_with = "lenient_string_patch")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "lenient_minutes_patch")]
    pub estimated_minutes: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub tags: Option<Option<Vec<String>>>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub project: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
    }

    #[test]
    fn minutes_default_applies_to_missing_and_non_positive() {
        assert_eq!(normalize_minutes(None), 30);
        assert_eq!(normalize_minutes(Some(0)), 30);
        assert_eq!(normalize_minutes(Some(-15)), 30);
        assert_eq!(normalize_minutes(Some(240)), 240);
    }

    #[test]
    fn label_parses_case_insensitively() {
        assert_eq!("Critical".parse::<PriorityLabel>(), Ok(PriorityLabel::Critical));
        assert_eq!(" low ".parse::<PriorityLabel>(), Ok(PriorityLabel::Low));
        assert!("meh".parse::<PriorityLabel>().is_err());
    }

    #[test]
    fn task_serializes_camel_case_with_mongo_style_id() {
        let task = Task::from_new(
            NewTask {
                title: Some("  Ship release  ".into()),
                ..Default::default()
            },
            now(),
        );
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["title"], "Ship release");
        assert_eq!(json["estimatedMinutes"], 30);
        assert_eq!(json["priorityLabel"], "normal");
        assert!(json["_id"].is_string());
        assert!(json["completedAt"].is_null());
    }

    #[test]
    fn created_completed_task_gets_timestamp() {
        let task = Task::from_new(
            NewTask {
                title: Some("Done already".into()),
                completed: Some(true),
                ..Default::default()
            },
            now(),
        );
        assert_eq!(task.completed_at, Some(now()));
    }

    #[test]
    fn patch_distinguishes_null_from_missing() {
        let patch: TaskPatch =
            serde_json::from_str(r#"{"dueDate": null, "completed": true}"#).unwrap();
        assert_eq!(patch.due_date, Some(None));
        assert!(patch.title.is_none());
        assert!(patch.tags.is_none());
        assert_eq!(patch.completed, Some(true));
    }

    #[test]
    fn apply_patch_merges_fields_but_not_scores() {
        let mut task = Task::from_new(
            NewTask {
                title: Some("Write report".into()),
                tags: Some(vec!["client".into()]),
                estimated_minutes: Some(60),
                ..Default::default()
            },
            now(),
        );
        task.apply_score(ScoreResult {
            urgency: 0.8,
            importance: 0.9,
            priority_label: PriorityLabel::Critical,
        });

        let patch: TaskPatch =
            serde_json::from_str(r#"{"estimatedMinutes": null, "tags": null}"#).unwrap();
        task.apply_patch(&patch, now());

        assert_eq!(task.estimated_minutes, 30);
        assert!(task.tags.is_empty());
        assert_eq!(task.priority_label, PriorityLabel::Critical);
        assert_eq!(task.urgency, 0.8);
    }

    #[test]
    fn create_payload_coerces_loose_input() {
        let body: NewTask =
            serde_json::from_str(r#"{"title": 5, "estimatedMinutes": "300"}"#).unwrap();
        assert!(body.title.is_none());
        assert_eq!(body.estimated_minutes, Some(300));

        let body: NewTask =
            serde_json::from_str(r#"{"title": "x", "estimatedMinutes": 45.5}"#).unwrap();
        assert_eq!(Task::from_new(body, now()).estimated_minutes, 45);
    }

    #[test]
    fn patch_treats_non_string_title_as_cleared() {
        let patch: TaskPatch = serde_json::from_str(r#"{"title": 7}"#).unwrap();
        assert_eq!(patch.title, Some(None));
        let patch: TaskPatch = serde_json::from_str(r#"{"estimatedMinutes": "abc"}"#).unwrap();
        assert_eq!(patch.estimated_minutes, Some(None));
    }
}
