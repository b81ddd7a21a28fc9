use chrono::{DateTime, Utc};
use serde::Serialize;
use taskmate_core::{normalize_minutes, Task};

/// The task fields classification looks at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoringInput {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub estimated_minutes: Option<i64>,
    pub tags: Vec<String>,
}

impl ScoringInput {
    /// Estimate with the canonical default applied.
    pub fn minutes(&self) -> u32 {
        normalize_minutes(self.estimated_minutes)
    }

    /// Normalized wire payload for the external scorer.
    pub fn payload(&self) -> ScorerPayload<'_> {
        ScorerPayload {
            title: &self.title,
            description: self.description.as_deref().unwrap_or(""),
            due_date: self.due_date,
            estimated_minutes: self.minutes(),
            tags: &self.tags,
        }
    }
}

impl From<&Task> for ScoringInput {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date,
            estimated_minutes: Some(i64::from(task.estimated_minutes)),
            tags: task.tags.clone(),
        }
    }
}

/// JSON written to the scorer's stdin.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorerPayload<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub due_date: Option<DateTime<Utc>>,
    pub estimated_minutes: u32,
    pub tags: &'a [String],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_applies_defaults() {
        let input = ScoringInput {
            title: "Call supplier".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(input.payload()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Call supplier",
                "description": "",
                "dueDate": null,
                "estimatedMinutes": 30,
                "tags": []
            })
        );
    }

    #[test]
    fn payload_keeps_given_values() {
        let input = ScoringInput {
            title: "Migrate DB".into(),
            description: Some("move to v2 schema".into()),
            due_date: None,
            estimated_minutes: Some(300),
            tags: vec!["maintenance".into()],
        };
        let json = serde_json::to_value(input.payload()).unwrap();
        assert_eq!(json["description"], "move to v2 schema");
        assert_eq!(json["estimatedMinutes"], 300);
        assert_eq!(json["tags"][0], "maintenance");
    }
}
