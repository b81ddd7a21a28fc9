use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::patch::{double_option, trimmed};
use crate::task::new_id;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Archived,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn from_new(input: NewProject, now: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            title: input.title.unwrap_or_default().trim().to_string(),
            description: trimmed(input.description),
            status: input.status.unwrap_or_default(),
            goal: trimmed(input.goal),
            deadline: input.deadline,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_patch(&mut self, patch: ProjectPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = trimmed(description);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(goal) = patch.goal {
            self.goal = trimmed(goal);
        }
        if let Some(deadline) = patch.deadline {
            self.deadline = deadline;
        }
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub goal: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectPatch {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub status: Option<ProjectStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub goal: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub deadline: Option<Option<DateTime<Utc>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_active() {
        let project = Project::from_new(
            NewProject {
                title: Some("Website relaunch".into()),
                ..Default::default()
            },
            Utc::now(),
        );
        assert_eq!(project.status, ProjectStatus::Active);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let parsed = serde_json::from_str::<NewProject>(r#"{"title": "x", "status": "paused"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn patch_can_clear_deadline() {
        let mut project = Project::from_new(
            NewProject {
                title: Some("Move office".into()),
                deadline: Some(Utc::now()),
                ..Default::default()
            },
            Utc::now(),
        );
        let patch: ProjectPatch =
            serde_json::from_str(r#"{"deadline": null, "status": "archived"}"#).unwrap();
        project.apply_patch(patch, Utc::now());
        assert!(project.deadline.is_none());
        assert_eq!(project.status, ProjectStatus::Archived);
    }
}
