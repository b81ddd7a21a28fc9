use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::new_id;

/// Kind of a note block, mirrored from the editor's block palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockType {
    #[default]
    #[serde(rename = "paragraph")]
    Paragraph,
    #[serde(rename = "heading_1")]
    Heading1,
    #[serde(rename = "heading_2")]
    Heading2,
    #[serde(rename = "heading_3")]
    Heading3,
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "list_item")]
    ListItem,
    #[serde(rename = "code")]
    Code,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "_id", default = "new_id")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub block_type: BlockType,
    #[serde(default)]
    pub content: String,
    /// Free-form metadata (image URL, checked state, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn from_new(input: NewNote, now: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            title: input.title.unwrap_or_default().trim().to_string(),
            blocks: input.blocks.unwrap_or_default(),
            tags: input.tags.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_patch(&mut self, patch: NotePatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(blocks) = patch.blocks {
            self.blocks = blocks;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewNote {
    pub title: Option<String>,
    pub blocks: Option<Vec<Block>>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotePatch {
    pub title: Option<String>,
    pub blocks: Option<Vec<Block>>,
    pub tags: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_types_use_snake_names_on_the_wire() {
        let block: Block =
            serde_json::from_str(r#"{"type": "heading_2", "content": "Plan"}"#).unwrap();
        assert_eq!(block.block_type, BlockType::Heading2);
        assert!(!block.id.is_empty());

        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "heading_2");
        assert!(json.get("properties").is_none());
    }

    #[test]
    fn missing_block_type_defaults_to_paragraph() {
        let block: Block = serde_json::from_str(r#"{"content": "hello"}"#).unwrap();
        assert_eq!(block.block_type, BlockType::Paragraph);
    }
}
