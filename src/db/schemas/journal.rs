//! Journal entry document schema
//!
//! Entries are written by the upstream journaling application; this service
//! only ever touches the two goal-link fields.

use bson::{doc, oid::ObjectId, Document};
use chrono::{DateTime, Utc};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;
use crate::db::schemas::GoalLevel;

/// Collection name for journal entries
pub const JOURNAL_COLLECTION: &str = "journals";

/// Journal entry document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct JournalDoc {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Owner of this entry
    pub user_id: String,

    /// Entry title
    #[serde(default)]
    pub title: String,

    /// Free-text entry body
    #[serde(default)]
    pub content: String,

    /// Mood tag chosen by the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,

    /// Topical tags
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    /// Goal this entry was classified against; absent or null until migrated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_goal_id: Option<String>,

    /// Level of the linked goal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_goal_type: Option<GoalLevel>,

    /// Whether the entry body was machine-authored
    #[serde(default)]
    pub is_ai_generated: bool,
}

impl IntoIndexes for JournalDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // Unmigrated selection scans relatedGoalId and sorts by recency
            (
                doc! { "relatedGoalId": 1, "createdAt": -1 },
                Some(
                    IndexOptions::builder()
                        .name("related_goal_created_at".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "userId": 1 },
                Some(
                    IndexOptions::builder()
                        .name("user_id_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}
