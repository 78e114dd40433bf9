//! Progress record document schema
//!
//! One record per successfully classified journal entry. Records are
//! insert-only: this service never updates or deletes them.

use bson::{doc, oid::ObjectId, Document};
use chrono::{DateTime, Utc};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;

/// Collection name for progress records
pub const PROGRESS_COLLECTION: &str = "progress";

/// Category tag for records derived from journal reflection
pub const PROGRESS_TYPE_REFLECTION: &str = "reflection";

/// Progress record document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProgressDoc {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Owner of this record
    pub user_id: String,

    /// Goal the source entry was classified against
    pub goal_id: String,

    /// Set only when the linked goal is at sub or sub-sub level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_goal_id: Option<String>,

    /// Category tag; always "reflection" for records derived here
    pub progress_type: String,

    /// Title copied from the source entry
    pub title: String,

    /// Source entry body, capped at 200 characters
    pub description: String,

    /// Timestamp copied from the source entry
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub date: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Copied from the source entry
    #[serde(default)]
    pub is_ai_generated: bool,

    /// Estimated minutes of goal-related activity
    pub time_spent_minutes: u32,

    pub is_milestone: bool,
}

impl IntoIndexes for ProgressDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "userId": 1, "date": -1 },
            Some(
                IndexOptions::builder()
                    .name("user_id_date".to_string())
                    .build(),
            ),
        )]
    }
}
