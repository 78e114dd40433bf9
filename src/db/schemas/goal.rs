//! Goal tree document schema
//!
//! One document per user: a root goal with up to two levels of nested
//! sub-goals. Grid positions the user left empty are stored as nulls, so
//! the nested vectors hold `Option`s.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;

/// Collection name for goal trees
pub const GOAL_COLLECTION: &str = "goals";

/// Depth level of a node in the goal tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalLevel {
    #[serde(rename = "main")]
    Main,
    #[serde(rename = "sub")]
    Sub,
    #[serde(rename = "sub-sub")]
    SubSub,
}

impl GoalLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalLevel::Main => "main",
            GoalLevel::Sub => "sub",
            GoalLevel::SubSub => "sub-sub",
        }
    }
}

/// Goal tree document stored in MongoDB
///
/// Field names are camelCase to match the dataset written by the upstream
/// journaling application.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GoalDoc {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Owner of this goal tree
    pub user_id: String,

    /// Root goal node identifier (unique within the owner's tree)
    pub goal_id: String,

    /// Root goal display text
    #[serde(default)]
    pub text: String,

    /// Root goal description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Second-level goals; nulls mark intentionally empty grid positions
    #[serde(default)]
    pub sub_goals: Vec<Option<SubGoal>>,
}

/// Second-level goal node
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubGoal {
    pub goal_id: String,

    #[serde(default)]
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Third-level goals; nulls mark intentionally empty grid positions
    #[serde(default)]
    pub sub_sub_goals: Vec<Option<SubSubGoal>>,
}

/// Third-level goal node (leaf)
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubSubGoal {
    pub goal_id: String,

    #[serde(default)]
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl IntoIndexes for GoalDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // One goal tree per user
            (
                doc! { "userId": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("user_id_unique".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_level_serializes_to_wire_tags() {
        assert_eq!(serde_json::to_string(&GoalLevel::Main).unwrap(), r#""main""#);
        assert_eq!(serde_json::to_string(&GoalLevel::Sub).unwrap(), r#""sub""#);
        assert_eq!(serde_json::to_string(&GoalLevel::SubSub).unwrap(), r#""sub-sub""#);
    }

    #[test]
    fn test_goal_doc_roundtrip_preserves_null_slots() {
        let json = r#"{
            "userId": "u1",
            "goalId": "g-root",
            "text": "Live well",
            "subGoals": [null, {"goalId": "g-1", "text": "Health", "subSubGoals": [null]}]
        }"#;

        let doc: GoalDoc = serde_json::from_str(json).unwrap();
        assert_eq!(doc.sub_goals.len(), 2);
        assert!(doc.sub_goals[0].is_none());
        let sub = doc.sub_goals[1].as_ref().unwrap();
        assert_eq!(sub.goal_id, "g-1");
        assert_eq!(sub.sub_sub_goals.len(), 1);
        assert!(sub.sub_sub_goals[0].is_none());
    }
}
