//! MongoDB implementations of the migration store traits.

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Bson};

use crate::db::mongo::{MongoClient, MongoCollection};
use crate::db::schemas::{
    GoalDoc, GoalLevel, JournalDoc, ProgressDoc, GOAL_COLLECTION, JOURNAL_COLLECTION,
    PROGRESS_COLLECTION,
};
use crate::migration::store::{GoalSource, JournalStore, ProgressStore};
use crate::types::Result;

/// Typed handles to the three collections the migration touches.
#[derive(Clone)]
pub struct MigrationDb {
    goals: MongoCollection<GoalDoc>,
    journals: MongoCollection<JournalDoc>,
    progress: MongoCollection<ProgressDoc>,
}

impl MigrationDb {
    /// Open the collections and apply their indexes.
    pub async fn new(client: &MongoClient) -> Result<Self> {
        Ok(Self {
            goals: client.collection(GOAL_COLLECTION).await?,
            journals: client.collection(JOURNAL_COLLECTION).await?,
            progress: client.collection(PROGRESS_COLLECTION).await?,
        })
    }
}

#[async_trait]
impl GoalSource for MigrationDb {
    async fn goal_tree_for_user(&self, user_id: &str) -> Result<Option<GoalDoc>> {
        self.goals.find_one(doc! { "userId": user_id }).await
    }
}

#[async_trait]
impl JournalStore for MigrationDb {
    async fn unmigrated_journals(&self) -> Result<Vec<JournalDoc>> {
        // A never-classified entry may have the link field entirely unset;
        // treat that the same as an explicit null.
        let filter = doc! {
            "$or": [
                { "relatedGoalId": { "$exists": false } },
                { "relatedGoalId": Bson::Null },
            ]
        };

        self.journals
            .find_many(filter, Some(doc! { "createdAt": -1 }))
            .await
    }

    async fn link_journal_to_goal(
        &self,
        journal_id: &ObjectId,
        goal_id: &str,
        level: GoalLevel,
    ) -> Result<()> {
        // Only the two link fields; everything else is owned upstream
        let update = doc! {
            "$set": {
                "relatedGoalId": goal_id,
                "relatedGoalType": level.as_str(),
            }
        };

        self.journals
            .update_one(doc! { "_id": *journal_id }, update)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl ProgressStore for MigrationDb {
    async fn insert_progress(&self, doc: ProgressDoc) -> Result<()> {
        self.progress.insert_one(doc).await?;
        Ok(())
    }
}
