//! Store traits for the migration runner.
//!
//! Narrow interfaces over the document database so the runner can be
//! exercised against in-memory implementations in tests. The MongoDB
//! implementations live in `db::stores`.

use std::collections::HashMap;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::db::schemas::{GoalDoc, GoalLevel, JournalDoc, ProgressDoc};
use crate::types::{MigrateError, Result};

/// Read-only lookup of a user's goal tree.
#[async_trait]
pub trait GoalSource: Send + Sync {
    async fn goal_tree_for_user(&self, user_id: &str) -> Result<Option<GoalDoc>>;
}

/// Query and point-update access to journal entries.
#[async_trait]
pub trait JournalStore: Send + Sync {
    /// All entries with no goal link (field absent or explicitly null),
    /// most recent first.
    async fn unmigrated_journals(&self) -> Result<Vec<JournalDoc>>;

    /// Attach the goal link to one entry. Only the two link fields are
    /// touched.
    async fn link_journal_to_goal(
        &self,
        journal_id: &ObjectId,
        goal_id: &str,
        level: GoalLevel,
    ) -> Result<()>;
}

/// Insert-only access to progress records.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn insert_progress(&self, doc: ProgressDoc) -> Result<()>;
}

// ============================================================================
// In-Memory Store (for testing/local development)
// ============================================================================

/// Simple in-memory implementation of all three store traits.
#[derive(Default)]
pub struct InMemoryStore {
    goals: RwLock<HashMap<String, GoalDoc>>,
    journals: RwLock<Vec<JournalDoc>>,
    progress: RwLock<Vec<ProgressDoc>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a goal tree keyed by its owner.
    pub async fn put_goal_tree(&self, goal: GoalDoc) {
        self.goals.write().await.insert(goal.user_id.clone(), goal);
    }

    /// Store a journal entry, assigning an id when absent.
    pub async fn put_journal(&self, mut journal: JournalDoc) -> ObjectId {
        let id = journal.id.unwrap_or_else(ObjectId::new);
        journal.id = Some(id);
        self.journals.write().await.push(journal);
        id
    }

    pub async fn journal(&self, id: &ObjectId) -> Option<JournalDoc> {
        self.journals
            .read()
            .await
            .iter()
            .find(|j| j.id.as_ref() == Some(id))
            .cloned()
    }

    pub async fn progress_records(&self) -> Vec<ProgressDoc> {
        self.progress.read().await.clone()
    }
}

#[async_trait]
impl GoalSource for InMemoryStore {
    async fn goal_tree_for_user(&self, user_id: &str) -> Result<Option<GoalDoc>> {
        Ok(self.goals.read().await.get(user_id).cloned())
    }
}

#[async_trait]
impl JournalStore for InMemoryStore {
    async fn unmigrated_journals(&self) -> Result<Vec<JournalDoc>> {
        let mut pending: Vec<JournalDoc> = self
            .journals
            .read()
            .await
            .iter()
            .filter(|j| j.related_goal_id.is_none())
            .cloned()
            .collect();

        pending.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(pending)
    }

    async fn link_journal_to_goal(
        &self,
        journal_id: &ObjectId,
        goal_id: &str,
        level: GoalLevel,
    ) -> Result<()> {
        let mut journals = self.journals.write().await;
        let journal = journals
            .iter_mut()
            .find(|j| j.id.as_ref() == Some(journal_id))
            .ok_or_else(|| MigrateError::Database(format!("Journal not found: {}", journal_id)))?;

        journal.related_goal_id = Some(goal_id.to_string());
        journal.related_goal_type = Some(level);
        Ok(())
    }
}

#[async_trait]
impl ProgressStore for InMemoryStore {
    async fn insert_progress(&self, doc: ProgressDoc) -> Result<()> {
        self.progress.write().await.push(doc);
        Ok(())
    }
}
