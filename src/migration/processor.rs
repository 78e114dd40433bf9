//! Resumable batch migration runner.
//!
//! Drives every unmigrated journal entry through flattening →
//! classification → gating → persistence, strictly sequentially, with a
//! fixed pause after each entry to respect the classification service's
//! request-rate ceiling. A failure on one entry is counted and logged but
//! never aborts the run; resumability comes from the persisted goal link,
//! so a re-run simply picks up whatever is still unlinked.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::classifier::GoalClassifier;
use crate::db::schemas::JournalDoc;
use crate::migration::decision;
use crate::migration::flatten::flatten_goal_tree;
use crate::migration::store::{GoalSource, JournalStore, ProgressStore};
use crate::types::{MigrateError, Result};

/// How often a running-totals progress line is emitted
const PROGRESS_EVERY: u32 = 10;

/// Counters for one migration run. Process-local; discarded after the
/// final report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    pub total: u32,
    pub mapped: u32,
    pub unmapped: u32,
    pub progress_created: u32,
    pub errors: u32,
}

enum EntryOutcome {
    Mapped,
    Unmapped,
}

/// Sequential, rate-limited migration over all unmigrated journal entries.
pub struct MigrationRunner<G, J, P>
where
    G: GoalSource,
    J: JournalStore,
    P: ProgressStore,
{
    goals: Arc<G>,
    journals: Arc<J>,
    progress: Arc<P>,
    classifier: GoalClassifier,
    entry_delay: Duration,
}

impl<G, J, P> MigrationRunner<G, J, P>
where
    G: GoalSource,
    J: JournalStore,
    P: ProgressStore,
{
    pub fn new(
        goals: Arc<G>,
        journals: Arc<J>,
        progress: Arc<P>,
        classifier: GoalClassifier,
        entry_delay: Duration,
    ) -> Self {
        Self {
            goals,
            journals,
            progress,
            classifier,
            entry_delay,
        }
    }

    /// Run the migration to completion.
    ///
    /// Fails only when the unmigrated set cannot be read at all; every
    /// per-entry failure is absorbed into the statistics.
    pub async fn run(&self) -> Result<RunStatistics> {
        let pending = self.journals.unmigrated_journals().await?;
        let mut stats = RunStatistics::default();

        if pending.is_empty() {
            info!("No unmigrated journal entries found, nothing to do");
            return Ok(stats);
        }

        info!(
            count = pending.len(),
            classifier_configured = self.classifier.is_configured(),
            "Starting goal classification migration"
        );

        for journal in &pending {
            stats.total += 1;

            match self.process_entry(journal).await {
                Ok(EntryOutcome::Mapped) => {
                    stats.mapped += 1;
                    stats.progress_created += 1;
                }
                Ok(EntryOutcome::Unmapped) => stats.unmapped += 1,
                Err(e) => {
                    let journal_id = journal
                        .id
                        .map(|id| id.to_hex())
                        .unwrap_or_else(|| "<no id>".to_string());
                    error!(journal_id = %journal_id, error = %e, "Entry failed, continuing with next");
                    stats.errors += 1;
                }
            }

            if stats.total % PROGRESS_EVERY == 0 {
                info!(
                    processed = stats.total,
                    total = pending.len(),
                    mapped = stats.mapped,
                    unmapped = stats.unmapped,
                    errors = stats.errors,
                    "Migration progress"
                );
            }

            // Rate ceiling: one entry at a time, fixed pause in between
            tokio::time::sleep(self.entry_delay).await;
        }

        Ok(stats)
    }

    async fn process_entry(&self, journal: &JournalDoc) -> Result<EntryOutcome> {
        let tree = self.goals.goal_tree_for_user(&journal.user_id).await?;
        let candidates = flatten_goal_tree(tree.as_ref());

        if candidates.is_empty() {
            debug!(user_id = %journal.user_id, "No goal candidates, leaving entry unmapped");
            return Ok(EntryOutcome::Unmapped);
        }

        let result = self.classifier.classify(&candidates, &journal.content).await?;

        let (Some(goal_id), Some(level)) =
            (result.related_goal_id.as_deref(), result.related_goal_type)
        else {
            debug!(reason = %result.reason, "No confident match for entry");
            return Ok(EntryOutcome::Unmapped);
        };

        let journal_id = journal
            .id
            .as_ref()
            .ok_or_else(|| MigrateError::Database("Journal entry missing _id".into()))?;

        self.journals
            .link_journal_to_goal(journal_id, goal_id, level)
            .await?;

        self.progress
            .insert_progress(decision::derive_progress(journal, goal_id, level))
            .await?;

        info!(
            journal_id = %journal_id.to_hex(),
            goal_id = goal_id,
            level = level.as_str(),
            confidence = result.confidence,
            "Entry linked to goal"
        );

        Ok(EntryOutcome::Mapped)
    }
}
