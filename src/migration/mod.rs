//! Batch migration of journal entries onto the goal-progress dataset.

pub mod decision;
pub mod flatten;
pub mod processor;
pub mod report;
pub mod store;

pub use flatten::{flatten_goal_tree, FlatGoalCandidate};
pub use processor::{MigrationRunner, RunStatistics};
pub use store::{GoalSource, InMemoryStore, JournalStore, ProgressStore};
