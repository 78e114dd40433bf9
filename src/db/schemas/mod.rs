//! Database schemas for Waymark
//!
//! Defines MongoDB document structures for goal trees, journal entries,
//! and progress records.

mod goal;
mod journal;
mod progress;

pub use goal::{GoalDoc, GoalLevel, SubGoal, SubSubGoal, GOAL_COLLECTION};
pub use journal::{JournalDoc, JOURNAL_COLLECTION};
pub use progress::{ProgressDoc, PROGRESS_COLLECTION, PROGRESS_TYPE_REFLECTION};
