//! Waymark - goal-progress migration for journal entries
//!
//! Classifies each unlinked journal entry against its owner's goal tree
//! using an OpenAI-compatible classification endpoint, then backfills the
//! goal link on the entry and a derived progress record.
//!
//! ## Pipeline
//!
//! ```text
//! journals (unmigrated) → flatten goal tree → classify → gate ≥ 0.3
//!                                                         │
//!                             ┌───────────────────────────┘
//!                             ▼
//!                 link entry + insert progress record
//! ```
//!
//! Processing is strictly sequential with a fixed pause per entry; a
//! terminated run is safely resumable because unmigrated status lives on
//! the persisted entry, not in run state.

pub mod classifier;
pub mod config;
pub mod db;
pub mod migration;
pub mod types;

pub use config::Args;
pub use types::{MigrateError, Result};
