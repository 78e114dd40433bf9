//! Journal-entry classification against goal trees.
//!
//! The classification model is an opaque capability reached through the
//! `LlmBackend` trait; this module owns how that capability is invoked and
//! how its structured judgment is validated.

pub mod backend;
pub mod client;
pub mod mock;
pub mod openai;

pub use backend::{CompletionRequest, CompletionResponse, LlmBackend, LlmError};
pub use client::{ClassificationResult, GoalClassifier, CONFIDENCE_THRESHOLD};
pub use mock::MockBackend;
pub use openai::OpenAiBackend;
