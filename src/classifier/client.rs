//! Goal classification client.
//!
//! Formats a journal entry and the flattened goal candidates into a single
//! completion request, then parses the structured judgment out of the
//! response. A missing backend, a missing payload, or an unparsable
//! judgment all resolve to a no-match result rather than an error: an
//! ambiguous response must never create an incorrect goal link.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::backend::{CompletionRequest, LlmBackend, LlmError};
use crate::db::schemas::GoalLevel;
use crate::migration::flatten::FlatGoalCandidate;

/// Minimum confidence for a classification to be accepted
pub const CONFIDENCE_THRESHOLD: f32 = 0.3;

const MAX_JUDGMENT_TOKENS: u32 = 256;
const CLASSIFY_TEMPERATURE: f32 = 0.2;

/// Structured judgment produced per classification call. Transient: only
/// its accepted fields are copied onto the journal entry and the derived
/// progress record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    #[serde(default)]
    pub related_goal_id: Option<String>,

    #[serde(default)]
    pub related_goal_type: Option<GoalLevel>,

    #[serde(default)]
    pub confidence: f32,

    #[serde(default)]
    pub reason: String,
}

impl ClassificationResult {
    /// Absence-marker result with confidence 0.
    pub fn no_match(reason: impl Into<String>) -> Self {
        Self {
            related_goal_id: None,
            related_goal_type: None,
            confidence: 0.0,
            reason: reason.into(),
        }
    }

    /// Whether this judgment links the entry to a goal.
    pub fn is_match(&self) -> bool {
        self.related_goal_id.is_some() && self.related_goal_type.is_some()
    }
}

/// Classifies journal entries against a user's flattened goal candidates.
pub struct GoalClassifier {
    backend: Option<Arc<dyn LlmBackend>>,
}

impl GoalClassifier {
    /// Create a classifier. `None` means the classification service is not
    /// configured; every entry then resolves to no-match without traffic.
    pub fn new(backend: Option<Arc<dyn LlmBackend>>) -> Self {
        Self { backend }
    }

    /// Classifier without a configured backend.
    pub fn unconfigured() -> Self {
        Self { backend: None }
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    /// Classify one journal entry body against the candidate list.
    ///
    /// Backend transport failures propagate so the caller can count them at
    /// the record boundary; everything judgment-shaped that cannot be
    /// trusted resolves to a no-match result instead.
    pub async fn classify(
        &self,
        candidates: &[FlatGoalCandidate],
        content: &str,
    ) -> Result<ClassificationResult, LlmError> {
        // An empty candidate list is structurally unanswerable; never pay
        // for the call.
        if candidates.is_empty() {
            return Ok(ClassificationResult::no_match("no goal candidates"));
        }

        let Some(backend) = &self.backend else {
            return Ok(ClassificationResult::no_match(
                "classification service not configured",
            ));
        };

        let request = CompletionRequest::user(content)
            .with_system(build_system_prompt(candidates))
            .with_max_tokens(MAX_JUDGMENT_TOKENS)
            .with_temperature(CLASSIFY_TEMPERATURE)
            .with_json_output();

        let completion = backend.complete(request).await?;

        debug!(
            model = backend.id(),
            prompt_tokens = completion.usage.prompt_tokens,
            completion_tokens = completion.usage.completion_tokens,
            "Classification call completed"
        );

        if completion.content.trim().is_empty() {
            return Ok(ClassificationResult::no_match("empty judgment payload"));
        }

        let Some(result) = parse_judgment(&completion.content) else {
            debug!(content = %completion.content, "Judgment failed to parse, treating as no match");
            return Ok(ClassificationResult::no_match("unparsable judgment"));
        };

        // A judgment missing either link field is ambiguous; a confident-
        // looking guess below the threshold is discarded the same way.
        if !result.is_match() || result.confidence < CONFIDENCE_THRESHOLD {
            return Ok(ClassificationResult::no_match(result.reason));
        }

        Ok(result)
    }
}

/// System instruction embedding every candidate and the decision policy.
fn build_system_prompt(candidates: &[FlatGoalCandidate]) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are classifying a journal entry against the user's goals.\n\n");
    prompt.push_str("The user's goals:\n");

    for candidate in candidates {
        prompt.push_str(&format!(
            "{}: \"{}\" (ID: {})",
            candidate.level.as_str().to_uppercase(),
            candidate.text,
            candidate.id
        ));
        if let Some(description) = &candidate.description {
            prompt.push_str(&format!(" - {}", description));
        }
        prompt.push('\n');
    }

    prompt.push_str("\nThe entry relates to a goal when it directly mentions the goal topic, ");
    prompt.push_str("describes activity or progress related to the goal, ");
    prompt.push_str("expresses an emotional connection to the goal, ");
    prompt.push_str("or references the goal theme indirectly.\n");
    prompt.push_str("Only classify when your confidence exceeds 0.3. ");
    prompt.push_str("Prefer no match over a weak match.\n\n");
    prompt.push_str("Respond with a JSON object of this exact shape:\n");
    prompt.push_str("{\"relatedGoalId\": <string or null>, ");
    prompt.push_str("\"relatedGoalType\": <\"main\", \"sub\", \"sub-sub\" or null>, ");
    prompt.push_str("\"confidence\": <number between 0 and 1>, ");
    prompt.push_str("\"reason\": <short string>}\n");

    prompt
}

/// Extract the structured judgment from the raw completion content.
///
/// Models occasionally wrap JSON mode output in a markdown fence; strip it
/// before parsing. Anything that still fails to parse yields `None`.
fn parse_judgment(content: &str) -> Option<ClassificationResult> {
    let trimmed = content.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("```").unwrap_or(trimmed).trim();

    serde_json::from_str(trimmed).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::mock::MockBackend;

    fn candidates() -> Vec<FlatGoalCandidate> {
        vec![FlatGoalCandidate {
            id: "g2".to_string(),
            text: "Physical Health".to_string(),
            description: Some("Exercise and rest".to_string()),
            level: GoalLevel::Sub,
        }]
    }

    fn classifier_with(backend: MockBackend) -> (GoalClassifier, Arc<MockBackend>) {
        let backend = Arc::new(backend);
        (GoalClassifier::new(Some(backend.clone())), backend)
    }

    #[tokio::test]
    async fn test_confident_judgment_returned_as_is() {
        let (classifier, _) = classifier_with(MockBackend::default().with_response(
            r#"{"relatedGoalId": "g2", "relatedGoalType": "sub", "confidence": 0.8, "reason": "mentions running"}"#,
        ));

        let result = classifier
            .classify(&candidates(), "Went for a 5k run and felt great")
            .await
            .unwrap();

        assert_eq!(result.related_goal_id.as_deref(), Some("g2"));
        assert_eq!(result.related_goal_type, Some(GoalLevel::Sub));
        assert!((result.confidence - 0.8).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_low_confidence_downgraded_to_no_match() {
        let (classifier, _) = classifier_with(MockBackend::default().with_response(
            r#"{"relatedGoalId": "g2", "relatedGoalType": "sub", "confidence": 0.2, "reason": "weak"}"#,
        ));

        let result = classifier
            .classify(&candidates(), "Went for a 5k run and felt great")
            .await
            .unwrap();

        assert!(!result.is_match());
        assert_eq!(result.confidence, 0.0);
    }

    #[tokio::test]
    async fn test_unparsable_judgment_is_no_match() {
        let (classifier, _) =
            classifier_with(MockBackend::default().with_response("I think it's about health"));

        let result = classifier.classify(&candidates(), "body").await.unwrap();

        assert!(!result.is_match());
        assert_eq!(result.confidence, 0.0);
    }

    #[tokio::test]
    async fn test_fenced_judgment_still_parses() {
        let (classifier, _) = classifier_with(MockBackend::default().with_response(
            "```json\n{\"relatedGoalId\": \"g2\", \"relatedGoalType\": \"sub\", \"confidence\": 0.7, \"reason\": \"ok\"}\n```",
        ));

        let result = classifier.classify(&candidates(), "body").await.unwrap();
        assert!(result.is_match());
    }

    #[tokio::test]
    async fn test_missing_level_tag_is_no_match() {
        let (classifier, _) = classifier_with(MockBackend::default().with_response(
            r#"{"relatedGoalId": "g2", "relatedGoalType": null, "confidence": 0.9, "reason": "sure"}"#,
        ));

        let result = classifier.classify(&candidates(), "body").await.unwrap();
        assert!(!result.is_match());
    }

    #[tokio::test]
    async fn test_empty_candidates_never_calls_backend() {
        let (classifier, backend) = classifier_with(MockBackend::default());

        let result = classifier.classify(&[], "body").await.unwrap();

        assert!(!result.is_match());
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unconfigured_classifier_is_no_match() {
        let classifier = GoalClassifier::unconfigured();

        let result = classifier.classify(&candidates(), "body").await.unwrap();

        assert!(!result.is_match());
        assert_eq!(result.confidence, 0.0);
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let (classifier, _) = classifier_with(MockBackend::default().with_failure());

        let result = classifier.classify(&candidates(), "body").await;
        assert!(matches!(result, Err(LlmError::RequestFailed(_))));
    }

    #[test]
    fn test_system_prompt_enumerates_candidates() {
        let prompt = build_system_prompt(&candidates());

        assert!(prompt.contains("SUB: \"Physical Health\" (ID: g2) - Exercise and rest"));
        assert!(prompt.contains("Prefer no match over a weak match"));
        assert!(prompt.contains("relatedGoalId"));
    }
}
