//! Acceptance gate and derived-field computation.
//!
//! Pure functions: the confidence threshold itself is enforced inside the
//! classifier, so acceptance here reduces to "did the judgment link a
//! goal", plus the field derivations persisted alongside an accepted link.

use crate::classifier::ClassificationResult;
use crate::db::schemas::{GoalLevel, JournalDoc, ProgressDoc, PROGRESS_TYPE_REFLECTION};

/// Progress descriptions carry at most this many characters of the body
pub const DESCRIPTION_CAP: usize = 200;

/// Accept a classification when it carries a goal link.
pub fn accept(result: &ClassificationResult) -> bool {
    result.is_match()
}

/// The sub-goal reference for a linked level: root-level links have no
/// sub-goal, deeper links reference the classified node itself.
pub fn derive_sub_goal_id(goal_id: &str, level: GoalLevel) -> Option<String> {
    match level {
        GoalLevel::Main => None,
        GoalLevel::Sub | GoalLevel::SubSub => Some(goal_id.to_string()),
    }
}

/// Coarse time-spent estimate in minutes: four minutes per started
/// 200-character block of reflective writing plus one, floored at five so
/// very short entries still register.
pub fn estimate_time_spent_minutes(body: &str) -> u32 {
    let blocks = (body.chars().count() as u32).div_ceil(200);
    (4 * blocks + 1).max(5)
}

/// Build the progress record derived from an accepted classification.
pub fn derive_progress(journal: &JournalDoc, goal_id: &str, level: GoalLevel) -> ProgressDoc {
    ProgressDoc {
        id: None,
        user_id: journal.user_id.clone(),
        goal_id: goal_id.to_string(),
        sub_goal_id: derive_sub_goal_id(goal_id, level),
        progress_type: PROGRESS_TYPE_REFLECTION.to_string(),
        title: journal.title.clone(),
        description: journal.content.chars().take(DESCRIPTION_CAP).collect(),
        date: journal.created_at,
        mood: journal.mood.clone(),
        tags: journal.tags.clone(),
        is_ai_generated: journal.is_ai_generated,
        time_spent_minutes: estimate_time_spent_minutes(&journal.content),
        is_milestone: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn journal_with_content(content: &str) -> JournalDoc {
        JournalDoc {
            id: None,
            user_id: "u1".to_string(),
            title: "A day".to_string(),
            content: content.to_string(),
            mood: Some("calm".to_string()),
            tags: vec!["running".to_string()],
            created_at: Utc::now(),
            related_goal_id: None,
            related_goal_type: None,
            is_ai_generated: false,
        }
    }

    fn match_result(goal_id: &str, level: GoalLevel) -> ClassificationResult {
        ClassificationResult {
            related_goal_id: Some(goal_id.to_string()),
            related_goal_type: Some(level),
            confidence: 0.8,
            reason: "test".to_string(),
        }
    }

    #[test]
    fn test_accept_requires_goal_link() {
        assert!(accept(&match_result("g2", GoalLevel::Sub)));
        assert!(!accept(&ClassificationResult::no_match("nothing")));
    }

    #[test]
    fn test_sub_goal_id_derivation() {
        assert_eq!(derive_sub_goal_id("g1", GoalLevel::Main), None);
        assert_eq!(derive_sub_goal_id("g2", GoalLevel::Sub), Some("g2".to_string()));
        assert_eq!(derive_sub_goal_id("g3", GoalLevel::SubSub), Some("g3".to_string()));
    }

    #[test]
    fn test_time_spent_boundaries() {
        assert_eq!(estimate_time_spent_minutes(""), 5);
        assert_eq!(estimate_time_spent_minutes(&"a".repeat(200)), 5);
        assert_eq!(estimate_time_spent_minutes(&"a".repeat(201)), 9);
        assert_eq!(estimate_time_spent_minutes(&"a".repeat(400)), 9);
        assert_eq!(estimate_time_spent_minutes(&"a".repeat(401)), 13);
    }

    #[test]
    fn test_time_spent_is_monotone_and_floored() {
        let mut last = 0;
        for len in (0..=2000).step_by(50) {
            let estimate = estimate_time_spent_minutes(&"a".repeat(len));
            assert!(estimate >= 5);
            assert!(estimate >= last);
            last = estimate;
        }
    }

    #[test]
    fn test_derive_progress_copies_source_fields() {
        let journal = journal_with_content(&"b".repeat(450));
        let progress = derive_progress(&journal, "g2", GoalLevel::Sub);

        assert_eq!(progress.goal_id, "g2");
        assert_eq!(progress.sub_goal_id.as_deref(), Some("g2"));
        assert_eq!(progress.progress_type, "reflection");
        assert_eq!(progress.description.chars().count(), 200);
        assert_eq!(progress.date, journal.created_at);
        assert_eq!(progress.mood.as_deref(), Some("calm"));
        assert_eq!(progress.time_spent_minutes, 13);
        assert!(!progress.is_milestone);
    }

    #[test]
    fn test_derive_progress_root_level_has_no_sub_goal() {
        let journal = journal_with_content("short");
        let progress = derive_progress(&journal, "g-root", GoalLevel::Main);

        assert_eq!(progress.sub_goal_id, None);
    }
}
