//! Goal tree flattening.
//!
//! Projects a user's nested goal tree into the ordered candidate list the
//! classifier matches against. Order is stable for a fixed tree: the
//! candidate list is embedded verbatim into the classification prompt, so
//! repeated runs over the same tree must produce identical requests.

use crate::db::schemas::{GoalDoc, GoalLevel};

/// Flat projection of one goal node, used for matching. Recomputed per
/// classification call; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatGoalCandidate {
    pub id: String,
    pub text: String,
    pub description: Option<String>,
    pub level: GoalLevel,
}

/// Flatten a goal tree into matchable candidates: root first, then each
/// sub-goal followed immediately by its own sub-sub children. Null grid
/// slots and nodes without display text are skipped.
pub fn flatten_goal_tree(goal: Option<&GoalDoc>) -> Vec<FlatGoalCandidate> {
    let Some(goal) = goal else {
        return Vec::new();
    };

    let mut candidates = Vec::new();

    if !goal.text.trim().is_empty() {
        candidates.push(FlatGoalCandidate {
            id: goal.goal_id.clone(),
            text: goal.text.clone(),
            description: goal.description.clone(),
            level: GoalLevel::Main,
        });
    }

    for sub in goal.sub_goals.iter().flatten() {
        if sub.text.trim().is_empty() {
            continue;
        }

        candidates.push(FlatGoalCandidate {
            id: sub.goal_id.clone(),
            text: sub.text.clone(),
            description: sub.description.clone(),
            level: GoalLevel::Sub,
        });

        for sub_sub in sub.sub_sub_goals.iter().flatten() {
            if sub_sub.text.trim().is_empty() {
                continue;
            }

            candidates.push(FlatGoalCandidate {
                id: sub_sub.goal_id.clone(),
                text: sub_sub.text.clone(),
                description: sub_sub.description.clone(),
                level: GoalLevel::SubSub,
            });
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schemas::{SubGoal, SubSubGoal};

    fn sample_tree() -> GoalDoc {
        GoalDoc {
            id: None,
            user_id: "u1".to_string(),
            goal_id: "g-root".to_string(),
            text: "Live well".to_string(),
            description: Some("Overall direction".to_string()),
            sub_goals: vec![
                Some(SubGoal {
                    goal_id: "g-1".to_string(),
                    text: "Physical Health".to_string(),
                    description: None,
                    sub_sub_goals: vec![
                        None,
                        Some(SubSubGoal {
                            goal_id: "g-1-1".to_string(),
                            text: "Run weekly".to_string(),
                            description: None,
                        }),
                        Some(SubSubGoal {
                            goal_id: "g-1-2".to_string(),
                            text: "".to_string(),
                            description: None,
                        }),
                    ],
                }),
                None,
                Some(SubGoal {
                    goal_id: "g-2".to_string(),
                    text: "Learning".to_string(),
                    description: Some("Keep studying".to_string()),
                    sub_sub_goals: vec![],
                }),
            ],
        }
    }

    #[test]
    fn test_flatten_orders_root_then_subtrees() {
        let tree = sample_tree();
        let candidates = flatten_goal_tree(Some(&tree));

        let ids: Vec<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["g-root", "g-1", "g-1-1", "g-2"]);

        assert_eq!(candidates[0].level, GoalLevel::Main);
        assert_eq!(candidates[1].level, GoalLevel::Sub);
        assert_eq!(candidates[2].level, GoalLevel::SubSub);
        assert_eq!(candidates[3].level, GoalLevel::Sub);
    }

    #[test]
    fn test_flatten_is_deterministic() {
        let tree = sample_tree();
        assert_eq!(flatten_goal_tree(Some(&tree)), flatten_goal_tree(Some(&tree)));
    }

    #[test]
    fn test_flatten_skips_null_slots_and_textless_nodes() {
        let tree = sample_tree();
        let candidates = flatten_goal_tree(Some(&tree));

        // g-1-2 has empty text, the None slots are placeholders
        assert!(candidates.iter().all(|c| !c.text.is_empty()));
        assert!(!candidates.iter().any(|c| c.id == "g-1-2"));
    }

    #[test]
    fn test_flatten_absent_tree_is_empty() {
        assert!(flatten_goal_tree(None).is_empty());
    }

    #[test]
    fn test_flatten_tree_with_no_eligible_nodes_is_empty() {
        let tree = GoalDoc {
            text: "   ".to_string(),
            sub_goals: vec![None, None],
            ..sample_tree()
        };

        assert!(flatten_goal_tree(Some(&tree)).is_empty());
    }
}
