use serde::Serialize;
use sqlx::FromRow;

/// One answered question as read back from the transcript. `correct` is
/// computed live against the current option flags, not a snapshot, so
/// post-hoc corrections to an option retroactively change reported scores.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct ScoredQuestion {
    pub(crate) test_id: String,
    pub(crate) correct: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub(crate) struct TestBreakdown {
    pub(crate) test_id: String,
    pub(crate) correct: i64,
    pub(crate) incorrect: i64,
    pub(crate) total: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub(crate) struct AttemptScore {
    pub(crate) per_test: Vec<TestBreakdown>,
    pub(crate) total_correct: i64,
    pub(crate) total_incorrect: i64,
    pub(crate) total_questions: i64,
}

/// Folds transcript rows into per-test and attempt-level counts.
/// A question with no selected option arrives as `correct = false` and
/// counts as incorrect. Test order follows first encounter.
pub(crate) fn aggregate(rows: &[ScoredQuestion]) -> AttemptScore {
    let mut per_test: Vec<TestBreakdown> = Vec::new();

    for row in rows {
        let position = per_test.iter().position(|entry| entry.test_id == row.test_id);
        let position = match position {
            Some(position) => position,
            None => {
                per_test.push(TestBreakdown {
                    test_id: row.test_id.clone(),
                    correct: 0,
                    incorrect: 0,
                    total: 0,
                });
                per_test.len() - 1
            }
        };
        let entry = &mut per_test[position];
        entry.total += 1;
        if row.correct {
            entry.correct += 1;
        } else {
            entry.incorrect += 1;
        }
    }

    let total_correct = per_test.iter().map(|entry| entry.correct).sum();
    let total_incorrect = per_test.iter().map(|entry| entry.incorrect).sum();
    let total_questions = per_test.iter().map(|entry| entry.total).sum();

    AttemptScore { per_test, total_correct, total_incorrect, total_questions }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(test_id: &str, correct: bool) -> ScoredQuestion {
        ScoredQuestion { test_id: test_id.to_string(), correct }
    }

    #[test]
    fn empty_transcript_scores_zero() {
        let score = aggregate(&[]);
        assert!(score.per_test.is_empty());
        assert_eq!(score.total_questions, 0);
        assert_eq!(score.total_correct, 0);
        assert_eq!(score.total_incorrect, 0);
    }

    #[test]
    fn groups_by_test_in_first_encounter_order() {
        let rows = vec![
            row("math", true),
            row("history", false),
            row("math", false),
            row("math", true),
            row("history", true),
        ];

        let score = aggregate(&rows);

        assert_eq!(
            score.per_test,
            vec![
                TestBreakdown {
                    test_id: "math".to_string(),
                    correct: 2,
                    incorrect: 1,
                    total: 3
                },
                TestBreakdown {
                    test_id: "history".to_string(),
                    correct: 1,
                    incorrect: 1,
                    total: 2
                },
            ]
        );
        assert_eq!(score.total_correct, 3);
        assert_eq!(score.total_incorrect, 2);
        assert_eq!(score.total_questions, 5);
    }

    #[test]
    fn unanswered_question_counts_as_incorrect() {
        // No selected option reads back as correct = false.
        let rows = vec![row("math", false)];

        let score = aggregate(&rows);

        assert_eq!(score.total_questions, 1);
        assert_eq!(score.total_correct, 0);
        assert_eq!(score.total_incorrect, 1);
    }
}
