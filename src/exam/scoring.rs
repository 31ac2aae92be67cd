// src/exam/scoring.rs

use std::collections::HashMap;

use crate::models::{
    exam_result::{QuestionBreakdown, ScoreResult},
    question::QuestionWithChoices,
    submission::Submission,
};

/// Resolves the authoritative submission for each question.
///
/// Submissions are visited newest first by `(submitted_at, id)` and the first
/// one seen per question is kept. Two rows with the same timestamp are ordered
/// by id, so the row inserted last wins.
pub fn latest_per_question(history: &[Submission]) -> HashMap<i64, &Submission> {
    let mut ordered: Vec<&Submission> = history.iter().collect();
    ordered.sort_by(|a, b| b.ordering_key().cmp(&a.ordering_key()));

    let mut latest = HashMap::with_capacity(ordered.len());
    for submission in ordered {
        latest.entry(submission.question_id).or_insert(submission);
    }
    latest
}

/// `earned * 100 / max`, or 0 when there is nothing to earn.
pub fn percentage_of(earned: i64, max: i64) -> f64 {
    if max <= 0 {
        return 0.0;
    }
    (earned as f64 * 100.0) / max as f64
}

pub fn is_passing(percentage: f64, passing_percentage: f64) -> bool {
    percentage >= passing_percentage
}

/// Scores one learner's exam from their full submission history.
///
/// Pure: the same history and questions always give the same result.
/// Submissions for questions outside `questions` are ignored, and a selected
/// choice that is not one of the question's choices counts as wrong.
pub fn compute_score(
    history: &[Submission],
    questions: &[QuestionWithChoices],
    passing_percentage: f64,
) -> ScoreResult {
    let latest = latest_per_question(history);

    let mut earned_score = 0;
    let mut max_score = 0;
    let mut breakdown = Vec::with_capacity(questions.len());

    for question in questions {
        let points = i64::from(question.question.points);
        max_score += points;

        let selected_choice_id = latest.get(&question.id()).map(|s| s.choice_id);
        let is_correct = selected_choice_id
            .and_then(|choice_id| question.choice(choice_id))
            .is_some_and(|choice| choice.is_correct);
        let earned_points = if is_correct { points } else { 0 };
        earned_score += earned_points;

        breakdown.push(QuestionBreakdown {
            question_id: question.id(),
            points,
            selected_choice_id,
            is_correct,
            earned_points,
        });
    }

    let percentage = percentage_of(earned_score, max_score);

    ScoreResult {
        earned_score,
        max_score,
        percentage,
        passed: is_passing(percentage, passing_percentage),
        breakdown,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::*;
    use crate::models::question::{Choice, Question};

    pub(crate) fn question(id: i64, points: i32, correct: i64, wrong: i64) -> QuestionWithChoices {
        QuestionWithChoices {
            question: Question {
                id,
                lesson_id: 1,
                question_text: format!("Q{}", id),
                points,
            },
            choices: vec![
                Choice {
                    id: correct,
                    question_id: id,
                    choice_text: "right".to_string(),
                    is_correct: true,
                },
                Choice {
                    id: wrong,
                    question_id: id,
                    choice_text: "wrong".to_string(),
                    is_correct: false,
                },
            ],
        }
    }

    pub(crate) fn at(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap() + Duration::seconds(seconds)
    }

    pub(crate) fn submission(
        id: i64,
        enrollment_id: i64,
        question_id: i64,
        choice_id: i64,
        submitted_at: DateTime<Utc>,
    ) -> Submission {
        Submission {
            id,
            enrollment_id,
            question_id,
            choice_id,
            submitted_at,
        }
    }

    #[test]
    fn test_one_right_one_wrong() {
        let questions = vec![question(1, 1, 10, 11), question(2, 3, 20, 21)];
        let history = vec![
            submission(1, 1, 1, 10, at(0)),
            submission(2, 1, 2, 21, at(0)),
        ];

        let result = compute_score(&history, &questions, 70.0);
        assert_eq!(result.earned_score, 1);
        assert_eq!(result.max_score, 4);
        assert_eq!(result.percentage, 25.0);
        assert!(!result.passed);
        assert_eq!(result.breakdown[1].selected_choice_id, Some(21));
        assert_eq!(result.breakdown[1].earned_points, 0);
    }

    #[test]
    fn test_max_score_is_sum_of_points() {
        let questions = vec![
            question(1, 2, 10, 11),
            question(2, 5, 20, 21),
            question(3, 1, 30, 31),
        ];
        let result = compute_score(&[], &questions, 70.0);
        assert_eq!(result.max_score, 8);
        assert_eq!(result.earned_score, 0);
        assert!(result.breakdown.iter().all(|b| b.selected_choice_id.is_none()));
    }

    #[test]
    fn test_later_resubmission_wins() {
        let questions = vec![question(1, 1, 10, 11)];
        // History arrives in arbitrary order.
        let history = vec![
            submission(2, 1, 1, 10, at(60)),
            submission(1, 1, 1, 11, at(0)),
        ];

        let result = compute_score(&history, &questions, 70.0);
        assert_eq!(result.earned_score, 1);
        assert!(result.passed);
        assert_eq!(result.breakdown[0].selected_choice_id, Some(10));
    }

    #[test]
    fn test_earlier_correct_answer_is_superseded() {
        let questions = vec![question(1, 1, 10, 11)];
        let history = vec![
            submission(1, 1, 1, 10, at(0)),
            submission(2, 1, 1, 11, at(30)),
        ];

        let result = compute_score(&history, &questions, 70.0);
        assert_eq!(result.earned_score, 0);
    }

    #[test]
    fn test_timestamp_tie_broken_by_id() {
        let questions = vec![question(1, 1, 10, 11)];
        let history = vec![
            submission(8, 1, 1, 10, at(5)),
            submission(7, 1, 1, 11, at(5)),
        ];
        let result = compute_score(&history, &questions, 70.0);
        assert_eq!(result.breakdown[0].selected_choice_id, Some(10));

        let reversed: Vec<Submission> = history.into_iter().rev().collect();
        assert_eq!(compute_score(&reversed, &questions, 70.0), result);
    }

    #[test]
    fn test_empty_exam_scores_zero() {
        let result = compute_score(&[], &[], 70.0);
        assert_eq!(result.max_score, 0);
        assert_eq!(result.percentage, 0.0);
        assert!(!result.passed);
    }

    #[test]
    fn test_pass_threshold_boundary() {
        assert!(is_passing(70.0, 70.0));
        assert!(!is_passing(69.999, 70.0));

        // 7 of 10 points lands exactly on the threshold.
        let questions: Vec<_> = (1..=10).map(|i| question(i, 1, i * 10, i * 10 + 1)).collect();
        let history: Vec<_> = (1..=10)
            .map(|i| {
                let choice = if i <= 7 { i * 10 } else { i * 10 + 1 };
                submission(i, 1, i, choice, at(i))
            })
            .collect();
        let result = compute_score(&history, &questions, 70.0);
        assert_eq!(result.percentage, 70.0);
        assert!(result.passed);
    }

    #[test]
    fn test_custom_threshold() {
        let questions = vec![question(1, 1, 10, 11), question(2, 1, 20, 21)];
        let history = vec![submission(1, 1, 1, 10, at(0))];
        assert!(compute_score(&history, &questions, 50.0).passed);
        assert!(!compute_score(&history, &questions, 51.0).passed);
    }

    #[test]
    fn test_is_idempotent() {
        let questions = vec![question(1, 1, 10, 11), question(2, 3, 20, 21)];
        let history = vec![
            submission(1, 1, 1, 11, at(0)),
            submission(2, 1, 1, 10, at(1)),
            submission(3, 1, 2, 20, at(2)),
        ];
        assert_eq!(
            compute_score(&history, &questions, 70.0),
            compute_score(&history, &questions, 70.0)
        );
    }

    #[test]
    fn test_foreign_question_and_choice_ignored() {
        let questions = vec![question(1, 2, 10, 11)];
        let history = vec![
            // choice 20 belongs to no question in this exam
            submission(1, 1, 1, 20, at(0)),
            // question 9 is not in this exam
            submission(2, 1, 9, 90, at(0)),
        ];
        let result = compute_score(&history, &questions, 70.0);
        assert_eq!(result.earned_score, 0);
        assert_eq!(result.max_score, 2);
        assert_eq!(result.breakdown.len(), 1);
        assert!(!result.breakdown[0].is_correct);
    }
}
