// src/exam/statistics.rs

use std::collections::{HashMap, HashSet};

use super::scoring::compute_score;
use crate::models::{
    enrollment::Enrollment, exam_result::LessonStatistics, question::QuestionWithChoices,
    submission::Submission,
};

/// Summarises every learner's result for one lesson.
///
/// Each learner with at least one submission is scored independently with
/// [`compute_score`]. The average covers learners whose exam has a positive
/// maximum score and is 0 when there are none.
pub fn compute_lesson_statistics(
    lesson_id: i64,
    submissions: &[Submission],
    learners: &[Enrollment],
    questions: &[QuestionWithChoices],
    passing_percentage: f64,
) -> LessonStatistics {
    let mut by_enrollment: HashMap<i64, Vec<Submission>> = HashMap::new();
    for submission in submissions {
        by_enrollment
            .entry(submission.enrollment_id)
            .or_default()
            .push(submission.clone());
    }

    let mut seen = HashSet::new();
    let mut unique_learner_count = 0;
    let mut scored = 0u64;
    let mut percentage_sum = 0.0;
    let mut passed_count = 0;

    for learner in learners {
        if !seen.insert(learner.id) {
            continue;
        }
        let Some(history) = by_enrollment.get(&learner.id) else {
            continue;
        };
        unique_learner_count += 1;

        let result = compute_score(history, questions, passing_percentage);
        if result.max_score > 0 {
            scored += 1;
            percentage_sum += result.percentage;
            if result.passed {
                passed_count += 1;
            }
        }
    }

    let average_percentage = if scored > 0 {
        percentage_sum / scored as f64
    } else {
        0.0
    };

    LessonStatistics {
        lesson_id,
        total_submission_count: submissions.len() as u64,
        unique_learner_count,
        average_percentage,
        question_count: questions.len() as u64,
        passed_count,
    }
}
