// src/models/exam_result.rs

use serde::{Deserialize, Serialize};

use super::submission::BatchReport;

/// A learner's computed result for one exam. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub earned_score: i64,
    pub max_score: i64,
    /// 0 when `max_score` is 0.
    pub percentage: f64,
    pub passed: bool,
    pub breakdown: Vec<QuestionBreakdown>,
}

/// Per-question line of a [`ScoreResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBreakdown {
    pub question_id: i64,
    pub points: i64,
    /// Choice of the latest submission, `None` if the question was never answered.
    pub selected_choice_id: Option<i64>,
    pub is_correct: bool,
    pub earned_points: i64,
}

/// Class-wide summary for one lesson's exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonStatistics {
    pub lesson_id: i64,
    /// Every submission row, superseded ones included.
    pub total_submission_count: u64,
    /// Learners with at least one submission in the lesson.
    pub unique_learner_count: u64,
    pub average_percentage: f64,
    pub question_count: u64,
    pub passed_count: u64,
}

/// Response body of the submit endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitExamResponse {
    pub result: ScoreResult,
    pub report: BatchReport,
}
