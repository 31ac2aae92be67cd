// src/models/submission.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'submissions' table in the database.
/// Rows are append-only: a re-submission adds a new row, older rows stay for audit.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Submission {
    /// Monotonic sequence, used to order rows that share a timestamp.
    pub id: i64,
    pub enrollment_id: i64,
    pub question_id: i64,
    pub choice_id: i64,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    /// Total order over submissions: later timestamp wins, then larger id.
    pub fn ordering_key(&self) -> (DateTime<Utc>, i64) {
        (self.submitted_at, self.id)
    }
}

/// DTO for submitting an exam attempt.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitExamRequest {
    /// User's answers map.
    /// Key: Question ID
    /// Value: Selected Choice ID
    #[validate(custom(function = validate_answers))]
    pub answers: BTreeMap<i64, i64>,
}

/// Rejects malformed ids only. An empty map is a valid batch that records nothing.
fn validate_answers(answers: &BTreeMap<i64, i64>) -> Result<(), validator::ValidationError> {
    if answers.iter().any(|(&question_id, &choice_id)| question_id <= 0 || choice_id <= 0) {
        return Err(validator::ValidationError::new("answer_ids_must_be_positive"));
    }
    Ok(())
}

/// Why a single answer was dropped from a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The question is not part of the lesson being submitted.
    QuestionNotInLesson,
    /// The choice does not belong to the question.
    InvalidChoiceForQuestion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedAnswer {
    pub question_id: i64,
    pub choice_id: i64,
    pub reason: RejectReason,
}

/// Outcome of one exam submission batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub accepted: Vec<Submission>,
    pub rejected: Vec<RejectedAnswer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(answers: &[(i64, i64)]) -> SubmitExamRequest {
        SubmitExamRequest {
            answers: answers.iter().copied().collect(),
        }
    }

    #[test]
    fn test_empty_answers_are_valid() {
        assert!(request(&[]).validate().is_ok());
    }

    #[test]
    fn test_non_positive_ids_are_rejected() {
        assert!(request(&[(1, 2)]).validate().is_ok());
        assert!(request(&[(0, 2)]).validate().is_err());
        assert!(request(&[(1, -3)]).validate().is_err());
    }
}
