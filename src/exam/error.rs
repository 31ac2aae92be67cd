// src/exam/error.rs

use thiserror::Error;

use crate::store::StoreError;

/// Structural errors that abort an exam request.
///
/// Per-answer problems are not errors; they are reported as
/// [`RejectReason`](crate::models::submission::RejectReason) inside a batch report.
#[derive(Debug, Error)]
pub enum ExamError {
    #[error("lesson {0} not found")]
    UnknownLesson(i64),

    #[error("learner {learner_id} is not enrolled in course {course_id}")]
    UnknownEnrollment { learner_id: i64, course_id: i64 },

    #[error("lesson {0} has no questions")]
    EmptyQuestionSet(i64),

    #[error(transparent)]
    Storage(#[from] StoreError),
}
