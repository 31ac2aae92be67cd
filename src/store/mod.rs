// src/store/mod.rs

// The engine reads lessons, questions and enrollments, and appends
// submissions, only through `ExamStore`. `PgExamStore` backs the running
// service; `MemoryExamStore` backs tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    enrollment::Enrollment, lesson::Lesson, question::QuestionWithChoices, submission::Submission,
};

pub use memory::MemoryExamStore;
pub use postgres::PgExamStore;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A referenced row does not exist (in-memory store only; Postgres reports FK violations).
    #[error("{0} not found")]
    MissingReference(String),
}

#[async_trait]
pub trait ExamStore: Send + Sync {
    async fn lesson(&self, lesson_id: i64) -> StoreResult<Option<Lesson>>;

    /// Questions of a lesson with nested choices, ordered by question id.
    async fn questions(&self, lesson_id: i64) -> StoreResult<Vec<QuestionWithChoices>>;

    async fn enrollment(&self, learner_id: i64, course_id: i64) -> StoreResult<Option<Enrollment>>;

    async fn enrolled_learners(&self, course_id: i64) -> StoreResult<Vec<Enrollment>>;

    /// All submissions of one enrollment for questions of one lesson. Order is unspecified.
    async fn submission_history(
        &self,
        enrollment_id: i64,
        lesson_id: i64,
    ) -> StoreResult<Vec<Submission>>;

    /// Number of rows `submission_history` would return.
    async fn submission_count(&self, enrollment_id: i64, lesson_id: i64) -> StoreResult<u64>;

    /// All submissions of every learner for questions of one lesson. Order is unspecified.
    async fn lesson_submissions(&self, lesson_id: i64) -> StoreResult<Vec<Submission>>;

    /// Appends a submission stamped with the current time and the next sequence id.
    async fn insert_submission(
        &self,
        enrollment_id: i64,
        question_id: i64,
        choice_id: i64,
    ) -> StoreResult<Submission>;
}
