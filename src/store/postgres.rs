// src/store/postgres.rs

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

use super::{ExamStore, StoreResult};
use crate::models::{
    enrollment::Enrollment,
    lesson::Lesson,
    question::{Choice, Question, QuestionWithChoices},
    submission::Submission,
};

/// Postgres-backed store. Schema lives in `migrations/`.
#[derive(Debug, Clone)]
pub struct PgExamStore {
    pool: PgPool,
}

impl PgExamStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExamStore for PgExamStore {
    async fn lesson(&self, lesson_id: i64) -> StoreResult<Option<Lesson>> {
        let lesson = sqlx::query_as::<_, Lesson>(
            "SELECT id, course_id, title, sort_order FROM lessons WHERE id = $1",
        )
        .bind(lesson_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(lesson)
    }

    async fn questions(&self, lesson_id: i64) -> StoreResult<Vec<QuestionWithChoices>> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, lesson_id, question_text, points
            FROM questions
            WHERE lesson_id = $1
            ORDER BY id
            "#,
        )
        .bind(lesson_id)
        .fetch_all(&self.pool)
        .await?;

        if questions.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = questions.iter().map(|q| q.id).collect();
        let choices = sqlx::query_as::<_, Choice>(
            r#"
            SELECT id, question_id, choice_text, is_correct
            FROM choices
            WHERE question_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_question: HashMap<i64, Vec<Choice>> = HashMap::new();
        for choice in choices {
            by_question.entry(choice.question_id).or_default().push(choice);
        }

        Ok(questions
            .into_iter()
            .map(|question| QuestionWithChoices {
                choices: by_question.remove(&question.id).unwrap_or_default(),
                question,
            })
            .collect())
    }

    async fn enrollment(&self, learner_id: i64, course_id: i64) -> StoreResult<Option<Enrollment>> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"
            SELECT id, learner_id, course_id, enrolled_at
            FROM enrollments
            WHERE learner_id = $1 AND course_id = $2
            "#,
        )
        .bind(learner_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(enrollment)
    }

    async fn enrolled_learners(&self, course_id: i64) -> StoreResult<Vec<Enrollment>> {
        let enrollments = sqlx::query_as::<_, Enrollment>(
            r#"
            SELECT id, learner_id, course_id, enrolled_at
            FROM enrollments
            WHERE course_id = $1
            ORDER BY id
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(enrollments)
    }

    async fn submission_history(
        &self,
        enrollment_id: i64,
        lesson_id: i64,
    ) -> StoreResult<Vec<Submission>> {
        let submissions = sqlx::query_as::<_, Submission>(
            r#"
            SELECT s.id, s.enrollment_id, s.question_id, s.choice_id, s.submitted_at
            FROM submissions s
            JOIN questions q ON q.id = s.question_id
            WHERE s.enrollment_id = $1 AND q.lesson_id = $2
            "#,
        )
        .bind(enrollment_id)
        .bind(lesson_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(submissions)
    }

    async fn submission_count(&self, enrollment_id: i64, lesson_id: i64) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM submissions s
            JOIN questions q ON q.id = s.question_id
            WHERE s.enrollment_id = $1 AND q.lesson_id = $2
            "#,
        )
        .bind(enrollment_id)
        .bind(lesson_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn lesson_submissions(&self, lesson_id: i64) -> StoreResult<Vec<Submission>> {
        let submissions = sqlx::query_as::<_, Submission>(
            r#"
            SELECT s.id, s.enrollment_id, s.question_id, s.choice_id, s.submitted_at
            FROM submissions s
            JOIN questions q ON q.id = s.question_id
            WHERE q.lesson_id = $1
            "#,
        )
        .bind(lesson_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(submissions)
    }

    async fn insert_submission(
        &self,
        enrollment_id: i64,
        question_id: i64,
        choice_id: i64,
    ) -> StoreResult<Submission> {
        // clock_timestamp(), clamped so a re-submission never sorts before an
        // earlier answer to the same question when the database clock steps back.
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO submissions (enrollment_id, question_id, choice_id, submitted_at)
            SELECT $1, $2, $3,
                   GREATEST(clock_timestamp(), COALESCE(MAX(submitted_at), '-infinity'::timestamptz))
            FROM submissions
            WHERE enrollment_id = $1 AND question_id = $2
            RETURNING id, enrollment_id, question_id, choice_id, submitted_at
            "#,
        )
        .bind(enrollment_id)
        .bind(question_id)
        .bind(choice_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert submission: {:?}", e);
            e
        })?;

        Ok(submission)
    }
}
