// src/exam/service.rs

use std::{collections::BTreeMap, sync::Arc};

use super::{
    cache::ResultCache, error::ExamError, recorder::record_batch, scoring::compute_score,
    statistics::compute_lesson_statistics,
};
use crate::{
    models::{
        enrollment::Enrollment,
        exam_result::{LessonStatistics, ScoreResult},
        lesson::Lesson,
        question::QuestionWithChoices,
        submission::{BatchReport, Submission},
    },
    store::ExamStore,
};

/// Entry point used by the HTTP handlers.
///
/// Resolves lessons and enrollments through the store, then hands the data
/// to the pure recorder/scoring/statistics functions.
#[derive(Clone)]
pub struct ExamService {
    store: Arc<dyn ExamStore>,
    cache: ResultCache,
    passing_percentage: f64,
}

impl ExamService {
    pub fn new(store: Arc<dyn ExamStore>, cache: ResultCache, passing_percentage: f64) -> Self {
        Self {
            store,
            cache,
            passing_percentage,
        }
    }

    async fn lesson(&self, lesson_id: i64) -> Result<Lesson, ExamError> {
        self.store
            .lesson(lesson_id)
            .await?
            .ok_or(ExamError::UnknownLesson(lesson_id))
    }

    async fn exam_questions(&self, lesson: &Lesson) -> Result<Vec<QuestionWithChoices>, ExamError> {
        let questions = self.store.questions(lesson.id).await?;
        if questions.is_empty() {
            return Err(ExamError::EmptyQuestionSet(lesson.id));
        }
        Ok(questions)
    }

    async fn enrollment(&self, learner_id: i64, lesson: &Lesson) -> Result<Enrollment, ExamError> {
        self.store
            .enrollment(learner_id, lesson.course_id)
            .await?
            .ok_or(ExamError::UnknownEnrollment {
                learner_id,
                course_id: lesson.course_id,
            })
    }

    /// Questions for a learner about to take the exam.
    pub async fn start_exam(
        &self,
        learner_id: i64,
        lesson_id: i64,
    ) -> Result<Vec<QuestionWithChoices>, ExamError> {
        let lesson = self.lesson(lesson_id).await?;
        self.enrollment(learner_id, &lesson).await?;
        self.exam_questions(&lesson).await
    }

    /// Records a batch of answers and returns the freshly computed result.
    pub async fn submit(
        &self,
        learner_id: i64,
        lesson_id: i64,
        answers: &BTreeMap<i64, i64>,
    ) -> Result<(ScoreResult, BatchReport), ExamError> {
        let lesson = self.lesson(lesson_id).await?;
        let enrollment = self.enrollment(learner_id, &lesson).await?;
        let questions = self.exam_questions(&lesson).await?;

        self.cache.invalidate(enrollment.id, lesson.id);
        let report = record_batch(self.store.as_ref(), &enrollment, &questions, answers).await?;

        let history = self.store.submission_history(enrollment.id, lesson.id).await?;
        let result = compute_score(&history, &questions, self.passing_percentage);
        self.cache
            .put(enrollment.id, lesson.id, history.len() as u64, result.clone());

        tracing::info!(
            learner_id,
            lesson_id,
            earned = result.earned_score,
            max = result.max_score,
            passed = result.passed,
            "Exam submitted"
        );

        Ok((result, report))
    }

    /// The learner's current result, served from cache when still valid.
    pub async fn result(&self, learner_id: i64, lesson_id: i64) -> Result<ScoreResult, ExamError> {
        let lesson = self.lesson(lesson_id).await?;
        let enrollment = self.enrollment(learner_id, &lesson).await?;

        let version = self
            .store
            .submission_count(enrollment.id, lesson.id)
            .await?;
        if let Some(cached) = self.cache.get(enrollment.id, lesson.id, version) {
            tracing::debug!(enrollment_id = enrollment.id, lesson_id, "Result cache hit");
            return Ok(cached);
        }

        let questions = self.store.questions(lesson.id).await?;
        let history = self.store.submission_history(enrollment.id, lesson.id).await?;
        let result = compute_score(&history, &questions, self.passing_percentage);
        self.cache
            .put(enrollment.id, lesson.id, history.len() as u64, result.clone());

        Ok(result)
    }

    /// Every submission the learner made for the lesson, newest first.
    pub async fn history(&self, learner_id: i64, lesson_id: i64) -> Result<Vec<Submission>, ExamError> {
        let lesson = self.lesson(lesson_id).await?;
        let enrollment = self.enrollment(learner_id, &lesson).await?;

        let mut history = self.store.submission_history(enrollment.id, lesson.id).await?;
        history.sort_by(|a, b| b.ordering_key().cmp(&a.ordering_key()));
        Ok(history)
    }

    pub async fn statistics(&self, lesson_id: i64) -> Result<LessonStatistics, ExamError> {
        let lesson = self.lesson(lesson_id).await?;
        let questions = self.store.questions(lesson.id).await?;
        let learners = self.store.enrolled_learners(lesson.course_id).await?;
        let submissions = self.store.lesson_submissions(lesson.id).await?;

        Ok(compute_lesson_statistics(
            lesson.id,
            &submissions,
            &learners,
            &questions,
            self.passing_percentage,
        ))
    }
}
