// src/store/memory.rs

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{ExamStore, StoreError, StoreResult};
use crate::models::{
    enrollment::Enrollment,
    lesson::Lesson,
    question::{Choice, Question, QuestionWithChoices},
    submission::Submission,
};

#[derive(Debug, Default)]
struct Tables {
    lessons: HashMap<i64, Lesson>,
    questions: Vec<QuestionWithChoices>,
    enrollments: Vec<Enrollment>,
    submissions: Vec<Submission>,
    next_id: i64,
    last_submitted_at: Option<DateTime<Utc>>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn lesson_of(&self, question_id: i64) -> Option<i64> {
        self.questions
            .iter()
            .find(|q| q.id() == question_id)
            .map(|q| q.question.lesson_id)
    }
}

/// In-memory [`ExamStore`] used by tests.
///
/// Mirrors the Postgres schema's referential rules: a submission must point at an
/// existing enrollment, question and choice.
#[derive(Debug, Default)]
pub struct MemoryExamStore {
    tables: Mutex<Tables>,
}

impl MemoryExamStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Creates a lesson and returns it.
    pub fn add_lesson(&self, course_id: i64, title: &str) -> Lesson {
        let mut tables = self.tables();
        let id = tables.next_id();
        let sort_order = tables
            .lessons
            .values()
            .filter(|l| l.course_id == course_id)
            .count() as i32;
        let lesson = Lesson {
            id,
            course_id,
            title: title.to_string(),
            sort_order,
        };
        tables.lessons.insert(id, lesson.clone());
        lesson
    }

    /// Adds a question worth `points` with one choice per entry of `correctness`.
    pub fn add_question(&self, lesson_id: i64, points: i32, correctness: &[bool]) -> QuestionWithChoices {
        let mut tables = self.tables();
        let question_id = tables.next_id();
        let choices = correctness
            .iter()
            .enumerate()
            .map(|(i, &is_correct)| Choice {
                id: tables.next_id(),
                question_id,
                choice_text: format!("Option {}", i + 1),
                is_correct,
            })
            .collect();
        let question = QuestionWithChoices {
            question: Question {
                id: question_id,
                lesson_id,
                question_text: format!("Question {}", question_id),
                points,
            },
            choices,
        };
        tables.questions.push(question.clone());
        question
    }

    pub fn enroll(&self, learner_id: i64, course_id: i64) -> Enrollment {
        let mut tables = self.tables();
        if let Some(existing) = tables
            .enrollments
            .iter()
            .find(|e| e.learner_id == learner_id && e.course_id == course_id)
        {
            return existing.clone();
        }
        let enrollment = Enrollment {
            id: tables.next_id(),
            learner_id,
            course_id,
            enrolled_at: Utc::now(),
        };
        tables.enrollments.push(enrollment.clone());
        enrollment
    }
}

#[async_trait]
impl ExamStore for MemoryExamStore {
    async fn lesson(&self, lesson_id: i64) -> StoreResult<Option<Lesson>> {
        Ok(self.tables().lessons.get(&lesson_id).cloned())
    }

    async fn questions(&self, lesson_id: i64) -> StoreResult<Vec<QuestionWithChoices>> {
        let mut questions: Vec<QuestionWithChoices> = self
            .tables()
            .questions
            .iter()
            .filter(|q| q.question.lesson_id == lesson_id)
            .cloned()
            .collect();
        questions.sort_by_key(|q| q.id());
        Ok(questions)
    }

    async fn enrollment(&self, learner_id: i64, course_id: i64) -> StoreResult<Option<Enrollment>> {
        Ok(self
            .tables()
            .enrollments
            .iter()
            .find(|e| e.learner_id == learner_id && e.course_id == course_id)
            .cloned())
    }

    async fn enrolled_learners(&self, course_id: i64) -> StoreResult<Vec<Enrollment>> {
        Ok(self
            .tables()
            .enrollments
            .iter()
            .filter(|e| e.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn submission_history(
        &self,
        enrollment_id: i64,
        lesson_id: i64,
    ) -> StoreResult<Vec<Submission>> {
        let tables = self.tables();
        Ok(tables
            .submissions
            .iter()
            .filter(|s| s.enrollment_id == enrollment_id)
            .filter(|s| tables.lesson_of(s.question_id) == Some(lesson_id))
            .cloned()
            .collect())
    }

    async fn submission_count(&self, enrollment_id: i64, lesson_id: i64) -> StoreResult<u64> {
        let tables = self.tables();
        Ok(tables
            .submissions
            .iter()
            .filter(|s| s.enrollment_id == enrollment_id)
            .filter(|s| tables.lesson_of(s.question_id) == Some(lesson_id))
            .count() as u64)
    }

    async fn lesson_submissions(&self, lesson_id: i64) -> StoreResult<Vec<Submission>> {
        let tables = self.tables();
        Ok(tables
            .submissions
            .iter()
            .filter(|s| tables.lesson_of(s.question_id) == Some(lesson_id))
            .cloned()
            .collect())
    }

    async fn insert_submission(
        &self,
        enrollment_id: i64,
        question_id: i64,
        choice_id: i64,
    ) -> StoreResult<Submission> {
        let mut tables = self.tables();

        if !tables.enrollments.iter().any(|e| e.id == enrollment_id) {
            return Err(StoreError::MissingReference(format!("enrollment {}", enrollment_id)));
        }
        if tables.lesson_of(question_id).is_none() {
            return Err(StoreError::MissingReference(format!("question {}", question_id)));
        }
        let choice_exists = tables
            .questions
            .iter()
            .any(|q| q.choices.iter().any(|c| c.id == choice_id));
        if !choice_exists {
            return Err(StoreError::MissingReference(format!("choice {}", choice_id)));
        }

        // Never step backwards even if the wall clock does.
        let now = Utc::now();
        let submitted_at = match tables.last_submitted_at {
            Some(last) if last > now => last,
            _ => now,
        };
        tables.last_submitted_at = Some(submitted_at);

        let submission = Submission {
            id: tables.next_id(),
            enrollment_id,
            question_id,
            choice_id,
            submitted_at,
        };
        tables.submissions.push(submission.clone());
        Ok(submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_rejects_unknown_references() {
        let store = MemoryExamStore::new();
        let lesson = store.add_lesson(1, "Intro");
        let q = store.add_question(lesson.id, 1, &[true, false]);
        let enrollment = store.enroll(7, 1);

        let err = store
            .insert_submission(enrollment.id, q.id(), 9999)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingReference(_)));

        let err = store
            .insert_submission(9999, q.id(), q.choices[0].id)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingReference(_)));
    }

    #[tokio::test]
    async fn submissions_are_appended_with_increasing_ids() {
        let store = MemoryExamStore::new();
        let lesson = store.add_lesson(1, "Intro");
        let q = store.add_question(lesson.id, 1, &[true, false]);
        let enrollment = store.enroll(7, 1);

        let first = store
            .insert_submission(enrollment.id, q.id(), q.choices[1].id)
            .await
            .unwrap();
        let second = store
            .insert_submission(enrollment.id, q.id(), q.choices[0].id)
            .await
            .unwrap();

        assert!(second.ordering_key() > first.ordering_key());
        assert_eq!(store.submission_count(enrollment.id, lesson.id).await.unwrap(), 2);
        assert_eq!(store.lesson_submissions(lesson.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn history_is_scoped_to_lesson() {
        let store = MemoryExamStore::new();
        let first = store.add_lesson(1, "One");
        let second = store.add_lesson(1, "Two");
        let q1 = store.add_question(first.id, 1, &[true]);
        let q2 = store.add_question(second.id, 1, &[true]);
        let enrollment = store.enroll(7, 1);

        store
            .insert_submission(enrollment.id, q1.id(), q1.choices[0].id)
            .await
            .unwrap();
        store
            .insert_submission(enrollment.id, q2.id(), q2.choices[0].id)
            .await
            .unwrap();

        let history = store.submission_history(enrollment.id, first.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].question_id, q1.id());
        assert_eq!(second.sort_order, 1);
    }

    #[test]
    fn enroll_is_unique_per_course() {
        let store = MemoryExamStore::new();
        let a = store.enroll(7, 1);
        let b = store.enroll(7, 1);
        assert_eq!(a, b);
    }
}
