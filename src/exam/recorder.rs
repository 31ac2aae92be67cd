// src/exam/recorder.rs

use std::collections::{BTreeMap, HashMap};

use crate::{
    models::{
        enrollment::Enrollment,
        question::QuestionWithChoices,
        submission::{BatchReport, RejectReason, RejectedAnswer, Submission},
    },
    store::{ExamStore, StoreResult},
};

/// Result of recording a single answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    Accepted(Submission),
    Rejected(RejectedAnswer),
}

/// Checks that `question_id` is part of the exam and `choice_id` is one of its choices.
pub fn validate_answer(
    questions: &[QuestionWithChoices],
    question_id: i64,
    choice_id: i64,
) -> Result<(), RejectReason> {
    let question = questions
        .iter()
        .find(|q| q.id() == question_id)
        .ok_or(RejectReason::QuestionNotInLesson)?;

    question
        .choice(choice_id)
        .map(|_| ())
        .ok_or(RejectReason::InvalidChoiceForQuestion)
}

/// Orders a batch for recording: answers to exam questions in question order,
/// then answers naming other questions by ascending id.
fn batch_order(
    questions: &[QuestionWithChoices],
    answers: &BTreeMap<i64, i64>,
) -> Vec<(i64, i64)> {
    let position: HashMap<i64, usize> = questions
        .iter()
        .enumerate()
        .map(|(i, q)| (q.id(), i))
        .collect();

    let mut ordered: Vec<(i64, i64)> = answers.iter().map(|(&q, &c)| (q, c)).collect();
    ordered.sort_by_key(|(question_id, _)| {
        (
            position.get(question_id).copied().unwrap_or(usize::MAX),
            *question_id,
        )
    });
    ordered
}

/// Validates one answer and, if it passes, appends it to the store.
///
/// A rejected answer is an ordinary outcome. Only storage failures are errors.
pub async fn record_submission(
    store: &dyn ExamStore,
    enrollment: &Enrollment,
    questions: &[QuestionWithChoices],
    question_id: i64,
    choice_id: i64,
) -> StoreResult<AnswerOutcome> {
    if let Err(reason) = validate_answer(questions, question_id, choice_id) {
        tracing::debug!(
            enrollment_id = enrollment.id,
            question_id,
            choice_id,
            ?reason,
            "Answer rejected"
        );
        return Ok(AnswerOutcome::Rejected(RejectedAnswer {
            question_id,
            choice_id,
            reason,
        }));
    }

    let submission = store
        .insert_submission(enrollment.id, question_id, choice_id)
        .await?;
    Ok(AnswerOutcome::Accepted(submission))
}

/// Records every answer of an exam submission as an independent write.
///
/// Not transactional: a storage failure part way through leaves the answers
/// already written in place, and scoring later reads whatever was persisted.
pub async fn record_batch(
    store: &dyn ExamStore,
    enrollment: &Enrollment,
    questions: &[QuestionWithChoices],
    answers: &BTreeMap<i64, i64>,
) -> StoreResult<BatchReport> {
    let mut report = BatchReport::default();

    for (question_id, choice_id) in batch_order(questions, answers) {
        match record_submission(store, enrollment, questions, question_id, choice_id).await? {
            AnswerOutcome::Accepted(submission) => report.accepted.push(submission),
            AnswerOutcome::Rejected(rejected) => report.rejected.push(rejected),
        }
    }

    tracing::info!(
        enrollment_id = enrollment.id,
        accepted = report.accepted.len(),
        rejected = report.rejected.len(),
        "Recorded exam submission batch"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryExamStore;

    #[test]
    fn test_validate_answer() {
        let questions = vec![crate::exam::scoring::tests::question(1, 1, 10, 11)];

        assert_eq!(validate_answer(&questions, 1, 10), Ok(()));
        assert_eq!(validate_answer(&questions, 1, 11), Ok(()));
        assert_eq!(
            validate_answer(&questions, 1, 99),
            Err(RejectReason::InvalidChoiceForQuestion)
        );
        assert_eq!(
            validate_answer(&questions, 2, 10),
            Err(RejectReason::QuestionNotInLesson)
        );
    }

    #[test]
    fn test_batch_order_follows_exam() {
        let questions = vec![
            crate::exam::scoring::tests::question(5, 1, 50, 51),
            crate::exam::scoring::tests::question(2, 1, 20, 21),
        ];
        let answers = BTreeMap::from([(2, 20), (5, 50), (1, 1), (9, 9)]);

        let order: Vec<i64> = batch_order(&questions, &answers)
            .into_iter()
            .map(|(q, _)| q)
            .collect();
        assert_eq!(order, vec![5, 2, 1, 9]);
    }

    #[tokio::test]
    async fn test_invalid_choice_does_not_abort_batch() {
        let store = MemoryExamStore::new();
        let lesson = store.add_lesson(1, "Intro");
        let q1 = store.add_question(lesson.id, 1, &[true, false]);
        let q2 = store.add_question(lesson.id, 3, &[false, true]);
        let enrollment = store.enroll(42, 1);
        let questions = store.questions(lesson.id).await.unwrap();

        // q1 answered with one of q2's choices.
        let answers = BTreeMap::from([(q1.id(), q2.choices[0].id), (q2.id(), q2.choices[1].id)]);
        let report = record_batch(&store, &enrollment, &questions, &answers)
            .await
            .unwrap();

        assert_eq!(report.accepted.len(), 1);
        assert_eq!(report.accepted[0].question_id, q2.id());
        assert_eq!(
            report.rejected,
            vec![RejectedAnswer {
                question_id: q1.id(),
                choice_id: q2.choices[0].id,
                reason: RejectReason::InvalidChoiceForQuestion,
            }]
        );
        assert_eq!(store.submission_count(enrollment.id, lesson.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_resubmission_appends() {
        let store = MemoryExamStore::new();
        let lesson = store.add_lesson(1, "Intro");
        let q = store.add_question(lesson.id, 1, &[true, false]);
        let enrollment = store.enroll(42, 1);
        let questions = store.questions(lesson.id).await.unwrap();

        for choice in [&q.choices[1], &q.choices[0]] {
            let outcome = record_submission(&store, &enrollment, &questions, q.id(), choice.id)
                .await
                .unwrap();
            assert!(matches!(outcome, AnswerOutcome::Accepted(_)));
        }

        let history = store.submission_history(enrollment.id, lesson.id).await.unwrap();
        assert_eq!(history.len(), 2);
    }
}
