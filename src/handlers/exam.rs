// src/handlers/exam.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    exam::ExamService,
    models::{
        exam_result::SubmitExamResponse,
        question::PublicQuestion,
        submission::SubmitExamRequest,
    },
    utils::jwt::Claims,
};

/// Starts an exam.
///
/// Returns the lesson's questions and choices without correctness flags.
/// Requires the caller to be enrolled in the lesson's course.
pub async fn start_exam(
    State(exams): State<ExamService>,
    Extension(claims): Extension<Claims>,
    Path(lesson_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let learner_id = claims.learner_id()?;
    let questions = exams.start_exam(learner_id, lesson_id).await?;

    let public_questions: Vec<PublicQuestion> = questions.iter().map(PublicQuestion::from).collect();

    Ok(Json(public_questions))
}

/// Submits a learner's exam answers and calculates the score.
///
/// * Each answer is recorded independently; invalid ones are listed under `report.rejected`.
/// * The score is computed from the full submission history, latest answer per question.
pub async fn submit_exam(
    State(exams): State<ExamService>,
    Extension(claims): Extension<Claims>,
    Path(lesson_id): Path<i64>,
    Json(req): Json<SubmitExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = req.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let learner_id = claims.learner_id()?;
    let (result, report) = exams.submit(learner_id, lesson_id, &req.answers).await?;

    Ok(Json(SubmitExamResponse { result, report }))
}

/// Retrieves the caller's current result for a lesson's exam.
pub async fn get_result(
    State(exams): State<ExamService>,
    Extension(claims): Extension<Claims>,
    Path(lesson_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let learner_id = claims.learner_id()?;
    let result = exams.result(learner_id, lesson_id).await?;

    Ok(Json(result))
}

/// Lists every answer the caller submitted for a lesson, newest first.
pub async fn get_history(
    State(exams): State<ExamService>,
    Extension(claims): Extension<Claims>,
    Path(lesson_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let learner_id = claims.learner_id()?;
    let history = exams.history(learner_id, lesson_id).await?;

    Ok(Json(history))
}
