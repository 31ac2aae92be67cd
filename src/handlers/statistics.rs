// src/handlers/statistics.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{error::AppError, exam::ExamService};

/// Class-wide statistics for a lesson's exam.
pub async fn get_statistics(
    State(exams): State<ExamService>,
    Path(lesson_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let stats = exams.statistics(lesson_id).await?;

    Ok(Json(stats))
}
