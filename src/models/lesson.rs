// src/models/lesson.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'lessons' table in the database.
/// A lesson's questions form one exam.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Lesson {
    pub id: i64,
    pub course_id: i64,
    pub title: String,

    /// Position of the lesson inside its course (ascending).
    pub sort_order: i32,
}
