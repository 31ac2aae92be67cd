// src/models/enrollment.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'enrollments' table in the database.
/// Unique per (learner, course). Every submission belongs to one enrollment.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,

    /// User ID of the learner, as carried in the `sub` claim of their token.
    pub learner_id: i64,

    pub course_id: i64,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}
