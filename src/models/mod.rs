// src/models/mod.rs

pub mod enrollment;
pub mod exam_result;
pub mod lesson;
pub mod question;
pub mod submission;
