// src/exam/mod.rs

// Raw submissions flow one way: the recorder appends them, scoring resolves
// the latest submission per question into a `ScoreResult`, and statistics
// aggregate scores across learners.

pub mod cache;
pub mod error;
pub mod recorder;
pub mod scoring;
pub mod service;
pub mod statistics;

pub use cache::ResultCache;
pub use error::ExamError;
pub use service::ExamService;
