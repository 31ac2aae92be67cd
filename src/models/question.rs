// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub lesson_id: i64,

    /// The text content of the question.
    pub question_text: String,

    /// Points awarded for a correct answer. Always positive.
    pub points: i32,
}

/// Represents the 'choices' table in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Choice {
    pub id: i64,
    pub question_id: i64,
    pub choice_text: String,

    /// Exactly one choice per question is expected to be correct.
    /// Not enforced here.
    pub is_correct: bool,
}

/// A question together with its choices, in the shape the scoring engine consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionWithChoices {
    #[serde(flatten)]
    pub question: Question,
    pub choices: Vec<Choice>,
}

impl QuestionWithChoices {
    pub fn id(&self) -> i64 {
        self.question.id
    }

    /// Looks up one of this question's choices. `None` if the choice belongs elsewhere.
    pub fn choice(&self, choice_id: i64) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == choice_id)
    }
}

/// DTO for sending a question to the learner (excludes correctness).
#[derive(Debug, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub question_text: String,
    pub points: i32,
    pub choices: Vec<PublicChoice>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PublicChoice {
    pub id: i64,
    pub choice_text: String,
}

impl From<&QuestionWithChoices> for PublicQuestion {
    fn from(q: &QuestionWithChoices) -> Self {
        PublicQuestion {
            id: q.question.id,
            question_text: q.question.question_text.clone(),
            points: q.question.points,
            choices: q
                .choices
                .iter()
                .map(|c| PublicChoice {
                    id: c.id,
                    choice_text: c.choice_text.clone(),
                })
                .collect(),
        }
    }
}
