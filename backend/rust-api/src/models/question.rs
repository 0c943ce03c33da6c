use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{level::Level, shape::Shape};

/// A generated practice problem. Pending in the visitor session until answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub shape: Shape,
    pub level: Level,
    pub problem: String,
    pub given: BTreeMap<String, f64>,
    pub correct_answer: f64,
    pub formula: String,
    pub hint: String,
    pub steps: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// What the client sees before answering: no answer, formula or worked steps.
#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub shape: Shape,
    pub level: Level,
    pub problem: String,
    pub given: BTreeMap<String, f64>,
    pub hint: String,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            shape: question.shape,
            level: question.level,
            problem: question.problem.clone(),
            given: question.given.clone(),
            hint: question.hint.clone(),
        }
    }
}

/// A worked example shown in a lesson.
#[derive(Debug, Clone, Serialize)]
pub struct WorkedExample {
    pub problem: String,
    pub solution: String,
    pub steps: Vec<String>,
}
