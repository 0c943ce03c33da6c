use serde::{Deserialize, Serialize};

use super::{feedback::TutorMessage, level::Level, shape::Shape};

/// `user_answer` is kept raw so that numeric strings are accepted and
/// anything else is reported as invalid input instead of a decode failure.
#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    #[serde(default)]
    pub user_answer: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    Correct,
    Close,
    Wrong,
}

impl AnswerOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerOutcome::Correct => "correct",
            AnswerOutcome::Close => "close",
            AnswerOutcome::Wrong => "wrong",
        }
    }

    pub fn is_correct(&self) -> bool {
        matches!(self, AnswerOutcome::Correct)
    }
}

/// Result of checking a level after an answer.
#[derive(Debug, Clone, Serialize)]
pub struct LevelStatus {
    pub can_advance: bool,
    pub level_complete: bool,
    pub needs_help: bool,
    pub attempts: u32,
    pub correct: u32,
    pub required: u32,
    pub accuracy: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvanceResult {
    pub shape: Shape,
    pub completed_level: Level,
    pub advanced: bool,
    pub new_level: Option<Level>,
    pub shape_mastered: bool,
}

#[derive(Debug, Serialize)]
pub struct AnswerProgress {
    pub level: Level,
    pub level_attempts: u32,
    pub level_correct: u32,
    pub level_required: u32,
    /// Percent, one decimal.
    pub level_accuracy: f64,
    pub total_attempts: u32,
    pub total_correct: u32,
}

#[derive(Debug, Serialize)]
pub struct SubmitAnswerResponse {
    pub is_correct: bool,
    pub is_close: bool,
    pub outcome: AnswerOutcome,
    pub correct_answer: f64,
    pub user_answer: f64,
    pub formula: String,
    pub steps: Vec<String>,
    pub ai_tutor: TutorMessage,
    pub level_status: LevelStatus,
    pub level_up: Option<AdvanceResult>,
    pub progress: AnswerProgress,
}
