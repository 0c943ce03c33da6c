use crate::errors::TutorError;
use crate::models::answer::AnswerOutcome;

/// Relative error at or below this is a correct answer.
pub const CORRECT_TOLERANCE: f64 = 0.02;
/// Relative error at or below this (but above the correct tolerance) is "close".
pub const CLOSE_TOLERANCE: f64 = 0.10;

/// `|user - correct| / |correct|`, or the absolute error when the answer is zero.
pub fn answer_error(user_answer: f64, correct_answer: f64) -> f64 {
    let diff = (user_answer - correct_answer).abs();
    if correct_answer != 0.0 {
        diff / correct_answer.abs()
    } else {
        diff
    }
}

pub fn classify_answer(user_answer: f64, correct_answer: f64) -> AnswerOutcome {
    let error = answer_error(user_answer, correct_answer);
    if error <= CORRECT_TOLERANCE {
        AnswerOutcome::Correct
    } else if error <= CLOSE_TOLERANCE {
        AnswerOutcome::Close
    } else {
        AnswerOutcome::Wrong
    }
}

/// Coerces a submitted answer: JSON numbers and numeric strings are accepted.
pub fn parse_answer(raw: Option<&serde_json::Value>) -> Result<f64, TutorError> {
    let value = match raw {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(serde_json::Value::Null) | None => {
            return Err(TutorError::invalid_input("Missing user_answer"))
        }
        Some(_) => None,
    };

    match value {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(TutorError::invalid_input("Please enter a valid number")),
    }
}
