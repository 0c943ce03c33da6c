use chrono::Utc;
use rand::Rng;

use crate::errors::TutorError;
use crate::metrics::{ANSWERS_SUBMITTED_TOTAL, LEVEL_TRANSITIONS_TOTAL};
use crate::models::answer::{
    AdvanceResult, AnswerOutcome, AnswerProgress, LevelStatus, SubmitAnswerResponse,
};
use crate::models::feedback::FeedbackCategory;
use crate::models::progress::QuestionOutcome;
use crate::models::VisitorSession;

use super::evaluator::{classify_answer, parse_answer};
use super::feedback::select_feedback;
use super::progression::{check_level_progress, maybe_advance};

/// Grades the visitor's pending question and applies the outcome to their progress.
///
/// The pending question is consumed: a second submission without a new
/// practice request fails with `NoActiveQuestion`. Invalid input leaves it pending.
pub fn submit_answer<R: Rng + ?Sized>(
    session: &mut VisitorSession,
    raw_answer: Option<&serde_json::Value>,
    rng: &mut R,
) -> Result<SubmitAnswerResponse, TutorError> {
    let user_answer = parse_answer(raw_answer)?;
    let question = session
        .current_question
        .take()
        .ok_or(TutorError::NoActiveQuestion)?;

    let shape = question.shape;
    let level = question.level;
    let outcome = classify_answer(user_answer, question.correct_answer);

    tracing::info!(
        "Answer submitted: visitor={}, shape={}, level={}, answer={}, expected={}, outcome={}",
        session.visitor_id,
        shape,
        level,
        user_answer,
        question.correct_answer,
        outcome.as_str()
    );

    session.progress.record_answer(
        shape,
        level,
        QuestionOutcome {
            correct: outcome.is_correct(),
            question: question.problem.clone(),
            user_answer,
            correct_answer: question.correct_answer,
            answered_at: Utc::now(),
        },
    );

    let shape_progress = session.progress.shape_mut(shape);
    let level_status = check_level_progress(shape_progress, level);
    // Only a correct answer completes a level.
    let level_up = if outcome.is_correct() {
        maybe_advance(shape, shape_progress, level, &level_status)
    } else {
        None
    };

    let category = feedback_category(outcome, &level_status, level_up.as_ref());
    let ai_tutor = select_feedback(category, None, rng);

    ANSWERS_SUBMITTED_TOTAL
        .with_label_values(&[shape.as_str(), outcome.as_str()])
        .inc();
    if let Some(result) = &level_up {
        let mastered = if result.shape_mastered { "true" } else { "false" };
        LEVEL_TRANSITIONS_TOTAL
            .with_label_values(&[shape.as_str(), result.completed_level.as_str(), mastered])
            .inc();
    }

    let (level_attempts, level_correct, level_accuracy) = {
        let data = session.progress.shape_mut(shape).level(level);
        (data.attempts, data.correct, data.accuracy())
    };
    let progress = AnswerProgress {
        level,
        level_attempts,
        level_correct,
        level_required: level.config().questions_required,
        level_accuracy: (level_accuracy * 1000.0).round() / 10.0,
        total_attempts: session.progress.total_attempts,
        total_correct: session.progress.correct_answers,
    };

    session.touch();

    Ok(SubmitAnswerResponse {
        is_correct: outcome.is_correct(),
        is_close: outcome == AnswerOutcome::Close,
        outcome,
        correct_answer: round2(question.correct_answer),
        user_answer: round2(user_answer),
        formula: question.formula,
        steps: question.steps,
        ai_tutor,
        level_status,
        level_up,
        progress,
    })
}

/// Level transitions take precedence over the per-answer reaction.
fn feedback_category(
    outcome: AnswerOutcome,
    status: &LevelStatus,
    level_up: Option<&AdvanceResult>,
) -> FeedbackCategory {
    match (level_up, outcome) {
        (Some(result), _) if result.shape_mastered => FeedbackCategory::LevelComplete,
        (Some(_), _) => FeedbackCategory::LevelUp,
        (None, AnswerOutcome::Correct) => FeedbackCategory::Correct,
        (None, AnswerOutcome::Close) => FeedbackCategory::Close,
        (None, AnswerOutcome::Wrong) if status.needs_help => FeedbackCategory::Struggling,
        (None, AnswerOutcome::Wrong) => FeedbackCategory::Wrong,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
