use crate::models::{
    answer::{AdvanceResult, LevelStatus},
    progress::ShapeProgress,
    Level, Shape,
};

/// Accuracy below this after the required attempts triggers the needs-help signal.
pub const STRUGGLE_ACCURACY: f64 = 0.4;
/// Consecutive incorrect answers that trigger the needs-help signal.
pub const STRUGGLE_STREAK: usize = 3;

/// Evaluates a level against its thresholds. Does not mutate anything.
pub fn check_level_progress(progress: &ShapeProgress, level: Level) -> LevelStatus {
    let data = progress.level(level);
    let config = level.config();
    let accuracy = data.accuracy();

    let enough_attempts = data.attempts >= config.questions_required;
    let can_advance = enough_attempts && accuracy >= config.pass_threshold;

    let recent_all_wrong = data.questions.len() >= STRUGGLE_STREAK
        && data
            .questions
            .iter()
            .rev()
            .take(STRUGGLE_STREAK)
            .all(|q| !q.correct);
    let needs_help = (enough_attempts && accuracy < STRUGGLE_ACCURACY) || recent_all_wrong;

    LevelStatus {
        can_advance,
        level_complete: can_advance,
        needs_help,
        attempts: data.attempts,
        correct: data.correct,
        required: config.questions_required,
        accuracy,
        threshold: config.pass_threshold,
    }
}

/// Completes the current level, then unlocks the next one or marks the shape mastered.
pub fn advance_level(shape: Shape, progress: &mut ShapeProgress) -> AdvanceResult {
    let current = progress.current_level;
    progress.level_mut(current).completed = true;

    match current.next() {
        Some(next) => {
            progress.current_level = next;
            progress.level_mut(next).unlocked = true;
            tracing::info!("Shape {} advanced from {} to {}", shape, current, next);
            AdvanceResult {
                shape,
                completed_level: current,
                advanced: true,
                new_level: Some(next),
                shape_mastered: false,
            }
        }
        None => {
            progress.mastered = true;
            tracing::info!("Shape {} mastered", shape);
            AdvanceResult {
                shape,
                completed_level: current,
                advanced: false,
                new_level: None,
                shape_mastered: true,
            }
        }
    }
}

/// Applies the transition after a correct answer at `level`, at most once per level.
pub fn maybe_advance(
    shape: Shape,
    progress: &mut ShapeProgress,
    level: Level,
    status: &LevelStatus,
) -> Option<AdvanceResult> {
    if !status.can_advance
        || progress.level(level).completed
        || progress.current_level != level
    {
        return None;
    }
    Some(advance_level(shape, progress))
}
