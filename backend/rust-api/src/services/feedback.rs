use rand::{seq::IndexedRandom, Rng};

use crate::models::feedback::{FeedbackCategory, TutorMessage};

const fn msg(message: &'static str, emotion: &'static str) -> TutorMessage {
    TutorMessage { message, emotion }
}

static CORRECT: [TutorMessage; 5] = [
    msg("Excellent work! You've got it!", "celebrating"),
    msg("Perfect! You're really understanding this!", "happy"),
    msg("That's right! Keep up the great work!", "thumbsup"),
    msg("Brilliant! You're a natural!", "excited"),
    msg("Spot on! I knew you could do it!", "proud"),
];

static WRONG: [TutorMessage; 5] = [
    msg(
        "Not quite, but don't worry! Let's look at this together.",
        "encouraging",
    ),
    msg("Almost there! Check the formula and try again.", "thinking"),
    msg("That's okay! Mistakes help us learn.", "supportive"),
    msg("Let me help you understand this better.", "helpful"),
    msg("No worries! Let's break this down step by step.", "teaching"),
];

static CLOSE: [TutorMessage; 2] = [
    msg("So close! Just a small calculation error.", "encouraging"),
    msg("You're on the right track! Double-check your math.", "thinking"),
];

static LEVEL_UP: [TutorMessage; 2] = [
    msg(
        "AMAZING! You've mastered this level! Ready for the next challenge?",
        "celebrating",
    ),
    msg(
        "Congratulations! You've leveled up! I'm so proud of you!",
        "excited",
    ),
];

static LEVEL_COMPLETE: [TutorMessage; 1] = [msg(
    "You've completed all levels for this shape! You're a geometry master!",
    "proud",
)];

static STRUGGLING: [TutorMessage; 2] = [
    msg(
        "I can see this is tricky. Would you like to review the lesson?",
        "supportive",
    ),
    msg("Let's slow down and go through the basics again.", "helpful"),
];

static WELCOME: [TutorMessage; 2] = [
    msg(
        "Hi! I'm Geo, your geometry tutor. Let's learn together!",
        "waving",
    ),
    msg(
        "Welcome back! Ready to continue your learning journey?",
        "happy",
    ),
];

/// Indexed by level position.
static START_LEVEL: [TutorMessage; 3] = [
    msg("Let's start with the basics. You've got this!", "encouraging"),
    msg("Time for a new challenge! I believe in you!", "excited"),
    msg("Expert level! Show me what you've learned!", "proud"),
];

pub fn pool(category: FeedbackCategory) -> &'static [TutorMessage] {
    match category {
        FeedbackCategory::Correct => &CORRECT,
        FeedbackCategory::Wrong => &WRONG,
        FeedbackCategory::Close => &CLOSE,
        FeedbackCategory::LevelUp => &LEVEL_UP,
        FeedbackCategory::LevelComplete => &LEVEL_COMPLETE,
        FeedbackCategory::Struggling => &STRUGGLING,
        FeedbackCategory::Welcome => &WELCOME,
        FeedbackCategory::StartLevel => &START_LEVEL,
    }
}

/// Picks a tutor message. `start_level` honours an in-range level index;
/// everything else is a random pick from the category pool.
pub fn select_feedback<R: Rng + ?Sized>(
    category: FeedbackCategory,
    level_index: Option<usize>,
    rng: &mut R,
) -> TutorMessage {
    let messages = pool(category);

    if category == FeedbackCategory::StartLevel {
        if let Some(message) = level_index.and_then(|i| messages.get(i)) {
            return *message;
        }
    }

    messages.choose(rng).copied().unwrap_or(CORRECT[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    const ALL: [FeedbackCategory; 8] = [
        FeedbackCategory::Correct,
        FeedbackCategory::Wrong,
        FeedbackCategory::Close,
        FeedbackCategory::LevelUp,
        FeedbackCategory::LevelComplete,
        FeedbackCategory::Struggling,
        FeedbackCategory::Welcome,
        FeedbackCategory::StartLevel,
    ];

    #[test]
    fn selection_comes_from_category_pool() {
        let mut rng = StdRng::seed_from_u64(42);
        for category in ALL {
            for _ in 0..20 {
                let message = select_feedback(category, None, &mut rng);
                assert!(pool(category).contains(&message));
            }
        }
    }

    #[test]
    fn start_level_is_indexed_by_level() {
        let mut rng = StdRng::seed_from_u64(1);
        for (index, expected) in START_LEVEL.iter().enumerate() {
            assert_eq!(
                select_feedback(FeedbackCategory::StartLevel, Some(index), &mut rng),
                *expected
            );
        }
        let fallback = select_feedback(FeedbackCategory::StartLevel, Some(9), &mut rng);
        assert!(START_LEVEL.contains(&fallback));
    }

    #[test]
    fn same_seed_same_message() {
        let a = select_feedback(
            FeedbackCategory::Wrong,
            None,
            &mut StdRng::seed_from_u64(99),
        );
        let b = select_feedback(
            FeedbackCategory::Wrong,
            None,
            &mut StdRng::seed_from_u64(99),
        );
        assert_eq!(a, b);
    }
}
