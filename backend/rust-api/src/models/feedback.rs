use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackCategory {
    Correct,
    Wrong,
    Close,
    LevelUp,
    LevelComplete,
    Struggling,
    Welcome,
    StartLevel,
}

/// A scripted tutor line ("Geo") with the mascot emotion to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TutorMessage {
    pub message: &'static str,
    pub emotion: &'static str,
}
