use serde::Serialize;

use super::{
    answer::LevelStatus,
    catalog::{Formula, ShapeProperty},
    feedback::TutorMessage,
    level::{Level, LevelConfig, LevelTableEntry},
    progress::{ProgressSummary, ShapeSummary},
    question::{QuestionView, WorkedExample},
    shape::Shape,
};

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub visitor_id: String,
    pub new_visitor: bool,
    pub ai_tutor: TutorMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ShapeCard {
    pub shape: Shape,
    pub description: &'static str,
    pub formula: &'static str,
    pub progress: ShapeSummary,
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub shapes: Vec<ShapeCard>,
    pub progress: ProgressSummary,
}

#[derive(Debug, Serialize)]
pub struct LessonResponse {
    pub shape_name: Shape,
    pub introduction: &'static str,
    pub properties: Vec<ShapeProperty>,
    pub formula: Formula,
    pub examples: Vec<WorkedExample>,
    pub learning_concepts: Vec<&'static str>,
    pub progress: ProgressSummary,
    pub levels: Vec<LevelTableEntry>,
}

#[derive(Debug, Serialize)]
pub struct PracticeResponse {
    pub question: QuestionView,
    pub shape: Shape,
    pub level: Level,
    pub level_config: &'static LevelConfig,
    pub level_progress: LevelStatus,
    pub ai_tutor: TutorMessage,
    pub levels: Vec<LevelTableEntry>,
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub progress: ProgressSummary,
    pub levels: Vec<LevelTableEntry>,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub reset: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,
}
