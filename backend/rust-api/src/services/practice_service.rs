use rand::Rng;

use crate::metrics::QUESTIONS_GENERATED_TOTAL;
use crate::models::feedback::{FeedbackCategory, TutorMessage};
use crate::models::level::level_table;
use crate::models::progress::{ShapeProgress, ShapeSummary};
use crate::models::question::QuestionView;
use crate::models::views::{
    LessonResponse, PracticeResponse, ResultsResponse, ShapeCard, StartResponse,
};
use crate::models::{ProgressRecord, Shape, VisitorSession};

use super::catalog::ShapeCatalog;
use super::feedback::select_feedback;
use super::progression::check_level_progress;
use super::question_generator::{generate_question, lesson_examples};

pub fn welcome_message<R: Rng + ?Sized>(rng: &mut R) -> TutorMessage {
    select_feedback(FeedbackCategory::Welcome, None, rng)
}

/// Shape picker: catalog summary plus the visitor's standing for each shape.
pub fn start_view(progress: &ProgressRecord) -> StartResponse {
    let summary = progress.summary();

    let shapes = ShapeCatalog::all_shapes()
        .iter()
        .map(|shape| ShapeCard {
            shape: *shape,
            description: ShapeCatalog::description(*shape),
            formula: ShapeCatalog::formula(*shape).expression,
            progress: progress
                .shape(*shape)
                .map(ShapeSummary::from)
                .unwrap_or_else(|| ShapeSummary::from(&ShapeProgress::new())),
        })
        .collect();

    StartResponse {
        shapes,
        progress: summary,
    }
}

/// Lesson page for a shape. Selecting a lesson makes it the visitor's current shape.
pub fn lesson<R: Rng + ?Sized>(
    session: &mut VisitorSession,
    shape: Shape,
    rng: &mut R,
) -> LessonResponse {
    let definition = ShapeCatalog::get(shape);
    session.current_shape = Some(shape);
    session.touch();

    LessonResponse {
        shape_name: shape,
        introduction: definition.description,
        properties: definition.properties,
        formula: definition.formula,
        examples: lesson_examples(shape, rng),
        learning_concepts: definition.learning_concepts,
        progress: session.progress.summary(),
        levels: level_table(),
    }
}

/// Generates a question at the shape's current level and makes it the pending one.
/// Any earlier unanswered question is replaced.
pub fn practice<R: Rng + ?Sized>(
    session: &mut VisitorSession,
    shape: Shape,
    rng: &mut R,
) -> PracticeResponse {
    let shape_progress = session.progress.shape_mut(shape);
    let level = shape_progress.current_level;
    let level_progress = check_level_progress(shape_progress, level);

    let question = generate_question(shape, level, rng);
    let ai_tutor = select_feedback(FeedbackCategory::StartLevel, Some(level.index()), rng);

    QUESTIONS_GENERATED_TOTAL
        .with_label_values(&[shape.as_str(), level.as_str()])
        .inc();
    tracing::debug!(
        "Generated {} question for visitor {}: {}",
        level,
        session.visitor_id,
        question.problem
    );

    let view = QuestionView::from(&question);
    session.current_question = Some(question);
    session.current_shape = Some(shape);
    session.touch();

    PracticeResponse {
        question: view,
        shape,
        level,
        level_config: level.config(),
        level_progress,
        ai_tutor,
        levels: level_table(),
    }
}

pub fn results(progress: &ProgressRecord) -> ResultsResponse {
    ResultsResponse {
        progress: progress.summary(),
        levels: level_table(),
    }
}

/// Resets one shape back to beginner. Global totals and history are kept.
pub fn reset_shape(session: &mut VisitorSession, shape: Shape) {
    session.progress.reset_shape(shape);

    if session
        .current_question
        .as_ref()
        .is_some_and(|question| question.shape == shape)
    {
        session.current_question = None;
    }

    tracing::info!("Visitor {} reset progress for {}", session.visitor_id, shape);
    session.touch();
}
