use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    errors::TutorError,
    extractors::{AppJson, VisitorId},
    models::answer::{SubmitAnswerRequest, SubmitAnswerResponse},
    services::{answer_service, AppState},
};

use super::load_or_init;

pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    VisitorId(visitor_id): VisitorId,
    AppJson(payload): AppJson<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResponse>, TutorError> {
    let mut session = load_or_init(&state, &visitor_id).await?;

    let response = state.with_rng(|rng| {
        answer_service::submit_answer(&mut session, payload.user_answer.as_ref(), rng)
    })?;
    state.store.save(&session).await?;

    if let Some(level_up) = &response.level_up {
        tracing::info!(
            "Visitor {} completed {} {} (mastered={})",
            visitor_id,
            level_up.shape,
            level_up.completed_level,
            level_up.shape_mastered
        );
    }

    Ok(Json(response))
}
