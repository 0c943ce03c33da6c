use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::{
    errors::TutorError,
    extractors::{
        expired_visitor_cookie, generate_visitor_id, visitor_cookie, VisitorId,
        VISITOR_COOKIE_NAME,
    },
    middlewares::csrf::{csrf_cookie, generate_csrf_token},
    models::views::{
        LessonResponse, PracticeResponse, ResetResponse, ResultsResponse, StartResponse,
        WelcomeResponse,
    },
    services::{practice_service, AppState},
};

use super::{load_or_init, parse_shape};

/// Landing endpoint: issues the visitor cookie (and CSRF token) and greets the visitor.
pub async fn index(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<WelcomeResponse>), TutorError> {
    let existing = jar
        .get(VISITOR_COOKIE_NAME)
        .map(|cookie| cookie.value().trim().to_string())
        .filter(|id| !id.is_empty());

    let (visitor_id, new_visitor) = match existing {
        Some(id) => (id, false),
        None => (generate_visitor_id(), true),
    };

    let session = load_or_init(&state, &visitor_id).await?;
    state.store.save(&session).await?;

    let ai_tutor = state.with_rng(|rng| practice_service::welcome_message(rng));
    let mut jar = jar.add(visitor_cookie(visitor_id.clone(), &state.config));

    let csrf_token = if state.config.csrf_enabled {
        let token = generate_csrf_token();
        jar = jar.add(csrf_cookie(token.clone(), &state.config));
        Some(token)
    } else {
        None
    };

    if new_visitor {
        tracing::info!("Issued visitor id {}", visitor_id);
    }

    Ok((
        jar,
        Json(WelcomeResponse {
            visitor_id,
            new_visitor,
            ai_tutor,
            csrf_token,
        }),
    ))
}

pub async fn start(
    State(state): State<Arc<AppState>>,
    VisitorId(visitor_id): VisitorId,
) -> Result<Json<StartResponse>, TutorError> {
    let mut session = load_or_init(&state, &visitor_id).await?;
    session.touch();
    state.store.save(&session).await?;

    Ok(Json(practice_service::start_view(&session.progress)))
}

pub async fn learn(
    State(state): State<Arc<AppState>>,
    VisitorId(visitor_id): VisitorId,
    Path(shape_name): Path<String>,
) -> Result<Json<LessonResponse>, TutorError> {
    let shape = parse_shape(&shape_name)?;
    let mut session = load_or_init(&state, &visitor_id).await?;

    let lesson = state.with_rng(|rng| practice_service::lesson(&mut session, shape, rng));
    state.store.save(&session).await?;

    tracing::info!("Visitor {} opened the {} lesson", visitor_id, shape);
    Ok(Json(lesson))
}

pub async fn practice(
    State(state): State<Arc<AppState>>,
    VisitorId(visitor_id): VisitorId,
    Path(shape_name): Path<String>,
) -> Result<Json<PracticeResponse>, TutorError> {
    let shape = parse_shape(&shape_name)?;
    let mut session = load_or_init(&state, &visitor_id).await?;

    let response = state.with_rng(|rng| practice_service::practice(&mut session, shape, rng));
    state.store.save(&session).await?;

    tracing::info!(
        "Visitor {} practising {} at {} level",
        visitor_id,
        shape,
        response.level
    );
    Ok(Json(response))
}

pub async fn results(
    State(state): State<Arc<AppState>>,
    VisitorId(visitor_id): VisitorId,
) -> Result<Json<ResultsResponse>, TutorError> {
    let mut session = load_or_init(&state, &visitor_id).await?;
    session.touch();
    state.store.save(&session).await?;

    Ok(Json(practice_service::results(&session.progress)))
}

/// Forgets the visitor entirely. Works without a cookie too.
pub async fn reset(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ResetResponse>), TutorError> {
    if let Some(cookie) = jar.get(VISITOR_COOKIE_NAME) {
        state.store.delete(cookie.value()).await?;
        tracing::info!("Visitor {} reset all progress", cookie.value());
    }

    Ok((
        jar.remove(expired_visitor_cookie()),
        Json(ResetResponse {
            reset: true,
            shape: None,
        }),
    ))
}

pub async fn reset_shape(
    State(state): State<Arc<AppState>>,
    VisitorId(visitor_id): VisitorId,
    Path(shape_name): Path<String>,
) -> Result<Json<ResetResponse>, TutorError> {
    let shape = parse_shape(&shape_name)?;
    let mut session = load_or_init(&state, &visitor_id).await?;

    practice_service::reset_shape(&mut session, shape);
    state.store.save(&session).await?;

    Ok(Json(ResetResponse {
        reset: true,
        shape: Some(shape),
    }))
}
