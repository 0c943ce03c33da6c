use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{
    errors::TutorError,
    extractors::VisitorId,
    models::{
        catalog::ShapeDefinition,
        level::{level_table, LevelTableEntry},
        progress::{ProgressSummary, ShapeProgress, ShapeSummary},
    },
    services::{catalog::ShapeCatalog, AppState},
};

use super::{load_or_init, parse_shape};

pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    VisitorId(visitor_id): VisitorId,
) -> Result<Json<ProgressSummary>, TutorError> {
    let session = load_or_init(&state, &visitor_id).await?;
    Ok(Json(session.progress.summary()))
}

pub async fn get_shape_progress(
    State(state): State<Arc<AppState>>,
    VisitorId(visitor_id): VisitorId,
    Path(shape_name): Path<String>,
) -> Result<Json<ShapeSummary>, TutorError> {
    let shape = parse_shape(&shape_name)?;
    let session = load_or_init(&state, &visitor_id).await?;

    let summary = session
        .progress
        .shape(shape)
        .map(ShapeSummary::from)
        .unwrap_or_else(|| ShapeSummary::from(&ShapeProgress::new()));
    Ok(Json(summary))
}

/// Catalog entry for a shape; no visitor required.
pub async fn get_shape(Path(shape_name): Path<String>) -> Result<Json<ShapeDefinition>, TutorError> {
    let definition = ShapeCatalog::definition(&shape_name);
    if definition.is_empty() {
        return Err(TutorError::unknown_shape(shape_name));
    }
    Ok(Json(definition))
}

pub async fn get_levels() -> Json<Vec<LevelTableEntry>> {
    Json(level_table())
}
