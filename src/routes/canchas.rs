use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};

use crate::app::AppState;
use crate::db;
use crate::error::ApiError;
use crate::filter::{CanchaFilter, QueryPairs};
use crate::models::{Cancha, CanchaForm, NewCancha};
use crate::routes::record_id;
use crate::uploads::DEFAULT_IMAGE_PATH;

const NOT_FOUND: &str = "Cancha not found";

// GET /canchas?city=&state=&type= - List canchas matching the filter
pub async fn list_canchas(
    State(state): State<AppState>,
    Query(query): Query<QueryPairs>,
) -> Result<Json<Vec<Cancha>>, ApiError> {
    let filter = CanchaFilter::from_query(&query);
    let canchas = db::canchas::list(&state.pool, &filter).await?;

    Ok(Json(canchas))
}

// GET /canchas/count - Total number of canchas
pub async fn count_canchas(State(state): State<AppState>) -> Result<Json<i64>, ApiError> {
    let count = db::canchas::count(&state.pool).await?;

    Ok(Json(count))
}

// POST /canchas - Publish a cancha directly
pub async fn create_cancha(
    State(state): State<AppState>,
    payload: Result<Json<CanchaForm>, JsonRejection>,
) -> Result<(StatusCode, Json<Cancha>), ApiError> {
    let Json(form) = payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    let (details, image) = form.into_details().map_err(ApiError::Validation)?;

    let new_cancha = NewCancha {
        details,
        image: image.unwrap_or_else(|| DEFAULT_IMAGE_PATH.to_string()),
    };
    let cancha = db::canchas::insert(&state.pool, &new_cancha).await?;

    tracing::info!(cancha_id = cancha.id, club = %cancha.details.club, "cancha created");
    Ok((StatusCode::CREATED, Json(cancha)))
}

// GET /canchas/:id - Get cancha by ID
pub async fn get_cancha(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Cancha>, ApiError> {
    let id = record_id(path, NOT_FOUND)?;
    let cancha = db::canchas::get(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;

    Ok(Json(cancha))
}

// DELETE /canchas/:id - Remove a cancha
pub async fn delete_cancha(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = record_id(path, NOT_FOUND)?;
    if !db::canchas::delete(&state.pool, id).await? {
        return Err(ApiError::NotFound(NOT_FOUND));
    }

    tracing::info!(cancha_id = id, "cancha deleted");
    Ok(StatusCode::NO_CONTENT)
}
