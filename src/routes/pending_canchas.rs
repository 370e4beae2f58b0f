use axum::{
    body::Bytes,
    extract::{
        multipart::{Multipart, MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};

use crate::app::AppState;
use crate::db;
use crate::error::ApiError;
use crate::filter::{PendingCanchaFilter, QueryPairs};
use crate::models::{
    ApproveResponse, CanchaForm, MessageResponse, NewPendingCancha, PendingCancha,
    UpdatePendingRequest,
};
use crate::routes::record_id;
use crate::uploads::{remove_upload, resolve_image, save_upload};

const NOT_FOUND: &str = "Pending cancha not found";

/// Image part of a submission, held in memory until the form validates
struct ImagePart {
    file_name: String,
    bytes: Bytes,
}

fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::Validation(err.body_text())
}

// GET /pending-canchas?pending= - List submissions
pub async fn list_pending_canchas(
    State(state): State<AppState>,
    Query(query): Query<QueryPairs>,
) -> Result<Json<Vec<PendingCancha>>, ApiError> {
    let filter = PendingCanchaFilter::from_query(&query);
    let pending = db::pending_canchas::list(&state.pool, &filter).await?;

    Ok(Json(pending))
}

// GET /pending-canchas/count - Total number of submissions
pub async fn count_pending_canchas(State(state): State<AppState>) -> Result<Json<i64>, ApiError> {
    let count = db::pending_canchas::count(&state.pool).await?;

    Ok(Json(count))
}

// POST /pending-canchas - Submit a cancha (multipart form, optional `image` file)
pub async fn create_pending_cancha(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<PendingCancha>), ApiError> {
    let mut multipart =
        multipart.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

    let mut form = CanchaForm::default();
    let mut image: Option<ImagePart> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "image" {
            // only file parts count; a text `image` value is ignored
            let Some(file_name) = field.file_name().map(str::to_string) else {
                continue;
            };
            let bytes = field.bytes().await.map_err(multipart_error)?;

            // browsers send an empty part when no file was chosen
            if !file_name.is_empty() && !bytes.is_empty() {
                image = Some(ImagePart { file_name, bytes });
            }
        } else {
            let value = field.text().await.map_err(multipart_error)?;
            form.set_field(&name, value);
        }
    }

    let (details, _) = form.into_details().map_err(ApiError::Validation)?;

    let stored = match image {
        Some(part) => Some(save_upload(&state.config.upload_dir, &part.file_name, &part.bytes).await?),
        None => None,
    };

    let new_pending = NewPendingCancha {
        details,
        image: Some(resolve_image(stored.as_ref())),
    };
    let pending = match db::pending_canchas::insert(&state.pool, &new_pending).await {
        Ok(pending) => pending,
        Err(err) => {
            if let Some(stored) = &stored {
                if let Err(io_err) = remove_upload(&state.config.upload_dir, stored).await {
                    tracing::warn!(file = %stored.file_name, error = %io_err, "failed to remove orphaned upload");
                }
            }
            return Err(err.into());
        }
    };

    tracing::info!(pending_id = pending.id, club = %pending.details.club, "cancha submitted for review");
    Ok((StatusCode::CREATED, Json(pending)))
}

// PUT /pending-canchas/:id - Set the moderation flag
pub async fn update_pending_cancha(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdatePendingRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = record_id(path, NOT_FOUND)?;
    let Json(request) = payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

    if !db::pending_canchas::set_pending_flag(&state.pool, id, request.pending).await? {
        return Err(ApiError::NotFound(NOT_FOUND));
    }

    tracing::info!(pending_id = id, pending = request.pending, "pending flag updated");
    Ok(Json(MessageResponse {
        message: "Pending cancha updated".to_string(),
    }))
}

// POST /pending-canchas/approve-cancha/:id - Publish a submission
pub async fn approve_pending_cancha(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApproveResponse>, ApiError> {
    let id = record_id(path, NOT_FOUND)?;
    let cancha = db::approval::approve_pending_cancha(&state.pool, id).await?;

    Ok(Json(ApproveResponse {
        message: "Cancha approved successfully".to_string(),
        cancha,
    }))
}

// DELETE /pending-canchas/:id - Discard a submission
pub async fn delete_pending_cancha(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = record_id(path, NOT_FOUND)?;
    if !db::pending_canchas::delete(&state.pool, id).await? {
        return Err(ApiError::NotFound(NOT_FOUND));
    }

    tracing::info!(pending_id = id, "pending cancha deleted");
    Ok(StatusCode::NO_CONTENT)
}
