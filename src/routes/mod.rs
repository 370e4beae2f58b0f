use axum::extract::{rejection::PathRejection, Path};

use crate::error::ApiError;

pub mod canchas;
pub mod health;
pub mod pending_canchas;


/// Record id from the path. An id that does not parse cannot name a record,
/// so it is reported the same way as an unknown one.
pub(crate) fn record_id(
    path: Result<Path<i64>, PathRejection>,
    not_found: &'static str,
) -> Result<i64, ApiError> {
    path.map(|Path(id)| id).map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "unresolvable record id");
        ApiError::NotFound(not_found)
    })
}
