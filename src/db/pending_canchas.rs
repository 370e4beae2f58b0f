//! Queries against the `pending_canchas` moderation queue.

use chrono::Utc;
use sqlx::{Executor, Sqlite};

use crate::filter::PendingCanchaFilter;
use crate::models::{NewPendingCancha, PendingCancha};

pub async fn list<'e, E>(
    executor: E,
    filter: &PendingCanchaFilter,
) -> Result<Vec<PendingCancha>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, PendingCancha>(
        r#"SELECT * FROM pending_canchas
           WHERE (? IS NULL OR pending = ?)
           ORDER BY id"#
    )
    .bind(filter.pending)
    .bind(filter.pending)
    .fetch_all(executor)
    .await
}

pub async fn count<'e, E>(executor: E) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(r#"SELECT COUNT(*) FROM pending_canchas"#)
        .fetch_one(executor)
        .await
}

pub async fn get<'e, E>(executor: E, id: i64) -> Result<Option<PendingCancha>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, PendingCancha>(r#"SELECT * FROM pending_canchas WHERE id = ?"#)
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// New submissions always start with `pending = true`.
pub async fn insert<'e, E>(executor: E, new: &NewPendingCancha) -> Result<PendingCancha, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = Utc::now();

    sqlx::query_as::<_, PendingCancha>(
        r#"INSERT INTO pending_canchas
               (club, city, state, type, maps_location, phone, image, created_at, updated_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
           RETURNING *"#
    )
    .bind(&new.details.club)
    .bind(&new.details.city)
    .bind(&new.details.state)
    .bind(new.details.kind)
    .bind(&new.details.maps_location)
    .bind(&new.details.phone)
    .bind(&new.image)
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await
}

/// Sets the moderation flag. Returns `false` when the id does not exist.
/// Clearing the flag does not publish or remove the submission.
pub async fn set_pending_flag<'e, E>(executor: E, id: i64, pending: bool) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"UPDATE pending_canchas SET pending = ?, updated_at = ? WHERE id = ?"#
    )
    .bind(pending)
    .bind(Utc::now())
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(r#"DELETE FROM pending_canchas WHERE id = ?"#)
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
