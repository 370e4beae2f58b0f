//! Queries against the `canchas` table.
//!
//! Functions take any SQLite executor so they can run on the pool or inside
//! a transaction (see [`super::approval`]).

use chrono::Utc;
use sqlx::{Executor, Sqlite};

use crate::filter::CanchaFilter;
use crate::models::{Cancha, NewCancha};

pub async fn list<'e, E>(executor: E, filter: &CanchaFilter) -> Result<Vec<Cancha>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Cancha>(
        r#"SELECT * FROM canchas
           WHERE (? IS NULL OR city = ?)
             AND (? IS NULL OR state = ?)
             AND (? IS NULL OR type = ?)
           ORDER BY id"#
    )
    .bind(&filter.city)
    .bind(&filter.city)
    .bind(&filter.state)
    .bind(&filter.state)
    .bind(filter.kind)
    .bind(filter.kind)
    .fetch_all(executor)
    .await
}

pub async fn count<'e, E>(executor: E) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(r#"SELECT COUNT(*) FROM canchas"#)
        .fetch_one(executor)
        .await
}

pub async fn get<'e, E>(executor: E, id: i64) -> Result<Option<Cancha>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Cancha>(r#"SELECT * FROM canchas WHERE id = ?"#)
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn insert<'e, E>(executor: E, new: &NewCancha) -> Result<Cancha, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = Utc::now();

    sqlx::query_as::<_, Cancha>(
        r#"INSERT INTO canchas
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

/// Returns whether a row was removed.
pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(r#"DELETE FROM canchas WHERE id = ?"#)
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
