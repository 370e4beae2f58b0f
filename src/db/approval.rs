//! Publishing a pending submission.
//!
//! Reading the submission, inserting the cancha and removing the submission
//! run in one transaction: either all three happen or none do. The
//! transaction takes SQLite's write lock up front, so two approvals of the
//! same submission run one after the other and the second finds it gone.

use sqlx::sqlite::SqlitePool;

use crate::db::{canchas, pending_canchas};
use crate::error::ApiError;
use crate::models::Cancha;

pub async fn approve_pending_cancha(pool: &SqlitePool, pending_id: i64) -> Result<Cancha, ApiError> {
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    let pending = pending_canchas::get(&mut *tx, pending_id)
        .await?
        .ok_or(ApiError::NotFound("Pending cancha not found"))?;

    let new_cancha = pending.to_new_cancha().map_err(ApiError::Validation)?;
    let cancha = canchas::insert(&mut *tx, &new_cancha).await?;

    // the write lock is held since BEGIN, so the row read above is still there
    if !pending_canchas::delete(&mut *tx, pending_id).await? {
        return Err(ApiError::NotFound("Pending cancha not found"));
    }

    tx.commit().await?;

    tracing::info!(pending_id, cancha_id = cancha.id, "pending cancha approved");
    Ok(cancha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{connect, connect_in_memory};
    use crate::models::{CanchaDetails, CanchaType, NewPendingCancha};
    use crate::uploads::DEFAULT_IMAGE_PATH;

    fn bariloche() -> CanchaDetails {
        CanchaDetails {
            club: "Club X".to_string(),
            city: "Bariloche".to_string(),
            state: "Rio Negro".to_string(),
            kind: CanchaType::Trinquete,
            maps_location: "Luelmo 38".to_string(),
            phone: "2944112233".to_string(),
        }
    }

    #[tokio::test]
    async fn approval_moves_the_record() {
        let pool = connect_in_memory().await.unwrap();
        let pending = pending_canchas::insert(
            &pool,
            &NewPendingCancha {
                details: bariloche(),
                image: Some(DEFAULT_IMAGE_PATH.to_string()),
            },
        )
        .await
        .unwrap();

        let cancha = approve_pending_cancha(&pool, pending.id).await.unwrap();

        assert_eq!(cancha.details, pending.details);
        assert_eq!(Some(cancha.image.clone()), pending.image);
        assert!(pending_canchas::get(&pool, pending.id).await.unwrap().is_none());
        assert_eq!(canchas::get(&pool, cancha.id).await.unwrap(), Some(cancha));
    }

    #[tokio::test]
    async fn approval_of_missing_id_creates_nothing() {
        let pool = connect_in_memory().await.unwrap();

        let err = approve_pending_cancha(&pool, 999_999).await.unwrap_err();

        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(canchas::count(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn approval_without_image_leaves_submission_in_place() {
        let pool = connect_in_memory().await.unwrap();
        let pending = pending_canchas::insert(
            &pool,
            &NewPendingCancha {
                details: bariloche(),
                image: None,
            },
        )
        .await
        .unwrap();

        let err = approve_pending_cancha(&pool, pending.id).await.unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(canchas::count(&pool).await.unwrap(), 0);
        assert_eq!(
            pending_canchas::get(&pool, pending.id).await.unwrap(),
            Some(pending)
        );
    }

    #[tokio::test]
    async fn second_approval_of_same_id_is_not_found() {
        let pool = connect_in_memory().await.unwrap();
        let pending = pending_canchas::insert(
            &pool,
            &NewPendingCancha {
                details: bariloche(),
                image: Some("/uploads/1700000000000-frente.jpg".to_string()),
            },
        )
        .await
        .unwrap();

        approve_pending_cancha(&pool, pending.id).await.unwrap();
        let err = approve_pending_cancha(&pool, pending.id).await.unwrap_err();

        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(canchas::count(&pool).await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_approvals_publish_once() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("canchas.db").display());
        let pool = connect(&url).await.unwrap();

        let rounds = 10;
        for _ in 0..rounds {
            let pending = pending_canchas::insert(
                &pool,
                &NewPendingCancha {
                    details: bariloche(),
                    image: Some(DEFAULT_IMAGE_PATH.to_string()),
                },
            )
            .await
            .unwrap();

            let (first, second) = tokio::join!(
                approve_pending_cancha(&pool, pending.id),
                approve_pending_cancha(&pool, pending.id),
            );

            let outcomes = [first, second];
            assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
            assert_eq!(
                outcomes
                    .iter()
                    .filter(|r| matches!(r, Err(ApiError::NotFound(_))))
                    .count(),
                1
            );
        }

        assert_eq!(canchas::count(&pool).await.unwrap(), rounds);
        assert_eq!(pending_canchas::count(&pool).await.unwrap(), 0);
        pool.close().await;
    }
}
