//! Show repository
//!
//! Shows are only ever created and listed. The listing resolves venue and
//! artist names with one join instead of a lookup per row.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::error::{is_foreign_key_violation, DbError};
use crate::models::{Show, ShowForm, ShowListingRow};

pub struct ShowRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ShowRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every show, latest start time first.
    pub async fn list(&self) -> Result<Vec<ShowListingRow>, DbError> {
        let rows = sqlx::query_as::<_, ShowListingRow>(
            r#"
            SELECT
                s.venue_id,
                v.name AS venue_name,
                s.artist_id,
                a.name AS artist_name,
                a.image_link AS artist_image_link,
                s.start_time
            FROM shows s
            JOIN venues v ON v.id = s.venue_id
            JOIN artists a ON a.id = s.artist_id
            ORDER BY s.start_time DESC, s.id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Book a show. Both references are checked, and key-share locked, in the
    /// same transaction as the insert.
    pub async fn create(&self, form: &ShowForm) -> Result<Show, DbError> {
        let mut tx = self.pool.begin().await?;

        ensure_exists(&mut tx, "venues", "venue_id", form.venue_id).await?;
        ensure_exists(&mut tx, "artists", "artist_id", form.artist_id).await?;

        let show = sqlx::query_as::<_, Show>(
            r#"
            INSERT INTO shows (venue_id, artist_id, start_time)
            VALUES ($1, $2, $3)
            RETURNING id, venue_id, artist_id, start_time, created_at
            "#,
        )
        .bind(form.venue_id)
        .bind(form.artist_id)
        .bind(form.start_time)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DbError::Conflict {
                    resource: "show",
                    id: format!("{}/{}", form.venue_id, form.artist_id),
                    reason: "venue or artist was removed while booking".to_string(),
                }
            } else {
                e.into()
            }
        })?;

        tx.commit().await?;
        tracing::info!(
            show_id = %show.id,
            venue_id = %show.venue_id,
            artist_id = %show.artist_id,
            "Show created"
        );
        Ok(show)
    }
}

async fn ensure_exists(
    tx: &mut Transaction<'_, Postgres>,
    table: &'static str,
    field: &'static str,
    id: Uuid,
) -> Result<(), DbError> {
    let sql = format!("SELECT id FROM {} WHERE id = $1 FOR KEY SHARE", table);
    sqlx::query_scalar::<_, Uuid>(&sql)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .map(|_| ())
        .ok_or(DbError::MissingReference { field, id })
}
