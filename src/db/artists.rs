//! Artist repository

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::contains_pattern;
use super::error::{is_foreign_key_violation, DbError};
use crate::models::{Artist, ArtistForm, ArtistShowRow, ArtistSummary};

macro_rules! artist_columns {
    () => {
        "id, name, city, state, phone, genres, website, facebook_link, \
         image_link, seeking_venue, seeking_description, created_at, updated_at"
    };
}

const RESOURCE: &str = "artist";

pub struct ArtistRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ArtistRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Artists in storage order whose name contains `term`, ignoring case.
    /// An empty term lists every artist.
    pub async fn search(
        &self,
        term: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<ArtistSummary>, DbError> {
        let artists = sqlx::query_as::<_, ArtistSummary>(
            r#"
            SELECT
                a.id,
                a.name,
                COUNT(s.id) FILTER (WHERE s.start_time > $1) AS num_upcoming_shows
            FROM artists a
            LEFT JOIN shows s ON s.artist_id = a.id
            WHERE a.name ILIKE $2
            GROUP BY a.id
            ORDER BY a.seq
            "#,
        )
        .bind(now)
        .bind(contains_pattern(term))
        .fetch_all(self.pool)
        .await?;

        Ok(artists)
    }

    pub async fn get(&self, id: Uuid) -> Result<Artist, DbError> {
        sqlx::query_as::<_, Artist>(concat!(
            "SELECT ",
            artist_columns!(),
            " FROM artists WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found(RESOURCE, id))
    }

    pub async fn shows(&self, id: Uuid) -> Result<Vec<ArtistShowRow>, DbError> {
        let rows = sqlx::query_as::<_, ArtistShowRow>(
            r#"
            SELECT
                s.venue_id,
                v.name AS venue_name,
                v.image_link AS venue_image_link,
                s.start_time
            FROM shows s
            JOIN venues v ON v.id = s.venue_id
            WHERE s.artist_id = $1
            ORDER BY s.start_time, s.id
            "#,
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn create(&self, form: &ArtistForm) -> Result<Artist, DbError> {
        let mut tx = self.pool.begin().await?;

        let artist = sqlx::query_as::<_, Artist>(concat!(
            r#"
            INSERT INTO artists (
                name, city, state, phone, genres, website,
                facebook_link, image_link, seeking_venue, seeking_description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING "#,
            artist_columns!()
        ))
        .bind(&form.name)
        .bind(&form.city)
        .bind(&form.state)
        .bind(&form.phone)
        .bind(&form.genres)
        .bind(&form.website)
        .bind(&form.facebook_link)
        .bind(&form.image_link)
        .bind(form.seeking_venue)
        .bind(&form.seeking_description)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(artist_id = %artist.id, name = %artist.name, "Artist created");
        Ok(artist)
    }

    /// Full replace: fields missing from the form are overwritten, not kept.
    pub async fn update(&self, id: Uuid, form: &ArtistForm) -> Result<Artist, DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query_scalar::<_, Uuid>("SELECT id FROM artists WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found(RESOURCE, id))?;

        let artist = sqlx::query_as::<_, Artist>(concat!(
            r#"
            UPDATE artists SET
                name = $2,
                city = $3,
                state = $4,
                phone = $5,
                genres = $6,
                website = $7,
                facebook_link = $8,
                image_link = $9,
                seeking_venue = $10,
                seeking_description = $11,
                updated_at = now()
            WHERE id = $1
            RETURNING "#,
            artist_columns!()
        ))
        .bind(id)
        .bind(&form.name)
        .bind(&form.city)
        .bind(&form.state)
        .bind(&form.phone)
        .bind(&form.genres)
        .bind(&form.website)
        .bind(&form.facebook_link)
        .bind(&form.image_link)
        .bind(form.seeking_venue)
        .bind(&form.seeking_description)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(artist_id = %id, "Artist updated");
        Ok(artist)
    }

    /// Delete an artist. Refused while any show still references it.
    pub async fn delete(&self, id: Uuid) -> Result<Artist, DbError> {
        let mut tx = self.pool.begin().await?;

        let artist = sqlx::query_as::<_, Artist>(concat!(
            "SELECT ",
            artist_columns!(),
            " FROM artists WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found(RESOURCE, id))?;

        let show_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM shows WHERE artist_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if show_count > 0 {
            return Err(dependent_shows(id, show_count));
        }

        sqlx::query("DELETE FROM artists WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    dependent_shows(id, 1)
                } else {
                    e.into()
                }
            })?;

        tx.commit().await?;
        tracing::info!(artist_id = %id, "Artist deleted");
        Ok(artist)
    }
}

fn dependent_shows(id: Uuid, count: i64) -> DbError {
    DbError::Conflict {
        resource: RESOURCE,
        id: id.to_string(),
        reason: format!("{} show(s) are still booked for this artist", count),
    }
}
