//! Venue repository
//!
//! Listings and search compute upcoming-show counts with a LEFT JOIN in the
//! same query. Every mutation runs in its own transaction; an early return
//! drops the transaction, which rolls it back.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::contains_pattern;
use super::error::{is_foreign_key_violation, DbError};
use crate::models::{Venue, VenueForm, VenueShowRow, VenueSummary};

macro_rules! venue_columns {
    () => {
        "id, name, address, city, state, phone, genres, website, facebook_link, \
         image_link, seeking_talent, seeking_description, created_at, updated_at"
    };
}

const RESOURCE: &str = "venue";

pub struct VenueRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> VenueRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All venues with their upcoming show counts, ordered by area and then
    /// storage order inside an area.
    pub async fn list_with_upcoming(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<VenueSummary>, DbError> {
        let venues = sqlx::query_as::<_, VenueSummary>(
            r#"
            SELECT
                v.id,
                v.name,
                v.city,
                v.state,
                COUNT(s.id) FILTER (WHERE s.start_time > $1) AS num_upcoming_shows
            FROM venues v
            LEFT JOIN shows s ON s.venue_id = v.id
            GROUP BY v.id
            ORDER BY v.state, v.city, v.seq
            "#,
        )
        .bind(now)
        .fetch_all(self.pool)
        .await?;

        Ok(venues)
    }

    /// Case-insensitive substring search on the venue name.
    pub async fn search(
        &self,
        term: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<VenueSummary>, DbError> {
        let venues = sqlx::query_as::<_, VenueSummary>(
            r#"
            SELECT
                v.id,
                v.name,
                v.city,
                v.state,
                COUNT(s.id) FILTER (WHERE s.start_time > $1) AS num_upcoming_shows
            FROM venues v
            LEFT JOIN shows s ON s.venue_id = v.id
            WHERE v.name ILIKE $2
            GROUP BY v.id
            ORDER BY v.seq
            "#,
        )
        .bind(now)
        .bind(contains_pattern(term))
        .fetch_all(self.pool)
        .await?;

        Ok(venues)
    }

    pub async fn get(&self, id: Uuid) -> Result<Venue, DbError> {
        sqlx::query_as::<_, Venue>(concat!(
            "SELECT ",
            venue_columns!(),
            " FROM venues WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found(RESOURCE, id))
    }

    /// Shows hosted by the venue with the performing artist joined in,
    /// earliest first.
    pub async fn shows(&self, id: Uuid) -> Result<Vec<VenueShowRow>, DbError> {
        let rows = sqlx::query_as::<_, VenueShowRow>(
            r#"
            SELECT
                s.artist_id,
                a.name AS artist_name,
                a.image_link AS artist_image_link,
                s.start_time
            FROM shows s
            JOIN artists a ON a.id = s.artist_id
            WHERE s.venue_id = $1
            ORDER BY s.start_time, s.id
            "#,
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn create(&self, form: &VenueForm) -> Result<Venue, DbError> {
        let mut tx = self.pool.begin().await?;

        let venue = sqlx::query_as::<_, Venue>(concat!(
            r#"
            INSERT INTO venues (
                name, address, city, state, phone, genres, website,
                facebook_link, image_link, seeking_talent, seeking_description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING "#,
            venue_columns!()
        ))
        .bind(&form.name)
        .bind(&form.address)
        .bind(&form.city)
        .bind(&form.state)
        .bind(&form.phone)
        .bind(&form.genres)
        .bind(&form.website)
        .bind(&form.facebook_link)
        .bind(&form.image_link)
        .bind(form.seeking_talent)
        .bind(&form.seeking_description)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(venue_id = %venue.id, name = %venue.name, "Venue created");
        Ok(venue)
    }

    /// Replace every editable field of an existing venue.
    pub async fn update(&self, id: Uuid, form: &VenueForm) -> Result<Venue, DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query_scalar::<_, Uuid>("SELECT id FROM venues WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found(RESOURCE, id))?;

        let venue = sqlx::query_as::<_, Venue>(concat!(
            r#"
            UPDATE venues SET
                name = $2,
                address = $3,
                city = $4,
                state = $5,
                phone = $6,
                genres = $7,
                website = $8,
                facebook_link = $9,
                image_link = $10,
                seeking_talent = $11,
                seeking_description = $12,
                updated_at = now()
            WHERE id = $1
            RETURNING "#,
            venue_columns!()
        ))
        .bind(id)
        .bind(&form.name)
        .bind(&form.address)
        .bind(&form.city)
        .bind(&form.state)
        .bind(&form.phone)
        .bind(&form.genres)
        .bind(&form.website)
        .bind(&form.facebook_link)
        .bind(&form.image_link)
        .bind(form.seeking_talent)
        .bind(&form.seeking_description)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(venue_id = %id, "Venue updated");
        Ok(venue)
    }

    /// Delete a venue. Refused while any show still references it.
    pub async fn delete(&self, id: Uuid) -> Result<Venue, DbError> {
        let mut tx = self.pool.begin().await?;

        let venue = sqlx::query_as::<_, Venue>(concat!(
            "SELECT ",
            venue_columns!(),
            " FROM venues WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found(RESOURCE, id))?;

        let show_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shows WHERE venue_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if show_count > 0 {
            return Err(dependent_shows(id, show_count));
        }

        sqlx::query("DELETE FROM venues WHERE id = $1")
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
        tracing::info!(venue_id = %id, "Venue deleted");
        Ok(venue)
    }
}

fn dependent_shows(id: Uuid, count: i64) -> DbError {
    DbError::Conflict {
        resource: RESOURCE,
        id: id.to_string(),
        reason: format!("{} show(s) are still booked at this venue", count),
    }
}
