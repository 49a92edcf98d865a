use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Show {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub artist_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A show seen from its venue: the performing artist joined in.
#[derive(Debug, Clone, FromRow)]
pub struct VenueShowRow {
    pub artist_id: Uuid,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

/// A show seen from its artist: the hosting venue joined in.
#[derive(Debug, Clone, FromRow)]
pub struct ArtistShowRow {
    pub venue_id: Uuid,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ShowListingRow {
    pub venue_id: Uuid,
    pub venue_name: String,
    pub artist_id: Uuid,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}
