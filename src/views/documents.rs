//! Documents handed to the presentation layer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::schedule::{format_start_time, partition, ArtistAppearance, VenueAppearance};
use crate::models::choices::{GENRES, STATES};
use crate::models::{
    Artist, ArtistForm, ArtistShowRow, ArtistSummary, ShowListingRow, Venue, VenueForm,
    VenueShowRow, VenueSummary,
};

/// Prefill layout for the show form's start time.
const FORM_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Serialize)]
pub struct VenueDetail {
    #[serde(flatten)]
    pub venue: Venue,
    pub past_shows: Vec<ArtistAppearance>,
    pub upcoming_shows: Vec<ArtistAppearance>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl VenueDetail {
    pub fn new(venue: Venue, shows: Vec<VenueShowRow>, now: DateTime<Utc>) -> Self {
        let (past, upcoming) = partition(shows, now, |s| s.start_time);
        let past_shows: Vec<ArtistAppearance> = past.into_iter().map(Into::into).collect();
        let upcoming_shows: Vec<ArtistAppearance> =
            upcoming.into_iter().map(Into::into).collect();
        Self {
            venue,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArtistDetail {
    #[serde(flatten)]
    pub artist: Artist,
    pub past_shows: Vec<VenueAppearance>,
    pub upcoming_shows: Vec<VenueAppearance>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl ArtistDetail {
    pub fn new(artist: Artist, shows: Vec<ArtistShowRow>, now: DateTime<Utc>) -> Self {
        let (past, upcoming) = partition(shows, now, |s| s.start_time);
        let past_shows: Vec<VenueAppearance> = past.into_iter().map(Into::into).collect();
        let upcoming_shows: Vec<VenueAppearance> =
            upcoming.into_iter().map(Into::into).collect();
        Self {
            artist,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: Uuid,
    pub name: String,
    pub num_upcoming_shows: i64,
}

impl From<VenueSummary> for SearchHit {
    fn from(venue: VenueSummary) -> Self {
        Self {
            id: venue.id,
            name: venue.name,
            num_upcoming_shows: venue.num_upcoming_shows,
        }
    }
}

impl From<ArtistSummary> for SearchHit {
    fn from(artist: ArtistSummary) -> Self {
        Self {
            id: artist.id,
            name: artist.name,
            num_upcoming_shows: artist.num_upcoming_shows,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub search_term: String,
    pub count: usize,
    pub data: Vec<SearchHit>,
}

impl SearchResults {
    pub fn new<T: Into<SearchHit>>(search_term: impl Into<String>, hits: Vec<T>) -> Self {
        let data: Vec<SearchHit> = hits.into_iter().map(Into::into).collect();
        Self {
            search_term: search_term.into(),
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShowListing {
    pub venue_id: Uuid,
    pub venue_name: String,
    pub artist_id: Uuid,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
    pub start_time_utc: DateTime<Utc>,
}

impl From<ShowListingRow> for ShowListing {
    fn from(row: ShowListingRow) -> Self {
        Self {
            venue_id: row.venue_id,
            venue_name: row.venue_name,
            artist_id: row.artist_id,
            artist_name: row.artist_name,
            artist_image_link: row.artist_image_link,
            start_time: format_start_time(row.start_time),
            start_time_utc: row.start_time,
        }
    }
}

/// Current values of a venue, for prefilling its edit form.
#[derive(Debug, Serialize)]
pub struct VenueEdit {
    pub id: Uuid,
    #[serde(flatten)]
    pub form: VenueForm,
}

impl From<&Venue> for VenueEdit {
    fn from(venue: &Venue) -> Self {
        Self {
            id: venue.id,
            form: VenueForm::from(venue),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArtistEdit {
    pub id: Uuid,
    #[serde(flatten)]
    pub form: ArtistForm,
}

impl From<&Artist> for ArtistEdit {
    fn from(artist: &Artist) -> Self {
        Self {
            id: artist.id,
            form: ArtistForm::from(artist),
        }
    }
}

/// Choice lists for the venue and artist forms.
#[derive(Debug, Serialize)]
pub struct FormChoices {
    pub genres: &'static [&'static str],
    pub states: &'static [&'static str],
}

impl FormChoices {
    pub fn new() -> Self {
        Self {
            genres: GENRES,
            states: STATES,
        }
    }
}

impl Default for FormChoices {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
pub struct ShowFormDefaults {
    pub start_time: String,
}

impl ShowFormDefaults {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            start_time: now.format(FORM_TIME_FORMAT).to_string(),
        }
    }
}
