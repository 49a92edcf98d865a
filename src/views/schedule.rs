//! Past/upcoming classification of shows.
//!
//! Classification is never stored: it is a pure function of a show's start
//! time and the instant the caller considers "now".

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{ArtistShowRow, VenueShowRow};

/// Display layout for start times, e.g. `Sat 05, 21, 2019 9:30PM`.
pub const START_TIME_FORMAT: &str = "%a %m, %d, %Y %-I:%M%p";

/// A show is upcoming strictly after `now`; at or before `now` it is past.
pub fn is_upcoming(start_time: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    start_time > now
}

pub fn format_start_time(start_time: DateTime<Utc>) -> String {
    start_time.format(START_TIME_FORMAT).to_string()
}

/// Split `items` into `(past, upcoming)`, keeping the input order in both.
pub fn partition<T, F>(items: Vec<T>, now: DateTime<Utc>, start_of: F) -> (Vec<T>, Vec<T>)
where
    F: Fn(&T) -> DateTime<Utc>,
{
    let (upcoming, past): (Vec<T>, Vec<T>) = items
        .into_iter()
        .partition(|item| is_upcoming(start_of(item), now));
    (past, upcoming)
}

/// An artist's appearance on a venue page.
#[derive(Debug, Clone, Serialize)]
pub struct ArtistAppearance {
    pub artist_id: Uuid,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
    pub start_time_utc: DateTime<Utc>,
}

impl From<VenueShowRow> for ArtistAppearance {
    fn from(row: VenueShowRow) -> Self {
        Self {
            artist_id: row.artist_id,
            artist_name: row.artist_name,
            artist_image_link: row.artist_image_link,
            start_time: format_start_time(row.start_time),
            start_time_utc: row.start_time,
        }
    }
}

/// A venue booking on an artist page.
#[derive(Debug, Clone, Serialize)]
pub struct VenueAppearance {
    pub venue_id: Uuid,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: String,
    pub start_time_utc: DateTime<Utc>,
}

impl From<ArtistShowRow> for VenueAppearance {
    fn from(row: ArtistShowRow) -> Self {
        Self {
            venue_id: row.venue_id,
            venue_name: row.venue_name,
            venue_image_link: row.venue_image_link,
            start_time: format_start_time(row.start_time),
            start_time_utc: row.start_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn boundary_is_past() {
        assert!(!is_upcoming(now(), now()));
        assert!(is_upcoming(now() + Duration::seconds(1), now()));
        assert!(!is_upcoming(now() - Duration::seconds(1), now()));
    }

    #[test]
    fn partition_keeps_order_and_splits_once() {
        let starts = vec![
            now() - Duration::days(3),
            now() + Duration::days(1),
            now(),
            now() + Duration::days(7),
            now() - Duration::hours(1),
        ];
        let (past, upcoming) = partition(starts.clone(), now(), |t| *t);

        assert_eq!(
            past,
            vec![starts[0], starts[2], starts[4]],
            "past keeps input order"
        );
        assert_eq!(upcoming, vec![starts[1], starts[3]]);
        assert_eq!(past.len() + upcoming.len(), starts.len());
    }

    #[test]
    fn formats_medium_layout() {
        let start = Utc.with_ymd_and_hms(2019, 5, 21, 21, 30, 0).unwrap();
        assert_eq!(format_start_time(start), "Tue 05, 21, 2019 9:30PM");

        let morning = Utc.with_ymd_and_hms(2035, 4, 1, 9, 5, 0).unwrap();
        assert_eq!(format_start_time(morning), "Sun 04, 01, 2035 9:05AM");
    }

    #[test]
    fn appearance_from_row() {
        let start = Utc.with_ymd_and_hms(2019, 5, 21, 21, 30, 0).unwrap();
        let artist_id = Uuid::new_v4();
        let appearance = ArtistAppearance::from(VenueShowRow {
            artist_id,
            artist_name: "Guns N Petals".into(),
            artist_image_link: None,
            start_time: start,
        });
        assert_eq!(appearance.artist_id, artist_id);
        assert_eq!(appearance.start_time, "Tue 05, 21, 2019 9:30PM");
        assert_eq!(appearance.start_time_utc, start);
    }
}
