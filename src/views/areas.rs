//! Grouping of venues by (city, state).

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use crate::models::VenueSummary;

#[derive(Debug, Clone, Serialize)]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<AreaVenue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AreaVenue {
    pub id: Uuid,
    pub name: String,
    pub num_upcoming_shows: i64,
}

/// Place every venue in exactly one area, its own (city, state).
///
/// Areas come out ordered by state then city; venues keep their input order
/// within an area.
pub fn group_by_area(venues: Vec<VenueSummary>) -> Vec<Area> {
    let mut areas: BTreeMap<(String, String), Vec<AreaVenue>> = BTreeMap::new();

    for venue in venues {
        areas
            .entry((venue.state, venue.city))
            .or_default()
            .push(AreaVenue {
                id: venue.id,
                name: venue.name,
                num_upcoming_shows: venue.num_upcoming_shows,
            });
    }

    areas
        .into_iter()
        .map(|((state, city), venues)| Area {
            city,
            state,
            venues,
        })
        .collect()
}
