//! Read-side shaping: pure functions from fetched rows to the documents the
//! presentation layer renders.

pub mod areas;
pub mod documents;
pub mod schedule;

pub use areas::{group_by_area, Area, AreaVenue};
pub use documents::{
    ArtistDetail, ArtistEdit, FormChoices, SearchHit, SearchResults, ShowFormDefaults,
    ShowListing, VenueDetail, VenueEdit,
};
pub use schedule::{format_start_time, is_upcoming, partition};
