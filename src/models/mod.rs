pub mod artist;
pub mod choices;
pub mod forms;
pub mod show;
pub mod validation;
pub mod venue;

pub use artist::{Artist, ArtistSummary};
pub use forms::{ArtistForm, FormFields, ShowForm, VenueForm};
pub use show::{ArtistShowRow, Show, ShowListingRow, VenueShowRow};
pub use validation::ValidationError;
pub use venue::{Venue, VenueSummary};
