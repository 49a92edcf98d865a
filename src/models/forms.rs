//! Parsing and validation of submitted venue, artist and show forms.
//!
//! Bodies arrive as url-encoded key/value pairs. Keys may repeat
//! (`genres=Jazz&genres=Soul`), so fields are kept as an ordered list of
//! pairs rather than a map.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

use super::choices::{is_genre, is_state};
use super::validation::ValidationError;
use super::{Artist, Venue};

const MAX_NAME_LEN: usize = 120;
const MAX_TEXT_LEN: usize = 500;

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{3}-[0-9]{3}-[0-9]{4}$").expect("phone pattern is valid")
});

/// Values that turn a seeking checkbox on.
const TRUTHY: &[&str] = &["y", "yes", "on", "true", "1"];

/// Start time layouts accepted besides RFC 3339. Interpreted as UTC.
const START_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Clone, Default)]
pub struct FormFields {
    pairs: Vec<(String, String)>,
}

impl FormFields {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// First non-blank value for `key`, trimmed; `None` when absent or blank.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .find(|v| !v.is_empty())
    }

    /// Every non-blank value submitted under `key`, in order.
    pub fn all(&self, key: &str) -> Vec<String> {
        self.values(key).map(str::to_owned).collect()
    }

    /// Checkbox semantics: true when any submitted value is marked yes.
    /// Absence is false.
    pub fn flag(&self, key: &str) -> bool {
        self.values(key)
            .any(|v| TRUTHY.iter().any(|t| v.eq_ignore_ascii_case(t)))
    }

    fn values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    }
}

impl From<Vec<(String, String)>> for FormFields {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self::new(pairs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueForm {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl VenueForm {
    pub fn parse(fields: &FormFields) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required(fields, "name", MAX_NAME_LEN)?,
            address: required(fields, "address", MAX_TEXT_LEN)?,
            city: required(fields, "city", MAX_NAME_LEN)?,
            state: state(fields)?,
            phone: phone(fields)?,
            genres: genres(fields)?,
            website: url(fields, "website")?,
            facebook_link: url(fields, "facebook_link")?,
            image_link: url(fields, "image_link")?,
            seeking_talent: fields.flag("seeking_talent"),
            seeking_description: optional(fields, "seeking_description", MAX_TEXT_LEN)?,
        })
    }
}

impl From<&Venue> for VenueForm {
    fn from(venue: &Venue) -> Self {
        Self {
            name: venue.name.clone(),
            address: venue.address.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            phone: venue.phone.clone(),
            genres: venue.genres.clone(),
            website: venue.website.clone(),
            facebook_link: venue.facebook_link.clone(),
            image_link: venue.image_link.clone(),
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl ArtistForm {
    pub fn parse(fields: &FormFields) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required(fields, "name", MAX_NAME_LEN)?,
            city: required(fields, "city", MAX_NAME_LEN)?,
            state: state(fields)?,
            phone: phone(fields)?,
            genres: genres(fields)?,
            website: url(fields, "website")?,
            facebook_link: url(fields, "facebook_link")?,
            image_link: url(fields, "image_link")?,
            seeking_venue: fields.flag("seeking_venue"),
            seeking_description: optional(fields, "seeking_description", MAX_TEXT_LEN)?,
        })
    }
}

impl From<&Artist> for ArtistForm {
    fn from(artist: &Artist) -> Self {
        Self {
            name: artist.name.clone(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            phone: artist.phone.clone(),
            genres: artist.genres.clone(),
            website: artist.website.clone(),
            facebook_link: artist.facebook_link.clone(),
            image_link: artist.image_link.clone(),
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowForm {
    pub venue_id: Uuid,
    pub artist_id: Uuid,
    pub start_time: DateTime<Utc>,
}

impl ShowForm {
    pub fn parse(fields: &FormFields) -> Result<Self, ValidationError> {
        Ok(Self {
            venue_id: id(fields, "venue_id")?,
            artist_id: id(fields, "artist_id")?,
            start_time: start_time(fields)?,
        })
    }
}

/// Parse a submitted start time: RFC 3339, or a naive date-time taken as UTC.
pub fn parse_start_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    START_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn required(
    fields: &FormFields,
    field: &'static str,
    max: usize,
) -> Result<String, ValidationError> {
    optional(fields, field, max)?.ok_or(ValidationError::Empty { field })
}

fn optional(
    fields: &FormFields,
    field: &'static str,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match fields.text(field) {
        Some(value) if value.chars().count() > max => Err(ValidationError::TooLong { field, max }),
        Some(value) => Ok(Some(value.to_owned())),
        None => Ok(None),
    }
}

fn state(fields: &FormFields) -> Result<String, ValidationError> {
    let value = fields
        .text("state")
        .ok_or(ValidationError::Empty { field: "state" })?;
    if is_state(value) {
        Ok(value.to_owned())
    } else {
        Err(ValidationError::InvalidChoice {
            field: "state",
            value: value.to_owned(),
        })
    }
}

fn phone(fields: &FormFields) -> Result<Option<String>, ValidationError> {
    match fields.text("phone") {
        Some(value) if !PHONE_RE.is_match(value) => Err(ValidationError::InvalidFormat {
            field: "phone",
            reason: "expected the form xxx-xxx-xxxx",
        }),
        other => Ok(other.map(str::to_owned)),
    }
}

fn url(fields: &FormFields, field: &'static str) -> Result<Option<String>, ValidationError> {
    let Some(value) = optional(fields, field, MAX_TEXT_LEN)? else {
        return Ok(None);
    };
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.contains(char::is_whitespace) => Ok(Some(value)),
        _ => Err(ValidationError::InvalidFormat {
            field,
            reason: "expected an http(s) URL",
        }),
    }
}

fn genres(fields: &FormFields) -> Result<Vec<String>, ValidationError> {
    let genres = fields.all("genres");
    if genres.is_empty() {
        return Err(ValidationError::Empty { field: "genres" });
    }
    if let Some(bad) = genres.iter().find(|g| !is_genre(g)) {
        return Err(ValidationError::InvalidChoice {
            field: "genres",
            value: bad.clone(),
        });
    }
    Ok(genres)
}

fn id(fields: &FormFields, field: &'static str) -> Result<Uuid, ValidationError> {
    let raw = fields.text(field).ok_or(ValidationError::Empty { field })?;
    Uuid::parse_str(raw).map_err(|_| ValidationError::InvalidFormat {
        field,
        reason: "expected an id",
    })
}

fn start_time(fields: &FormFields) -> Result<DateTime<Utc>, ValidationError> {
    let raw = fields
        .text("start_time")
        .ok_or(ValidationError::Empty { field: "start_time" })?;
    parse_start_time(raw).ok_or(ValidationError::InvalidFormat {
        field: "start_time",
        reason: "expected YYYY-MM-DD HH:MM:SS",
    })
}
