//! Fixed choice lists offered by the venue and artist forms.

pub const GENRES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

pub const STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH",
    "OK", "OR", "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

pub fn is_genre(value: &str) -> bool {
    GENRES.contains(&value)
}

pub fn is_state(value: &str) -> bool {
    STATES.contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_cover_fifty_states_and_dc() {
        assert_eq!(STATES.len(), 51);
        assert!(is_state("CA"));
        assert!(is_state("DC"));
        assert!(!is_state("ca"));
    }

    #[test]
    fn genres_are_exact_matches() {
        assert!(is_genre("Jazz"));
        assert!(is_genre("R&B"));
        assert!(!is_genre("jazz"));
    }
}
