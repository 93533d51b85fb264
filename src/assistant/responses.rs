//! Canned assistant replies

use crate::models::{Location, Restroom};

pub const GREETING: &str =
    "Hi! I can help you find nearby restrooms. What are you looking for?";

pub const LOCATION_REQUIRED: &str = "I need your location to find restrooms near you. \
Please enable location access and try again.";

pub const HELP: &str = "I can help you find:\n\
- Restrooms near you\n\
- Clean restrooms (cleanliness score of 85 or more)\n\
- Wheelchair accessible restrooms\n\
- Restrooms with baby changing stations\n\
- Gender neutral restrooms\n\
You can also ask me where you are.";

pub const UNKNOWN: &str = "I'm not sure how to help with that. Try asking me to find a \
restroom nearby, a clean restroom, or an accessible one. Say \"help\" to see everything I can do.";

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

pub fn nearby_found(count: usize, first: &Restroom) -> String {
    format!(
        "I found {} near you. The closest one is {} with a cleanliness score of {}/100. \
I'll show them on the map.",
        plural(count, "restroom", "restrooms"),
        first.name,
        first.cleanliness.score()
    )
}

pub fn clean_found(count: usize, first: &Restroom) -> String {
    format!(
        "I found {} nearby. {} has a cleanliness score of {}/100. I'll show them on the map.",
        plural(count, "clean restroom", "clean restrooms"),
        first.name,
        first.cleanliness.score()
    )
}

pub fn accessible_found(count: usize, first: &Restroom) -> String {
    format!(
        "I found {} nearby. The closest one is {} ({}/100 cleanliness). \
I'll show them on the map.",
        plural(count, "accessible restroom", "accessible restrooms"),
        first.name,
        first.cleanliness.score()
    )
}

pub fn baby_changing_found(count: usize, first: &Restroom) -> String {
    format!(
        "I found {} with baby changing facilities nearby. The closest one is {} \
({}/100 cleanliness). I'll show them on the map.",
        plural(count, "restroom", "restrooms"),
        first.name,
        first.cleanliness.score()
    )
}

pub fn gender_neutral_found(count: usize, first: &Restroom) -> String {
    format!(
        "I found {} nearby. The closest one is {} ({}/100 cleanliness). \
I'll show them on the map.",
        plural(count, "gender neutral restroom", "gender neutral restrooms"),
        first.name,
        first.cleanliness.score()
    )
}

/// Nothing matched; offer a wider search
pub fn expand_radius(what: &str, radius_km: f64) -> String {
    format!(
        "I couldn't find any {what} within {radius_km} km. \
Would you like me to expand the search radius?"
    )
}

pub fn where_am_i(location: &Location, has_location: bool) -> String {
    if has_location {
        format!(
            "You are currently at {}.",
            location.format_coordinates()
        )
    } else {
        format!(
            "Location access is off, so I'm using the default position {}. \
Enable location access for a precise fix.",
            location.format_coordinates()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_radius_formats_whole_km() {
        let text = expand_radius("accessible restrooms", 3.0);
        assert!(text.contains("within 3 km"));
        assert!(text.contains("expand the search radius"));
    }

    #[test]
    fn test_where_am_i_four_decimals() {
        let text = where_am_i(&Location::new(48.858_370_1, 2.294_481), true);
        assert_eq!(text, "You are currently at 48.8584, 2.2945.");
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "clean restroom", "clean restrooms"), "1 clean restroom");
        assert_eq!(plural(3, "clean restroom", "clean restrooms"), "3 clean restrooms");
    }
}
