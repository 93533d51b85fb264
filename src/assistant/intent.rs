//! Keyword intent classification for assistant queries
//!
//! A query is matched against an ordered keyword table, first match wins.
//! Location-aware intents filter the candidate restrooms by attribute and
//! distance and report the first remaining record. The first record is
//! reported as "the closest one" even though the candidates are never
//! sorted by distance.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::responses;
use crate::geo::{GeographicSearch, NEARBY_DEFAULT_RADIUS_KM};
use crate::models::{Location, Restroom};

/// Radius for attribute-specific searches
pub const ATTRIBUTE_RADIUS_KM: f64 = 3.0;

/// Minimum score for a restroom to count as clean
pub const CLEAN_SCORE_THRESHOLD: u8 = 85;

/// Category of request inferred from a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Nearby,
    Clean,
    Accessible,
    BabyChanging,
    GenderNeutral,
    Help,
    WhereAmI,
    Unknown,
}

/// Keyword table in priority order.
const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (Intent::Clean, &["clean", "hygienic"]),
    (Intent::Accessible, &["accessible", "disability"]),
    (Intent::BabyChanging, &["baby", "changing"]),
    (Intent::GenderNeutral, &["gender", "neutral"]),
    (Intent::Nearby, &["restroom", "bathroom", "toilet"]),
    (Intent::Help, &["help"]),
    (Intent::WhereAmI, &["location", "where am i"]),
];

/// Filter the presentation layer should apply to the map and list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterPredicate {
    NearbyAny,
    Clean,
    Accessible,
    BabyChanging,
    GenderNeutral,
}

/// Signal for the presentation layer to surface matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub predicate: FilterPredicate,
    /// Label handed to `on_find_nearby_restrooms`
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub intent: Intent,
    pub text: String,
    pub trigger: Option<Trigger>,
    /// Filtered restrooms in candidate order
    pub matches: Vec<Restroom>,
}

impl ClassificationResult {
    fn text_only(intent: Intent, text: impl Into<String>) -> Self {
        Self {
            intent,
            text: text.into(),
            trigger: None,
            matches: Vec::new(),
        }
    }
}

impl Intent {
    /// Detect the intent of a raw query
    #[must_use]
    pub fn detect(query: &str) -> Self {
        let lowered = query.to_lowercase();
        INTENT_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
            .map_or(Intent::Unknown, |(intent, _)| *intent)
    }

    /// Whether answering needs a real location fix
    #[must_use]
    pub fn requires_location(&self) -> bool {
        self.predicate().is_some()
    }

    #[must_use]
    pub fn predicate(&self) -> Option<FilterPredicate> {
        match self {
            Intent::Nearby => Some(FilterPredicate::NearbyAny),
            Intent::Clean => Some(FilterPredicate::Clean),
            Intent::Accessible => Some(FilterPredicate::Accessible),
            Intent::BabyChanging => Some(FilterPredicate::BabyChanging),
            Intent::GenderNeutral => Some(FilterPredicate::GenderNeutral),
            Intent::Help | Intent::WhereAmI | Intent::Unknown => None,
        }
    }
}

impl FilterPredicate {
    #[must_use]
    pub fn accepts(&self, restroom: &Restroom, clean_threshold: u8) -> bool {
        match self {
            FilterPredicate::NearbyAny => true,
            FilterPredicate::Clean => restroom.cleanliness.score() >= clean_threshold,
            FilterPredicate::Accessible => restroom.amenities.accessible,
            FilterPredicate::BabyChanging => restroom.amenities.baby_changing,
            FilterPredicate::GenderNeutral => restroom.amenities.gender_neutral,
        }
    }

    /// Trigger label; the generic search passes the user's own words through
    #[must_use]
    pub fn label(&self, query: &str) -> String {
        match self {
            FilterPredicate::NearbyAny => query.to_string(),
            FilterPredicate::Clean => "clean restrooms".to_string(),
            FilterPredicate::Accessible => "accessible".to_string(),
            FilterPredicate::BabyChanging => "baby changing".to_string(),
            FilterPredicate::GenderNeutral => "gender neutral".to_string(),
        }
    }

    fn describe_missing(&self) -> &'static str {
        match self {
            FilterPredicate::NearbyAny => "restrooms",
            FilterPredicate::Clean => "clean restrooms",
            FilterPredicate::Accessible => "accessible restrooms",
            FilterPredicate::BabyChanging => "restrooms with baby changing facilities",
            FilterPredicate::GenderNeutral => "gender neutral restrooms",
        }
    }

    fn describe_found(&self, count: usize, first: &Restroom) -> String {
        match self {
            FilterPredicate::NearbyAny => responses::nearby_found(count, first),
            FilterPredicate::Clean => responses::clean_found(count, first),
            FilterPredicate::Accessible => responses::accessible_found(count, first),
            FilterPredicate::BabyChanging => responses::baby_changing_found(count, first),
            FilterPredicate::GenderNeutral => responses::gender_neutral_found(count, first),
        }
    }
}

/// Radii and thresholds used while filtering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierSettings {
    /// Radius of the generic "restroom near me" search
    pub nearby_radius_km: f64,
    /// Radius of attribute searches (clean, accessible, ...)
    pub attribute_radius_km: f64,
    pub clean_threshold: u8,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            nearby_radius_km: NEARBY_DEFAULT_RADIUS_KM,
            attribute_radius_km: ATTRIBUTE_RADIUS_KM,
            clean_threshold: CLEAN_SCORE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Classifier {
    settings: ClassifierSettings,
}

impl Classifier {
    #[must_use]
    pub fn new(settings: ClassifierSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &ClassifierSettings {
        &self.settings
    }

    /// Classify a query and answer it from `candidates`.
    ///
    /// Never fails: every input maps to a reply.
    #[must_use]
    pub fn classify(
        &self,
        query: &str,
        has_location: bool,
        location: &Location,
        candidates: &[Restroom],
    ) -> ClassificationResult {
        let intent = Intent::detect(query);
        debug!(?intent, has_location, candidates = candidates.len(), "Classified query");

        match intent.predicate() {
            Some(_) if !has_location => {
                ClassificationResult::text_only(intent, responses::LOCATION_REQUIRED)
            }
            Some(predicate) => self.search(intent, predicate, query, location, candidates),
            None => match intent {
                Intent::Help => ClassificationResult::text_only(intent, responses::HELP),
                Intent::WhereAmI => ClassificationResult::text_only(
                    intent,
                    responses::where_am_i(location, has_location),
                ),
                _ => ClassificationResult::text_only(intent, responses::UNKNOWN),
            },
        }
    }

    fn search(
        &self,
        intent: Intent,
        predicate: FilterPredicate,
        query: &str,
        location: &Location,
        candidates: &[Restroom],
    ) -> ClassificationResult {
        let matches: Vec<Restroom> = match predicate {
            FilterPredicate::NearbyAny => {
                GeographicSearch::within_radius(candidates, location, self.settings.nearby_radius_km)
                    .into_iter()
                    .cloned()
                    .collect()
            }
            _ => {
                let qualifying: Vec<Restroom> = candidates
                    .iter()
                    .filter(|r| predicate.accepts(r, self.settings.clean_threshold))
                    .cloned()
                    .collect();
                GeographicSearch::within_radius(
                    &qualifying,
                    location,
                    self.settings.attribute_radius_km,
                )
                .into_iter()
                .cloned()
                .collect()
            }
        };

        let radius_km = match predicate {
            FilterPredicate::NearbyAny => self.settings.nearby_radius_km,
            _ => self.settings.attribute_radius_km,
        };

        match matches.first() {
            Some(first) => ClassificationResult {
                intent,
                text: predicate.describe_found(matches.len(), first),
                trigger: Some(Trigger {
                    predicate,
                    label: predicate.label(query),
                }),
                matches,
            },
            None => ClassificationResult::text_only(
                intent,
                responses::expand_radius(predicate.describe_missing(), radius_km),
            ),
        }
    }
}

/// Classify with the default radii and threshold
#[must_use]
pub fn classify(
    query: &str,
    has_location: bool,
    location: &Location,
    candidates: &[Restroom],
) -> ClassificationResult {
    Classifier::default().classify(query, has_location, location, candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Amenities, Cleanliness, RestroomSource};
    use rstest::rstest;

    const HERE: Location = Location::new(11.0168, 76.9558);

    /// Restroom `km` kilometres north of `HERE`
    fn restroom(id: &str, score: u8, km: f64, amenities: Amenities) -> Restroom {
        Restroom {
            id: id.to_string(),
            name: id.to_string(),
            location: Some(Location::new(HERE.latitude + km / 111.0, HERE.longitude)),
            cleanliness: Cleanliness::new(score, 3).unwrap(),
            amenities,
            source: RestroomSource::Catalog,
        }
    }

    fn accessible() -> Amenities {
        Amenities {
            accessible: true,
            ..Amenities::default()
        }
    }

    #[rstest]
    #[case("Is there a toilet around?", Intent::Nearby)]
    #[case("BATHROOM please", Intent::Nearby)]
    #[case("Where can I find a clean restroom?", Intent::Clean)]
    #[case("something hygienic", Intent::Clean)]
    #[case("find a clean accessible restroom", Intent::Clean)]
    #[case("accessible bathroom", Intent::Accessible)]
    #[case("I have a disability", Intent::Accessible)]
    #[case("baby changing table", Intent::BabyChanging)]
    #[case("gender neutral options", Intent::GenderNeutral)]
    #[case("help", Intent::Help)]
    #[case("help me find a restroom", Intent::Nearby)]
    #[case("what is my location", Intent::WhereAmI)]
    #[case("Where am I?", Intent::WhereAmI)]
    #[case("hello", Intent::Unknown)]
    #[case("", Intent::Unknown)]
    fn test_detect_intent(#[case] query: &str, #[case] expected: Intent) {
        assert_eq!(Intent::detect(query), expected);
    }

    #[test]
    fn test_clean_restroom_scenario() {
        let candidates = vec![
            restroom("A", 90, 1.0, Amenities::default()),
            restroom("B", 70, 1.0, Amenities::default()),
        ];
        let result = classify("Where can I find a clean restroom?", true, &HERE, &candidates);

        assert_eq!(result.intent, Intent::Clean);
        assert!(result.text.contains("1 clean restroom "), "{}", result.text);
        assert!(result.text.contains('A'));
        assert!(result.text.contains("90/100"));
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].id, "A");
        let trigger = result.trigger.unwrap();
        assert_eq!(trigger.label, "clean restrooms");
        assert_eq!(trigger.predicate, FilterPredicate::Clean);
    }

    #[test]
    fn test_clean_restroom_without_location() {
        let candidates = vec![
            restroom("A", 90, 1.0, Amenities::default()),
            restroom("B", 70, 1.0, Amenities::default()),
        ];
        let result = classify("Where can I find a clean restroom?", false, &HERE, &candidates);
        assert_eq!(result.text, responses::LOCATION_REQUIRED);
        assert!(result.trigger.is_none());
        assert!(result.matches.is_empty());
    }

    #[rstest]
    #[case("toilet")]
    #[case("clean")]
    #[case("accessible")]
    #[case("baby")]
    #[case("neutral")]
    fn test_location_intents_need_location(#[case] query: &str) {
        let candidates = vec![restroom("A", 95, 0.1, Amenities {
            accessible: true,
            baby_changing: true,
            gender_neutral: true,
        })];
        let result = classify(query, false, &HERE, &candidates);
        assert_eq!(result.text, responses::LOCATION_REQUIRED);
        assert!(result.trigger.is_none());
    }

    #[test]
    fn test_accessible_without_matches_offers_expansion() {
        let candidates = vec![restroom("A", 95, 0.5, Amenities::default())];
        let result = classify("accessible bathroom", true, &HERE, &candidates);
        assert_eq!(result.intent, Intent::Accessible);
        assert!(result.text.contains("expand the search radius"));
        assert!(result.trigger.is_none());
    }

    #[test]
    fn test_hello_falls_back() {
        let candidates = vec![restroom("A", 95, 0.5, Amenities::default())];
        let result = classify("hello", true, &HERE, &candidates);
        assert_eq!(result.intent, Intent::Unknown);
        assert_eq!(result.text, responses::UNKNOWN);
        assert!(result.trigger.is_none());
        assert!(result.matches.is_empty());
    }

    #[test]
    fn test_clean_only_matches_threshold() {
        let candidates = vec![
            restroom("low", 84, 0.2, accessible()),
            restroom("edge", 85, 0.2, Amenities::default()),
            restroom("high", 99, 0.2, Amenities::default()),
        ];
        let result = classify("hygienic please", true, &HERE, &candidates);
        assert!(result.matches.iter().all(|r| r.cleanliness.score() >= 85));
        assert_eq!(result.matches.len(), 2);
    }

    #[test]
    fn test_first_match_reported_not_nearest() {
        let candidates = vec![
            restroom("further", 90, 2.5, accessible()),
            restroom("nearest", 90, 0.1, accessible()),
        ];
        let result = classify("accessible", true, &HERE, &candidates);
        assert!(result.text.contains("The closest one is further"));
        assert_eq!(result.matches[0].id, "further");
    }

    #[test]
    fn test_radius_asymmetry() {
        // 2.5 km away: outside the generic radius, inside the attribute radius
        let candidates = vec![restroom("mid", 90, 2.5, accessible())];

        let generic = classify("toilet", true, &HERE, &candidates);
        assert!(generic.trigger.is_none());
        assert!(generic.text.contains("within 2 km"));

        let attribute = classify("accessible", true, &HERE, &candidates);
        assert_eq!(attribute.matches.len(), 1);
    }

    #[rstest]
    #[case("clean", 90, Amenities::default(), FilterPredicate::Clean, "clean restrooms")]
    #[case("accessible", 50, accessible(), FilterPredicate::Accessible, "accessible")]
    #[case(
        "baby changing",
        50,
        Amenities { baby_changing: true, ..Amenities::default() },
        FilterPredicate::BabyChanging,
        "baby changing"
    )]
    #[case(
        "gender neutral",
        50,
        Amenities { gender_neutral: true, ..Amenities::default() },
        FilterPredicate::GenderNeutral,
        "gender neutral"
    )]
    fn test_attribute_trigger_label_and_predicate(
        #[case] query: &str,
        #[case] score: u8,
        #[case] amenities: Amenities,
        #[case] predicate: FilterPredicate,
        #[case] label: &str,
    ) {
        // inside the attribute radius but outside the generic one
        let candidates = vec![
            restroom("plain", 40, 0.5, Amenities::default()),
            restroom("match", score, 2.5, amenities),
        ];
        let result = classify(query, true, &HERE, &candidates);

        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].id, "match");
        let trigger = result.trigger.unwrap();
        assert_eq!(trigger.predicate, predicate);
        assert_eq!(trigger.label, label);
    }

    #[test]
    fn test_baby_changing_reply_wording() {
        let candidates = vec![restroom(
            "Mall Nursery",
            88,
            1.0,
            Amenities {
                baby_changing: true,
                ..Amenities::default()
            },
        )];
        let result = classify("any baby changing room?", true, &HERE, &candidates);

        assert_eq!(result.intent, Intent::BabyChanging);
        assert!(
            result
                .text
                .contains("1 restroom with baby changing facilities nearby"),
            "{}",
            result.text
        );
        assert!(result.text.contains("The closest one is Mall Nursery"));
        assert!(result.text.contains("88/100"));
    }

    #[test]
    fn test_nearby_trigger_uses_raw_query() {
        let candidates = vec![restroom("A", 50, 0.5, Amenities::default())];
        let result = classify("Any Toilet nearby?", true, &HERE, &candidates);
        assert_eq!(result.trigger.unwrap().label, "Any Toilet nearby?");
        assert!(result.text.contains("1 restroom near you"));
    }

    #[test]
    fn test_missing_location_records_are_excluded() {
        let mut lost = restroom("lost", 99, 0.0, accessible());
        lost.location = None;
        let result = classify("clean", true, &HERE, &[lost]);
        assert!(result.matches.is_empty());
        assert!(result.trigger.is_none());
    }

    #[test]
    fn test_classification_is_idempotent() {
        let candidates = vec![
            restroom("A", 90, 1.0, accessible()),
            restroom("B", 88, 2.9, accessible()),
            restroom("C", 88, 3.1, accessible()),
        ];
        let first = classify("accessible", true, &HERE, &candidates);
        let second = classify("accessible", true, &HERE, &candidates);
        assert_eq!(first, second);
        assert_eq!(first.matches.len(), 2);
    }

    #[test]
    fn test_where_am_i_echoes_coordinates() {
        let result = classify("where am i", true, &HERE, &[]);
        assert_eq!(result.text, "You are currently at 11.0168, 76.9558.");
        assert!(result.trigger.is_none());
    }

    #[test]
    fn test_help_lists_capabilities_without_filtering() {
        let result = classify("help", false, &HERE, &[]);
        assert_eq!(result.intent, Intent::Help);
        assert_eq!(result.text, responses::HELP);
    }

    #[test]
    fn test_custom_settings() {
        let classifier = Classifier::new(ClassifierSettings {
            clean_threshold: 95,
            ..ClassifierSettings::default()
        });
        let candidates = vec![restroom("A", 90, 1.0, Amenities::default())];
        let result = classifier.classify("clean", true, &HERE, &candidates);
        assert!(result.matches.is_empty());
    }
}
