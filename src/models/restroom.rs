//! Restroom records and their cleanliness and amenity data

use serde::{Deserialize, Serialize};

use super::Location;
use crate::error::LooFinderError;

/// Highest possible cleanliness score
pub const MAX_SCORE: u8 = 100;

/// Aggregated cleanliness rating. The score is always within `0..=100`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "RawCleanliness")]
pub struct Cleanliness {
    score: u8,
    reports: u32,
}

#[derive(Deserialize)]
struct RawCleanliness {
    score: u8,
    #[serde(default)]
    reports: u32,
}

impl TryFrom<RawCleanliness> for Cleanliness {
    type Error = LooFinderError;

    fn try_from(raw: RawCleanliness) -> Result<Self, Self::Error> {
        Cleanliness::new(raw.score, raw.reports)
    }
}

/// Display tier derived from the score. Only used for presentation.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CleanlinessTier {
    High,
    Medium,
    Low,
}

impl Cleanliness {
    pub fn new(score: u8, reports: u32) -> crate::Result<Self> {
        if score > MAX_SCORE {
            return Err(LooFinderError::validation(format!(
                "cleanliness score {score} must be between 0 and {MAX_SCORE}"
            )));
        }
        Ok(Self { score, reports })
    }

    #[must_use]
    pub fn score(&self) -> u8 {
        self.score
    }

    #[must_use]
    pub fn reports(&self) -> u32 {
        self.reports
    }

    #[must_use]
    pub fn tier(&self) -> CleanlinessTier {
        match self.score {
            85..=100 => CleanlinessTier::High,
            60..=84 => CleanlinessTier::Medium,
            _ => CleanlinessTier::Low,
        }
    }

    /// Fold one more user rating into the running average.
    pub fn record_report(&self, score: u8) -> crate::Result<Self> {
        if score > MAX_SCORE {
            return Err(LooFinderError::validation(format!(
                "reported score {score} must be between 0 and {MAX_SCORE}"
            )));
        }
        let total = u64::from(self.score) * u64::from(self.reports) + u64::from(score);
        let reports = self.reports.saturating_add(1);
        let average = (total as f64 / f64::from(reports)).round();
        Ok(Self {
            // average of values <= 100 stays <= 100
            score: average.clamp(0.0, f64::from(MAX_SCORE)) as u8,
            reports,
        })
    }
}

impl CleanlinessTier {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            CleanlinessTier::High => "high",
            CleanlinessTier::Medium => "medium",
            CleanlinessTier::Low => "low",
        }
    }
}

/// Capability flags of a restroom
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct Amenities {
    #[serde(default)]
    pub accessible: bool,
    #[serde(default)]
    pub baby_changing: bool,
    #[serde(default)]
    pub gender_neutral: bool,
}

impl Amenities {
    /// Human readable labels for the flags that are set
    #[must_use]
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.accessible {
            labels.push("Wheelchair accessible");
        }
        if self.baby_changing {
            labels.push("Baby changing station");
        }
        if self.gender_neutral {
            labels.push("Gender neutral");
        }
        labels
    }
}

/// Where a record came from
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RestroomSource {
    #[default]
    Catalog,
    UserSubmitted,
}

/// A restroom as held by the store. Immutable once loaded.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Restroom {
    pub id: String,
    pub name: String,
    /// Records without a position are never distance-filtered in.
    #[serde(default)]
    pub location: Option<Location>,
    pub cleanliness: Cleanliness,
    #[serde(default)]
    pub amenities: Amenities,
    #[serde(default)]
    pub source: RestroomSource,
}

impl Restroom {
    /// Copy of this record with a replaced cleanliness aggregate
    #[must_use]
    pub fn with_cleanliness(&self, cleanliness: Cleanliness) -> Self {
        Self {
            cleanliness,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(100, CleanlinessTier::High)]
    #[case(85, CleanlinessTier::High)]
    #[case(84, CleanlinessTier::Medium)]
    #[case(60, CleanlinessTier::Medium)]
    #[case(59, CleanlinessTier::Low)]
    #[case(0, CleanlinessTier::Low)]
    fn test_cleanliness_tier(#[case] score: u8, #[case] tier: CleanlinessTier) {
        assert_eq!(Cleanliness::new(score, 1).unwrap().tier(), tier);
    }

    #[test]
    fn test_cleanliness_rejects_score_above_100() {
        assert!(Cleanliness::new(101, 0).is_err());
    }

    #[test]
    fn test_record_report_averages() {
        let c = Cleanliness::new(80, 3).unwrap();
        let updated = c.record_report(100).unwrap();
        assert_eq!(updated.score(), 85);
        assert_eq!(updated.reports(), 4);
        // original is untouched
        assert_eq!(c.score(), 80);
    }

    #[test]
    fn test_record_report_first_rating() {
        let c = Cleanliness::new(0, 0).unwrap();
        assert_eq!(c.record_report(72).unwrap().score(), 72);
    }

    #[test]
    fn test_deserialize_rejects_invalid_score() {
        let json = r#"{"id":"x","name":"X","cleanliness":{"score":150,"reports":2}}"#;
        assert!(serde_json::from_str::<Restroom>(json).is_err());
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{"id":"x","name":"X","cleanliness":{"score":70}}"#;
        let restroom: Restroom = serde_json::from_str(json).unwrap();
        assert!(restroom.location.is_none());
        assert_eq!(restroom.amenities, Amenities::default());
        assert_eq!(restroom.source, RestroomSource::Catalog);
        assert_eq!(restroom.cleanliness.reports(), 0);
    }

    #[test]
    fn test_amenity_labels() {
        let amenities = Amenities {
            accessible: true,
            baby_changing: false,
            gender_neutral: true,
        };
        assert_eq!(
            amenities.labels(),
            vec!["Wheelchair accessible", "Gender neutral"]
        );
    }
}
