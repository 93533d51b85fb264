//! Detail panel view model for a single restroom

use serde::{Deserialize, Serialize};

use crate::geo::haversine_km;
use crate::models::{CleanlinessTier, Location, Restroom};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestroomDetail {
    pub id: String,
    pub name: String,
    pub location: Option<Location>,
    pub score: u8,
    pub tier: CleanlinessTier,
    pub reports: u32,
    pub amenities: Vec<String>,
    /// Great-circle distance from the viewer, when both positions are known
    pub distance_km: Option<f64>,
}

impl RestroomDetail {
    #[must_use]
    pub fn build(restroom: &Restroom, from: Option<&Location>) -> Self {
        let distance_km = match (from, restroom.location.as_ref()) {
            (Some(from), Some(to)) => Some(haversine_km(from, to)),
            _ => None,
        };

        Self {
            id: restroom.id.clone(),
            name: restroom.name.clone(),
            location: restroom.location,
            score: restroom.cleanliness.score(),
            tier: restroom.cleanliness.tier(),
            reports: restroom.cleanliness.reports(),
            amenities: restroom
                .amenities
                .labels()
                .into_iter()
                .map(str::to_string)
                .collect(),
            distance_km,
        }
    }

    /// "92/100 (high) from 128 reports"
    #[must_use]
    pub fn format_cleanliness(&self) -> String {
        let noun = if self.reports == 1 { "report" } else { "reports" };
        format!(
            "{}/100 ({}) from {} {}",
            self.score,
            self.tier.label(),
            self.reports,
            noun
        )
    }

    #[must_use]
    pub fn format_distance(&self) -> Option<String> {
        self.distance_km.map(|km| format!("{km:.1} km away"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Amenities, Cleanliness, RestroomSource};

    fn restroom(location: Option<Location>) -> Restroom {
        Restroom {
            id: "cbe-002".to_string(),
            name: "Brookefields Mall Restroom".to_string(),
            location,
            cleanliness: Cleanliness::new(92, 128).unwrap(),
            amenities: Amenities {
                accessible: true,
                baby_changing: true,
                gender_neutral: false,
            },
            source: RestroomSource::Catalog,
        }
    }

    #[test]
    fn test_build_detail() {
        let detail = RestroomDetail::build(
            &restroom(Some(Location::new(11.0258, 76.9558))),
            Some(&Location::DEFAULT),
        );
        assert_eq!(detail.tier, CleanlinessTier::High);
        assert_eq!(detail.amenities, vec!["Wheelchair accessible", "Baby changing station"]);
        assert_eq!(detail.format_cleanliness(), "92/100 (high) from 128 reports");
        assert_eq!(detail.format_distance().as_deref(), Some("1.0 km away"));
    }

    #[test]
    fn test_detail_without_positions() {
        let detail = RestroomDetail::build(&restroom(None), Some(&Location::DEFAULT));
        assert!(detail.distance_km.is_none());
        assert!(detail.format_distance().is_none());

        let detail = RestroomDetail::build(&restroom(Some(Location::DEFAULT)), None);
        assert!(detail.distance_km.is_none());
    }
}
