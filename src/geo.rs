//! Distance calculations and radius search
//!
//! The assistant uses a flat-earth approximation (111 km per degree) that is
//! only meaningful for short distances at mid-latitudes. Great-circle
//! distances are available for display purposes.

use crate::models::{Location, Restroom};

/// Kilometres per degree used by the flat-earth approximation
pub const KM_PER_DEGREE: f64 = 111.0;

/// Default radius for a generic nearby search
pub const NEARBY_DEFAULT_RADIUS_KM: f64 = 2.0;

/// Approximate distance in km: `sqrt(dlat^2 + dlng^2) * 111`
#[must_use]
pub fn flat_earth_km(from: &Location, to: &Location) -> f64 {
    let dlat = to.latitude - from.latitude;
    let dlng = to.longitude - from.longitude;
    dlat.hypot(dlng) * KM_PER_DEGREE
}

/// Great-circle distance in km
#[must_use]
pub fn haversine_km(from: &Location, to: &Location) -> f64 {
    haversine::distance(
        haversine::Location {
            latitude: from.latitude,
            longitude: from.longitude,
        },
        haversine::Location {
            latitude: to.latitude,
            longitude: to.longitude,
        },
        haversine::Units::Kilometers,
    )
}

/// Geographic search functionality
pub struct GeographicSearch;

impl GeographicSearch {
    /// Restrooms within `radius_km` of `center`, in input order.
    ///
    /// Records without a location are skipped. No sorting is applied.
    #[must_use]
    pub fn within_radius<'a>(
        restrooms: &'a [Restroom],
        center: &Location,
        radius_km: f64,
    ) -> Vec<&'a Restroom> {
        restrooms
            .iter()
            .filter(|restroom| {
                restroom
                    .location
                    .as_ref()
                    .is_some_and(|location| flat_earth_km(center, location) <= radius_km)
            })
            .collect()
    }
}
