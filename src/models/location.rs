//! Location model for geographic coordinates

use serde::{Deserialize, Serialize};

use crate::error::LooFinderError;

/// A point-in-time position fix in decimal degrees.
///
/// Locations are replaced, never mutated: a new fix produces a new value.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Location {
    /// Fallback position used until the platform reports a real fix.
    pub const DEFAULT: Location = Location {
        latitude: 11.0168,
        longitude: 76.9558,
    };

    /// Create a new location
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a location, rejecting out-of-range or non-finite coordinates
    pub fn try_new(latitude: f64, longitude: f64) -> crate::Result<Self> {
        let location = Self::new(latitude, longitude);
        location.validate()?;
        Ok(location)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(LooFinderError::validation(format!(
                "latitude {} must be between -90 and 90",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(LooFinderError::validation(format!(
                "longitude {} must be between -180 and 180",
                self.longitude
            )));
        }
        Ok(())
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::DEFAULT
    }
}
