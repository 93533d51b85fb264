//! Data models for the LooFinder application
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates of a position fix
//! - Restroom: Restroom records with cleanliness and amenity data

pub mod location;
pub mod restroom;

// Re-export all public types for convenient access
pub use location::Location;
pub use restroom::{Amenities, Cleanliness, CleanlinessTier, Restroom, RestroomSource};
