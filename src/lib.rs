//! `LooFinder` - Restroom locator with a conversational assistant
//!
//! This library provides the restroom catalog, the detail view model and
//! the chat assistant that answers free-text questions about nearby
//! facilities.

pub mod api;
pub mod assistant;
pub mod capabilities;
pub mod config;
pub mod detail;
pub mod error;
pub mod geo;
pub mod logging;
pub mod models;
pub mod store;
pub mod web;

// Re-export core types for public API
pub use assistant::{ClassificationResult, Classifier, FilterPredicate, Intent, Trigger, classify};
pub use config::LooFinderConfig;
pub use detail::RestroomDetail;
pub use error::LooFinderError;
pub use geo::GeographicSearch;
pub use models::{Location, Restroom};
pub use store::RestroomStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, LooFinderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
