//! Restroom store
//!
//! Holds the static catalog together with user-submitted entries. Records are
//! immutable; updates replace a record with a new value.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::LooFinderError;
use crate::models::{Amenities, Cleanliness, Location, Restroom, RestroomSource};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Payload for a user-contributed restroom
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRestroom {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Initial cleanliness rating given by the submitter
    pub score: u8,
    #[serde(default)]
    pub amenities: Amenities,
}

#[derive(Debug, Default, Clone)]
pub struct RestroomStore {
    catalog: Vec<Restroom>,
    submitted: Vec<Restroom>,
}

impl RestroomStore {
    /// Store with no records
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Store seeded with the catalog shipped in the binary
    pub fn with_builtin_catalog() -> crate::Result<Self> {
        Self::from_catalog_json(BUILTIN_CATALOG)
    }

    /// Parse a JSON array of restroom records as the catalog.
    ///
    /// Ids must be unique within the catalog.
    pub fn from_catalog_json(json: &str) -> crate::Result<Self> {
        let mut catalog: Vec<Restroom> = serde_json::from_str(json)?;
        let mut seen = HashSet::with_capacity(catalog.len());
        for restroom in &mut catalog {
            if !seen.insert(restroom.id.clone()) {
                return Err(LooFinderError::validation(format!(
                    "Duplicate restroom id '{}' in catalog",
                    restroom.id
                )));
            }
            if let Some(location) = &restroom.location {
                location.validate()?;
            }
            restroom.source = RestroomSource::Catalog;
        }
        debug!("Parsed {} catalog restrooms", catalog.len());
        Ok(Self {
            catalog,
            submitted: Vec::new(),
        })
    }

    /// Load the catalog from a JSON file
    #[tracing::instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let store = Self::from_catalog_json(&json)?;
        info!("Loaded {} restrooms from catalog file", store.catalog.len());
        Ok(store)
    }

    /// All known restrooms, catalog entries first
    #[must_use]
    pub fn all(&self) -> Vec<Restroom> {
        self.catalog
            .iter()
            .chain(self.submitted.iter())
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.catalog.len() + self.submitted.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Restroom> {
        self.catalog
            .iter()
            .chain(self.submitted.iter())
            .find(|restroom| restroom.id == id)
    }

    /// Validate and append a user-contributed restroom
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn submit(&mut self, new: NewRestroom) -> crate::Result<Restroom> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(LooFinderError::validation("Restroom name cannot be empty"));
        }
        let location = Location::try_new(new.latitude, new.longitude)?;
        let cleanliness = Cleanliness::new(new.score, 1)?;

        let restroom = Restroom {
            id: self.next_user_id(),
            name: name.to_string(),
            location: Some(location),
            cleanliness,
            amenities: new.amenities,
            source: RestroomSource::UserSubmitted,
        };
        info!("Added user restroom {} ({})", restroom.id, restroom.name);
        self.submitted.push(restroom.clone());
        Ok(restroom)
    }

    /// First free `user-<n>` id, skipping ids already used by the catalog
    fn next_user_id(&self) -> String {
        let mut n = self.submitted.len() + 1;
        loop {
            let id = format!("user-{n}");
            if self.get(&id).is_none() {
                return id;
            }
            n += 1;
        }
    }

    /// Record a cleanliness rating, replacing the stored record
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn report_cleanliness(&mut self, id: &str, score: u8) -> crate::Result<Restroom> {
        let slot = self
            .catalog
            .iter_mut()
            .chain(self.submitted.iter_mut())
            .find(|restroom| restroom.id == id)
            .ok_or_else(|| LooFinderError::not_found(id))?;

        let updated = slot.with_cleanliness(slot.cleanliness.record_report(score)?);
        debug!(
            "Cleanliness of {} is now {}/100 over {} reports",
            id,
            updated.cleanliness.score(),
            updated.cleanliness.reports()
        );
        *slot = updated.clone();
        Ok(updated)
    }
}
