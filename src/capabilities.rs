//! Platform capabilities injected into the assistant
//!
//! Geolocation, speech recognition and speech synthesis are owned by the host
//! platform. The assistant only sees these traits, so it never depends on a
//! particular runtime.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, warn};

use crate::error::LooFinderError;
use crate::models::Location;

/// Source of the user's current position
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_location(&self) -> crate::Result<Location>;
}

/// Source of transcribed user utterances
#[async_trait]
pub trait SpeechInput: Send + Sync {
    /// Next utterance, `None` once the input is exhausted
    async fn listen(&self) -> crate::Result<Option<String>>;
}

/// Sink for spoken assistant replies
#[async_trait]
pub trait SpeechOutput: Send + Sync {
    async fn speak(&self, text: &str) -> crate::Result<()>;
}

/// Callback the map or list view uses to apply a filter
pub trait TriggerSink: Send + Sync {
    fn on_find_nearby_restrooms(&self, label: &str);
}

/// Resolve the current position, falling back to [`Location::DEFAULT`].
///
/// The flag is `true` only for a real fix.
pub async fn resolve_location(provider: &dyn LocationProvider) -> (Location, bool) {
    match provider.current_location().await {
        Ok(location) => (location, true),
        Err(e) => {
            warn!("Location unavailable, using default position: {}", e);
            (Location::DEFAULT, false)
        }
    }
}

/// Provider that reports a fixed position, or fails when none is set
#[derive(Debug, Clone, Default)]
pub struct FixedLocationProvider {
    location: Option<Location>,
}

impl FixedLocationProvider {
    #[must_use]
    pub fn new(location: Location) -> Self {
        Self {
            location: Some(location),
        }
    }

    /// Provider that behaves like a denied permission
    #[must_use]
    pub fn denied() -> Self {
        Self { location: None }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn current_location(&self) -> crate::Result<Location> {
        self.location
            .ok_or_else(|| LooFinderError::capability("location permission denied"))
    }
}

/// Reads utterances line by line from standard input
pub struct StdinSpeechInput {
    lines: tokio::sync::Mutex<Lines<BufReader<Stdin>>>,
}

impl StdinSpeechInput {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: tokio::sync::Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

impl Default for StdinSpeechInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechInput for StdinSpeechInput {
    async fn listen(&self) -> crate::Result<Option<String>> {
        let mut lines = self.lines.lock().await;
        Ok(lines.next_line().await?)
    }
}

/// Speech output that writes replies to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSpeechOutput;

#[async_trait]
impl SpeechOutput for TracingSpeechOutput {
    async fn speak(&self, text: &str) -> crate::Result<()> {
        info!(target: "loofinder::speech", "{}", text);
        Ok(())
    }
}

/// Trigger sink that remembers every label it was handed
#[derive(Debug, Default)]
pub struct RecordingTriggerSink {
    labels: Mutex<Vec<String>>,
}

impl RecordingTriggerSink {
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.labels
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl TriggerSink for RecordingTriggerSink {
    fn on_find_nearby_restrooms(&self, label: &str) {
        info!("Showing '{}' on the map", label);
        self.labels
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(label.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_location_real_fix() {
        let provider = FixedLocationProvider::new(Location::new(51.5, -0.12));
        let (location, has_location) = resolve_location(&provider).await;
        assert!(has_location);
        assert_eq!(location, Location::new(51.5, -0.12));
    }

    #[tokio::test]
    async fn test_resolve_location_falls_back() {
        let (location, has_location) = resolve_location(&FixedLocationProvider::denied()).await;
        assert!(!has_location);
        assert_eq!(location, Location::DEFAULT);
    }

    #[test]
    fn test_recording_sink() {
        let sink = RecordingTriggerSink::default();
        sink.on_find_nearby_restrooms("accessible");
        sink.on_find_nearby_restrooms("clean restrooms");
        assert_eq!(sink.labels(), vec!["accessible", "clean restrooms"]);
    }
}
