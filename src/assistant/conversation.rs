//! Conversation transcript and delayed reply delivery

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::intent::{ClassificationResult, Classifier};
use super::responses;
use crate::capabilities::{LocationProvider, SpeechOutput, TriggerSink, resolve_location};
use crate::models::{Location, Restroom};

/// Delay before a reply is shown
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl Message {
    fn now(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

/// Transcript plus the location snapshot queries are answered against
#[derive(Debug, Clone)]
pub struct Conversation {
    classifier: Classifier,
    location: Location,
    has_location: bool,
    transcript: Vec<Message>,
}

impl Conversation {
    #[must_use]
    pub fn new(classifier: Classifier) -> Self {
        Self {
            classifier,
            location: Location::DEFAULT,
            has_location: false,
            transcript: vec![Message::now(Role::Assistant, responses::GREETING)],
        }
    }

    /// Replace the location snapshot with a real fix
    pub fn set_location(&mut self, location: Location) {
        self.location = location;
        self.has_location = true;
    }

    /// Drop back to the default position
    pub fn clear_location(&mut self) {
        self.location = Location::DEFAULT;
        self.has_location = false;
    }

    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    #[must_use]
    pub fn has_location(&self) -> bool {
        self.has_location
    }

    #[must_use]
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Record the user's message and classify it
    pub fn submit(&mut self, query: &str, candidates: &[Restroom]) -> ClassificationResult {
        self.transcript.push(Message::now(Role::User, query));
        self.classifier
            .classify(query, self.has_location, &self.location, candidates)
    }

    /// Record the assistant reply once it is shown
    pub fn deliver(&mut self, result: &ClassificationResult) {
        self.transcript
            .push(Message::now(Role::Assistant, result.text.clone()));
    }
}

/// Runs reply delivery after a fixed delay
#[derive(Debug, Clone, Copy)]
pub struct ReplyScheduler {
    delay: Duration,
}

impl Default for ReplyScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_REPLY_DELAY)
    }
}

impl ReplyScheduler {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `delivery` after the delay. Must be called within a tokio runtime.
    pub fn schedule<F>(&self, delivery: F) -> PendingReply
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            delivery.await;
        });
        PendingReply {
            handle: Some(handle),
        }
    }
}

/// Handle to a scheduled reply. Dropping it cancels the reply.
#[derive(Debug)]
pub struct PendingReply {
    handle: Option<JoinHandle<()>>,
}

impl PendingReply {
    /// Cancel the reply if it has not been delivered yet
    pub fn cancel(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the reply; `true` when it was delivered
    pub async fn wait(mut self) -> bool {
        match self.handle.take() {
            Some(handle) => handle.await.is_ok(),
            None => false,
        }
    }
}

impl Drop for PendingReply {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// A conversation wired to its platform capabilities.
///
/// Closing the session cancels every reply that has not been shown yet.
pub struct ChatSession {
    conversation: Arc<Mutex<Conversation>>,
    scheduler: ReplyScheduler,
    speech: Arc<dyn SpeechOutput>,
    triggers: Arc<dyn TriggerSink>,
    pending: Vec<PendingReply>,
}

fn lock(conversation: &Mutex<Conversation>) -> MutexGuard<'_, Conversation> {
    conversation.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ChatSession {
    #[must_use]
    pub fn new(
        classifier: Classifier,
        scheduler: ReplyScheduler,
        speech: Arc<dyn SpeechOutput>,
        triggers: Arc<dyn TriggerSink>,
    ) -> Self {
        Self {
            conversation: Arc::new(Mutex::new(Conversation::new(classifier))),
            scheduler,
            speech,
            triggers,
            pending: Vec::new(),
        }
    }

    /// Refresh the location snapshot from the platform
    pub async fn locate(&self, provider: &dyn LocationProvider) -> bool {
        let (location, has_location) = resolve_location(provider).await;
        let mut conversation = lock(&self.conversation);
        if has_location {
            conversation.set_location(location);
        } else {
            conversation.clear_location();
        }
        has_location
    }

    /// Classify `query` now and schedule its reply for display
    pub fn ask(&mut self, query: &str, candidates: &[Restroom]) -> ClassificationResult {
        let result = lock(&self.conversation).submit(query, candidates);

        let conversation = Arc::clone(&self.conversation);
        let speech = Arc::clone(&self.speech);
        let triggers = Arc::clone(&self.triggers);
        let reply = result.clone();

        self.pending.retain(|pending| !pending.is_finished());
        self.pending.push(self.scheduler.schedule(async move {
            lock(&conversation).deliver(&reply);
            if let Err(e) = speech.speak(&reply.text).await {
                warn!("Failed to speak reply: {}", e);
            }
            // the map updates only after the reply has been shown
            if let Some(trigger) = &reply.trigger {
                triggers.on_find_nearby_restrooms(&trigger.label);
            }
        }));
        debug!(pending = self.pending.len(), "Scheduled assistant reply");

        result
    }

    /// Wait until every scheduled reply has been shown
    pub async fn flush(&mut self) {
        for pending in self.pending.drain(..) {
            pending.wait().await;
        }
    }

    #[must_use]
    pub fn transcript(&self) -> Vec<Message> {
        lock(&self.conversation).transcript().to_vec()
    }

    /// Tear down the session, cancelling undelivered replies.
    ///
    /// Returns how many replies were cancelled.
    pub fn close(mut self) -> usize {
        let mut cancelled = 0;
        for pending in self.pending.drain(..) {
            if !pending.is_finished() {
                cancelled += 1;
            }
            pending.cancel();
        }
        debug!(cancelled, "Closed chat session");
        cancelled
    }
}
