//! Conversational assistant
//!
//! This module provides the chat assistant:
//! - Keyword intent classification and nearby filtering
//! - Canned reply text
//! - Conversation transcript with delayed, cancellable reply delivery

pub mod conversation;
pub mod intent;
pub mod responses;

pub use conversation::{ChatSession, Conversation, Message, PendingReply, ReplyScheduler, Role};
pub use intent::{
    ClassificationResult, Classifier, ClassifierSettings, FilterPredicate, Intent, Trigger,
    classify,
};
