//! Outbound notification dispatch: the transport seam and the fanout layer
//! on top of it.

use async_trait::async_trait;

use crate::notify::error::NotifyError;

pub mod dispatcher;
pub mod error;
pub mod message_builder;
pub mod telegram;

/// Messaging transport. One attempt per call; retrying is the caller's
/// decision (and nothing in this crate retries).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), NotifyError>;
}

/// Result of a single delivery attempt. Failures are values, not errors, so
/// a fanout is never aborted by one bad recipient and every failure stays
/// observable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Delivered,
    Failed { reason: String },
}

impl SendOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, SendOutcome::Delivered)
    }
}
