//! Fanout layer over the messaging transport.

use std::sync::Arc;
use std::time::Duration;

use log::warn;
use tokio::time::sleep;

use crate::notify::MessageSender;
use crate::notify::SendOutcome;

pub struct NotificationDispatcher {
    sender: Arc<dyn MessageSender>,
    /// Fixed delay between consecutive sends within one fanout, to respect
    /// the platform's outbound rate limit.
    send_delay: Duration,
}

impl NotificationDispatcher {
    pub fn new(sender: Arc<dyn MessageSender>, send_delay: Duration) -> Self {
        Self { sender, send_delay }
    }

    /// One delivery attempt. Transport failures become
    /// [`SendOutcome::Failed`], never an error: a fanout must not be aborted
    /// by one bad recipient.
    pub async fn send_one(&self, user_id: i64, text: &str) -> SendOutcome {
        match self.sender.send_message(user_id, text).await {
            Ok(()) => SendOutcome::Delivered,
            Err(e) => {
                warn!("Failed to deliver message to {user_id}: {e}");
                SendOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Sequential fanout in list order. Every id is attempted exactly once;
    /// failures do not stop the run. Returns the delivered count.
    pub async fn send_many(&self, user_ids: &[i64], text: &str) -> u32 {
        let mut delivered = 0;
        for (i, user_id) in user_ids.iter().enumerate() {
            if i > 0 {
                sleep(self.send_delay).await;
            }
            if self.send_one(*user_id, text).await.is_delivered() {
                delivered += 1;
            }
        }
        delivered
    }
}
