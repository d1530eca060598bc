//! Operator-initiated fanout to the entire subscriber base.

use std::sync::Arc;

use log::info;

use crate::database::Database;
use crate::database::model::BroadcastModel;
use crate::notify::dispatcher::NotificationDispatcher;
use crate::notify::message_builder;
use crate::service::error::ServiceError;

pub struct BroadcastService {
    db: Arc<Database>,
    dispatcher: Arc<NotificationDispatcher>,
}

impl BroadcastService {
    pub fn new(db: Arc<Database>, dispatcher: Arc<NotificationDispatcher>) -> Self {
        Self { db, dispatcher }
    }

    /// Sends `message` to every subscriber and appends a ledger row with the
    /// ACHIEVED delivery count, not the attempted count, so failures stay
    /// visible as a lower-than-expected number.
    ///
    /// Not idempotent: calling twice sends twice.
    ///
    /// # Performance
    /// * DB calls: 2
    /// * API calls: N
    pub async fn broadcast(
        &self,
        message: &str,
        initiated_by: &str,
    ) -> Result<u32, ServiceError> {
        let subscribers = self.db.subscriber_table.select_all().await?;
        let ids: Vec<i64> = subscribers.iter().map(|s| s.user_id).collect();
        info!(
            "Broadcasting to {} subscribers (initiated by {initiated_by}).",
            ids.len()
        );

        let delivered = self
            .dispatcher
            .send_many(&ids, &message_builder::broadcast_message(message))
            .await;

        self.db
            .broadcast_table
            .insert(message, initiated_by, delivered as i64)
            .await?;
        info!(
            "Broadcast reached {delivered} of {} subscribers.",
            ids.len()
        );
        Ok(delivered)
    }

    /// # Performance
    /// * DB calls: 1
    pub async fn history(&self, limit: i64) -> Result<Vec<BroadcastModel>, ServiceError> {
        Ok(self.db.broadcast_table.select_recent(limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::notify::MockMessageSender;
    use crate::notify::error::NotifyError;

    #[tokio::test]
    async fn test_broadcast_records_achieved_count() {
        let db = Arc::new(Database::open_in_memory().await);
        for id in 1..=10i64 {
            db.subscriber_table.upsert(id, None, None).await.unwrap();
        }

        let mut sender = MockMessageSender::new();
        sender.expect_send_message().returning(|chat_id, _| {
            if chat_id == 3 || chat_id == 7 {
                Err(NotifyError::ApiError {
                    description: "Forbidden".to_string(),
                })
            } else {
                Ok(())
            }
        });
        let dispatcher = Arc::new(NotificationDispatcher::new(
            Arc::new(sender),
            Duration::ZERO,
        ));

        let service = BroadcastService::new(db.clone(), dispatcher);
        let delivered = service.broadcast("Test", "operator").await.unwrap();
        assert_eq!(delivered, 8);

        let history = service.history(50).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].message, "Test");
        assert_eq!(history[0].sent_by, "operator");
        assert_eq!(history[0].recipients_count, 8);
    }

    #[tokio::test]
    async fn test_broadcast_twice_sends_twice() {
        let db = Arc::new(Database::open_in_memory().await);
        db.subscriber_table.upsert(1, None, None).await.unwrap();

        let mut sender = MockMessageSender::new();
        sender
            .expect_send_message()
            .times(2)
            .returning(|_, _| Ok(()));
        let dispatcher = Arc::new(NotificationDispatcher::new(
            Arc::new(sender),
            Duration::ZERO,
        ));

        let service = BroadcastService::new(db, dispatcher);
        service.broadcast("One", "op").await.unwrap();
        service.broadcast("One", "op").await.unwrap();
        assert_eq!(service.history(50).await.unwrap().len(), 2);
    }
}
