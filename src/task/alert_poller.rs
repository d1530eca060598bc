//! Background task polling the alert source and fanning out notifications.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;

use log::debug;
use log::error;
use log::info;
use log::warn;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::alert::ActiveAlert;
use crate::alert::AlertSource;
use crate::database::Database;
use crate::database::error::DatabaseError;
use crate::notify::dispatcher::NotificationDispatcher;
use crate::notify::message_builder;

/// Advisory status written to the region cache while an alert is active.
const ALERT_ACTIVE_STATUS: &str = "A";

/// Task that periodically fetches active alerts and notifies subscribers of
/// the affected regions.
///
/// One cycle is fetch -> match -> dispatch; the task then sleeps for the
/// fixed poll interval regardless of how much work the cycle did. A failed
/// fetch degrades the whole cycle to a no-op; the loop itself never
/// terminates on error.
pub struct AlertPoller {
    source: Arc<dyn AlertSource>,
    db: Arc<Database>,
    dispatcher: Arc<NotificationDispatcher>,
    poll_interval: Duration,
    /// Upper bound on subscribers notified per alert per cycle. A
    /// backpressure valve on worst-case fanout volume, not a correctness
    /// requirement.
    fanout_cap: usize,
    running: AtomicBool,
    stop_notify: Notify,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl AlertPoller {
    pub fn new(
        source: Arc<dyn AlertSource>,
        db: Arc<Database>,
        dispatcher: Arc<NotificationDispatcher>,
        poll_interval: Duration,
        fanout_cap: usize,
    ) -> Arc<Self> {
        info!("Initializing AlertPoller with poll interval {poll_interval:?}");
        Arc::new(Self {
            source,
            db,
            dispatcher,
            poll_interval,
            fanout_cap,
            running: AtomicBool::new(false),
            stop_notify: Notify::new(),
            handle: Mutex::new(None),
        })
    }

    /// Starts the poll loop. Idempotent: a running poller is left alone.
    pub fn start(self: Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }
        info!("Starting AlertPoller check loop.");
        let handle = self.clone().spawn_check_loop();
        *self.handle.lock().unwrap() = Some(handle);
    }

    /// Stops accepting new cycles. An in-flight cycle runs to completion.
    pub fn stop(&self) {
        info!("Stopping AlertPoller check loop.");
        self.running.store(false, Ordering::SeqCst);
        self.stop_notify.notify_one();
    }

    /// Stops the loop and waits for it to wind down.
    pub async fn shutdown(&self) {
        self.stop();
        let handle = self.handle.lock().unwrap().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    fn spawn_check_loop(self: Arc<Self>) -> JoinHandle<()> {
        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    _ = self.stop_notify.notified() => {}
                }
                if !self.running.load(Ordering::SeqCst) {
                    info!("Stopping check loop.");
                    break;
                }

                // Each cycle runs in its own task so a panic is contained
                // and the loop resumes on the next tick.
                let this = Arc::clone(&self);
                if let Err(e) = tokio::spawn(async move { this.run_cycle().await }).await
                    && e.is_panic()
                {
                    error!("Alert cycle panicked; resuming on next tick.");
                }
            }
        })
    }

    /// One fetch -> match -> dispatch cycle. All failure modes are handled
    /// here; the loop never sees an error.
    async fn run_cycle(&self) {
        debug!("Checking for active alerts.");
        let alerts = match self.source.fetch_active_alerts().await {
            Ok(alerts) => alerts,
            Err(e) => {
                warn!("Skipping alert cycle, source unavailable: {e}");
                return;
            }
        };

        if alerts.is_empty() {
            debug!("No active alerts.");
            return;
        }
        info!("Found {} active alerts.", alerts.len());

        for alert in &alerts {
            if let Err(e) = self.notify_region(alert).await {
                error!(
                    "Error notifying subscribers for `{}`: {e}",
                    alert.location_title
                );
            }
        }
    }

    async fn notify_region(&self, alert: &ActiveAlert) -> Result<(), DatabaseError> {
        if let Some(uid) = &alert.location_uid
            && let Err(e) = self
                .db
                .region_table
                .update_status(uid, ALERT_ACTIVE_STATUS)
                .await
        {
            warn!("Could not refresh status cache for region uid {uid}: {e}");
        }

        let subscribers = self
            .db
            .subscriber_table
            .select_by_region(&alert.location_title)
            .await?;
        if subscribers.is_empty() {
            debug!("No subscribers for `{}`.", alert.location_title);
            return Ok(());
        }

        let text = message_builder::alert_message(&alert.location_title);
        for subscriber in subscribers.iter().take(self.fanout_cap) {
            // Per-recipient failures are contained by the dispatcher.
            self.dispatcher.send_one(subscriber.user_id, &text).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::MockAlertSource;
    use crate::alert::error::AlertError;
    use crate::notify::MockMessageSender;
    use crate::notify::error::NotifyError;

    fn active(location: &str, uid: Option<&str>) -> ActiveAlert {
        ActiveAlert {
            location_title: location.to_string(),
            location_uid: uid.map(str::to_string),
            started_at: None,
        }
    }

    fn poller(
        source: MockAlertSource,
        db: Arc<Database>,
        sender: MockMessageSender,
        fanout_cap: usize,
    ) -> Arc<AlertPoller> {
        let dispatcher = Arc::new(NotificationDispatcher::new(
            Arc::new(sender),
            Duration::ZERO,
        ));
        AlertPoller::new(
            Arc::new(source),
            db,
            dispatcher,
            Duration::from_secs(240),
            fanout_cap,
        )
    }

    #[tokio::test]
    async fn test_failed_fetch_degrades_cycle_to_noop() {
        let db = Arc::new(Database::open_in_memory().await);
        db.subscriber_table.upsert(1, None, None).await.unwrap();
        db.subscriber_table
            .set_regions(1, &["Сумська область".to_string()])
            .await
            .unwrap();

        let mut source = MockAlertSource::new();
        source
            .expect_fetch_active_alerts()
            .returning(|| Err(AlertError::MissingToken));

        let mut sender = MockMessageSender::new();
        sender.expect_send_message().times(0);

        let poller = poller(source, db, sender, 5);
        // Must return normally with zero dispatches; the next cycle would
        // run on schedule.
        poller.run_cycle().await;
    }

    #[tokio::test]
    async fn test_fanout_capped_per_alert_per_cycle() {
        let db = Arc::new(Database::open_in_memory().await);
        for id in 1..=1000i64 {
            db.subscriber_table.upsert(id, None, None).await.unwrap();
            db.subscriber_table
                .set_regions(id, &["Київська область".to_string()])
                .await
                .unwrap();
        }

        let mut source = MockAlertSource::new();
        source
            .expect_fetch_active_alerts()
            .returning(|| Ok(vec![active("Київська область", Some("9"))]));

        let mut sender = MockMessageSender::new();
        sender
            .expect_send_message()
            .times(5)
            .returning(|_, _| Ok(()));

        let poller = poller(source, db, sender, 5);
        poller.run_cycle().await;
    }

    #[tokio::test]
    async fn test_recipient_failure_does_not_stop_fanout() {
        let db = Arc::new(Database::open_in_memory().await);
        for id in 1..=3i64 {
            db.subscriber_table.upsert(id, None, None).await.unwrap();
            db.subscriber_table
                .set_regions(id, &["Сумська область".to_string()])
                .await
                .unwrap();
        }

        let mut source = MockAlertSource::new();
        source
            .expect_fetch_active_alerts()
            .returning(|| Ok(vec![active("Сумська область", None)]));

        let mut sender = MockMessageSender::new();
        sender
            .expect_send_message()
            .times(3)
            .returning(|chat_id, _| {
                if chat_id == 1 {
                    Err(NotifyError::ApiError {
                        description: "Forbidden".to_string(),
                    })
                } else {
                    Ok(())
                }
            });

        let poller = poller(source, db, sender, 5);
        poller.run_cycle().await;
    }

    #[tokio::test]
    async fn test_cycle_refreshes_region_status_cache() {
        let db = Arc::new(Database::open_in_memory().await);
        db.seed().await.unwrap();

        let mut source = MockAlertSource::new();
        source
            .expect_fetch_active_alerts()
            .returning(|| Ok(vec![active("Київська область", Some("9"))]));

        let mut sender = MockMessageSender::new();
        sender.expect_send_message().times(0);

        let poller = poller(source, db.clone(), sender, 5);
        poller.run_cycle().await;

        let region = db
            .region_table
            .select_by_name("Київська область")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(region.alert_status, "A");
    }

    #[tokio::test]
    async fn test_start_and_shutdown() {
        let db = Arc::new(Database::open_in_memory().await);

        let mut source = MockAlertSource::new();
        // The first tick fires immediately; any number of cycles may run
        // before shutdown lands.
        source
            .expect_fetch_active_alerts()
            .returning(|| Ok(Vec::new()));

        let mut sender = MockMessageSender::new();
        sender.expect_send_message().times(0);

        let poller = poller(source, db, sender, 5);
        poller.clone().start();
        // Second start is a no-op.
        poller.clone().start();
        poller.shutdown().await;
        assert!(!poller.running.load(Ordering::SeqCst));
    }
}
