use std::sync::Arc;

use crate::alert::AlertSource;
use crate::database::Database;
use crate::notify::dispatcher::NotificationDispatcher;
use crate::service::broadcast_service::BroadcastService;
use crate::service::subscriber_service::SubscriberService;

pub mod broadcast_service;
pub mod error;
pub mod subscriber_service;

/// The operation surface the command layer and dashboard call into.
pub struct Services {
    pub subscriber: Arc<SubscriberService>,
    pub broadcast: Arc<BroadcastService>,
}

impl Services {
    pub fn new(
        db: Arc<Database>,
        source: Arc<dyn AlertSource>,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            subscriber: Arc::new(SubscriberService::new(db.clone(), source)),
            broadcast: Arc::new(BroadcastService::new(db, dispatcher)),
        }
    }
}
