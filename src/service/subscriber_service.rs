//! Subscriber-facing operations: registration, region selection, roles,
//! preferences and on-demand alert status.

use std::sync::Arc;

use log::info;
use log::warn;

use crate::alert::AlertSource;
use crate::alert::matcher;
use crate::database::Database;
use crate::database::model::Role;
use crate::database::model::ShelterModel;
use crate::database::model::SubscriberModel;
use crate::notify::message_builder;
use crate::service::error::ServiceError;

pub struct SubscriberService {
    db: Arc<Database>,
    source: Arc<dyn AlertSource>,
}

impl SubscriberService {
    pub fn new(db: Arc<Database>, source: Arc<dyn AlertSource>) -> Self {
        Self { db, source }
    }

    /// Registers a contact, creating the subscriber on first sight and
    /// refreshing `last_seen` (and any newly supplied display fields) after.
    ///
    /// # Performance
    /// * DB calls: 2
    pub async fn register_contact(
        &self,
        user_id: i64,
        username: Option<&str>,
        full_name: Option<&str>,
    ) -> Result<SubscriberModel, ServiceError> {
        Ok(self
            .db
            .subscriber_table
            .upsert(user_id, username, full_name)
            .await?)
    }

    /// Adds one region to the subscriber's set, if not already present.
    /// The region must exist in the canonical catalog.
    ///
    /// Returns the resulting region list.
    ///
    /// # Performance
    /// * DB calls: 3 + 1?
    pub async fn add_region(
        &self,
        user_id: i64,
        region: &str,
    ) -> Result<Vec<String>, ServiceError> {
        self.require_subscriber(user_id).await?;
        self.require_catalog_region(region).await?;

        let mut regions = self.db.subscriber_table.get_regions(user_id).await?;
        if !regions.iter().any(|r| r == region) {
            regions.push(region.to_string());
            self.db
                .subscriber_table
                .set_regions(user_id, &regions)
                .await?;
            info!("Subscriber {user_id} now watches {} regions.", regions.len());
        }
        Ok(regions)
    }

    /// Full replace of the subscriber's region set. Every name must exist in
    /// the canonical catalog; an empty set clears all subscriptions.
    ///
    /// # Performance
    /// * DB calls: 2 + N
    pub async fn set_regions(
        &self,
        user_id: i64,
        regions: &[String],
    ) -> Result<(), ServiceError> {
        self.require_subscriber(user_id).await?;
        for region in regions {
            self.require_catalog_region(region).await?;
        }
        self.db.subscriber_table.set_regions(user_id, regions).await?;
        Ok(())
    }

    /// # Performance
    /// * DB calls: 2
    pub async fn clear_regions(&self, user_id: i64) -> Result<(), ServiceError> {
        self.require_subscriber(user_id).await?;
        self.db.subscriber_table.set_regions(user_id, &[]).await?;
        Ok(())
    }

    /// # Performance
    /// * DB calls: 1
    pub async fn regions(&self, user_id: i64) -> Result<Vec<String>, ServiceError> {
        Ok(self.db.subscriber_table.get_regions(user_id).await?)
    }

    /// # Performance
    /// * DB calls: 2
    pub async fn set_notifications_enabled(
        &self,
        user_id: i64,
        enabled: bool,
    ) -> Result<(), ServiceError> {
        self.require_subscriber(user_id).await?;
        self.db
            .subscriber_table
            .set_notifications_enabled(user_id, enabled)
            .await?;
        Ok(())
    }

    /// Promotes a subscriber to moderator. The acting subscriber must hold
    /// the moderator or admin role.
    ///
    /// Monotonic: a target that is already moderator or admin keeps its
    /// current role.
    ///
    /// # Performance
    /// * DB calls: 2 + 1?
    pub async fn promote_to_moderator(
        &self,
        actor_id: i64,
        target_id: i64,
    ) -> Result<Role, ServiceError> {
        let actor = self
            .db
            .subscriber_table
            .select(actor_id)
            .await?
            .ok_or(ServiceError::PermissionDenied { actor: actor_id })?;
        if !actor.role.can_moderate() {
            return Err(ServiceError::PermissionDenied { actor: actor_id });
        }

        let target = self
            .db
            .subscriber_table
            .select(target_id)
            .await?
            .ok_or(ServiceError::SubscriberNotFound { user_id: target_id })?;
        if target.role.can_moderate() {
            return Ok(target.role);
        }

        self.db
            .subscriber_table
            .set_role(target_id, Role::Moderator)
            .await?;
        info!("Subscriber {target_id} promoted to moderator by {actor_id}.");
        Ok(Role::Moderator)
    }

    /// # Performance
    /// * DB calls: 1
    pub async fn profile(&self, user_id: i64) -> Result<Option<SubscriberModel>, ServiceError> {
        Ok(self.db.subscriber_table.select(user_id).await?)
    }

    /// # Performance
    /// * DB calls: 1
    pub async fn subscriber_count(&self) -> Result<i64, ServiceError> {
        Ok(self.db.subscriber_table.count().await?)
    }

    /// All subscribers, most recently seen first.
    ///
    /// # Performance
    /// * DB calls: 1
    pub async fn list_subscribers(&self) -> Result<Vec<SubscriberModel>, ServiceError> {
        Ok(self.db.subscriber_table.select_all().await?)
    }

    /// On-demand alert status for the subscriber's regions (all regions when
    /// none are chosen). A failing alert source yields an explicit
    /// "data unavailable" text, never an error or silence.
    ///
    /// # Performance
    /// * DB calls: 1
    /// * API calls: 1
    pub async fn alert_status(&self, user_id: i64) -> Result<String, ServiceError> {
        let regions = self.db.subscriber_table.get_regions(user_id).await?;

        match self.source.fetch_active_alerts().await {
            Ok(alerts) => {
                let relevant = matcher::relevant_alerts(&alerts, &regions);
                Ok(message_builder::status_message(&relevant, &regions))
            }
            Err(e) => {
                warn!("Could not fetch active alerts: {e}");
                Ok(message_builder::status_unavailable())
            }
        }
    }

    /// Shelter lookup in a region. Shares the store; rendering is the
    /// caller's concern.
    ///
    /// # Performance
    /// * DB calls: 1
    pub async fn shelters_in_region(
        &self,
        region: &str,
    ) -> Result<Vec<ShelterModel>, ServiceError> {
        Ok(self.db.shelter_table.select_by_region(region).await?)
    }

    async fn require_subscriber(&self, user_id: i64) -> Result<SubscriberModel, ServiceError> {
        self.db
            .subscriber_table
            .select(user_id)
            .await?
            .ok_or(ServiceError::SubscriberNotFound { user_id })
    }

    async fn require_catalog_region(&self, region: &str) -> Result<(), ServiceError> {
        if self.db.region_table.select_by_name(region).await?.is_none() {
            return Err(ServiceError::UnknownRegion {
                name: region.to_string(),
            });
        }
        Ok(())
    }
}
