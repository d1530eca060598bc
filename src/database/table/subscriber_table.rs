use sqlx::SqlitePool;

use super::TableBase;
use crate::database::error::DatabaseError;
use crate::database::model::Role;
use crate::database::model::SubscriberModel;
use crate::database::model::join_regions;
use crate::database::model::split_regions;

const COLUMNS: &str =
    "user_id, username, full_name, regions, role, notifications_enabled, first_seen, last_seen";

pub struct SubscriberTable {
    base: TableBase,
}

impl SubscriberTable {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            base: TableBase::new(pool),
        }
    }

    /// Creates the subscriber on first sight with defaults; on an existing id
    /// refreshes `last_seen` and replaces `username`/`full_name` only when a
    /// non-empty value is supplied.
    pub async fn upsert(
        &self,
        user_id: i64,
        username: Option<&str>,
        full_name: Option<&str>,
    ) -> Result<SubscriberModel, DatabaseError> {
        // Empty strings carry no information, treat them as absent.
        let username = username.filter(|v| !v.is_empty());
        let full_name = full_name.filter(|v| !v.is_empty());

        sqlx::query(
            r#"
            INSERT INTO subscribers (user_id, username, full_name, last_seen)
            VALUES (?, ?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(user_id) DO UPDATE SET
                username = COALESCE(excluded.username, username),
                full_name = COALESCE(excluded.full_name, full_name),
                last_seen = CURRENT_TIMESTAMP
            "#,
        )
        .bind(user_id)
        .bind(username)
        .bind(full_name)
        .execute(&self.base.pool)
        .await?;

        self.select(user_id)
            .await?
            .ok_or_else(|| DatabaseError::InternalError {
                message: format!("Subscriber {user_id} missing right after upsert"),
            })
    }

    pub async fn select(&self, user_id: i64) -> Result<Option<SubscriberModel>, DatabaseError> {
        let model = sqlx::query_as::<_, SubscriberModel>(&format!(
            "SELECT {COLUMNS} FROM subscribers WHERE user_id = ?"
        ))
        .bind(user_id)
        .fetch_optional(&self.base.pool)
        .await?;
        Ok(model)
    }

    /// Full replace of the region set. An empty slice clears all subscriptions.
    pub async fn set_regions(
        &self,
        user_id: i64,
        regions: &[String],
    ) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE subscribers SET regions = ? WHERE user_id = ?")
            .bind(join_regions(regions))
            .bind(user_id)
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }

    /// Returns an empty list when the subscriber is absent or has no regions.
    pub async fn get_regions(&self, user_id: i64) -> Result<Vec<String>, DatabaseError> {
        let raw: Option<(String,)> =
            sqlx::query_as("SELECT regions FROM subscribers WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.base.pool)
                .await?;
        Ok(raw.map(|(r,)| split_regions(&r)).unwrap_or_default())
    }

    /// Unconditional overwrite. Legal transitions are the caller's concern.
    pub async fn set_role(&self, user_id: i64, role: Role) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE subscribers SET role = ? WHERE user_id = ?")
            .bind(role)
            .bind(user_id)
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }

    pub async fn set_notifications_enabled(
        &self,
        user_id: i64,
        enabled: bool,
    ) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE subscribers SET notifications_enabled = ? WHERE user_id = ?")
            .bind(enabled)
            .bind(user_id)
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }

    pub async fn select_all(&self) -> Result<Vec<SubscriberModel>, DatabaseError> {
        let ret = sqlx::query_as::<_, SubscriberModel>(&format!(
            "SELECT {COLUMNS} FROM subscribers ORDER BY last_seen DESC"
        ))
        .fetch_all(&self.base.pool)
        .await?;
        Ok(ret)
    }

    pub async fn count(&self) -> Result<i64, DatabaseError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM subscribers")
            .fetch_one(&self.base.pool)
            .await?;
        Ok(count)
    }

    /// Containment match against the stored delimited region field.
    ///
    /// Matches only when `region` appears as a literal substring of the
    /// subscriber's serialized region list; region names that are substrings
    /// of other region names over-match, and alert labels that differ
    /// textually from catalog names under-match.
    pub async fn select_by_region(
        &self,
        region: &str,
    ) -> Result<Vec<SubscriberModel>, DatabaseError> {
        let ret = sqlx::query_as::<_, SubscriberModel>(&format!(
            "SELECT {COLUMNS} FROM subscribers WHERE regions LIKE ?"
        ))
        .bind(format!("%{region}%"))
        .fetch_all(&self.base.pool)
        .await?;
        Ok(ret)
    }
}
