use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

/// Subscriber role. Upgrades are monotonic: no code path downgrades a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    User,
    Moderator,
    Admin,
}

impl Role {
    pub fn can_moderate(self) -> bool {
        matches!(self, Role::Moderator | Role::Admin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }
}

#[derive(FromRow, Debug, Clone, Serialize)]
pub struct SubscriberModel {
    /// Telegram user id, assigned by the platform.
    pub user_id: i64,
    pub username: Option<String>,
    pub full_name: Option<String>,
    /// Comma-delimited region names. See [`split_regions`].
    pub regions: String,
    pub role: Role,
    pub notifications_enabled: bool,
    pub first_seen: NaiveDateTime,
    pub last_seen: NaiveDateTime,
}

impl SubscriberModel {
    pub fn region_list(&self) -> Vec<String> {
        split_regions(&self.regions)
    }
}

/// Parses the denormalized delimited region field into a list.
pub fn split_regions(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Serializes a region list back into the delimited storage form.
pub fn join_regions(regions: &[String]) -> String {
    regions.join(",")
}

#[derive(FromRow, Debug, Clone, Serialize)]
pub struct RegionModel {
    pub id: i64,
    /// Canonical human-readable name, the key used for matching.
    pub name: String,
    /// Stable identifier on the external alert source.
    pub uid: Option<String>,
    /// Advisory cache only. The authoritative state is re-fetched per poll.
    pub alert_status: String,
    pub last_updated: Option<NaiveDateTime>,
}

#[derive(FromRow, Debug, Clone, Serialize)]
pub struct ShelterModel {
    pub id: i64,
    pub region: String,
    pub city: String,
    pub address: String,
    pub shelter_type: String,
    pub capacity: i64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub description: Option<String>,
}

#[derive(FromRow, Debug, Clone, Serialize)]
pub struct BroadcastModel {
    pub id: i64,
    pub message: String,
    pub sent_by: String,
    /// Achieved delivery count, never the attempted count.
    pub recipients_count: i64,
    pub sent_at: NaiveDateTime,
}
