//! Consumed alert-source interface and the containment matcher.

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::alert::error::AlertError;

pub mod alerts_in_ua;
pub mod error;
pub mod matcher;

/// One currently-active air-raid alert as reported by the external source.
#[derive(Debug, Clone)]
pub struct ActiveAlert {
    /// Free-text location label, as given by the source. Not guaranteed to
    /// equal any catalog region name.
    pub location_title: String,
    /// Stable region identifier on the source, when present.
    pub location_uid: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
}

/// Supplier of the currently active alert set.
///
/// Unavailability (missing credentials, transport error, malformed body) is
/// an expected, recoverable condition; callers skip work and try again on
/// the next cycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlertSource: Send + Sync {
    async fn fetch_active_alerts(&self) -> Result<Vec<ActiveAlert>, AlertError>;
}
