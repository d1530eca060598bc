//! alerts.in.ua API client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use log::debug;
use reqwest::Client;
use serde_json::Value;

use crate::alert::ActiveAlert;
use crate::alert::AlertSource;
use crate::alert::error::AlertError;

const API_URL: &str = "https://api.alerts.in.ua/v1/alerts/active.json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the alerts.in.ua active-alerts endpoint.
///
/// Only air-raid alerts are surfaced; other alert types the API reports
/// (artillery shelling, street fights) are filtered out.
pub struct AlertsInUaSource {
    client: Client,
    token: Option<String>,
}

impl AlertsInUaSource {
    pub fn new(token: Option<String>) -> Self {
        let client = Client::builder()
            .user_agent("alert-map-bot/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create client");

        Self { client, token }
    }

    fn parse_alerts(&self, body: &str) -> Result<Vec<ActiveAlert>, AlertError> {
        let resp: Value = serde_json::from_str(body)?;

        let alerts = resp
            .get("alerts")
            .and_then(|v| v.as_array())
            .ok_or_else(|| AlertError::MissingField {
                field: "alerts".to_string(),
            })?;

        let mut ret = Vec::new();
        for entry in alerts {
            if entry.get("alert_type").and_then(|v| v.as_str()) != Some("air_raid") {
                continue;
            }
            let location_title = entry
                .get("location_title")
                .and_then(|v| v.as_str())
                .ok_or_else(|| AlertError::MissingField {
                    field: "location_title".to_string(),
                })?
                .to_string();

            // The API has reported uids both as strings and as numbers.
            let location_uid = match entry.get("location_uid") {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            };

            let started_at = entry
                .get("started_at")
                .and_then(|v| v.as_str())
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&Utc));

            ret.push(ActiveAlert {
                location_title,
                location_uid,
                started_at,
            });
        }
        Ok(ret)
    }
}

#[async_trait]
impl AlertSource for AlertsInUaSource {
    async fn fetch_active_alerts(&self) -> Result<Vec<ActiveAlert>, AlertError> {
        let token = self.token.as_ref().ok_or(AlertError::MissingToken)?;

        debug!("Fetching active alerts.");
        let response = self
            .client
            .get(API_URL)
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AlertError::ApiError {
                message: format!("Unexpected status {status}"),
            });
        }

        let body = response.text().await?;
        self.parse_alerts(&body)
    }
}
