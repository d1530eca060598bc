use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

/// Runtime configuration, read from the environment once at startup.
#[derive(Clone)]
pub struct Config {
    /// Seconds between alert poll cycles.
    pub poll_interval: Duration,
    /// Fixed delay inserted between consecutive outbound sends.
    pub send_delay: Duration,
    /// Maximum subscribers notified per alert per poll cycle.
    pub fanout_cap: usize,
    pub db_url: String,
    pub db_path: String,
    pub logs_path: PathBuf,
    /// Telegram bot token. Mandatory.
    pub bot_token: String,
    /// alerts.in.ua API token. Absence is valid: poll cycles degrade to no-ops.
    pub alerts_api_token: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        Ok(Self {
            poll_interval: Duration::from_secs(env_parse("POLL_INTERVAL", 240)),
            send_delay: Duration::from_millis(env_parse("SEND_DELAY_MS", 50)),
            fanout_cap: env_parse("FANOUT_CAP", 5) as usize,
            db_url: std::env::var("DB_URL").unwrap_or("sqlite://data.db".to_string()),
            db_path: std::env::var("DB_PATH").unwrap_or("data.db".to_string()),
            logs_path: std::env::var("LOGS_PATH")
                .unwrap_or("logs".to_string())
                .into(),
            bot_token: std::env::var("BOT_TOKEN").map_err(|_| AppError::MissingConfig {
                key: "BOT_TOKEN".to_string(),
            })?,
            alerts_api_token: std::env::var("ALERTS_API_TOKEN")
                .ok()
                .filter(|v| !v.is_empty()),
        })
    }
}

fn env_parse(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}
