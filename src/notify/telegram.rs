//! Telegram Bot API transport.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;

use crate::notify::MessageSender;
use crate::notify::error::NotifyError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct TelegramSender {
    client: Client,
    send_url: String,
}

impl TelegramSender {
    pub fn new(bot_token: &str) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create client");

        Self {
            client,
            send_url: format!("https://api.telegram.org/bot{bot_token}/sendMessage"),
        }
    }
}

#[async_trait]
impl MessageSender for TelegramSender {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), NotifyError> {
        debug!("Sending message to chat {chat_id}.");
        let payload = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });

        let response = self.client.post(&self.send_url).json(&payload).send().await?;

        let body = response.text().await?;
        let resp: Value = serde_json::from_str(&body)?;
        if resp.get("ok").and_then(|v| v.as_bool()) != Some(true) {
            let description = resp
                .get("description")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown error")
                .to_string();
            return Err(NotifyError::ApiError { description });
        }
        Ok(())
    }
}
