//! Telegram Bot API client.
//!
//! Calls `sendMessage`, `sendPhoto` and `pinChatMessage` on
//! `{base}/bot{token}/{method}`, always with `parse_mode = HTML`.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::{DeliveryChannel, MessageId, TelegramError};

/// Public Bot API root.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Bot bound to a single chat.
#[derive(Clone)]
pub struct TelegramBot {
    client: reqwest::Client,
    api_url: String,
    token: String,
    chat_id: String,
}

impl std::fmt::Debug for TelegramBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramBot")
            .field("api_url", &self.api_url)
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

/// Envelope every Bot API method answers with.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: MessageId,
}

impl TelegramBot {
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Result<Self, TelegramError> {
        Self::with_base_url(DEFAULT_API_URL, token, chat_id)
    }

    /// Bot against another API root (a local fake in tests).
    pub fn with_base_url(
        api_url: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Result<Self, TelegramError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            chat_id: chat_id.into(),
        })
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> Result<T, TelegramError> {
        let response = self
            .client
            .post(format!("{}/bot{}/{method}", self.api_url, self.token))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        // Error answers still carry the JSON envelope; fall back to the raw
        // text when they do not.
        let parsed = serde_json::from_slice::<ApiResponse<T>>(&bytes);
        match parsed {
            Ok(ApiResponse {
                ok: true,
                result: Some(result),
                ..
            }) if status.is_success() => Ok(result),
            Ok(envelope) => Err(TelegramError::Api {
                status: status.as_u16(),
                description: envelope
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            }),
            Err(_) if !status.is_success() => Err(TelegramError::Api {
                status: status.as_u16(),
                description: String::from_utf8_lossy(&bytes).into_owned(),
            }),
            Err(e) => Err(TelegramError::Decode(e)),
        }
    }
}

#[async_trait]
impl DeliveryChannel for TelegramBot {
    async fn send_text(&self, html: &str) -> Result<MessageId, TelegramError> {
        let body = json!({
            "chat_id": self.chat_id,
            "text": html,
            "parse_mode": "HTML",
        });
        let sent: SentMessage = self.call("sendMessage", body).await?;
        tracing::debug!(message_id = sent.message_id, "Sent text message");
        Ok(sent.message_id)
    }

    async fn send_image(
        &self,
        image_url: &str,
        caption_html: &str,
    ) -> Result<MessageId, TelegramError> {
        let body = json!({
            "chat_id": self.chat_id,
            "photo": image_url,
            "caption": caption_html,
            "parse_mode": "HTML",
        });
        let sent: SentMessage = self.call("sendPhoto", body).await?;
        tracing::debug!(message_id = sent.message_id, "Sent photo message");
        Ok(sent.message_id)
    }

    async fn pin(&self, message_id: MessageId) -> Result<(), TelegramError> {
        let body = json!({
            "chat_id": self.chat_id,
            "message_id": message_id,
            "disable_notification": true,
        });
        let _: bool = self.call("pinChatMessage", body).await?;
        Ok(())
    }
}
