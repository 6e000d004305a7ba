//! Delivery of announcements to the group chat.
//!
//! [`DeliveryChannel`] is the port the poster talks to; [`TelegramBot`] is
//! the Bot API implementation bound to one chat.

use async_trait::async_trait;

pub mod bot;

pub use bot::TelegramBot;

/// Identifier of a message inside the chat it was sent to.
pub type MessageId = i64;

/// Longest caption the Bot API accepts on a photo.
pub const CAPTION_LIMIT: usize = 1024;

/// Length of an HTML body as the Bot API counts it: tags removed, entities
/// decoded, measured in UTF-16 code units.
pub fn entity_text_len(html: &str) -> usize {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    html_escape::decode_html_entities(&text)
        .encode_utf16()
        .count()
}

/// Whether `html` can be sent as a photo caption.
pub fn fits_caption(html: &str) -> bool {
    entity_text_len(html) <= CAPTION_LIMIT
}

#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    /// Network, DNS, TLS or timeout failure. The URL (which embeds the bot
    /// token) is stripped before the error is stored.
    #[error("request failed: {0}")]
    Request(reqwest::Error),

    /// The Bot API answered with `ok: false` or a non-2xx status.
    #[error("Telegram API error ({status}): {description}")]
    Api { status: u16, description: String },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for TelegramError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.without_url())
    }
}

/// A chat the poster can publish HTML messages to.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Send an HTML text message.
    async fn send_text(&self, html: &str) -> Result<MessageId, TelegramError>;

    /// Send an image by URL with an HTML caption.
    async fn send_image(&self, image_url: &str, caption_html: &str)
        -> Result<MessageId, TelegramError>;

    /// Pin a message without notifying chat members.
    async fn pin(&self, message_id: MessageId) -> Result<(), TelegramError>;
}
