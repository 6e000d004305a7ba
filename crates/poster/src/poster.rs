//! The posting state machine.
//!
//! One call to [`Poster::post_next`] walks `Selecting -> Formatting ->
//! Delivering -> Committing`. Any failure aborts the cycle and leaves the
//! recommendation in the queue; the caller always gets a [`PostOutcome`]
//! back, never an error.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use fantrax_core::announcement::{format_announcement, SERIES_NAME};
use fantrax_core::clock::{Clock, SystemClock};
use fantrax_core::types::{DbId, PostNumber};
use fantrax_db::models::recommendation::Recommendation;
use fantrax_telegram::{fits_caption, DeliveryChannel, MessageId, TelegramError};
use tokio::sync::Mutex;

use crate::store::{PostingStore, StoreError};

/// Default upper bound on sending the announcement.
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// Result of one posting attempt.
#[derive(Debug)]
pub enum PostOutcome {
    Posted {
        recommendation_id: DbId,
        post_number: PostNumber,
        message_id: MessageId,
    },
    Skipped(SkipReason),
    Failed(PostError),
}

/// Why an attempt ended without doing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No bot token or chat configured.
    ChannelUnconfigured,
    Paused,
    QueueEmpty,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ChannelUnconfigured => "channel_unconfigured",
            Self::Paused => "paused",
            Self::QueueEmpty => "queue_empty",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store reads that happen before anything is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostStage {
    CheckPause,
    Select,
    Number,
}

impl fmt::Display for PostStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CheckPause => "checking the pause flag",
            Self::Select => "selecting a recommendation",
            Self::Number => "reading the last post number",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("store error while {stage}: {source}")]
    Store {
        stage: PostStage,
        #[source]
        source: StoreError,
    },

    #[error("delivery failed: {0}")]
    Delivery(#[source] TelegramError),

    #[error("delivery timed out after {0:?}")]
    DeliveryTimeout(Duration),

    /// The announcement went out but the row could not be marked posted.
    /// The message stays in the chat and the recommendation stays queued.
    #[error("message {message_id} was delivered but the post was not recorded: {source}")]
    CommitAfterDelivery {
        message_id: MessageId,
        #[source]
        source: StoreError,
    },
}

impl PostError {
    fn store(stage: PostStage) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { stage, source }
    }
}

// ---------------------------------------------------------------------------
// Poster
// ---------------------------------------------------------------------------

/// Publishes one queued recommendation per call.
///
/// Calls are serialized: the scheduler and the manual trigger can race
/// freely and every call still sees the previous call's commit.
pub struct Poster {
    store: Arc<dyn PostingStore>,
    channel: Option<Arc<dyn DeliveryChannel>>,
    clock: Arc<dyn Clock>,
    series: String,
    delivery_timeout: Duration,
    cycle: Mutex<()>,
}

impl Poster {
    /// `channel` is `None` when delivery credentials are not configured;
    /// every call then skips.
    pub fn new(store: Arc<dyn PostingStore>, channel: Option<Arc<dyn DeliveryChannel>>) -> Self {
        Self {
            store,
            channel,
            clock: Arc::new(SystemClock),
            series: SERIES_NAME.to_string(),
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
            cycle: Mutex::new(()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_delivery_timeout(mut self, timeout: Duration) -> Self {
        self.delivery_timeout = timeout;
        self
    }

    pub fn with_series(mut self, series: impl Into<String>) -> Self {
        self.series = series.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.channel.is_some()
    }

    /// Run one posting cycle.
    pub async fn post_next(&self) -> PostOutcome {
        let Some(channel) = self.channel.as_deref() else {
            tracing::warn!("Delivery channel not configured, skipping post");
            return PostOutcome::Skipped(SkipReason::ChannelUnconfigured);
        };

        let _cycle = self.cycle.lock().await;

        match self.run_cycle(channel).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Posting attempt aborted");
                PostOutcome::Failed(e)
            }
        }
    }

    async fn run_cycle(&self, channel: &dyn DeliveryChannel) -> Result<PostOutcome, PostError> {
        if self
            .store
            .is_paused()
            .await
            .map_err(PostError::store(PostStage::CheckPause))?
        {
            tracing::info!("Posting is paused, skipping post");
            return Ok(PostOutcome::Skipped(SkipReason::Paused));
        }

        // Selecting
        let Some(rec) = self
            .store
            .pick_random_unposted()
            .await
            .map_err(PostError::store(PostStage::Select))?
        else {
            tracing::info!("No pending recommendations to post");
            return Ok(PostOutcome::Skipped(SkipReason::QueueEmpty));
        };

        let post_number = self
            .store
            .max_post_number()
            .await
            .map_err(PostError::store(PostStage::Number))?
            + 1;

        // Formatting
        let body = format_announcement(&self.series, post_number, &rec.as_announcement());

        // Delivering
        let message_id = self.deliver(channel, &rec, &body).await?;

        if let Err(e) = channel.pin(message_id).await {
            tracing::warn!(message_id, error = %e, "Failed to pin announcement");
        }

        // Committing
        let posted_at = self.clock.now();
        if let Err(source) = self.store.mark_posted(rec.id, post_number, posted_at).await {
            tracing::error!(
                recommendation_id = rec.id,
                post_number,
                message_id,
                error = %source,
                "Announcement delivered but not recorded; it may be posted again"
            );
            return Err(PostError::CommitAfterDelivery { message_id, source });
        }

        tracing::info!(
            recommendation_id = rec.id,
            post_number,
            message_id,
            album_title = rec.album_title.as_deref().unwrap_or(""),
            artist_name = rec.artist_name.as_deref().unwrap_or(""),
            "Posted recommendation"
        );

        Ok(PostOutcome::Posted {
            recommendation_id: rec.id,
            post_number,
            message_id,
        })
    }

    /// Send the announcement, as a photo caption when there is album art
    /// and the body fits in a caption, otherwise as a text message.
    async fn deliver(
        &self,
        channel: &dyn DeliveryChannel,
        rec: &Recommendation,
        body: &str,
    ) -> Result<MessageId, PostError> {
        let send = async {
            match rec.image_url() {
                Some(image) if fits_caption(body) => {
                    channel.send_image(image, body).await
                }
                _ => channel.send_text(body).await,
            }
        };

        match tokio::time::timeout(self.delivery_timeout, send).await {
            Ok(Ok(message_id)) => Ok(message_id),
            Ok(Err(e)) => Err(PostError::Delivery(e)),
            Err(_) => Err(PostError::DeliveryTimeout(self.delivery_timeout)),
        }
    }
}
