//! Recommendation rows and the DTOs used to create and list them.

use fantrax_core::announcement::Announcement;
use fantrax_core::types::{DbId, PostNumber, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `recommendations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Recommendation {
    pub id: DbId,
    pub submitter_name: String,
    pub album_title: Option<String>,
    pub artist_name: Option<String>,
    pub context: String,
    pub spotify_url: Option<String>,
    pub apple_music_url: Option<String>,
    pub songlink_url: Option<String>,
    pub album_art_url: Option<String>,
    pub submitted_at: Timestamp,
    pub is_posted: bool,
    pub posted_at: Option<Timestamp>,
    pub post_number: Option<PostNumber>,
}

impl Recommendation {
    /// Borrow the fields the channel message is built from.
    pub fn as_announcement(&self) -> Announcement<'_> {
        Announcement {
            submitter_name: &self.submitter_name,
            context: &self.context,
            album_title: self.album_title.as_deref(),
            artist_name: self.artist_name.as_deref(),
            spotify_url: self.spotify_url.as_deref(),
            apple_music_url: self.apple_music_url.as_deref(),
            aggregator_url: self.songlink_url.as_deref(),
        }
    }

    /// Image to attach to the post, if the resolver found one.
    pub fn image_url(&self) -> Option<&str> {
        self.album_art_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }
}

/// DTO for inserting a validated, resolved submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateRecommendation {
    pub submitter_name: String,
    pub album_title: Option<String>,
    pub artist_name: Option<String>,
    pub context: String,
    pub spotify_url: Option<String>,
    pub apple_music_url: Option<String>,
    pub songlink_url: Option<String>,
    pub album_art_url: Option<String>,
}

/// Queue entry shown on the public submission page.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QueuedRecommendation {
    pub id: DbId,
    pub submitter_name: String,
    pub album_title: Option<String>,
    pub artist_name: Option<String>,
    pub submitted_at: Timestamp,
}

/// History entry shown on the admin page.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostedRecommendation {
    pub id: DbId,
    pub post_number: PostNumber,
    pub submitter_name: String,
    pub album_title: Option<String>,
    pub artist_name: Option<String>,
    pub spotify_url: Option<String>,
    pub apple_music_url: Option<String>,
    pub songlink_url: Option<String>,
    pub posted_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row() -> Recommendation {
        Recommendation {
            id: 7,
            submitter_name: "Alex".into(),
            album_title: Some("Blue Rev".into()),
            artist_name: None,
            context: "rainy mornings".into(),
            spotify_url: Some("https://open.spotify.com/album/1".into()),
            apple_music_url: None,
            songlink_url: Some("https://album.link/1".into()),
            album_art_url: Some("  ".into()),
            submitted_at: Utc::now(),
            is_posted: false,
            posted_at: None,
            post_number: None,
        }
    }

    #[test]
    fn announcement_borrows_row_fields() {
        let rec = row();
        let a = rec.as_announcement();
        assert_eq!(a.submitter_name, "Alex");
        assert_eq!(a.album_title, Some("Blue Rev"));
        assert_eq!(a.artist_name, None);
        assert_eq!(a.aggregator_url, Some("https://album.link/1"));
    }

    #[test]
    fn blank_album_art_is_no_image() {
        assert_eq!(row().image_url(), None);

        let mut rec = row();
        rec.album_art_url = Some("https://img.test/a.jpg".into());
        assert_eq!(rec.image_url(), Some("https://img.test/a.jpg"));
    }
}
