//! Channel announcement formatting.
//!
//! Turns a queued recommendation plus its post number into the HTML body
//! that is sent to the group chat. Only the `<b>`, `<i>` and `<a>` tags are
//! emitted, and every user-supplied value is escaped so the channel's HTML
//! parser never rejects a message because of a stray `<` or `&`.

use crate::types::PostNumber;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Name of the running series shown in every announcement header.
pub const SERIES_NAME: &str = "Indie Fantrax";

/// Fallback shown when the resolver did not return an album title.
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Fallback shown when the resolver did not return an artist name.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Label introducing the platform link bullets.
pub const LISTEN_LABEL: &str = "🔗 Listen:";

/// Bullet prefix for each platform link line.
pub const LINK_BULLET: &str = "• ";

// ---------------------------------------------------------------------------
// Announcement
// ---------------------------------------------------------------------------

/// Borrowed view of everything an announcement needs.
///
/// Kept independent of the database row type so formatting stays a pure
/// function of its inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Announcement<'a> {
    pub submitter_name: &'a str,
    pub context: &'a str,
    pub album_title: Option<&'a str>,
    pub artist_name: Option<&'a str>,
    pub spotify_url: Option<&'a str>,
    pub apple_music_url: Option<&'a str>,
    pub aggregator_url: Option<&'a str>,
}

impl<'a> Announcement<'a> {
    /// Platform links in their fixed display order, skipping absent ones.
    pub fn links(&self) -> Vec<(&'static str, &'a str)> {
        [
            ("Spotify", self.spotify_url),
            ("Apple Music", self.apple_music_url),
            ("Other platforms", self.aggregator_url),
        ]
        .into_iter()
        .filter_map(|(label, url)| present(url).map(|u| (label, u)))
        .collect()
    }
}

/// Build the announcement body for `post_number` in the `series` run.
///
/// ```
/// use fantrax_core::announcement::{format_announcement, Announcement};
///
/// let body = format_announcement(
///     "Indie Fantrax",
///     3,
///     &Announcement {
///         submitter_name: "Sam",
///         context: "Late-night listen",
///         ..Default::default()
///     },
/// );
/// assert!(body.starts_with("🎶 <b>Indie Fantrax #3</b>\n"));
/// assert!(body.contains("<b>Unknown Album</b>"));
/// assert!(body.ends_with("🔗 Listen:"));
/// ```
pub fn format_announcement(
    series: &str,
    post_number: PostNumber,
    announcement: &Announcement<'_>,
) -> String {
    let album = present(announcement.album_title).unwrap_or(UNKNOWN_ALBUM);
    let artist = present(announcement.artist_name).unwrap_or(UNKNOWN_ARTIST);

    let mut lines = vec![
        format!("🎶 <b>{} #{post_number}</b>", text(series)),
        format!("🎵 <b>{}</b>", text(album)),
        format!("👤 {}", text(artist)),
        String::new(),
        format!(
            "📝 Recommended by <b>{}</b>:",
            text(announcement.submitter_name)
        ),
        format!("<i>{}</i>", text(announcement.context)),
        String::new(),
        LISTEN_LABEL.to_string(),
    ];

    for (label, url) in announcement.links() {
        lines.push(format!(
            "{LINK_BULLET}<a href=\"{}\">{label}</a>",
            html_escape::encode_double_quoted_attribute(url)
        ));
    }

    lines.join("\n")
}

/// Treat empty and whitespace-only values the same as missing ones.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn text(value: &str) -> std::borrow::Cow<'_, str> {
    html_escape::encode_text(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> Announcement<'static> {
        Announcement {
            submitter_name: "Alex",
            context: "Perfect for rainy mornings",
            album_title: Some("Blue Rev"),
            artist_name: Some("Alvvays"),
            spotify_url: Some("https://open.spotify.com/album/1"),
            apple_music_url: Some("https://music.apple.com/album/2"),
            aggregator_url: Some("https://album.link/3"),
        }
    }

    fn bullet_lines(body: &str) -> Vec<&str> {
        body.lines()
            .skip_while(|l| *l != LISTEN_LABEL)
            .skip(1)
            .collect()
    }

    #[test]
    fn full_message_layout() {
        let body = format_announcement(SERIES_NAME, 12, &full());
        let expected = "\
🎶 <b>Indie Fantrax #12</b>
🎵 <b>Blue Rev</b>
👤 Alvvays

📝 Recommended by <b>Alex</b>:
<i>Perfect for rainy mornings</i>

🔗 Listen:
• <a href=\"https://open.spotify.com/album/1\">Spotify</a>
• <a href=\"https://music.apple.com/album/2\">Apple Music</a>
• <a href=\"https://album.link/3\">Other platforms</a>";
        assert_eq!(body, expected);
    }

    #[test]
    fn missing_metadata_uses_fallbacks() {
        let body = format_announcement(
            SERIES_NAME,
            1,
            &Announcement {
                album_title: None,
                artist_name: None,
                ..full()
            },
        );
        assert!(body.contains("🎵 <b>Unknown Album</b>"));
        assert!(body.contains("👤 Unknown Artist"));
    }

    #[test]
    fn blank_metadata_counts_as_missing() {
        let body = format_announcement(
            SERIES_NAME,
            1,
            &Announcement {
                album_title: Some("  "),
                artist_name: Some(""),
                ..full()
            },
        );
        assert!(body.contains(UNKNOWN_ALBUM));
        assert!(body.contains(UNKNOWN_ARTIST));
    }

    #[test]
    fn no_links_means_no_bullets() {
        let body = format_announcement(
            SERIES_NAME,
            4,
            &Announcement {
                spotify_url: None,
                apple_music_url: None,
                aggregator_url: None,
                ..full()
            },
        );
        assert!(body.ends_with(LISTEN_LABEL));
        assert!(bullet_lines(&body).is_empty());
    }

    #[test]
    fn one_bullet_per_present_link_in_fixed_order() {
        let body = format_announcement(
            SERIES_NAME,
            4,
            &Announcement {
                apple_music_url: None,
                ..full()
            },
        );
        let bullets = bullet_lines(&body);
        assert_eq!(bullets.len(), 2);
        assert!(bullets[0].ends_with(">Spotify</a>"));
        assert!(bullets[1].ends_with(">Other platforms</a>"));
    }

    #[test]
    fn only_aggregator_link() {
        let body = format_announcement(
            SERIES_NAME,
            4,
            &Announcement {
                spotify_url: None,
                apple_music_url: None,
                ..full()
            },
        );
        assert_eq!(
            bullet_lines(&body),
            vec!["• <a href=\"https://album.link/3\">Other platforms</a>"]
        );
    }

    #[test]
    fn user_text_is_escaped() {
        let body = format_announcement(
            SERIES_NAME,
            2,
            &Announcement {
                submitter_name: "<script>",
                context: "Tom & Jerry <3",
                album_title: Some("A<B>"),
                ..full()
            },
        );
        assert!(body.contains("<b>&lt;script&gt;</b>"));
        assert!(body.contains("<i>Tom &amp; Jerry &lt;3</i>"));
        assert!(body.contains("<b>A&lt;B&gt;</b>"));
    }

    #[test]
    fn link_attribute_quotes_are_escaped() {
        let body = format_announcement(
            SERIES_NAME,
            2,
            &Announcement {
                spotify_url: Some("https://x.test/\"onclick"),
                apple_music_url: None,
                aggregator_url: None,
                ..full()
            },
        );
        assert!(body.contains("href=\"https://x.test/&quot;onclick\""));
    }

    #[test]
    fn links_helper_skips_blank_urls() {
        let a = Announcement {
            spotify_url: Some(""),
            ..full()
        };
        let labels: Vec<_> = a.links().into_iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Apple Music", "Other platforms"]);
    }
}
