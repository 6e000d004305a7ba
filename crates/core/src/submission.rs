//! Validation of submitted recommendations.
//!
//! Submitters send a name, one Spotify or Apple Music album URL and a short
//! free-text context. Everything is trimmed before it is checked; the
//! trimmed values are what gets stored.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Column width of `recommendations.submitter_name`.
pub const MAX_SUBMITTER_NAME_LEN: usize = 100;

/// Longest accepted context. With every other field at its column width the
/// announcement still fits in a single 4096-unit chat message, even when the
/// context is all astral-plane emoji (two UTF-16 units each).
pub const MAX_CONTEXT_LEN: usize = 1000;

/// Hosts a submitted album URL may point at.
const MUSIC_URL_PATTERN: &str =
    r"(?i)^(https?://)?(open\.spotify\.com|spotify\.link|music\.apple\.com|itunes\.apple\.com)(/|$)";

static MUSIC_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(MUSIC_URL_PATTERN).expect("valid regex"));

/// A submission whose fields have been trimmed and checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    pub name: String,
    pub album_url: String,
    pub context: String,
}

/// Whether `url` points at a supported streaming platform.
pub fn is_supported_music_url(url: &str) -> bool {
    MUSIC_URL_RE.is_match(url.trim())
}

/// Trim and validate the raw form fields.
///
/// Errors carry the message shown to the submitter.
pub fn validate_submission(
    name: &str,
    album_url: &str,
    context: &str,
) -> Result<ValidSubmission, CoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("Name is required".into()));
    }
    if name.chars().count() > MAX_SUBMITTER_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Name must be at most {MAX_SUBMITTER_NAME_LEN} characters"
        )));
    }

    let album_url = album_url.trim();
    if album_url.is_empty() {
        return Err(CoreError::Validation("Album URL is required".into()));
    }
    if !is_supported_music_url(album_url) {
        return Err(CoreError::Validation(
            "Please provide a Spotify or Apple Music URL".into(),
        ));
    }

    let context = context.trim();
    if context.is_empty() {
        return Err(CoreError::Validation("Context is required".into()));
    }
    if context.chars().count() > MAX_CONTEXT_LEN {
        return Err(CoreError::Validation(format!(
            "Context must be at most {MAX_CONTEXT_LEN} characters"
        )));
    }

    Ok(ValidSubmission {
        name: name.to_string(),
        album_url: album_url.to_string(),
        context: context.to_string(),
    })
}
