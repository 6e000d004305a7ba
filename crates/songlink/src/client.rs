//! HTTP client for the Odesli (song.link) links API.
//!
//! One endpoint is used: `GET {base}/links?url=<music url>`. The response
//! carries an aggregator `pageUrl`, per-platform links and a map of
//! entities (albums/songs) with their metadata.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{LinkResolver, ResolveError, ResolvedLinks};

/// Public API root.
pub const DEFAULT_API_URL: &str = "https://api.song.link/v1-alpha.1";

/// Upper bound on a single resolve call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolver backed by the song.link API.
#[derive(Debug, Clone)]
pub struct SonglinkClient {
    client: reqwest::Client,
    api_url: String,
}

impl SonglinkClient {
    /// Client against the public API with the default timeout.
    pub fn new() -> Result<Self, ResolveError> {
        Self::with_base_url(DEFAULT_API_URL)
    }

    /// Client against another API root (a local fake in tests).
    pub fn with_base_url(api_url: impl Into<String>) -> Result<Self, ResolveError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl LinkResolver for SonglinkClient {
    async fn resolve(&self, url: &str) -> Result<ResolvedLinks, ResolveError> {
        let response = self
            .client
            .get(format!("{}/links", self.api_url))
            .query(&[("url", url)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url, "Link service rejected lookup");
            return Err(ResolveError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let links = parse_links_response(&body)?;
        tracing::debug!(
            url,
            album_title = links.album_title.as_deref().unwrap_or(""),
            "Resolved album links"
        );
        Ok(links)
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinksResponse {
    entity_unique_id: Option<String>,
    page_url: Option<String>,
    #[serde(default)]
    links_by_platform: BTreeMap<String, PlatformLink>,
    #[serde(default)]
    entities_by_unique_id: BTreeMap<String, Entity>,
}

#[derive(Debug, Deserialize)]
struct PlatformLink {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Entity {
    title: Option<String>,
    artist_name: Option<String>,
    thumbnail_url: Option<String>,
}

/// Decode a `/links` response body.
///
/// Metadata comes from the entity the lookup resolved to, falling back to
/// any entity when that one is missing from the map.
pub(crate) fn parse_links_response(body: &[u8]) -> Result<ResolvedLinks, ResolveError> {
    let parsed: LinksResponse = serde_json::from_slice(body)?;

    let platform_url = |key: &str| {
        parsed
            .links_by_platform
            .get(key)
            .and_then(|l| l.url.clone())
    };

    let entity = parsed
        .entity_unique_id
        .as_ref()
        .and_then(|id| parsed.entities_by_unique_id.get(id))
        .or_else(|| parsed.entities_by_unique_id.values().next());

    Ok(ResolvedLinks {
        spotify_url: platform_url("spotify"),
        apple_music_url: platform_url("appleMusic"),
        aggregator_url: parsed.page_url.clone(),
        album_title: entity.and_then(|e| e.title.clone()),
        artist_name: entity.and_then(|e| e.artist_name.clone()),
        album_art_url: entity.and_then(|e| e.thumbnail_url.clone()),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
