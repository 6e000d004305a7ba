//! Cross-platform link resolution for submitted album URLs.
//!
//! A [`LinkResolver`] turns one Spotify or Apple Music URL into the set of
//! listening links and album metadata stored with a recommendation. The
//! production implementation is [`SonglinkClient`], backed by the public
//! Odesli (song.link) API.

use async_trait::async_trait;

pub mod client;

pub use client::SonglinkClient;

/// Everything the resolver could find for one URL. Every field is optional;
/// the resolver may know the album on one platform only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedLinks {
    pub spotify_url: Option<String>,
    pub apple_music_url: Option<String>,
    /// Aggregator page listing all platforms.
    pub aggregator_url: Option<String>,
    pub album_title: Option<String>,
    pub artist_name: Option<String>,
    pub album_art_url: Option<String>,
}

/// Failures while resolving a link. All of them mean "could not resolve".
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Network, DNS, TLS or timeout failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("link service returned HTTP {status}")]
    HttpStatus { status: u16 },

    /// The body was not the JSON shape we expect.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Port for resolving a music URL into cross-platform links and metadata.
#[async_trait]
pub trait LinkResolver: Send + Sync {
    async fn resolve(&self, url: &str) -> Result<ResolvedLinks, ResolveError>;
}
