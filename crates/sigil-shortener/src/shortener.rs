use crate::error::ShortenerError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sigil_codec::Token;
use sigil_core::UrlRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortenParams {
    /// The original URL to be shortened.
    pub long_url: String,
    /// Optional suffix joined onto the URL's path before storing,
    /// e.g. `"docs"` turns `https://example.com` into `https://example.com/docs`.
    pub custom_suffix: Option<String>,
}

/// Outcome of a successful shorten call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortened {
    /// The public token for the stored URL.
    pub token: Token,
    /// The URL that was actually stored, after suffix composition.
    pub long_url: String,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens a URL and returns its token. Shortening the same URL twice
    /// returns the same token.
    async fn shorten(&self, params: ShortenParams) -> Result<Shortened, ShortenerError>;

    /// Resolves a token to the stored URL record.
    ///
    /// Returns `Ok(None)` for tokens that are malformed, forged, or simply
    /// unknown; callers cannot distinguish the three.
    async fn resolve(&self, token: &str) -> Result<Option<UrlRecord>, ShortenerError>;
}
