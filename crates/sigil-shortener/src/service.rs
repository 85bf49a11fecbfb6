use crate::error::ShortenerError;
use crate::shortener::{ShortenParams, Shortened, Shortener};
use async_trait::async_trait;
use sigil_core::{Repository, UrlRecord};
use std::sync::Arc;
use tracing::{debug, trace};

/// A concrete implementation of the [`Shortener`] trait.
///
/// This service wraps a [`Repository`] and handles:
/// - URL validation and custom-suffix composition
/// - Row id assignment through the repository
/// - Token encoding/decoding at the storage seam
///
/// The repository deduplicates on `long_url`, so no collision handling is
/// needed here: equal URLs map to equal ids, and the codec is a bijection.
#[derive(Debug, Clone)]
pub struct ShortenerService<R> {
    repository: Arc<R>,
}

impl<R: Repository> ShortenerService<R> {
    /// Creates a new `ShortenerService` over the given repository.
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Validates that the URL has a valid format (has a scheme and host).
    fn validate_url(url: &str) -> Result<(), ShortenerError> {
        if url.is_empty() {
            return Err(ShortenerError::InvalidUrl(
                "URL cannot be empty".to_string(),
            ));
        }

        // Basic validation: check for scheme and host presence.
        // A valid URL should have "://" and something after it.
        let parts: Vec<&str> = url.split("://").collect();
        if parts.len() < 2 || parts[0].is_empty() || parts[1].is_empty() {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must have a valid scheme and host: {}",
                url
            )));
        }

        let scheme = parts[0].to_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL scheme must be http or https: {}",
                scheme
            )));
        }

        Ok(())
    }

    /// Joins an optional suffix onto the URL's path.
    fn compose_url(long_url: &str, custom_suffix: Option<&str>) -> String {
        match custom_suffix {
            Some(suffix) if !suffix.is_empty() => format!(
                "{}/{}",
                long_url.trim_end_matches('/'),
                suffix.trim_start_matches('/')
            ),
            _ => long_url.to_owned(),
        }
    }
}

#[async_trait]
impl<R: Repository> Shortener for ShortenerService<R> {
    async fn shorten(&self, params: ShortenParams) -> Result<Shortened, ShortenerError> {
        Self::validate_url(&params.long_url)?;

        let long_url = Self::compose_url(&params.long_url, params.custom_suffix.as_deref());

        let id = self.repository.insert_or_get(&long_url).await?;

        // Encoding only fails once the assigned ids outgrow the codec's
        // identifier domain.
        let token =
            sigil_codec::encode(id).map_err(|_| ShortenerError::CapacityExhausted(id))?;

        debug!(id, token = %token, "shortened url");
        Ok(Shortened { token, long_url })
    }

    async fn resolve(&self, token: &str) -> Result<Option<UrlRecord>, ShortenerError> {
        trace!(token, "resolving token");

        let id = match sigil_codec::decode(token) {
            Ok(id) => id,
            Err(err) => {
                // Malformed and forged tokens surface as "not found"; the
                // caller gets no more detail than an unknown-but-valid one.
                debug!(token, %err, "token rejected by codec");
                return Ok(None);
            }
        };

        let record = self.repository.get(id).await?;
        match &record {
            Some(record) => debug!(id, url = %record.long_url, "resolved token"),
            None => trace!(id, "no record for decoded id"),
        }
        Ok(record)
    }
}
