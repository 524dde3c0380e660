use thiserror::Error;

use super::fetcher::{fetch_feed, FetchError, FetchOptions};
use super::normalizer::{FeedResult, NormalizeError, Normalizer};

/// Why a podcast could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The remote feed could not be retrieved.
    #[error("Failed to fetch feed: {0}")]
    Fetch(#[from] FetchError),
    /// The feed was retrieved but is not usable RSS.
    #[error("Malformed feed: {0}")]
    MalformedFeed(#[from] NormalizeError),
}

/// Fetches a feed and normalizes it.
///
/// Each call is independent: nothing is cached and concurrent calls for the
/// same address fetch and parse separately.
pub async fn load_podcast(
    client: &reqwest::Client,
    url: &str,
    options: &FetchOptions,
    normalizer: &Normalizer,
) -> Result<FeedResult, LoadError> {
    let bytes = fetch_feed(client, url, options).await?;

    let result = normalizer.normalize(&bytes).map_err(|e| {
        tracing::warn!(url = %url, error = %e, "Feed could not be normalized");
        e
    })?;

    tracing::info!(
        url = %url,
        title = %result.meta.title,
        episodes = result.episodes.len(),
        "Loaded podcast"
    );
    Ok(result)
}
