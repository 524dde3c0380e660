//! Podcast feed retrieval and normalization.
//!
//! Turns a loosely populated RSS 2.0 document (with optional iTunes
//! extensions) into the fixed JSON contract served to clients:
//!
//! - **Tree**: generic element tree built from `quick-xml` events
//! - **Normalizer**: channel metadata with fallback chains, episode list in
//!   document order
//! - **Duration**: `itunes:duration` in any common form to `HH:MM:SS`/`MM:SS`
//! - **Fetcher**: single bounded HTTP download of the feed bytes
//!
//! # Example
//!
//! ```ignore
//! use podfeed::feed::{load_podcast, FetchOptions, Normalizer};
//!
//! let podcast = load_podcast(&client, url, &FetchOptions::default(), &Normalizer::default()).await?;
//! println!("{} ({} episodes)", podcast.meta.title, podcast.episodes.len());
//! ```

mod duration;
mod fetcher;
mod loader;
mod normalizer;
mod tree;

pub use duration::{format_duration, RawDuration};
pub use fetcher::{build_client, fetch_feed, FetchError, FetchOptions};
pub use loader::{load_podcast, LoadError};
pub use normalizer::{
    normalize, Episode, FeedResult, NormalizeError, Normalizer, PodcastMeta,
    DEFAULT_PLACEHOLDER_IMAGE, NO_DESCRIPTION, UNKNOWN_AUTHOR,
};
pub use tree::{parse_document, TreeError, XmlElement};
