use serde::Serialize;
use thiserror::Error;

use super::duration::{format_duration, RawDuration};
use super::tree::{parse_document, TreeError, XmlElement};

/// Cover art used when a feed declares neither `<image><url>` nor `itunes:image`.
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://cdn.glitch.global/d1d3f23a-e9d5-45e6-ba0d-86c24c7f4deb/placeholder.png?v=1741660876805";

pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const NO_DESCRIPTION: &str = "No description available";

/// Errors that make a feed unusable.
///
/// Both variants are "malformed feed" conditions: there is no partial result,
/// a single episode without an enclosure fails the whole feed.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The payload is not well-formed XML.
    #[error("Parse error: {0}")]
    Parse(#[from] TreeError),

    /// A required element or attribute is missing.
    #[error("Malformed feed: missing {0}")]
    Structure(String),
}

impl NormalizeError {
    fn missing(what: impl Into<String>) -> Self {
        NormalizeError::Structure(what.into())
    }
}

/// Podcast-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PodcastMeta {
    pub title: String,
    pub author: String,
    pub image: String,
    pub description: String,
}

/// A single playable episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub title: String,
    pub audio_url: String,
    /// Publication date exactly as the feed wrote it, or empty.
    pub pub_date: String,
    /// `HH:MM:SS` or `MM:SS`.
    pub duration: String,
}

/// Normalized feed: the metadata fields side by side with `episodes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedResult {
    #[serde(flatten)]
    pub meta: PodcastMeta,
    /// Episodes in document order.
    pub episodes: Vec<Episode>,
}

/// Converts RSS 2.0 documents (with optional iTunes extensions) into [`FeedResult`].
#[derive(Debug, Clone)]
pub struct Normalizer {
    placeholder_image: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER_IMAGE)
    }
}

impl Normalizer {
    pub fn new(placeholder_image: impl Into<String>) -> Self {
        Self {
            placeholder_image: placeholder_image.into(),
        }
    }

    /// Parses and normalizes a raw feed document.
    ///
    /// # Errors
    ///
    /// - [`NormalizeError::Parse`] if the bytes are not well-formed XML
    /// - [`NormalizeError::Structure`] if the root is not `<rss>`, there is no
    ///   `<channel>`, or the channel or any item lacks its `<title>`, or any
    ///   item lacks an `<enclosure url="...">`
    pub fn normalize(&self, bytes: &[u8]) -> Result<FeedResult, NormalizeError> {
        let root = parse_document(bytes)?;
        if root.name != "rss" {
            return Err(NormalizeError::missing(format!(
                "<rss> root element (found <{}>)",
                root.name
            )));
        }

        let channel = root
            .child("channel")
            .ok_or_else(|| NormalizeError::missing("<channel>"))?;

        let meta = self.podcast_meta(channel)?;
        // A channel without items yields an empty list, not an error
        let episodes = channel
            .children_named("item")
            .enumerate()
            .map(|(index, item)| episode(index, item))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            title = %meta.title,
            episodes = episodes.len(),
            "Normalized feed"
        );

        Ok(FeedResult { meta, episodes })
    }

    fn podcast_meta(&self, channel: &XmlElement) -> Result<PodcastMeta, NormalizeError> {
        let title = channel
            .child("title")
            .ok_or_else(|| NormalizeError::missing("channel <title>"))?
            .text()
            .to_owned();

        let author = child_text(channel, "itunes:author").unwrap_or(UNKNOWN_AUTHOR);

        let image = channel
            .child("image")
            .and_then(|image| child_text(image, "url"))
            .or_else(|| {
                channel
                    .child("itunes:image")
                    .and_then(|image| image.attr("href"))
                    .filter(|href| !href.is_empty())
            })
            .unwrap_or(self.placeholder_image.as_str());

        let description = child_text(channel, "description").unwrap_or(NO_DESCRIPTION);

        Ok(PodcastMeta {
            title,
            author: author.to_owned(),
            image: image.to_owned(),
            description: description.to_owned(),
        })
    }
}

/// Normalizes a feed with the default placeholder image.
pub fn normalize(bytes: &[u8]) -> Result<FeedResult, NormalizeError> {
    Normalizer::default().normalize(bytes)
}

fn episode(index: usize, item: &XmlElement) -> Result<Episode, NormalizeError> {
    let title = item
        .child("title")
        .ok_or_else(|| NormalizeError::missing(format!("<title> in item {index}")))?
        .text()
        .to_owned();

    let audio_url = item
        .child("enclosure")
        .ok_or_else(|| NormalizeError::missing(format!("<enclosure> in item {index}")))?
        .attr("url")
        .filter(|url| !url.is_empty())
        .ok_or_else(|| NormalizeError::missing(format!("enclosure url in item {index}")))?
        .to_owned();

    let pub_date = child_text(item, "pubDate").unwrap_or_default().to_owned();

    let raw_duration = child_text(item, "itunes:duration")
        .map(RawDuration::from)
        .unwrap_or_default();

    Ok(Episode {
        title,
        audio_url,
        pub_date,
        duration: format_duration(&raw_duration),
    })
}

/// Text of the named child, treating an empty element as absent.
fn child_text<'a>(parent: &'a XmlElement, name: &str) -> Option<&'a str> {
    parent
        .child(name)
        .map(XmlElement::text)
        .filter(|text| !text.is_empty())
}
