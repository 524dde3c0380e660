//! Podcast feed normalization service.
//!
//! Fetches RSS 2.0 podcast feeds and reshapes them into a stable JSON
//! contract (title, author, image, description, episodes) for browser
//! players. See [`feed`] for the normalization rules and [`server`] for the
//! HTTP surface.

pub mod config;
pub mod feed;
pub mod server;
pub mod util;
