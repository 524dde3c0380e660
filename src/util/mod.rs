//! Utility functions shared by the CLI and the HTTP surface.
//!
//! - **URL validation**: feed address policy guarding against SSRF

mod url_validator;

pub use url_validator::{validate_feed_url, UrlValidationError};
