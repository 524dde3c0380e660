//! HTTP surface for browser clients.
//!
//! - `GET /feed?podurl=<url>` fetches and normalizes a podcast feed
//! - `GET /podcast?episodeurl=<url>` echoes an episode URL as `{"audioUrl": ...}`
//!
//! Failures are reported with a fixed message; parse and network details go
//! to the log only.

use actix_web::{web, App, HttpResponse, HttpServer};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::feed::{build_client, load_podcast, FetchOptions, Normalizer};
use crate::util::validate_feed_url;

const FEED_FAILURE: &str = "Failed to fetch podcast feed";

/// Immutable state shared by every worker.
#[derive(Debug, Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub fetch_options: FetchOptions,
    pub normalizer: Normalizer,
    pub allow_private_hosts: bool,
}

impl AppState {
    pub fn from_config(config: &Config) -> reqwest::Result<Self> {
        Ok(Self {
            client: build_client(config, config.allow_private_hosts)?,
            fetch_options: FetchOptions::from(config),
            normalizer: Normalizer::new(config.placeholder_image.clone()),
            allow_private_hosts: config.allow_private_hosts,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub podurl: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EpisodeQuery {
    pub episodeurl: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeResponse {
    pub audio_url: String,
}

/// Registers the routes on an actix `App` or scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/feed", web::get().to(get_feed))
        .route("/podcast", web::get().to(get_podcast));
}

async fn get_feed(state: web::Data<AppState>, query: web::Query<FeedQuery>) -> HttpResponse {
    let Some(pod_url) = query.podurl.as_deref().filter(|u| !u.is_empty()) else {
        return HttpResponse::BadRequest().body("Missing podurl");
    };

    let url = match validate_feed_url(pod_url, state.allow_private_hosts) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(url = %pod_url, error = %e, "Rejected feed address");
            return HttpResponse::BadRequest().body("Invalid podurl");
        }
    };

    match load_podcast(
        &state.client,
        url.as_str(),
        &state.fetch_options,
        &state.normalizer,
    )
    .await
    {
        Ok(podcast) => HttpResponse::Ok().json(podcast),
        Err(e) => {
            tracing::error!(url = %url, error = %e, "Feed request failed");
            HttpResponse::InternalServerError().body(FEED_FAILURE)
        }
    }
}

async fn get_podcast(query: web::Query<EpisodeQuery>) -> HttpResponse {
    match query.into_inner().episodeurl.filter(|u| !u.is_empty()) {
        Some(audio_url) => HttpResponse::Ok().json(EpisodeResponse { audio_url }),
        None => HttpResponse::BadRequest().body("Missing episodeurl"),
    }
}

/// Runs the HTTP server until it is shut down.
pub async fn run(config: &Config) -> std::io::Result<()> {
    let state = AppState::from_config(config).map_err(std::io::Error::other)?;
    let data = web::Data::new(state);

    let server = HttpServer::new(move || App::new().app_data(data.clone()).configure(configure))
        .bind(config.bind_address.as_str())?;
    tracing::info!(bind = %config.bind_address, "Server is running");

    server.run().await
}
