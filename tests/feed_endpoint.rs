//! Integration tests for the HTTP surface: `/feed` end-to-end against a mock
//! publisher, and `/podcast`.
//!
//! Each test starts its own wiremock server as the remote feed host. Private
//! hosts are allowed in the app state because the mock listens on 127.0.0.1.

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use pretty_assertions::assert_eq;
use podfeed::config::Config;
use podfeed::server::{configure, AppState};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PODCAST_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd">
  <channel>
    <title>Endpoint Show</title>
    <itunes:author>Endpoint Host</itunes:author>
    <description><![CDATA[A show about <b>endpoints</b>.]]></description>
    <itunes:image href="https://img.example.com/show.jpg"/>
    <item>
      <title>Episode 2</title>
      <pubDate>Mon, 10 Mar 2025 08:00:00 +0000</pubDate>
      <enclosure url="https://cdn.example.com/ep2.mp3" length="1000" type="audio/mpeg"/>
      <itunes:duration>4521</itunes:duration>
    </item>
    <item>
      <title>Episode 1</title>
      <pubDate>Mon, 03 Mar 2025 08:00:00 +0000</pubDate>
      <enclosure url="https://cdn.example.com/ep1.mp3" length="1000" type="audio/mpeg"/>
      <itunes:duration>42:07</itunes:duration>
    </item>
  </channel>
</rss>"#;

fn test_state() -> AppState {
    let config = Config {
        allow_private_hosts: true,
        ..Config::default()
    };
    AppState::from_config(&config).unwrap()
}

async fn mock_feed(status: u16, body: &str) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/show.xml"))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("Content-Type", "application/rss+xml"),
        )
        .mount(&mock_server)
        .await;
    mock_server
}

fn feed_uri(server: &MockServer) -> String {
    let feed_url = format!("{}/show.xml", server.uri());
    format!(
        "/feed?podurl={}",
        url::form_urlencoded::byte_serialize(feed_url.as_bytes()).collect::<String>()
    )
}

// ============================================================================
// /feed
// ============================================================================

#[actix_web::test]
async fn test_feed_returns_normalized_json() {
    let server = mock_feed(200, PODCAST_RSS).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri(&feed_uri(&server)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        serde_json::json!({
            "title": "Endpoint Show",
            "author": "Endpoint Host",
            "image": "https://img.example.com/show.jpg",
            "description": "A show about <b>endpoints</b>.",
            "episodes": [
                {
                    "title": "Episode 2",
                    "audioUrl": "https://cdn.example.com/ep2.mp3",
                    "pubDate": "Mon, 10 Mar 2025 08:00:00 +0000",
                    "duration": "01:15:21",
                },
                {
                    "title": "Episode 1",
                    "audioUrl": "https://cdn.example.com/ep1.mp3",
                    "pubDate": "Mon, 03 Mar 2025 08:00:00 +0000",
                    "duration": "42:07",
                },
            ],
        })
    );
}

#[actix_web::test]
async fn test_feed_upstream_error_is_generic_500() {
    let server = mock_feed(404, "gone").await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri(&feed_uri(&server)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(test::read_body(resp).await, "Failed to fetch podcast feed");
}

#[actix_web::test]
async fn test_feed_malformed_document_is_generic_500() {
    let server = mock_feed(200, "<rss><channel><title>Broken").await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri(&feed_uri(&server)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    // No parser details leak to the client
    assert_eq!(test::read_body(resp).await, "Failed to fetch podcast feed");
}

#[actix_web::test]
async fn test_feed_item_without_enclosure_is_500() {
    let body = PODCAST_RSS.replace(
        r#"<enclosure url="https://cdn.example.com/ep1.mp3" length="1000" type="audio/mpeg"/>"#,
        "",
    );
    let server = mock_feed(200, &body).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri(&feed_uri(&server)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn test_feed_rejects_non_http_scheme() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/feed?podurl=file%3A%2F%2F%2Fetc%2Fpasswd")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(test::read_body(resp).await, "Invalid podurl");
}

// ============================================================================
// /podcast
// ============================================================================

#[actix_web::test]
async fn test_podcast_echo() {
    let app = test::init_service(App::new().configure(configure)).await;

    let req = test::TestRequest::get()
        .uri("/podcast?episodeurl=https%3A%2F%2Fcdn.example.com%2Fep2.mp3%3Ftoken%3Dabc")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
        body["audioUrl"],
        "https://cdn.example.com/ep2.mp3?token=abc"
    );
}
