//! HTTP contract tests for the djorder service
//!
//! Drives the router directly with `oneshot`; audio analysis is replaced by
//! fake extractors so the tests exercise request handling, not DSP.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use djorder::analysis::{ArtworkExtractor, FeatureExtractor};
use djorder::pipeline::BatchAnalyzer;
use djorder::server::{build_router, AppState};
use djorder::types::{AudioFeatures, BpmResult, KeyResult, Mode, PitchClass};
use djorder::{DjorderError, Result};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "djorder-test-boundary";

/// Reads "bpm:key" (e.g. "127.6:A") from the file contents
struct FixtureFeatures;

impl FeatureExtractor for FixtureFeatures {
    fn extract(&self, name: &str, bytes: &[u8]) -> Result<AudioFeatures> {
        let text = String::from_utf8_lossy(bytes);
        let parsed = text.split_once(':').and_then(|(bpm, key)| {
            Some((bpm.parse::<f64>().ok()?, PitchClass::from_label(key)?))
        });
        let (bpm, pitch_class) =
            parsed.ok_or_else(|| DjorderError::decode_error(name, "not a fixture"))?;
        Ok(AudioFeatures {
            bpm: BpmResult {
                value: bpm,
                confidence: 1.0,
            },
            key: KeyResult {
                pitch_class,
                mode: Mode::Major,
                confidence: 1.0,
            },
        })
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}

/// Files named "cover*" carry artwork
struct FixtureArtwork;

impl ArtworkExtractor for FixtureArtwork {
    fn extract(&self, name: &str, _bytes: &[u8]) -> Result<Option<String>> {
        Ok(name.starts_with("cover").then(|| format!("jpeg-of-{}", name)))
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}

fn app_with_limit(max_tracks: usize) -> Router {
    let analyzer = BatchAnalyzer::new(Arc::new(FixtureFeatures), Arc::new(FixtureArtwork));
    build_router(AppState::new(analyzer, max_tracks), 16 * 1024 * 1024)
}

fn app() -> Router {
    app_with_limit(1000)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_order(body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/order")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

/// Build a multipart/form-data request from (field, filename, contents) parts
fn post_upload(parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
    let mut body = String::new();
    for (field, filename, contents) in parts {
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        match filename {
            Some(filename) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                field, filename
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                field
            )),
        }
        body.push_str(contents);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn titles(body: &Value) -> Vec<&str> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect()
}

// =============================================================================
// POST /order
// =============================================================================

#[tokio::test]
async fn test_order_scenario() {
    let body = json!([
        {"title": "C", "bpm": 120, "key": "C"},
        {"title": "G", "bpm": 122, "key": "G"},
        {"title": "F#", "bpm": 90, "key": "F#"}
    ]);
    let (status, body) = send(app(), post_order(body.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), ["F#", "C", "G"]);
}

#[tokio::test]
async fn test_order_returns_tracks_unchanged() {
    let body = json!([
        {"title": "b", "bpm": 128.5, "key": "A", "artwork": "abc", "rating": 3},
        {"title": "a", "bpm": null, "key": null, "artwork": null}
    ]);
    let (status, body) = send(app(), post_order(body.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"title": "b", "bpm": 128.5, "key": "A", "artwork": "abc", "rating": 3},
            {"title": "a", "bpm": null, "key": null, "artwork": null}
        ])
    );
}

#[tokio::test]
async fn test_order_empty_list() {
    let (status, body) = send(app(), post_order("[]")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_order_malformed_json_is_500_with_error() {
    for payload in ["{not json", r#"{"title": "x"}"#, r#"[{"bpm": 120}]"#, ""] {
        let (status, body) = send(app(), post_order(payload)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{:?}", payload);
        assert!(body["error"].is_string(), "{:?} -> {}", payload, body);
    }
}

#[tokio::test]
async fn test_order_invalid_tempo_is_rejected() {
    let body = json!([
        {"title": "ok", "bpm": 120, "key": "C"},
        {"title": "bad", "bpm": -3, "key": "G"}
    ]);
    let (status, body) = send(app(), post_order(body.to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("position 1"));
}

#[tokio::test]
async fn test_order_large_list() {
    const KEYS: [&str; 12] = ["C", "G", "D", "A", "E", "B", "F#", "C#", "G#", "D#", "A#", "F"];
    let tracks: Vec<Value> = (0..600)
        .map(|i| {
            json!({
                "title": format!("t{}", i),
                "bpm": 90 + (i * 7) % 60,
                "key": KEYS[(i * 5) % KEYS.len()]
            })
        })
        .collect();

    let (status, body) = send(app(), post_order(Value::from(tracks).to_string())).await;
    assert_eq!(status, StatusCode::OK);

    let mut got: Vec<&str> = titles(&body);
    got.sort_unstable();
    let mut expected: Vec<String> = (0..600).map(|i| format!("t{}", i)).collect();
    expected.sort_unstable();
    assert_eq!(got, expected);
}

#[tokio::test]
async fn test_order_track_limit() {
    let body = json!([
        {"title": "1", "bpm": 120, "key": "C"},
        {"title": "2", "bpm": 121, "key": "C"},
        {"title": "3", "bpm": 122, "key": "C"}
    ]);
    let (status, body) = send(app_with_limit(2), post_order(body.to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("limit is 2"));
}

// =============================================================================
// POST /upload
// =============================================================================

#[tokio::test]
async fn test_upload_preserves_order_and_isolates_failures() {
    let request = post_upload(&[
        ("files", Some("z_last.mp3"), "127.6:A"),
        ("files", Some("broken.mp3"), "garbage"),
        ("files", Some("cover_a.flac"), "90:F#"),
    ]);
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"title": "z_last.mp3", "bpm": 128, "key": "A", "artwork": null},
            {"title": "broken.mp3", "bpm": null, "key": null, "artwork": null},
            {"title": "cover_a.flac", "bpm": 90, "key": "F#", "artwork": "jpeg-of-cover_a.flac"}
        ])
    );
}

#[tokio::test]
async fn test_upload_ignores_other_fields() {
    let request = post_upload(&[
        ("comment", None, "hello"),
        ("files", Some("one.wav"), "100:C"),
        ("other", Some("skip.wav"), "100:C"),
    ]);
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), ["one.wav"]);
}

#[tokio::test]
async fn test_upload_without_files_part_is_400() {
    let request = post_upload(&[("comment", None, "no audio here")]);
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "No files part"}));
}

#[tokio::test]
async fn test_upload_non_multipart_is_400() {
    let request = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("[]"))
        .unwrap();
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "No files part"}));
}

#[tokio::test]
async fn test_upload_then_order() {
    let request = post_upload(&[
        ("files", Some("c.mp3"), "120:C"),
        ("files", Some("g.mp3"), "122:G"),
        ("files", Some("fs.mp3"), "90:F#"),
    ]);
    let (_, records) = send(app(), request).await;

    let (status, ordered) = send(app(), post_order(records.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&ordered), ["fs.mp3", "c.mp3", "g.mp3"]);
}

// =============================================================================
// Ambient routes and layers
// =============================================================================

#[tokio::test]
async fn test_health() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "djorder");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let request = Request::builder()
        .method("POST")
        .uri("/order")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("[]"))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let request = Request::builder()
        .uri("/nope")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
