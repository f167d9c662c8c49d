//! Sequencing and upload handlers

use super::error::ApiError;
use super::AppState;
use crate::error::DjorderError;
use crate::mixing::order_tracks;
use crate::pipeline::{records, UploadedFile};
use crate::types::{TrackDescriptor, TrackRecord};
use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, rejection::BytesRejection, Multipart, State},
    Json,
};
use tracing::{debug, info};

/// Form field carrying the uploaded audio files
const FILES_FIELD: &str = "files";

/// POST /order
///
/// Body is a JSON array of tracks; responds with the same tracks in mixing
/// order. The body is parsed by hand so that malformed JSON is reported
/// through the same `{"error"}` payload as every other failure.
pub async fn order(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Vec<TrackDescriptor>>, ApiError> {
    let body = body.map_err(|e| DjorderError::MalformedInput(e.body_text()))?;
    let tracks: Vec<TrackDescriptor> = serde_json::from_slice(&body).map_err(DjorderError::from)?;

    if tracks.len() > state.max_tracks {
        return Err(DjorderError::TooManyTracks {
            count: tracks.len(),
            limit: state.max_tracks,
        }
        .into());
    }

    debug!("Ordering {} tracks", tracks.len());

    // Sequencing is quadratic in the list length
    let ordered = tokio::task::spawn_blocking(move || order_tracks(tracks))
        .await
        .map_err(|e| ApiError::Internal(format!("ordering task failed: {}", e)))??;
    Ok(Json(ordered))
}

/// POST /upload
///
/// Multipart form with one or more `files` parts. Responds with one record
/// per file, in upload order.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Vec<TrackRecord>>, ApiError> {
    let Ok(mut multipart) = multipart else {
        return Err(ApiError::NoFiles);
    };

    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        // Parts without a filename are form values, not files
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field.bytes().await?;
        debug!("Received {} ({} bytes)", name, bytes.len());
        files.push(UploadedFile {
            name,
            bytes: bytes.to_vec(),
        });
    }

    if files.is_empty() {
        return Err(ApiError::NoFiles);
    }

    info!("Analyzing {} uploaded files", files.len());
    let analyzer = state.analyzer.clone();
    let results = tokio::task::spawn_blocking(move || analyzer.analyze(&files))
        .await
        .map_err(|e| ApiError::Internal(format!("analysis task failed: {}", e)))?;

    Ok(Json(records(&results)))
}
