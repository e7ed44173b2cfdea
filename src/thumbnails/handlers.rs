use axum::{
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::path::Path as StdPath;
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{debug, error};

use super::ThumbnailError;
use crate::{
    AppState,
    validate::{validate_date_folder_name, validate_photo_filename},
};

pub async fn thumbnail_handler(
    State(app_state): State<AppState>,
    Path((date, filename)): Path<(String, String)>,
) -> Response {
    if validate_date_folder_name(&date).is_err() || validate_photo_filename(&filename).is_err() {
        return (StatusCode::NOT_FOUND, "404 not found").into_response();
    }

    match app_state.thumbnailer.get_or_create(&date, &filename).await {
        Ok(path) => serve_thumbnail(&path).await,
        Err(ThumbnailError::SourceNotFound(path)) => {
            debug!("No source photo for thumbnail: {:?}", path);
            (StatusCode::NOT_FOUND, "404 not found").into_response()
        }
        Err(ThumbnailError::ImageError(e)) => {
            error!("Failed to generate thumbnail for {}/{}: {}", date, filename, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate thumbnail - not an image file?",
            )
                .into_response()
        }
        Err(e) => {
            error!("Thumbnail error for {}/{}: {}", date, filename, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

async fn serve_thumbnail(path: &StdPath) -> Response {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(m) => m,
        Err(e) => {
            error!("Failed to stat thumbnail {:?}: {}", path, e);
            return (StatusCode::NOT_FOUND, "404 not found").into_response();
        }
    };

    let file = match File::open(path).await {
        Ok(file) => file,
        Err(e) => {
            error!("Failed to open thumbnail {:?}: {}", path, e);
            return (StatusCode::NOT_FOUND, "404 not found").into_response();
        }
    };

    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string();

    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, metadata.len())
        .header(header::CACHE_CONTROL, "public, max-age=31536000");

    if let Ok(modified) = metadata.modified() {
        response = response.header(header::LAST_MODIFIED, httpdate::fmt_http_date(modified));
    }

    let body = Body::from_stream(ReaderStream::new(file));
    response.body(body).unwrap_or_else(|e| {
        error!("Failed to build thumbnail response: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}
