use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{
    AppState,
    photos::{DateGroup, Picture, PhotosError, Snapshot, display_date_key},
    validate::{validate_date_folder_name, validate_number, validate_photo_filename},
};

const DEFAULT_LATEST_AMOUNT: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoSummary {
    pub date: String,
    pub display_date: String,
    pub filename: String,
    pub url: String,
    pub thumbnail: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LatestResponse {
    pub latest: Vec<PhotoSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DateGroupResponse {
    pub date: String,
    pub display_date: String,
    pub pictures: Vec<PhotoSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PageResponse {
    pub dates: Vec<DateGroupResponse>,
    pub current_page: usize,
    pub total_pages: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ViewResponse {
    pub photo: PhotoSummary,
    pub previous_photo: Option<PhotoSummary>,
    pub next_photo: Option<PhotoSummary>,
    pub absolute_thumbnail: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DateResponse {
    pub date: String,
    pub display_date: String,
    pub previous: Option<String>,
    pub next: Option<String>,
    pub picture_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct LatestQuery {
    pub amount: Option<String>,
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 not found").into_response()
}

fn index_error(e: PhotosError) -> Response {
    error!("Failed to load photo index: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}

impl AppState {
    fn photo_summary(&self, picture: &Picture) -> PhotoSummary {
        let prefix = &self.config.app.path_prefix;
        let filename = urlencoding::encode(&picture.filename);

        PhotoSummary {
            date: picture.date.clone(),
            display_date: display_date_key(&picture.date),
            filename: picture.filename.clone(),
            url: format!("{}/view/{}/{}", prefix, picture.date, filename),
            thumbnail: format!("{}/thumbnails/{}/{}", prefix, picture.date, filename),
        }
    }

    fn date_group(&self, group: &DateGroup) -> DateGroupResponse {
        DateGroupResponse {
            date: group.date.clone(),
            display_date: display_date_key(&group.date),
            pictures: group.pictures.iter().map(|p| self.photo_summary(p)).collect(),
        }
    }

    fn page_response(&self, snapshot: &Snapshot, page_number: usize) -> Option<PageResponse> {
        let page = snapshot.page(page_number)?;
        Some(PageResponse {
            dates: page.groups.iter().map(|g| self.date_group(g)).collect(),
            current_page: page_number,
            total_pages: snapshot.page_count(),
        })
    }
}

pub async fn latest_handler(
    State(app_state): State<AppState>,
    Query(query): Query<LatestQuery>,
) -> Response {
    let amount = match query.amount.as_deref().map(validate_number) {
        None => DEFAULT_LATEST_AMOUNT,
        Some(Ok(amount)) => amount,
        Some(Err(_)) => return not_found(),
    };

    let snapshot = match app_state.photos.snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => return index_error(e),
    };

    let latest = snapshot
        .latest(amount)
        .iter()
        .map(|p| app_state.photo_summary(p))
        .collect();

    Json(LatestResponse { latest }).into_response()
}

pub async fn index_handler(State(app_state): State<AppState>) -> Response {
    render_page(&app_state, 1).await
}

pub async fn page_handler(
    State(app_state): State<AppState>,
    Path(page): Path<String>,
) -> Response {
    match validate_number(&page) {
        Ok(page_number) => render_page(&app_state, page_number).await,
        Err(_) => not_found(),
    }
}

async fn render_page(app_state: &AppState, page_number: usize) -> Response {
    let snapshot = match app_state.photos.snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => return index_error(e),
    };

    match app_state.page_response(&snapshot, page_number) {
        Some(page) => Json(page).into_response(),
        None => not_found(),
    }
}

pub async fn view_handler(
    State(app_state): State<AppState>,
    Path((date, filename)): Path<(String, String)>,
) -> Response {
    if validate_date_folder_name(&date).is_err() || validate_photo_filename(&filename).is_err() {
        return not_found();
    }

    let (picture, neighbors) = match app_state
        .photos
        .get_picture_with_neighbors(&date, &filename)
        .await
    {
        Ok(Some(found)) => found,
        Ok(None) => return not_found(),
        Err(e) => return index_error(e),
    };

    let photo = app_state.photo_summary(&picture);
    let absolute_thumbnail = format!(
        "{}{}",
        app_state.config.app.base_url.as_deref().unwrap_or_default(),
        photo.thumbnail
    );

    Json(ViewResponse {
        previous_photo: neighbors.previous.map(|p| app_state.photo_summary(&p)),
        next_photo: neighbors.next.map(|p| app_state.photo_summary(&p)),
        photo,
        absolute_thumbnail,
    })
    .into_response()
}

pub async fn date_handler(
    State(app_state): State<AppState>,
    Path(date): Path<String>,
) -> Response {
    if validate_date_folder_name(&date).is_err() {
        return not_found();
    }

    let snapshot = match app_state.photos.snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => return index_error(e),
    };

    match snapshot.date_neighbors(&date) {
        Some(neighbors) => Json(DateResponse {
            display_date: display_date_key(&date),
            picture_count: snapshot.pictures_for_date(&date).len(),
            date,
            previous: neighbors.previous,
            next: neighbors.next,
        })
        .into_response(),
        None => not_found(),
    }
}
