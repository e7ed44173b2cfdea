use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::Arc, time::Duration};

pub mod api;
pub mod photos;
pub mod startup_checks;
pub mod thumbnails;
pub mod validate;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub photos: PhotoLibraryConfig,
    pub thumbnails: ThumbnailConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub name: String,
    /// Prefix for generated URLs when mounted below the site root.
    #[serde(default)]
    pub path_prefix: String,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PhotoLibraryConfig {
    pub source_directory: PathBuf,
    #[serde(default = "default_cache_time_to_live_ms")]
    pub cache_time_to_live_ms: u64,
    #[serde(default = "default_pagination_threshold")]
    pub pagination_threshold: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThumbnailConfig {
    pub directory: PathBuf,
    pub width: u32,
    pub height: u32,
    pub quality: u8,
}

fn default_cache_time_to_live_ms() -> u64 {
    photos::DEFAULT_CACHE_TIME_TO_LIVE_MS
}

fn default_pagination_threshold() -> usize {
    photos::DEFAULT_PAGINATION_THRESHOLD
}

impl PhotoLibraryConfig {
    pub fn index_config(&self) -> photos::PhotosConfig {
        photos::PhotosConfig {
            cache_time_to_live: Duration::from_millis(self.cache_time_to_live_ms),
            pagination_threshold: self.pagination_threshold,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            app: AppConfig {
                name: "Date Gallery".to_string(),
                path_prefix: String::new(),
                base_url: None,
            },
            photos: PhotoLibraryConfig {
                source_directory: PathBuf::from("photos"),
                cache_time_to_live_ms: default_cache_time_to_live_ms(),
                pagination_threshold: default_pagination_threshold(),
            },
            thumbnails: ThumbnailConfig {
                directory: PathBuf::from("thumbnails"),
                width: 300,
                height: 300,
                quality: 85,
            },
        }
    }
}

use axum::Router;
use tower_http::{services::ServeDir, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub photos: photos::SharedPhotoManager,
    pub thumbnailer: thumbnails::SharedThumbnailer,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let source = Arc::new(photos::FsPhotoSource::new(
            config.photos.source_directory.clone(),
        ));
        let photos = Arc::new(photos::PhotoManager::new(
            config.photos.index_config(),
            source,
        ));
        let thumbnailer = Arc::new(thumbnails::Thumbnailer::new(
            config.thumbnails.clone(),
            config.photos.source_directory.clone(),
        ));

        Self {
            photos,
            thumbnailer,
            config,
        }
    }
}

pub async fn create_app(config: Config) -> Router {
    create_app_with_state(AppState::new(config))
}

pub fn create_app_with_state(app_state: AppState) -> Router {
    let originals = ServeDir::new(&app_state.config.photos.source_directory);

    Router::new()
        .route("/", axum::routing::get(api::index_handler))
        .route("/latest", axum::routing::get(api::latest_handler))
        .route("/{page}", axum::routing::get(api::page_handler))
        .route(
            "/view/{date}/{filename}",
            axum::routing::get(api::view_handler),
        )
        .route("/dates/{date}", axum::routing::get(api::date_handler))
        .route(
            "/thumbnails/{date}/{filename}",
            axum::routing::get(thumbnails::thumbnail_handler),
        )
        .nest_service("/photos", originals)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    let method = request.method();
                    let uri = request.uri();
                    let matched_path = request
                        .extensions()
                        .get::<axum::extract::MatchedPath>()
                        .map(|matched_path| matched_path.as_str());

                    tracing::info_span!(
                        "http_request",
                        method = %method,
                        uri = %uri,
                        matched_path,
                    )
                })
                .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
                    let user_agent = request
                        .headers()
                        .get("user-agent")
                        .and_then(|h| h.to_str().ok())
                        .unwrap_or("-");

                    tracing::info!(
                        target: "access_log",
                        method = %request.method(),
                        path = %request.uri().path(),
                        user_agent = %user_agent,
                        "request"
                    );
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::info!(
                            target: "access_log",
                            status = %response.status(),
                            latency_ms = %latency.as_millis(),
                            "response"
                        );
                    },
                ),
        )
        .with_state(app_state)
}
