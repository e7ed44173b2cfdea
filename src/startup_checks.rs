use crate::Config;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum StartupCheckError {
    #[error("Failed to create thumbnail directory: {0}")]
    ThumbnailDirectoryCreationFailed(#[from] std::io::Error),

    #[error("Photo source directory does not exist: {0}")]
    PhotoDirectoryMissing(String),

    #[error("Photo source directory is not readable: {0}")]
    PhotoDirectoryUnreadable(String),
}

impl StartupCheckError {
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            Self::PhotoDirectoryMissing(_) | Self::PhotoDirectoryUnreadable(_)
        )
    }
}

pub async fn perform_startup_checks(config: &Config) -> Result<(), Vec<StartupCheckError>> {
    let mut errors = Vec::new();

    info!("Performing startup checks...");

    let thumbnail_dir = &config.thumbnails.directory;
    if !thumbnail_dir.exists() {
        info!(
            "Thumbnail directory does not exist, creating: {:?}",
            thumbnail_dir
        );
        if let Err(e) = tokio::fs::create_dir_all(thumbnail_dir).await {
            error!("Failed to create thumbnail directory: {}", e);
            errors.push(StartupCheckError::ThumbnailDirectoryCreationFailed(e));
        }
    } else {
        info!("Thumbnail directory exists: {:?}", thumbnail_dir);
    }

    let photo_dir = &config.photos.source_directory;
    let photo_dir_name = photo_dir.display().to_string();
    if !photo_dir.exists() {
        error!("Photo source directory does not exist: {:?}", photo_dir);
        errors.push(StartupCheckError::PhotoDirectoryMissing(photo_dir_name));
    } else {
        match tokio::fs::read_dir(photo_dir).await {
            Ok(_) => info!("Photo source directory is accessible: {:?}", photo_dir),
            Err(e) => {
                error!("Photo source directory is not accessible: {}", e);
                errors.push(StartupCheckError::PhotoDirectoryUnreadable(photo_dir_name));
            }
        }
    }

    if config.photos.pagination_threshold == 0 {
        warn!("pagination_threshold is 0, every date will get its own page");
    }

    if errors.is_empty() {
        info!("All startup checks passed");
        Ok(())
    } else {
        error!("Startup checks failed with {} errors", errors.len());
        Err(errors)
    }
}
