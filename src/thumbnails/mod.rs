// Thumbnails - on-demand derived images keyed by source path
mod error;
mod handlers;

pub use error::ThumbnailError;
pub use handlers::thumbnail_handler;

use image::{DynamicImage, ImageFormat, codecs::jpeg::JpegEncoder, imageops::FilterType};
use std::{
    collections::HashMap,
    io::{BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::ThumbnailConfig;

pub type SharedThumbnailer = Arc<Thumbnailer>;

/// Get-or-create cache of thumbnails, stored as `<directory>/<date>/<filename>`.
///
/// Thumbnails are never regenerated once written. Concurrent requests for the
/// same thumbnail wait on one generation.
pub struct Thumbnailer {
    config: ThumbnailConfig,
    photo_root: PathBuf,
    in_flight: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl Thumbnailer {
    pub fn new(config: ThumbnailConfig, photo_root: PathBuf) -> Self {
        Self {
            config,
            photo_root,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Path of the thumbnail for a photo, generating it first if needed.
    /// `date` and `filename` must already be validated.
    pub async fn get_or_create(
        &self,
        date: &str,
        filename: &str,
    ) -> Result<PathBuf, ThumbnailError> {
        let thumbnail_path = self.config.directory.join(date).join(filename);

        if tokio::fs::try_exists(&thumbnail_path).await? {
            return Ok(thumbnail_path);
        }

        let lock = {
            let mut in_flight = self.in_flight.lock().await;
            Arc::clone(in_flight.entry(thumbnail_path.clone()).or_default())
        };
        let _guard = lock.lock().await;

        if tokio::fs::try_exists(&thumbnail_path).await? {
            debug!("Thumbnail generated while waiting: {:?}", thumbnail_path);
            return Ok(thumbnail_path);
        }

        let result = self.generate(date, filename, &thumbnail_path).await;

        // A later request may have replaced the entry after an earlier removal.
        let mut in_flight = self.in_flight.lock().await;
        if in_flight
            .get(&thumbnail_path)
            .is_some_and(|current| Arc::ptr_eq(current, &lock))
        {
            in_flight.remove(&thumbnail_path);
        }
        drop(in_flight);

        result.map(|_| thumbnail_path)
    }

    async fn generate(
        &self,
        date: &str,
        filename: &str,
        thumbnail_path: &Path,
    ) -> Result<(), ThumbnailError> {
        let source_path = self.photo_root.join(date).join(filename);

        match tokio::fs::metadata(&source_path).await {
            Ok(metadata) if metadata.is_file() => {}
            Ok(_) => return Err(ThumbnailError::SourceNotFound(source_path)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ThumbnailError::SourceNotFound(source_path));
            }
            Err(e) => return Err(e.into()),
        }

        if let Some(parent) = thumbnail_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        info!("Generating thumbnail for {}/{}", date, filename);

        let target = thumbnail_path.to_path_buf();
        let (width, height, quality) = (self.config.width, self.config.height, self.config.quality);

        tokio::task::spawn_blocking(move || {
            render_thumbnail(&source_path, &target, width, height, quality)
        })
        .await??;

        Ok(())
    }
}

fn render_thumbnail(
    source: &Path,
    target: &Path,
    width: u32,
    height: u32,
    quality: u8,
) -> Result<(), ThumbnailError> {
    let img = image::open(source)?;
    let resized = img.resize(width, height, FilterType::Lanczos3);

    // Thumbnails keep the source's format; unknown extensions fall back to JPEG.
    let format = ImageFormat::from_path(target).unwrap_or(ImageFormat::Jpeg);

    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let temp_path = target.with_file_name(format!(".{}.tmp", file_name));

    let written = write_image(&resized, &temp_path, format, quality);
    if let Err(e) = written {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e);
    }

    std::fs::rename(&temp_path, target)?;
    debug!(
        "Wrote {}x{} thumbnail to {:?}",
        resized.width(),
        resized.height(),
        target
    );
    Ok(())
}

fn write_image(
    img: &DynamicImage,
    path: &Path,
    format: ImageFormat,
    quality: u8,
) -> Result<(), ThumbnailError> {
    let mut writer = BufWriter::new(std::fs::File::create(path)?);

    if format == ImageFormat::Jpeg {
        let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
        rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, quality))?;
    } else {
        img.write_to(&mut writer, format)?;
    }

    writer.flush()?;
    Ok(())
}
