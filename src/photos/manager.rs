use futures::future::try_join_all;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tokio::{
    sync::{Mutex, RwLock},
    time::Instant,
};
use tracing::{debug, info, warn};

use super::{
    entry_cache::DirectoryEntryCache,
    error::PhotosError,
    snapshot::{DatedEntries, Snapshot},
    source::DynPhotoSource,
    types::{
        DateGroup, DateNeighbors, Page, Picture, PhotosConfig, PictureNeighbors, parse_date_key,
    },
};

pub type SharedPhotoManager = Arc<PhotoManager>;

/// Owns the published snapshot and rebuilds it when it goes stale.
///
/// Every accessor checks freshness first. At most one rebuild runs at a time;
/// callers that find the snapshot stale queue on the rebuild lock and pick up
/// whatever the running rebuild publishes. A failed rebuild publishes nothing.
pub struct PhotoManager {
    config: PhotosConfig,
    source: DynPhotoSource,
    entry_cache: DirectoryEntryCache,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    /// Held for the duration of a rebuild; guards the error of the last failed one.
    rebuild_lock: Mutex<Option<PhotosError>>,
    rebuild_attempts: AtomicU64,
}

impl PhotoManager {
    pub fn new(config: PhotosConfig, source: DynPhotoSource) -> Self {
        Self {
            config,
            entry_cache: DirectoryEntryCache::new(Arc::clone(&source)),
            source,
            snapshot: RwLock::new(None),
            rebuild_lock: Mutex::new(None),
            rebuild_attempts: AtomicU64::new(0),
        }
    }

    /// The published snapshot, without checking freshness.
    pub async fn current_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.read().await.clone()
    }

    async fn fresh_snapshot(&self) -> Option<Arc<Snapshot>> {
        let snapshot = self.snapshot.read().await;
        snapshot
            .as_ref()
            .filter(|s| s.is_fresh(self.config.cache_time_to_live))
            .cloned()
    }

    /// Returns a fresh snapshot, rebuilding first if needed.
    pub async fn snapshot(&self) -> Result<Arc<Snapshot>, PhotosError> {
        if let Some(snapshot) = self.fresh_snapshot().await {
            return Ok(snapshot);
        }

        let attempts_seen = self.rebuild_attempts.load(Ordering::Acquire);
        let mut last_failure = self.rebuild_lock.lock().await;

        if let Some(snapshot) = self.fresh_snapshot().await {
            debug!("Snapshot was refreshed while waiting");
            return Ok(snapshot);
        }

        // A rebuild finished while we queued: take its outcome instead of starting another.
        if self.rebuild_attempts.load(Ordering::Acquire) != attempts_seen {
            if let Some(snapshot) = self.current_snapshot().await {
                debug!("Concurrent rebuild failed, serving previous snapshot");
                return Ok(snapshot);
            }
            if let Some(e) = last_failure.as_ref() {
                debug!("Concurrent rebuild failed with no previous snapshot");
                return Err(e.clone());
            }
        }

        self.rebuild_locked(&mut last_failure).await
    }

    /// Rebuilds regardless of freshness.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, PhotosError> {
        let mut last_failure = self.rebuild_lock.lock().await;
        self.rebuild_locked(&mut last_failure).await
    }

    async fn rebuild_locked(
        &self,
        last_failure: &mut Option<PhotosError>,
    ) -> Result<Arc<Snapshot>, PhotosError> {
        let result = self.build_snapshot().await;

        let outcome = match result {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                *self.snapshot.write().await = Some(Arc::clone(&snapshot));
                *last_failure = None;
                Ok(snapshot)
            }
            Err(e) => {
                warn!("Photo index rebuild failed, keeping previous snapshot: {}", e);
                *last_failure = Some(e.clone());
                Err(e)
            }
        };

        self.rebuild_attempts.fetch_add(1, Ordering::AcqRel);
        outcome
    }

    async fn build_snapshot(&self) -> Result<Snapshot, PhotosError> {
        let started = Instant::now();
        info!("Refreshing photo index from {}", self.source.name());

        let mut dates = self
            .source
            .list_date_folders()
            .await?
            .into_iter()
            .map(|name| parse_date_key(&name).map(|date| (name, date)))
            .collect::<Result<Vec<_>, _>>()?;

        dates.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));

        let dated: Vec<DatedEntries> = try_join_all(dates.into_iter().map(|(key, date)| async move {
            let entries = self.entry_cache.entries(&key).await?;
            Ok::<_, PhotosError>((key, date, entries))
        }))
        .await?;

        let snapshot = Snapshot::build(dated, self.config.pagination_threshold, Instant::now());

        info!(
            "Indexed {} pictures across {} dates into {} pages in {}ms",
            snapshot.pictures().len(),
            snapshot.dates().len(),
            snapshot.page_count(),
            started.elapsed().as_millis()
        );

        Ok(snapshot)
    }

    /// Date keys, newest first.
    pub async fn list_known_date_keys(&self) -> Result<Arc<[String]>, PhotosError> {
        Ok(self.snapshot().await?.dates())
    }

    pub async fn get_date_neighbors(
        &self,
        date_key: &str,
    ) -> Result<Option<DateNeighbors>, PhotosError> {
        Ok(self.snapshot().await?.date_neighbors(date_key))
    }

    pub async fn list_grouped_pictures(&self) -> Result<Arc<[DateGroup]>, PhotosError> {
        Ok(self.snapshot().await?.grouped())
    }

    pub async fn list_paginated_pictures(&self) -> Result<Arc<[Page]>, PhotosError> {
        Ok(self.snapshot().await?.pages())
    }

    pub async fn list_pictures_for_date(
        &self,
        date_key: &str,
    ) -> Result<Vec<Picture>, PhotosError> {
        Ok(self.snapshot().await?.pictures_for_date(date_key))
    }

    pub async fn list_all_pictures(&self) -> Result<Arc<[Picture]>, PhotosError> {
        Ok(self.snapshot().await?.pictures())
    }

    pub async fn get_picture(
        &self,
        date_key: &str,
        filename: &str,
    ) -> Result<Option<Picture>, PhotosError> {
        Ok(self.snapshot().await?.picture(date_key, filename).cloned())
    }

    /// A picture together with its newer and older neighbors.
    pub async fn get_picture_with_neighbors(
        &self,
        date_key: &str,
        filename: &str,
    ) -> Result<Option<(Picture, PictureNeighbors)>, PhotosError> {
        let snapshot = self.snapshot().await?;
        Ok(snapshot.picture(date_key, filename).map(|picture| {
            let neighbors = snapshot.picture_neighbors(picture);
            (picture.clone(), neighbors)
        }))
    }
}
