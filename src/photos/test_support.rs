use async_trait::async_trait;
use std::{
    io,
    path::Path,
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use super::{
    error::PhotosError,
    source::{FsPhotoSource, PhotoSource},
};

/// Filesystem source that counts listings and can be told to fail.
pub(crate) struct CountingSource {
    inner: FsPhotoSource,
    pub folder_listings: AtomicUsize,
    pub file_listings: AtomicUsize,
    active_file_listings: AtomicUsize,
    peak_file_listings: AtomicUsize,
    pub fail_folder_listing: AtomicBool,
    pub failing_date: Mutex<Option<String>>,
}

impl CountingSource {
    pub fn new(root: &Path) -> Self {
        Self {
            inner: FsPhotoSource::new(root),
            folder_listings: AtomicUsize::new(0),
            file_listings: AtomicUsize::new(0),
            active_file_listings: AtomicUsize::new(0),
            peak_file_listings: AtomicUsize::new(0),
            fail_folder_listing: AtomicBool::new(false),
            failing_date: Mutex::new(None),
        }
    }

    pub fn folder_listings(&self) -> usize {
        self.folder_listings.load(Ordering::SeqCst)
    }

    pub fn file_listings(&self) -> usize {
        self.file_listings.load(Ordering::SeqCst)
    }

    /// Most file listings that were ever in progress at the same time.
    pub fn peak_file_listings(&self) -> usize {
        self.peak_file_listings.load(Ordering::SeqCst)
    }

    pub fn fail_date(&self, date_key: Option<&str>) {
        *self.failing_date.lock().unwrap() = date_key.map(str::to_string);
    }
}

#[async_trait]
impl PhotoSource for CountingSource {
    async fn list_date_folders(&self) -> Result<Vec<String>, PhotosError> {
        self.folder_listings.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        if self.fail_folder_listing.load(Ordering::SeqCst) {
            return Err(PhotosError::filesystem(
                self.inner.root(),
                io::Error::new(io::ErrorKind::PermissionDenied, "simulated failure"),
            ));
        }

        self.inner.list_date_folders().await
    }

    async fn list_files(&self, date_key: &str) -> Result<Vec<String>, PhotosError> {
        self.file_listings.fetch_add(1, Ordering::SeqCst);
        let active = self.active_file_listings.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_file_listings.fetch_max(active, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.active_file_listings.fetch_sub(1, Ordering::SeqCst);

        let failing = self.failing_date.lock().unwrap().clone();
        if failing.as_deref() == Some(date_key) {
            return Err(PhotosError::filesystem(
                self.inner.root().join(date_key),
                io::Error::new(io::ErrorKind::PermissionDenied, "simulated failure"),
            ));
        }

        self.inner.list_files(date_key).await
    }

    fn name(&self) -> &str {
        "counting"
    }
}

pub(crate) fn create_date_folder(root: &Path, date_key: &str, files: &[&str]) {
    let dir = root.join(date_key);
    std::fs::create_dir_all(&dir).unwrap();
    for file in files {
        std::fs::write(dir.join(file), file.as_bytes()).unwrap();
    }
}
