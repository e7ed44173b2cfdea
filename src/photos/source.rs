use async_trait::async_trait;
use std::{path::PathBuf, sync::Arc};
use tracing::debug;

use super::error::PhotosError;

/// Directory-listing collaborator the index is built from.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// Names of the directories directly under the photo root.
    async fn list_date_folders(&self) -> Result<Vec<String>, PhotosError>;

    /// Names of the regular files directly inside one date folder.
    async fn list_files(&self, date_key: &str) -> Result<Vec<String>, PhotosError>;

    fn name(&self) -> &str;
}

pub type DynPhotoSource = Arc<dyn PhotoSource>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Directory,
    File,
}

pub struct FsPhotoSource {
    root: PathBuf,
    name: String,
}

impl FsPhotoSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = format!("filesystem:{}", root.display());
        Self { root, name }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    async fn list_entries(
        &self,
        dir: PathBuf,
        kind: EntryKind,
    ) -> Result<Vec<String>, PhotosError> {
        debug!("Listing {:?} entries in {:?}", kind, dir);

        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| PhotosError::filesystem(&dir, e))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| PhotosError::filesystem(&dir, e))?
        {
            let file_name = entry.file_name().to_string_lossy().to_string();
            if file_name.starts_with('.') {
                continue;
            }

            // Follows symlinks, so a linked date folder or photo counts as its target.
            let metadata = tokio::fs::metadata(entry.path())
                .await
                .map_err(|e| PhotosError::filesystem(entry.path(), e))?;

            let matches = match kind {
                EntryKind::Directory => metadata.is_dir(),
                EntryKind::File => metadata.is_file(),
            };
            if matches {
                names.push(file_name);
            }
        }

        Ok(names)
    }
}

#[async_trait]
impl PhotoSource for FsPhotoSource {
    async fn list_date_folders(&self) -> Result<Vec<String>, PhotosError> {
        self.list_entries(self.root.clone(), EntryKind::Directory)
            .await
    }

    async fn list_files(&self, date_key: &str) -> Result<Vec<String>, PhotosError> {
        self.list_entries(self.root.join(date_key), EntryKind::File)
            .await
    }

    fn name(&self) -> &str {
        &self.name
    }
}
