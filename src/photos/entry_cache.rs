use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, OnceCell};
use tracing::debug;

use super::{error::PhotosError, source::DynPhotoSource};

type EntrySlot = Arc<OnceCell<Arc<[String]>>>;

/// Memoized per-date directory listings.
///
/// A date folder is read at most once for the lifetime of the cache; entries
/// are never invalidated. Date folders are treated as historical, so files
/// added to an already scanned folder stay invisible until the process
/// restarts. Concurrent lookups for the same uncached date share one read,
/// and a failed read leaves the slot empty so the next lookup retries.
pub struct DirectoryEntryCache {
    source: DynPhotoSource,
    slots: Mutex<HashMap<String, EntrySlot>>,
}

impl DirectoryEntryCache {
    pub fn new(source: DynPhotoSource) -> Self {
        Self {
            source,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Filenames of one date folder, newest first.
    pub async fn entries(&self, date_key: &str) -> Result<Arc<[String]>, PhotosError> {
        let slot = {
            let mut slots = self.slots.lock().await;
            Arc::clone(slots.entry(date_key.to_string()).or_default())
        };

        if let Some(entries) = slot.get() {
            debug!("Entry cache hit for {}", date_key);
            return Ok(Arc::clone(entries));
        }

        let entries = slot
            .get_or_try_init(|| async {
                let mut names = self.source.list_files(date_key).await?;
                names.sort_unstable_by(|a, b| b.cmp(a));
                debug!("Cached {} entries for {}", names.len(), date_key);
                Ok::<_, PhotosError>(Arc::<[String]>::from(names))
            })
            .await?;

        Ok(Arc::clone(entries))
    }

    pub async fn cached_dates(&self) -> usize {
        let slots = self.slots.lock().await;
        slots.values().filter(|slot| slot.initialized()).count()
    }
}
