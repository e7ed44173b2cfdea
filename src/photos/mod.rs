// Photo index - dated folders into a navigable, TTL-refreshed snapshot
mod date_graph;
mod entry_cache;
mod error;
mod grouping;
mod index;
mod manager;
mod snapshot;
mod source;
mod types;

pub use date_graph::build_date_graph;
pub use entry_cache::DirectoryEntryCache;
pub use error::PhotosError;
pub use grouping::{group_pictures_by_date, paginate_groups};
pub use index::{PictureIndex, build_picture_index};
pub use manager::{PhotoManager, SharedPhotoManager};
pub use snapshot::{DatedEntries, Snapshot};
pub use source::{DynPhotoSource, FsPhotoSource, PhotoSource};
pub use types::*;

#[cfg(test)]
mod test_support;
