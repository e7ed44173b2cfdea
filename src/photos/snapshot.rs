use chrono::NaiveDate;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::time::Instant;

use super::{
    date_graph::build_date_graph,
    grouping::{group_pictures_by_date, paginate_groups},
    index::{PictureLookup, build_picture_index},
    types::{DateFolder, DateGroup, DateNeighbors, Page, Picture, PictureNeighbors},
};

/// A date folder ready to be indexed: key, parsed date and newest-first entries.
pub type DatedEntries = (String, NaiveDate, Arc<[String]>);

/// Immutable, fully built view of the photo tree. Published behind an `Arc`
/// and replaced wholesale on refresh.
#[derive(Debug)]
pub struct Snapshot {
    dates: Arc<[String]>,
    folders: Arc<[DateFolder]>,
    folder_positions: HashMap<String, usize>,
    pictures: Arc<[Picture]>,
    lookup: PictureLookup,
    groups: Arc<[DateGroup]>,
    pages: Arc<[Page]>,
    built_at: Instant,
}

impl Snapshot {
    /// Builds a snapshot from folders already sorted newest first.
    pub fn build(dated: Vec<DatedEntries>, pagination_threshold: usize, built_at: Instant) -> Self {
        let (keys, entries): (Vec<_>, Vec<_>) = dated
            .into_iter()
            .map(|(key, date, entries)| ((key, date), entries))
            .unzip();

        let nodes = build_date_graph(&keys);
        let index = build_picture_index(nodes, entries);
        let groups = group_pictures_by_date(&index.pictures);
        let pages = paginate_groups(&groups, pagination_threshold);

        let folder_positions = index
            .folders
            .iter()
            .enumerate()
            .map(|(i, folder)| (folder.name.clone(), i))
            .collect();

        Self {
            dates: keys.into_iter().map(|(key, _)| key).collect(),
            folders: index.folders.into(),
            folder_positions,
            pictures: index.pictures.into(),
            lookup: index.lookup,
            groups: groups.into(),
            pages: pages.into(),
            built_at,
        }
    }

    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.built_at.elapsed() < ttl
    }

    /// Date keys, newest first.
    pub fn dates(&self) -> Arc<[String]> {
        Arc::clone(&self.dates)
    }

    pub fn folders(&self) -> Arc<[DateFolder]> {
        Arc::clone(&self.folders)
    }

    pub fn folder(&self, date_key: &str) -> Option<&DateFolder> {
        self.folder_positions
            .get(date_key)
            .map(|&i| &self.folders[i])
    }

    pub fn date_neighbors(&self, date_key: &str) -> Option<DateNeighbors> {
        self.folder(date_key).map(|folder| DateNeighbors {
            previous: folder.previous.clone(),
            next: folder.next.clone(),
        })
    }

    pub fn pictures(&self) -> Arc<[Picture]> {
        Arc::clone(&self.pictures)
    }

    /// Pictures of one date, newest first. Unknown dates yield nothing.
    pub fn pictures_for_date(&self, date_key: &str) -> Vec<Picture> {
        self.folder(date_key)
            .map(|folder| self.pictures[folder.pictures.clone()].to_vec())
            .unwrap_or_default()
    }

    pub fn picture(&self, date_key: &str, filename: &str) -> Option<&Picture> {
        let position = *self.lookup.get(date_key)?.get(filename)?;
        self.pictures.get(position)
    }

    pub fn picture_neighbors(&self, picture: &Picture) -> PictureNeighbors {
        let position = picture.position;
        PictureNeighbors {
            previous: position
                .checked_sub(1)
                .and_then(|p| self.pictures.get(p))
                .cloned(),
            next: self.pictures.get(position + 1).cloned(),
        }
    }

    pub fn latest(&self, amount: usize) -> Vec<Picture> {
        self.pictures.iter().take(amount).cloned().collect()
    }

    pub fn grouped(&self) -> Arc<[DateGroup]> {
        Arc::clone(&self.groups)
    }

    pub fn pages(&self) -> Arc<[Page]> {
        Arc::clone(&self.pages)
    }

    /// Looks up a 1-indexed page.
    pub fn page(&self, number: usize) -> Option<&Page> {
        number.checked_sub(1).and_then(|i| self.pages.get(i))
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn has_date(&self, date_key: &str) -> bool {
        self.lookup.contains_key(date_key)
    }
}
