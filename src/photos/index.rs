use std::{collections::HashMap, sync::Arc};

use super::types::{DateFolder, DateNode, Picture};

pub type PictureLookup = HashMap<String, HashMap<String, usize>>;

pub struct PictureIndex {
    pub folders: Vec<DateFolder>,
    pub pictures: Vec<Picture>,
    /// date key -> filename -> position in `pictures`
    pub lookup: PictureLookup,
}

/// Flattens per-date entries into one newest-first picture sequence.
///
/// `entries[i]` belongs to `nodes[i]` and must hold only photo filenames,
/// newest first. Neighbors are implicit: the picture at position `i` is
/// preceded by `i - 1` and followed by `i + 1`, across date boundaries.
/// Every date gets an inner lookup map, even when it holds no pictures.
pub fn build_picture_index(nodes: Vec<DateNode>, entries: Vec<Arc<[String]>>) -> PictureIndex {
    debug_assert_eq!(nodes.len(), entries.len());

    let total = entries.iter().map(|e| e.len()).sum();
    let mut pictures = Vec::with_capacity(total);
    let mut folders = Vec::with_capacity(nodes.len());
    let mut lookup = PictureLookup::with_capacity(nodes.len());

    for (node, entries) in nodes.into_iter().zip(entries) {
        let start = pictures.len();
        let by_name = lookup.entry(node.key.clone()).or_default();

        for filename in entries.iter() {
            let position = pictures.len();
            by_name.insert(filename.clone(), position);
            pictures.push(Picture {
                date: node.key.clone(),
                filename: filename.clone(),
                position,
            });
        }

        folders.push(DateFolder {
            name: node.key,
            date: node.date,
            entries,
            previous: node.previous,
            next: node.next,
            pictures: start..pictures.len(),
        });
    }

    PictureIndex {
        folders,
        pictures,
        lookup,
    }
}
