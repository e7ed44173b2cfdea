use chrono::NaiveDate;
use serde::Serialize;
use std::{ops::Range, sync::Arc, time::Duration};

use super::error::PhotosError;

pub const DEFAULT_CACHE_TIME_TO_LIVE_MS: u64 = 5000;
pub const DEFAULT_PAGINATION_THRESHOLD: usize = 50;

#[derive(Debug, Clone)]
pub struct PhotosConfig {
    pub cache_time_to_live: Duration,
    /// Pictures-per-page target. Zero puts every date group on its own page.
    pub pagination_threshold: usize,
}

impl Default for PhotosConfig {
    fn default() -> Self {
        Self {
            cache_time_to_live: Duration::from_millis(DEFAULT_CACHE_TIME_TO_LIVE_MS),
            pagination_threshold: DEFAULT_PAGINATION_THRESHOLD,
        }
    }
}

/// Parses a `YYYYMMDD` folder name into a calendar date.
pub fn parse_date_key(key: &str) -> Result<NaiveDate, PhotosError> {
    if key.len() != 8 || !key.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PhotosError::MalformedDateKey(key.to_string()));
    }

    NaiveDate::parse_from_str(key, "%Y%m%d")
        .map_err(|_| PhotosError::MalformedDateKey(key.to_string()))
}

/// `YYYY-MM-DD` form of a date key; keys that don't parse are returned as-is.
pub fn display_date_key(key: &str) -> String {
    parse_date_key(key)
        .map(|date| format_display_date(&date))
        .unwrap_or_else(|_| key.to_string())
}

fn format_display_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// One node of the chronological date chain. `previous` is the next-newer
/// date and `next` the next-older one, following the newest-first order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateNode {
    pub key: String,
    pub date: NaiveDate,
    pub previous: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DateFolder {
    pub name: String,
    pub date: NaiveDate,
    /// Filenames, newest first.
    pub entries: Arc<[String]>,
    pub previous: Option<String>,
    pub next: Option<String>,
    /// Positions of this date's pictures in the flat picture sequence.
    pub pictures: Range<usize>,
}

impl DateFolder {
    pub fn display_date(&self) -> String {
        format_display_date(&self.date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Picture {
    pub date: String,
    pub filename: String,
    /// Index into the flat newest-first picture sequence.
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateNeighbors {
    pub previous: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PictureNeighbors {
    pub previous: Option<Picture>,
    pub next: Option<Picture>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateGroup {
    pub date: String,
    pub pictures: Vec<Picture>,
}

impl DateGroup {
    pub fn len(&self) -> usize {
        self.pictures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pictures.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub groups: Vec<DateGroup>,
}

impl Page {
    pub fn picture_count(&self) -> usize {
        self.groups.iter().map(DateGroup::len).sum()
    }
}
