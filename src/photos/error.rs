use std::{path::PathBuf, sync::Arc};
use thiserror::Error;

/// Cloneable so the outcome of one failed rebuild can be handed to every
/// caller that was waiting on it.
#[derive(Debug, Clone, Error)]
pub enum PhotosError {
    #[error("Filesystem error at {path:?}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("Malformed date folder name: {0}")]
    MalformedDateKey(String),
}

impl PhotosError {
    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source: Arc::new(source),
        }
    }
}
