//! Collaborator errors
//!
//! Malformed entry content is never an error here: it becomes a
//! [`Failure`](jardiff_core::Failure) and surfaces as `ERR_LEFT` / `ERR_RIGHT`.

use jardiff_core::KindError;

/// Errors building archives, settings or differs
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// Entry path empty after normalisation
    #[error("invalid entry path {path:?}")]
    InvalidEntryPath {
        /// Path as given
        path: String,
    },

    /// Entry path added twice
    #[error("duplicate entry {path:?}")]
    DuplicateEntry {
        /// Normalised path
        path: String,
    },

    /// Settings document could not be decoded
    #[error("invalid settings: {0}")]
    Settings(#[from] toml::de::Error),

    /// Diff category could not be built
    #[error("invalid kind: {0}")]
    Kind(#[from] KindError),
}
