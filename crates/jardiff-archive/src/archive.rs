//! In-memory archive model
//!
//! Provides [`Archive`], an ordered map from entry path to [`ArchiveEntry`],
//! and [`entry_name`], which turns an entry path into a diff address.

use crate::error::ArchiveError;
use crate::hash::ContentHash;
use jardiff_core::{Name, SEPARATOR};
use std::collections::btree_map::{self, BTreeMap};
use std::sync::Arc;

/// Path of the JAR manifest
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// One archive entry: content plus metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    content: Arc<[u8]>,
    hash: ContentHash,
    last_modified: Option<u64>,
    extra: Arc<[u8]>,
}

impl ArchiveEntry {
    /// Create entry, hashing its content
    #[must_use]
    pub fn new(content: impl Into<Arc<[u8]>>) -> Self {
        let content = content.into();
        Self {
            hash: ContentHash::compute(&content),
            content,
            last_modified: None,
            extra: Arc::from(Vec::<u8>::new()),
        }
    }

    /// With last-modified time (seconds since the epoch)
    #[inline]
    #[must_use]
    pub fn with_last_modified(mut self, seconds: u64) -> Self {
        self.last_modified = Some(seconds);
        self
    }

    /// With extra-field bytes
    #[inline]
    #[must_use]
    pub fn with_extra(mut self, extra: impl Into<Arc<[u8]>>) -> Self {
        self.extra = extra.into();
        self
    }

    /// Raw content
    #[inline]
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Content hash
    #[inline]
    #[must_use]
    pub fn hash(&self) -> &ContentHash {
        &self.hash
    }

    /// Last-modified time, if recorded
    #[inline]
    #[must_use]
    pub fn last_modified(&self) -> Option<u64> {
        self.last_modified
    }

    /// Extra-field bytes
    #[inline]
    #[must_use]
    pub fn extra(&self) -> &[u8] {
        &self.extra
    }

    /// Content size in bytes
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// Ordered set of entries keyed by normalised path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    entries: BTreeMap<String, ArchiveEntry>,
}

impl Archive {
    /// Start building an archive
    #[inline]
    #[must_use]
    pub fn builder() -> ArchiveBuilder {
        ArchiveBuilder::default()
    }

    /// Entry at `path` (trailing `/` ignored)
    #[must_use]
    pub fn entry(&self, path: &str) -> Option<&ArchiveEntry> {
        self.entries.get(normalize(path))
    }

    /// All entries by path
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &BTreeMap<String, ArchiveEntry> {
        &self.entries
    }

    /// Iterate `(path, entry)` in path order
    #[inline]
    pub fn iter(&self) -> btree_map::Iter<'_, String, ArchiveEntry> {
        self.entries.iter()
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the archive has no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Archive {
    type Item = (&'a String, &'a ArchiveEntry);
    type IntoIter = btree_map::Iter<'a, String, ArchiveEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Builder for [`Archive`]
#[derive(Debug, Default)]
pub struct ArchiveBuilder {
    entries: BTreeMap<String, ArchiveEntry>,
}

impl ArchiveBuilder {
    /// Add an entry with the given content
    ///
    /// # Errors
    /// See [`ArchiveBuilder::entry_with`]
    pub fn entry(self, path: &str, content: impl Into<Arc<[u8]>>) -> Result<Self, ArchiveError> {
        self.entry_with(path, ArchiveEntry::new(content))
    }

    /// Add a directory entry (empty content)
    ///
    /// # Errors
    /// See [`ArchiveBuilder::entry_with`]
    pub fn directory(self, path: &str) -> Result<Self, ArchiveError> {
        self.entry_with(path, ArchiveEntry::new(Vec::<u8>::new()))
    }

    /// Add a prepared entry
    ///
    /// # Errors
    /// - [`ArchiveError::InvalidEntryPath`] if the path is empty once a
    ///   trailing `/` is removed
    /// - [`ArchiveError::DuplicateEntry`] if the normalised path was already
    ///   added
    pub fn entry_with(mut self, path: &str, entry: ArchiveEntry) -> Result<Self, ArchiveError> {
        let normalized = normalize(path);
        if normalized.is_empty() {
            return Err(ArchiveError::InvalidEntryPath {
                path: path.to_string(),
            });
        }
        if self.entries.contains_key(normalized) {
            return Err(ArchiveError::DuplicateEntry {
                path: normalized.to_string(),
            });
        }
        self.entries.insert(normalized.to_string(), entry);
        Ok(self)
    }

    /// Finish building
    #[inline]
    #[must_use]
    pub fn build(self) -> Archive {
        Archive {
            entries: self.entries,
        }
    }
}

fn normalize(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

/// Address of an entry
///
/// Slashes in the path are structure; every other character is literal. A
/// path with an empty segment (`a//b`, `/a`) becomes one bracketed segment.
/// Distinct normalised paths always get distinct names.
#[must_use]
pub fn entry_name(path: &str) -> Name {
    let path = normalize(path);
    if path.split(SEPARATOR).any(str::is_empty) {
        tracing::trace!("Entry path {} kept as one segment", path);
        return Name::single(path);
    }
    path.split(SEPARATOR)
        .fold(Name::root(), |name, segment| name.append_segment(segment))
}
