//! Archive differs
//!
//! Builds the primary [`Differ`] over a pair of [`Archive`]s and the manifest
//! differ used by the refinement pass.
//!
//! # Kinds
//! - `entry`: entry added, removed, or content changed
//! - `entry.time`: last-modified time differs (when enabled)
//! - `entry.extra`: extra-field bytes differ (when enabled)
//! - `entry.manifest.attribute`: manifest attribute added, removed, changed
//! - `entry.manifest.section`: named manifest section added or removed

use crate::archive::{entry_name, Archive, ArchiveEntry};
use crate::error::ArchiveError;
use crate::manifest::{Attributes, Manifest};
use crate::settings::Settings;
use jardiff_core::differs::{self, diff_maps, Hinter};
use jardiff_core::{CompositeDiffer, Differ, Diffs, Element, Emitter, Kind, Pair, SetDiffer};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Root kind of every archive diff
pub const ENTRY_KIND: &str = "entry";

/// Kinds minted by the archive differs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryKinds {
    /// `entry`
    pub entry: Kind,
    /// `entry.time`
    pub time: Kind,
    /// `entry.extra`
    pub extra: Kind,
    /// `entry.manifest.attribute`
    pub manifest_attribute: Kind,
    /// `entry.manifest.section`
    pub manifest_section: Kind,
}

impl EntryKinds {
    /// Build the kind set
    ///
    /// # Errors
    /// Returns [`ArchiveError::Kind`] if a kind literal fails validation
    pub fn new() -> Result<Self, ArchiveError> {
        let entry = Kind::parse(ENTRY_KIND)?;
        let manifest = entry.child("manifest")?;
        Ok(Self {
            time: entry.child("time")?,
            extra: entry.child("extra")?,
            manifest_attribute: manifest.child("attribute")?,
            manifest_section: manifest.child("section")?,
            entry,
        })
    }
}

fn hash_hinter() -> Hinter<ArchiveEntry> {
    Arc::new(|entry: &ArchiveEntry| Some(entry.hash().short()))
}

fn entry_emitter(emitter: &Emitter, path: &str) -> Emitter {
    emitter.for_name(emitter.name().append(&entry_name(path)))
}

/// Entry paths as structured names below the emitter
fn path_differ() -> SetDiffer<String> {
    SetDiffer::default().with_projection(|emitter: &Emitter, path: &String| entry_emitter(emitter, path))
}

/// Differ for two entries at the same path
///
/// Content is compared by hash and reported at the entry itself with short
/// hashes as hints.
#[must_use]
pub fn entry_differ(settings: &Settings, kinds: &EntryKinds) -> Differ<ArchiveEntry> {
    let mut composite = CompositeDiffer::new().child(
        "",
        differs::of_equality_with(
            |l: &ArchiveEntry, r: &ArchiveEntry| l.hash() == r.hash(),
            Some(hash_hinter()),
        ),
    );

    if settings.compare_timestamps {
        composite = composite.child(
            "",
            differs::of_optionals(Some(differs::display_hinter::<u64>()))
                .projecting(ArchiveEntry::last_modified)
                .emit_as_kind(kinds.time.clone()),
        );
    }

    if settings.compare_extra {
        composite = composite.child(
            "",
            differs::of_equality_with(|l: &ArchiveEntry, r: &ArchiveEntry| l.extra() == r.extra(), None)
                .emit_as_kind(kinds.extra.clone()),
        );
    }

    composite.into_differ()
}

/// Differ for two manifest entries
///
/// Main attributes are reported at `<manifest>/<attribute>`, named sections
/// at `<manifest>/<section>` and their attributes one level below. A side
/// that fails to parse is reported as `ERR_LEFT` / `ERR_RIGHT` at the
/// manifest itself.
#[must_use]
pub fn manifest_differ(kinds: &EntryKinds) -> Differ<ArchiveEntry> {
    let attributes = differs::of_map_values::<String, String, Attributes>()
        .emit_as_kind(kinds.manifest_attribute.clone());

    let main = attributes
        .clone()
        .projecting(|manifest: &Manifest| manifest.main().clone());

    let sections = differs::of_maps::<String, Attributes, BTreeMap<String, Attributes>>(attributes)
        .emit_as_kind(kinds.manifest_section.clone())
        .projecting(|manifest: &Manifest| manifest.sections().clone());

    differs::of_throwing(
        |entry: &ArchiveEntry| Manifest::parse(entry.content()),
        main.and(sections),
    )
}

/// Primary differ over two archives
///
/// Entries only on one side are `ADDED` / `REMOVED` (hinted with their short
/// hash); entries on both sides go through [`entry_differ`]. With
/// [`Settings::parallel`] the shared entries are compared on the rayon pool
/// and the partial results merged.
///
/// # Errors
/// Returns [`ArchiveError::Kind`] if the kind set cannot be built
pub fn archive_differ(settings: &Settings) -> Result<Differ<Archive>, ArchiveError> {
    let kinds = EntryKinds::new()?;
    let entries = entry_differ(settings, &kinds);
    let paths = path_differ();
    let hinter = hash_hinter();
    let parallel = settings.parallel;

    Ok(Differ::new(move |emitter, element: &Element<Archive>| {
        let maps = element.values().as_ref().map(Archive::entries);
        tracing::debug!(
            "Comparing {} left entries with {} right entries",
            maps.left.len(),
            maps.right.len()
        );

        if !parallel {
            return diff_maps(emitter, maps, &paths, &entries, Some(&hinter));
        }

        let presence: Diffs = diff_maps(emitter, maps, &paths, &Differ::none(), Some(&hinter))
            .into_iter()
            .collect();
        presence
            .merge(diff_shared_parallel(emitter, maps, &entries))
            .into_iter()
            .collect()
    }))
}

fn diff_shared_parallel(
    emitter: &Emitter,
    maps: Pair<&BTreeMap<String, ArchiveEntry>>,
    entries: &Differ<ArchiveEntry>,
) -> Diffs {
    let shared: Vec<(&String, &ArchiveEntry, &ArchiveEntry)> = maps
        .left
        .iter()
        .filter_map(|(path, left)| maps.right.get(path).map(|right| (path, left, right)))
        .collect();

    shared
        .par_iter()
        .map(|&(path, left, right)| {
            let here = entry_emitter(emitter, path);
            let element = Element::new(here.name().clone(), Pair::new(left.clone(), right.clone()));
            entries.diff(&here, &element).into_iter().collect::<Diffs>()
        })
        .reduce(Diffs::new, Diffs::merge)
}
