//! Manifest refinement pass
//!
//! Replaces a coarse "manifest bytes changed" diff with attribute-level
//! findings.

use crate::archive::{entry_name, Archive, ArchiveEntry, MANIFEST_PATH};
use crate::differ::{manifest_differ, EntryKinds};
use crate::error::ArchiveError;
use crate::settings::Settings;
use jardiff_core::{Diff, Differ, Diffs, Element, Emitter, Name, Refinement, RefinementStrategy, Verb};

/// Refines a changed `META-INF/MANIFEST.MF`
///
/// When the diffs so far hold a `CHANGED` of exact kind `entry` at the
/// manifest, that diff is superseded by the manifest differ's findings,
/// which may be none at all when the manifests only differ in layout.
#[derive(Debug, Clone)]
pub struct ManifestRefinement {
    kinds: EntryKinds,
    name: Name,
    differ: Differ<ArchiveEntry>,
}

impl ManifestRefinement {
    /// Create the strategy
    ///
    /// # Errors
    /// Returns [`ArchiveError::Kind`] if the kind set cannot be built
    pub fn new() -> Result<Self, ArchiveError> {
        let kinds = EntryKinds::new()?;
        Ok(Self {
            differ: manifest_differ(&kinds),
            name: entry_name(MANIFEST_PATH),
            kinds,
        })
    }

    fn coarse(&self) -> Diff {
        Diff::new(self.name.clone(), self.kinds.entry.clone(), Verb::Changed)
    }
}

impl RefinementStrategy<Archive, Settings> for ManifestRefinement {
    fn refine(&self, _settings: &Settings, diffs: &Diffs, subject: &Element<Archive>) -> Refinement {
        let coarse = self.coarse();
        if !diffs.contains(&coarse) {
            tracing::trace!("No changed manifest to refine");
            return Refinement::empty();
        }

        let Some(entries) = subject
            .values()
            .as_ref()
            .map(|archive| archive.entry(MANIFEST_PATH).cloned())
            .transpose()
        else {
            return Refinement::empty();
        };

        let emitter = Emitter::at(self.kinds.entry.clone(), self.name.clone());
        let element = Element::new(self.name.clone(), entries);
        let refined: Diffs = self.differ.diff(&emitter, &element).into_iter().collect();
        Refinement::new([coarse], refined)
    }

    fn name(&self) -> &'static str {
        "manifest"
    }
}
