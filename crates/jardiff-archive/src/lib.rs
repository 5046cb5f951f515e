//! Jardiff Archive
//!
//! Compares two JAR-like archives with the `jardiff-core` framework.
//!
//! # Core Concepts
//!
//! - [`Archive`]: In-memory entries keyed by path
//! - [`ContentHash`]: 32-byte BLAKE3 hash of entry content
//! - [`Manifest`]: Parsed `META-INF/MANIFEST.MF`
//! - [`Settings`]: Toggles for timestamp, extra-field and manifest handling
//! - [`archive_differ`]: Primary differ over two archives
//! - [`ManifestRefinement`]: Pass that turns a changed manifest into
//!   attribute-level diffs
//!
//! # Example
//!
//! ```rust,ignore
//! use jardiff_archive::{compare, Archive, Settings};
//!
//! let left = Archive::builder().entry("a.txt", b"one".to_vec())?.build();
//! let right = Archive::builder().entry("a.txt", b"two".to_vec())?.build();
//!
//! let outcome = compare(&Settings::default(), left, right)?;
//! println!("{}", outcome.result); // a.txt entry CHANGED (..., ...)
//! ```

#![warn(unreachable_pub)]

mod archive;
mod differ;
mod error;
mod hash;
mod manifest;
mod refine;
mod settings;

pub use archive::{entry_name, Archive, ArchiveBuilder, ArchiveEntry, MANIFEST_PATH};
pub use differ::{archive_differ, entry_differ, manifest_differ, EntryKinds, ENTRY_KIND};
pub use error::ArchiveError;
pub use hash::{ContentHash, HashError};
pub use manifest::{Attributes, Manifest, SECTION_NAME};
pub use refine::ManifestRefinement;
pub use settings::Settings;

use jardiff_core::{Element, Emitter, Pair, Plan, PlanOutcome};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Refinement passes for `settings`, in run order
///
/// # Errors
/// Returns [`ArchiveError::Kind`] if a strategy cannot be built
pub fn default_plan(settings: &Settings) -> Result<Plan<Archive, Settings>, ArchiveError> {
    let mut plan = Plan::new();
    if settings.refine_manifest {
        plan = plan.then(ManifestRefinement::new()?);
    }
    Ok(plan)
}

/// Compare two archives and refine the result
///
/// # Errors
/// Returns [`ArchiveError::Kind`] if the differ or plan cannot be built
pub fn compare(settings: &Settings, left: Archive, right: Archive) -> Result<PlanOutcome, ArchiveError> {
    let kinds = EntryKinds::new()?;
    let differ = archive_differ(settings)?;
    let plan = default_plan(settings)?;
    let subject = Element::root(Pair::new(left, right));
    Ok(plan.run(settings, &differ, &Emitter::new(kinds.entry), &subject))
}
