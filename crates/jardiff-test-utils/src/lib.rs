//! Testing utilities for jardiff workspace
//!
//! Shared archive fixtures, diff constructors and assertions.

#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

use jardiff_archive::{Archive, ArchiveEntry, MANIFEST_PATH};
use jardiff_core::{Diff, Diffs, Kind, Name, Pair, Verb};

/// Entries as `(path, text content)`
pub fn archive_of(entries: &[(&str, &str)]) -> Archive {
    entries
        .iter()
        .fold(Archive::builder(), |builder, (path, content)| {
            builder.entry(path, content.as_bytes().to_vec()).unwrap()
        })
        .build()
}

/// Archive with a manifest and the given extra entries
pub fn archive_with_manifest(manifest: &str, entries: &[(&str, &str)]) -> Archive {
    let mut all = vec![(MANIFEST_PATH, manifest)];
    all.extend_from_slice(entries);
    archive_of(&all)
}

/// Manifest text with the given main attributes, CRLF line endings
pub fn manifest_text(attributes: &[(&str, &str)]) -> String {
    let mut text = String::from("Manifest-Version: 1.0\r\n");
    for (key, value) in attributes {
        text.push_str(&format!("{key}: {value}\r\n"));
    }
    text.push_str("\r\n");
    text
}

/// Entry with content and metadata
pub fn entry(content: &str, last_modified: u64) -> ArchiveEntry {
    ArchiveEntry::new(content.as_bytes().to_vec()).with_last_modified(last_modified)
}

pub fn name(path: &str) -> Name {
    Name::parse(path).unwrap()
}

pub fn kind(kind: &str) -> Kind {
    Kind::parse(kind).unwrap()
}

pub fn diff(path: &str, kind_str: &str, verb: Verb) -> Diff {
    Diff::new(name(path), kind(kind_str), verb)
}

pub fn hinted_diff(path: &str, kind_str: &str, verb: Verb, left: &str, right: &str) -> Diff {
    Diff::with_hints(
        name(path),
        kind(kind_str),
        verb,
        Pair::new(Some(left.to_string()), Some(right.to_string())),
    )
}

/// `(name, kind, verb)` of every diff, in order
pub fn identities(diffs: &Diffs) -> Vec<(String, String, Verb)> {
    diffs
        .iter()
        .map(|d| (d.name().to_string(), d.kind().to_string(), d.verb()))
        .collect()
}

/// Install a test subscriber once; later calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
