use jardiff_archive::{compare, Archive, ArchiveEntry, Settings, MANIFEST_PATH};
use jardiff_core::{Diffs, Verb};
use jardiff_test_utils::{
    archive_of, archive_with_manifest, diff, entry, identities, init_tracing, manifest_text,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::BTreeMap;

#[test]
fn test_changed_text_entry_is_one_changed_diff() {
    init_tracing();
    let left = archive_of(&[("a.txt", "same"), ("b.txt", "before")]);
    let right = archive_of(&[("a.txt", "same"), ("b.txt", "after")]);

    let outcome = compare(&Settings::default(), left, right).unwrap();
    assert_eq!(
        identities(&outcome.result),
        vec![("b.txt".to_string(), "entry".to_string(), Verb::Changed)]
    );
}

#[test]
fn test_entry_only_on_right_is_one_added_diff() {
    let left = archive_of(&[("a.txt", "same")]);
    let right = archive_of(&[("a.txt", "same"), ("com/example/New.class", "cafebabe")]);

    let outcome = compare(&Settings::default(), left, right).unwrap();
    assert_eq!(outcome.result.len(), 1);
    assert!(outcome.result.contains(&diff("com/example/New.class", "entry", Verb::Added)));
}

#[test]
fn test_manifest_class_path_refined_to_attribute() {
    init_tracing();
    let left = archive_with_manifest(&manifest_text(&[("Class-Path", ".")]), &[("a.txt", "x")]);
    let right = archive_with_manifest(&manifest_text(&[("Class-Path", ".,foo")]), &[("a.txt", "x")]);

    let outcome = compare(&Settings::default(), left, right).unwrap();

    assert!(outcome
        .initial
        .contains(&diff(MANIFEST_PATH, "entry", Verb::Changed)));
    assert_eq!(outcome.result.len(), 1);
    let only = outcome.result.iter().next().unwrap();
    assert_eq!(only.name().to_string(), "META-INF/MANIFEST.MF/Class-Path");
    assert_eq!(only.kind().as_str(), "entry.manifest.attribute");
    assert_eq!(only.verb(), Verb::Changed);
    assert_eq!(only.hints().left.as_deref(), Some("."));
    assert_eq!(only.hints().right.as_deref(), Some(".,foo"));

    assert_eq!(outcome.refinements.len(), 1);
    assert_eq!(outcome.refinements[0].strategy, "manifest");
}

#[test]
fn test_manifest_refinement_disabled_keeps_coarse_diff() {
    let left = archive_with_manifest(&manifest_text(&[("Class-Path", ".")]), &[]);
    let right = archive_with_manifest(&manifest_text(&[("Class-Path", ".,foo")]), &[]);

    let settings = Settings::default().with_refine_manifest(false);
    let outcome = compare(&settings, left, right).unwrap();
    assert!(outcome.refinements.is_empty());
    assert_eq!(outcome.result, outcome.initial);
    assert!(outcome.result.contains(&diff(MANIFEST_PATH, "entry", Verb::Changed)));
}

#[test]
fn test_unparseable_manifest_reported_not_aborted() {
    let left = archive_with_manifest("Manifest-Version: 1.0\n", &[("a.txt", "1")]);
    let right = archive_with_manifest("not a header\n", &[("a.txt", "2")]);

    let outcome = compare(&Settings::default(), left, right).unwrap();
    assert_eq!(
        identities(&outcome.result),
        vec![
            ("a.txt".to_string(), "entry".to_string(), Verb::Changed),
            (MANIFEST_PATH.to_string(), "entry".to_string(), Verb::ErrRight),
        ]
    );
}

#[test]
fn test_timestamps_from_settings_document() {
    let settings = Settings::from_toml_str("compare_timestamps = true").unwrap();
    let left = Archive::builder()
        .entry_with("a.txt", entry("x", 10))
        .unwrap()
        .build();
    let right = Archive::builder()
        .entry_with("a.txt", entry("x", 20))
        .unwrap()
        .build();

    let outcome = compare(&settings, left, right).unwrap();
    assert_eq!(outcome.result.to_string(), "a.txt entry.time CHANGED (10, 20)");
}

#[test]
fn test_outcome_serializes_to_json() {
    let left = archive_of(&[("a.txt", "1")]);
    let right = archive_of(&[]);
    let outcome = compare(&Settings::default(), left, right).unwrap();

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["result"][0]["verb"], "REMOVED");
    assert_eq!(json["result"][0]["name"], "a.txt");
    assert!(json["refinements"].as_array().unwrap()[0]["refinement"]["superseded"]
        .as_array()
        .unwrap()
        .is_empty());
}

#[test]
fn test_bracketed_and_empty_segment_paths_both_reported() {
    let left = archive_of(&[]);
    let right = archive_of(&[("a//b", "1"), ("{a//b}", "2")]);

    let outcome = compare(&Settings::default(), left, right).unwrap();
    assert_eq!(outcome.result.len(), 2);
    assert!(outcome
        .result
        .iter()
        .all(|d| d.verb() == Verb::Added));
}

#[test]
fn test_unbalanced_bracket_entry_survives_json() {
    let left = archive_of(&[("a{b/c", "1"), ("x}/y", "1")]);
    let right = archive_of(&[("a{b/c", "2")]);
    let outcome = compare(&Settings::default(), left, right).unwrap();
    assert_eq!(outcome.result.len(), 2);

    let json = serde_json::to_string(&outcome.result).unwrap();
    let back: Diffs = serde_json::from_str(&json).unwrap();
    assert_eq!(identities(&back), identities(&outcome.result));
}

fn archive_strategy() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[a-c]{1,2}(/[a-c]{1,2})?", "[xy]{0,3}", 0..8)
}

fn build(entries: &BTreeMap<String, String>) -> Archive {
    entries
        .iter()
        .fold(Archive::builder(), |builder, (path, content)| {
            builder
                .entry_with(path, ArchiveEntry::new(content.as_bytes().to_vec()))
                .unwrap()
        })
        .build()
}

proptest! {
    #[test]
    fn prop_archive_equal_to_itself(entries in archive_strategy()) {
        let outcome = compare(&Settings::default(), build(&entries), build(&entries)).unwrap();
        prop_assert!(outcome.result.is_empty());
    }

    #[test]
    fn prop_entry_verbs_follow_presence(
        left in archive_strategy(),
        right in archive_strategy(),
    ) {
        let outcome = compare(&Settings::default(), build(&left), build(&right)).unwrap();
        for d in &outcome.result {
            let path = d.name().to_string();
            let expected = match (left.get(&path), right.get(&path)) {
                (None, Some(_)) => Verb::Added,
                (Some(_), None) => Verb::Removed,
                (Some(l), Some(r)) => {
                    prop_assert_ne!(l, r);
                    Verb::Changed
                }
                (None, None) => unreachable!("diff at unknown path {path}"),
            };
            prop_assert_eq!(d.verb(), expected);
        }
    }

    #[test]
    fn prop_parallel_matches_sequential(
        left in archive_strategy(),
        right in archive_strategy(),
    ) {
        let parallel = compare(&Settings::default(), build(&left), build(&right)).unwrap();
        let sequential = compare(
            &Settings::default().with_parallel(false),
            build(&left),
            build(&right),
        )
        .unwrap();
        prop_assert_eq!(identities(&parallel.result), identities(&sequential.result));
    }
}
