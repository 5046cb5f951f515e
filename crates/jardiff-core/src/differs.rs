//! Combinator library
//!
//! Lifts a "both sides meaningfully present" comparison over a container
//! shape. Each shape comes in two forms:
//!
//! - `diff_*`: compare one paired value now, given the emitter
//! - `of_*`: build a reusable [`Differ`]
//!
//! # Shapes
//! - equality: `CHANGED` when the values differ
//! - optionals: `ADDED` / `REMOVED` on one-sided presence
//! - results: `ERR_LEFT` / `ERR_RIGHT` on one- or two-sided failure
//! - at most one: plurality is a failure, then optional presence
//! - sets and maps: union walk via [`SetDiffer`]
//!
//! Defaults fall back to structural equality and to no-op intersection.

use crate::diff::Diff;
use crate::differ::Differ;
use crate::element::Element;
use crate::emitter::Emitter;
use crate::failure::Failure;
use crate::pair::Pair;
use crate::set_differ::{Member, SetDiffer};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

/// Produces a presentation hint for a value
pub type Hinter<T> = Arc<dyn Fn(&T) -> Option<String> + Send + Sync>;

/// Failure message for more than one value where at most one was expected
pub const UNEXPECTED_PLURALITY: &str = "unexpected plurality";

/// Hint with the value's `Display` form
#[must_use]
pub fn display_hinter<T: Display>() -> Hinter<T> {
    Arc::new(|value: &T| Some(value.to_string()))
}

/// Compare two present values
///
/// Equal values yield nothing. Otherwise one `CHANGED`, hinted only when the
/// hinter produces a hint for both sides.
pub fn diff_equality<T, E>(
    emitter: &Emitter,
    values: Pair<&T>,
    eq: E,
    hinter: Option<&Hinter<T>>,
) -> Vec<Diff>
where
    E: FnOnce(&T, &T) -> bool,
{
    if eq(values.left, values.right) {
        return Vec::new();
    }
    let hints = hinter.and_then(|h| values.map(|v| h(v)).transpose());
    match hints {
        Some(hints) => vec![emitter.changed_with(hints.map(Some))],
        None => vec![emitter.changed()],
    }
}

/// Structural equality, no hints
#[must_use]
pub fn of_equality<T: PartialEq + 'static>() -> Differ<T> {
    Differ::new(|emitter, element: &Element<T>| {
        diff_equality(emitter, element.values().as_ref(), |l, r| l == r, None)
    })
}

/// Structural equality, `CHANGED` hinted by `hinter`
#[must_use]
pub fn of_equality_hinted<T: PartialEq + 'static>(hinter: Hinter<T>) -> Differ<T> {
    Differ::new(move |emitter, element: &Element<T>| {
        diff_equality(
            emitter,
            element.values().as_ref(),
            |l, r| l == r,
            Some(&hinter),
        )
    })
}

/// Custom equality predicate
#[must_use]
pub fn of_equality_with<T, E>(eq: E, hinter: Option<Hinter<T>>) -> Differ<T>
where
    T: 'static,
    E: Fn(&T, &T) -> bool + Send + Sync + 'static,
{
    Differ::new(move |emitter, element: &Element<T>| {
        diff_equality(emitter, element.values().as_ref(), &eq, hinter.as_ref())
    })
}

/// Compare two optionally present values
///
/// `ADDED` is hinted by the right value, `REMOVED` by the left one; when both
/// are present `both` decides.
pub fn diff_optionals<T, B>(
    emitter: &Emitter,
    values: Pair<Option<&T>>,
    hinter: Option<&Hinter<T>>,
    both: B,
) -> Vec<Diff>
where
    B: FnOnce(&Emitter, Pair<&T>) -> Vec<Diff>,
{
    let hint = |value: &T| hinter.and_then(|h| h(value));
    match (values.left, values.right) {
        (None, None) => Vec::new(),
        (None, Some(right)) => vec![emitter.added_with(hint(right))],
        (Some(left), None) => vec![emitter.removed_with(hint(left))],
        (Some(left), Some(right)) => both(emitter, Pair::new(left, right)),
    }
}

/// Optional values, equality when both are present
#[must_use]
pub fn of_optionals<T: PartialEq + 'static>(hinter: Option<Hinter<T>>) -> Differ<Option<T>> {
    Differ::new(move |emitter, element: &Element<Option<T>>| {
        diff_optionals(
            emitter,
            element.values().as_ref().map(Option::as_ref),
            hinter.as_ref(),
            |em, present| diff_equality(em, present, |l, r| l == r, hinter.as_ref()),
        )
    })
}

/// Optional values, `present` when both are present
#[must_use]
pub fn of_optionals_with<T>(hinter: Option<Hinter<T>>, present: Differ<T>) -> Differ<Option<T>>
where
    T: Clone + 'static,
{
    of_nullables(|value: &Option<T>| value.clone(), hinter, present)
}

/// Derive an optional value from each side, `present` when both exist
#[must_use]
pub fn of_nullables<S, T, F>(derive: F, hinter: Option<Hinter<T>>, present: Differ<T>) -> Differ<S>
where
    S: 'static,
    T: 'static,
    F: Fn(&S) -> Option<T> + Send + Sync + 'static,
{
    Differ::new(move |emitter, element: &Element<S>| {
        let Pair { left, right } = element.values().as_ref().map(&derive);
        match (left, right) {
            (Some(left), Some(right)) => present.diff(
                emitter,
                &Element::new(element.name().clone(), Pair::new(left, right)),
            ),
            (left, right) => diff_optionals(
                emitter,
                Pair::new(left.as_ref(), right.as_ref()),
                hinter.as_ref(),
                |_, _| Vec::new(),
            ),
        }
    })
}

/// Compare two outcomes
///
/// Failures become `ERR_LEFT` / `ERR_RIGHT`; when both sides fail, the left
/// error comes first. Two successes go to `both`.
pub fn diff_results<T, B>(
    emitter: &Emitter,
    values: Pair<&Result<T, Failure>>,
    both: B,
) -> Vec<Diff>
where
    B: FnOnce(&Emitter, Pair<&T>) -> Vec<Diff>,
{
    match (values.left, values.right) {
        (Ok(left), Ok(right)) => both(emitter, Pair::new(left, right)),
        (Err(left), Ok(_)) => vec![emitter.err_left(left)],
        (Ok(_), Err(right)) => vec![emitter.err_right(right)],
        (Err(left), Err(right)) => vec![emitter.err_left(left), emitter.err_right(right)],
    }
}

/// Outcomes, equality when both succeed
#[must_use]
pub fn of_results<T: PartialEq + 'static>(hinter: Option<Hinter<T>>) -> Differ<Result<T, Failure>> {
    Differ::new(move |emitter, element: &Element<Result<T, Failure>>| {
        diff_results(emitter, element.values().as_ref(), |em, ok| {
            diff_equality(em, ok, |l, r| l == r, hinter.as_ref())
        })
    })
}

/// Derive a fallible value from each side, `success` when both succeed
#[must_use]
pub fn of_throwing<S, T, F>(derive: F, success: Differ<T>) -> Differ<S>
where
    S: 'static,
    T: 'static,
    F: Fn(&S) -> Result<T, Failure> + Send + Sync + 'static,
{
    Differ::new(move |emitter, element: &Element<S>| {
        let Pair { left, right } = element.values().as_ref().map(&derive);
        match (left, right) {
            (Ok(left), Ok(right)) => success.diff(
                emitter,
                &Element::new(element.name().clone(), Pair::new(left, right)),
            ),
            (left, right) => diff_results(emitter, Pair::new(&left, &right), |_, _| Vec::new()),
        }
    })
}

/// Reduce to zero or one value; two or more is a failure
///
/// # Errors
/// A [`Failure`] with message [`UNEXPECTED_PLURALITY`] when the iterator
/// yields more than one item.
pub fn at_most_one<I: IntoIterator>(values: I) -> Result<Option<I::Item>, Failure> {
    let mut iter = values.into_iter();
    let first = iter.next();
    if first.is_some() && iter.next().is_some() {
        return Err(Failure::new(UNEXPECTED_PLURALITY));
    }
    Ok(first)
}

/// Compare two collections expected to hold at most one value each
///
/// Plurality surfaces through [`diff_results`], the single values through
/// [`diff_optionals`].
pub fn diff_at_most_one<'a, T, I, B>(
    emitter: &Emitter,
    values: Pair<I>,
    hinter: Option<&Hinter<T>>,
    both: B,
) -> Vec<Diff>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    B: FnOnce(&Emitter, Pair<&T>) -> Vec<Diff>,
{
    let reduced = values.map(at_most_one);
    diff_results(emitter, reduced.as_ref(), |em, single| {
        diff_optionals(em, single.map(|value| *value), hinter, both)
    })
}

/// Collections of at most one value, equality on the single values
#[must_use]
pub fn of_at_most_one<T, C>(hinter: Option<Hinter<T>>) -> Differ<C>
where
    T: PartialEq + 'static,
    C: 'static,
    for<'a> &'a C: IntoIterator<Item = &'a T>,
{
    Differ::new(move |emitter, element: &Element<C>| {
        diff_at_most_one(
            emitter,
            element.values().as_ref(),
            hinter.as_ref(),
            |em, single| diff_equality(em, single, |l, r| l == r, hinter.as_ref()),
        )
    })
}

/// Sorted set union with member-named children
pub fn diff_sets<T, C>(emitter: &Emitter, values: Pair<&C>, hinter: Option<&Hinter<T>>) -> Vec<Diff>
where
    T: Member + Ord + Display,
    for<'a> &'a C: IntoIterator<Item = &'a T>,
{
    let mut differ = SetDiffer::<T>::default();
    if let Some(hinter) = hinter {
        differ = differ.with_hinter(Arc::clone(hinter));
    }
    differ.diff(emitter, values)
}

/// Set union as a differ
#[must_use]
pub fn of_sets<T, C>(hinter: Option<Hinter<T>>) -> Differ<C>
where
    T: Member + Ord + Display,
    C: 'static,
    for<'a> &'a C: IntoIterator<Item = &'a T>,
{
    let differ = SetDiffer::<T>::default();
    match hinter {
        Some(hinter) => differ.with_hinter(hinter).into_differ(),
        None => differ.into_differ(),
    }
}

/// Set union with a configured [`SetDiffer`]
#[must_use]
pub fn of_sets_with<T, C>(differ: SetDiffer<T>) -> Differ<C>
where
    T: Member,
    C: 'static,
    for<'a> &'a C: IntoIterator<Item = &'a T>,
{
    differ.into_differ()
}

/// Read access to a keyed collection
pub trait MapLike<K, V> {
    /// Keys in the map's own order
    fn map_keys(&self) -> Box<dyn Iterator<Item = &K> + '_>;

    /// Value stored under `key`
    fn map_value(&self, key: &K) -> Option<&V>;
}

impl<K: Ord, V> MapLike<K, V> for BTreeMap<K, V> {
    fn map_keys(&self) -> Box<dyn Iterator<Item = &K> + '_> {
        Box::new(self.keys())
    }

    fn map_value(&self, key: &K) -> Option<&V> {
        self.get(key)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> MapLike<K, V> for HashMap<K, V, S> {
    fn map_keys(&self) -> Box<dyn Iterator<Item = &K> + '_> {
        Box::new(self.keys())
    }

    fn map_value(&self, key: &K) -> Option<&V> {
        self.get(key)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> MapLike<K, V> for IndexMap<K, V, S> {
    fn map_keys(&self) -> Box<dyn Iterator<Item = &K> + '_> {
        Box::new(self.keys())
    }

    fn map_value(&self, key: &K) -> Option<&V> {
        self.get(key)
    }
}

/// Map union keyed by the map keys
///
/// Keys only on one side are `ADDED` / `REMOVED`, hinted by the value when a
/// `value_hinter` is given and by the key differ's hinter otherwise. Keys on
/// both sides hand the two values, located at the key's name, to `values`.
pub fn diff_maps<K, V, M>(
    emitter: &Emitter,
    maps: Pair<&M>,
    keys: &SetDiffer<K>,
    values: &Differ<V>,
    value_hinter: Option<&Hinter<V>>,
) -> Vec<Diff>
where
    K: Member,
    V: Clone + 'static,
    M: MapLike<K, V>,
{
    let hint = |map: &M, key: &K| match value_hinter {
        Some(hinter) => map.map_value(key).and_then(|value| hinter(value)),
        None => keys.hinter().and_then(|hinter| hinter(key)),
    };
    let removed_hint: &dyn Fn(&K) -> Option<String> = &|key: &K| hint(maps.left, key);
    let added_hint: &dyn Fn(&K) -> Option<String> = &|key: &K| hint(maps.right, key);
    let intersection = |member: &Emitter, key: &K| {
        match (maps.left.map_value(key), maps.right.map_value(key)) {
            (Some(left), Some(right)) => values.diff(
                member,
                &Element::new(member.name().clone(), Pair::new(left.clone(), right.clone())),
            ),
            _ => Vec::new(),
        }
    };
    keys.diff_members(
        emitter,
        Pair::new(maps.left.map_keys(), maps.right.map_keys()),
        Pair::new(removed_hint, added_hint),
        &intersection,
    )
}

/// Map union with default key handling, `values` on shared keys
#[must_use]
pub fn of_maps<K, V, M>(values: Differ<V>) -> Differ<M>
where
    K: Member + Ord + Display,
    V: Clone + 'static,
    M: MapLike<K, V> + 'static,
{
    of_maps_customized(SetDiffer::default(), values, None)
}

/// Map union with a configured key differ and optional value hints
#[must_use]
pub fn of_maps_customized<K, V, M>(
    keys: SetDiffer<K>,
    values: Differ<V>,
    value_hinter: Option<Hinter<V>>,
) -> Differ<M>
where
    K: Member,
    V: Clone + 'static,
    M: MapLike<K, V> + 'static,
{
    Differ::new(move |emitter, element: &Element<M>| {
        diff_maps(
            emitter,
            element.values().as_ref(),
            &keys,
            &values,
            value_hinter.as_ref(),
        )
    })
}

/// Map union comparing values by equality, every diff hinted by the values
#[must_use]
pub fn of_map_values<K, V, M>() -> Differ<M>
where
    K: Member + Ord + Display,
    V: PartialEq + Display + Clone + 'static,
    M: MapLike<K, V> + 'static,
{
    of_maps_customized(
        SetDiffer::default(),
        of_equality_hinted(display_hinter()),
        Some(display_hinter()),
    )
}
