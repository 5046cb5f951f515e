//! Field-by-field aggregation
//!
//! Provides [`CompositeDiffer`]: a fixed set of labelled child differs over
//! the same element type, each run below its label.

use crate::diff::Diff;
use crate::differ::Differ;
use crate::element::Element;
use crate::emitter::Emitter;
use std::collections::BTreeMap;

/// Named-child aggregation over one element type
///
/// Children run in label order. The empty label runs at the element's own
/// name. Registering a label twice runs both differs under it, in
/// registration order.
#[derive(Debug, Clone)]
pub struct CompositeDiffer<T> {
    children: BTreeMap<String, Differ<T>>,
}

impl<T> Default for CompositeDiffer<T> {
    fn default() -> Self {
        Self {
            children: BTreeMap::new(),
        }
    }
}

impl<T: 'static> CompositeDiffer<T> {
    /// Create empty composite
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a child differ under `label`
    #[must_use]
    pub fn child(mut self, label: impl Into<String>, differ: Differ<T>) -> Self {
        let label = label.into();
        let differ = match self.children.remove(&label) {
            Some(existing) => existing.and(differ),
            None => differ,
        };
        self.children.insert(label, differ);
        self
    }

    /// Registered labels in run order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    /// Number of registered labels
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Check if no child is registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Run every child, concatenating their diffs
    pub fn diff(&self, emitter: &Emitter, element: &Element<T>) -> Vec<Diff> {
        let here = emitter.for_sub_element(element);
        self.children
            .iter()
            .flat_map(|(label, differ)| {
                let child = if label.is_empty() {
                    here.clone()
                } else {
                    here.for_child(label)
                };
                differ.diff(&child, element)
            })
            .collect()
    }

    /// Wrap as a [`Differ`]
    #[must_use]
    pub fn into_differ(self) -> Differ<T> {
        Differ::new(move |emitter, element| self.diff(emitter, element))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::differs::of_equality;
    use crate::kind::Kind;
    use crate::name::Name;
    use crate::pair::Pair;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        size: u64,
        crc: u32,
    }

    fn composite() -> CompositeDiffer<Entry> {
        CompositeDiffer::new()
            .child("size", of_equality::<u64>().projecting(|e: &Entry| e.size))
            .child("crc", of_equality::<u32>().projecting(|e: &Entry| e.crc))
            .child("", of_equality::<Entry>())
    }

    #[test]
    fn composite_children_in_label_order() {
        let el = Element::new(
            Name::parse("lib/a.jar").unwrap(),
            Pair::new(Entry { size: 1, crc: 1 }, Entry { size: 2, crc: 2 }),
        );
        let em = Emitter::new(Kind::parse("entry").unwrap());
        let names: Vec<_> = composite()
            .diff(&em, &el)
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(names, vec!["lib/a.jar", "lib/a.jar/crc", "lib/a.jar/size"]);
    }

    #[test]
    fn composite_duplicate_label_concats() {
        let c = CompositeDiffer::<Entry>::new()
            .child("x", of_equality::<u64>().projecting(|e: &Entry| e.size))
            .child("x", of_equality::<u32>().projecting(|e: &Entry| e.crc));
        assert_eq!(c.len(), 1);
        let el = Element::root(Pair::new(Entry { size: 1, crc: 1 }, Entry { size: 2, crc: 2 }));
        let em = Emitter::new(Kind::parse("entry").unwrap());
        assert_eq!(c.diff(&em, &el).len(), 2);
    }

    #[test]
    fn composite_empty_yields_nothing() {
        let c = CompositeDiffer::<Entry>::new();
        assert!(c.is_empty());
        let el = Element::root(Pair::both(Entry { size: 1, crc: 1 }));
        let em = Emitter::new(Kind::parse("entry").unwrap());
        assert!(c.into_differ().diff(&em, &el).is_empty());
    }
}
