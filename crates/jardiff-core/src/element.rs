//! Located pairs
//!
//! Provides [`Element`], a [`Pair`] of values together with the [`Name`] they
//! live at.

use crate::name::Name;
use crate::pair::Pair;

/// The thing being compared, located at a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<V> {
    name: Name,
    values: Pair<V>,
}

impl<V> Element<V> {
    /// Create new element
    #[inline]
    #[must_use]
    pub fn new(name: Name, values: Pair<V>) -> Self {
        Self { name, values }
    }

    /// Element at the root name
    #[inline]
    #[must_use]
    pub fn root(values: Pair<V>) -> Self {
        Self::new(Name::root(), values)
    }

    /// Location
    #[inline]
    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Paired values
    #[inline]
    #[must_use]
    pub fn values(&self) -> &Pair<V> {
        &self.values
    }

    /// Left value
    #[inline]
    #[must_use]
    pub fn left(&self) -> &V {
        &self.values.left
    }

    /// Right value
    #[inline]
    #[must_use]
    pub fn right(&self) -> &V {
        &self.values.right
    }

    /// Take the paired values
    #[inline]
    #[must_use]
    pub fn into_values(self) -> Pair<V> {
        self.values
    }

    /// Descendant element at `relative` below this one, values mapped by `f`
    pub fn project<U, F>(&self, relative: &Name, f: F) -> Element<U>
    where
        F: FnMut(&V) -> U,
    {
        Element::new(self.name.append(relative), self.values.as_ref().map(f))
    }

    /// Same name, values mapped by `f`
    pub fn map<U, F>(&self, f: F) -> Element<U>
    where
        F: FnMut(&V) -> U,
    {
        self.project(&Name::root(), f)
    }
}
