//! Two-sided container
//!
//! Provides [`Pair`], the left/right value holder threaded through every
//! combinator.

use serde::{Deserialize, Serialize};

/// Left and right values under comparison
///
/// Both sides are independently owned; nothing is shared between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Pair<T> {
    /// Old side
    pub left: T,
    /// New side
    pub right: T,
}

impl<T> Pair<T> {
    /// Create new pair
    #[inline]
    #[must_use]
    pub const fn new(left: T, right: T) -> Self {
        Self { left, right }
    }

    /// Pair holding the same value on both sides
    #[inline]
    #[must_use]
    pub fn both(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(value.clone(), value)
    }

    /// Borrow both sides
    #[inline]
    #[must_use]
    pub fn as_ref(&self) -> Pair<&T> {
        Pair::new(&self.left, &self.right)
    }

    /// Apply `f` to both sides, left first
    #[inline]
    pub fn map<U, F>(self, mut f: F) -> Pair<U>
    where
        F: FnMut(T) -> U,
    {
        let left = f(self.left);
        Pair::new(left, f(self.right))
    }

    /// Apply a partial `f` to both sides
    #[inline]
    pub fn map_optional<U, F>(self, f: F) -> Pair<Option<U>>
    where
        F: FnMut(T) -> Option<U>,
    {
        self.map(f)
    }

    /// Combine side-wise with another pair
    #[inline]
    pub fn zip_with<U, R, F>(self, other: Pair<U>, mut f: F) -> Pair<R>
    where
        F: FnMut(T, U) -> R,
    {
        let left = f(self.left, other.left);
        Pair::new(left, f(self.right, other.right))
    }

    /// Evaluate a binary predicate over left and right
    #[inline]
    pub fn test_both<F>(&self, predicate: F) -> bool
    where
        F: FnOnce(&T, &T) -> bool,
    {
        predicate(&self.left, &self.right)
    }

    /// Exchange the sides
    #[inline]
    #[must_use]
    pub fn swap(self) -> Self {
        Self::new(self.right, self.left)
    }

    /// Iterate left then right
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        [&self.left, &self.right].into_iter()
    }

    /// Map each side to an iterator and chain them, left first
    #[inline]
    pub fn flat_map<I, F>(self, f: F) -> impl Iterator<Item = I::Item>
    where
        I: IntoIterator,
        F: FnMut(T) -> I,
    {
        self.into_iter().flat_map(f)
    }
}

impl<T: Clone> Pair<&T> {
    /// Clone both borrowed sides
    #[inline]
    #[must_use]
    pub fn cloned(self) -> Pair<T> {
        self.map(T::clone)
    }
}

impl<T> Pair<Option<T>> {
    /// Both sides present
    #[inline]
    #[must_use]
    pub fn transpose(self) -> Option<Pair<T>> {
        match (self.left, self.right) {
            (Some(left), Some(right)) => Some(Pair::new(left, right)),
            _ => None,
        }
    }
}

impl<T> IntoIterator for Pair<T> {
    type Item = T;
    type IntoIter = std::array::IntoIter<T, 2>;

    fn into_iter(self) -> Self::IntoIter {
        [self.left, self.right].into_iter()
    }
}

impl<T> From<(T, T)> for Pair<T> {
    fn from((left, right): (T, T)) -> Self {
        Self::new(left, right)
    }
}
