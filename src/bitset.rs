//! Fixed-width customer sets.
//!
//! Labels carry two of these (ng-memory and visited enforced customers), so
//! they are `Copy` and stored inline. The width bounds the number of
//! locations (depot included) an instance may have.

use serde::{Deserialize, Serialize};

/// Maximum number of locations (depot included) representable in a
/// [`CustomerSet`].
pub const SET_WIDTH: usize = 128;

/// A set of location indices in `0..SET_WIDTH`, backed by a single `u128`.
///
/// # Examples
///
/// ```
/// use u_pricing::bitset::CustomerSet;
///
/// let a = CustomerSet::from_indices([1, 4, 7]);
/// let b = CustomerSet::from_indices([1, 4]);
/// assert!(b.is_subset_of(&a));
/// assert!(a.intersection(&b) == b);
/// assert_eq!(a.len(), 3);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerSet {
    bits: u128,
}

impl CustomerSet {
    /// The empty set.
    pub const EMPTY: Self = Self { bits: 0 };

    /// Creates an empty set.
    pub fn new() -> Self {
        Self::EMPTY
    }

    /// Creates a set from an iterator of indices.
    ///
    /// # Panics
    ///
    /// Panics if an index is `>= SET_WIDTH`.
    pub fn from_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        let mut set = Self::new();
        for i in indices {
            set.insert(i);
        }
        set
    }

    /// Adds `index` to the set.
    ///
    /// # Panics
    ///
    /// Panics if `index >= SET_WIDTH`.
    pub fn insert(&mut self, index: usize) {
        assert!(index < SET_WIDTH, "index {index} exceeds set width");
        self.bits |= 1u128 << index;
    }

    /// Removes `index` from the set.
    pub fn remove(&mut self, index: usize) {
        if index < SET_WIDTH {
            self.bits &= !(1u128 << index);
        }
    }

    /// Returns `true` if `index` is in the set.
    pub fn contains(&self, index: usize) -> bool {
        index < SET_WIDTH && self.bits & (1u128 << index) != 0
    }

    /// Set intersection.
    pub fn intersection(&self, other: &Self) -> Self {
        Self {
            bits: self.bits & other.bits,
        }
    }

    /// Set union.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Returns `true` if every element of `self` is in `other`.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.bits & other.bits == self.bits
    }

    /// Returns `true` if the sets share no element.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.bits & other.bits == 0
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Iterates over the elements in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        let mut rest = self.bits;
        std::iter::from_fn(move || {
            if rest == 0 {
                return None;
            }
            let i = rest.trailing_zeros() as usize;
            rest &= rest - 1;
            Some(i)
        })
    }
}

impl FromIterator<usize> for CustomerSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self::from_indices(iter)
    }
}
