//! Decremental state-space relaxation of the ng-memory.
//!
//! Labeling starts with empty filter sets, so a label only remembers the
//! customer it ends at. Tours returned by pricing are then checked against
//! the full ng-neighbourhoods; every cycle found adds the revisited
//! customer to the filter of each customer on the cycle, and the tour is
//! dropped.

use crate::bitset::CustomerSet;
use serde::{Deserialize, Serialize};

/// Returns the first ng-cycle of `tour` as `(start, end)` positions: the
/// customer at `end` was still remembered since its visit at `start`.
///
/// # Examples
///
/// ```
/// use u_pricing::bitset::CustomerSet;
/// use u_pricing::pricing::find_ng_cycle;
///
/// // every customer remembers every other one
/// let ng: Vec<CustomerSet> = (0..4)
///     .map(|i| (1..4).filter(|&j| j != i).collect())
///     .collect();
/// assert_eq!(find_ng_cycle(&ng, &[1, 2, 3]), None);
/// assert_eq!(find_ng_cycle(&ng, &[1, 2, 1, 3]), Some((0, 2)));
/// ```
pub fn find_ng_cycle(ng_sets: &[CustomerSet], tour: &[usize]) -> Option<(usize, usize)> {
    let mut memory = CustomerSet::EMPTY;
    for (end, &u) in tour.iter().enumerate() {
        if memory.contains(u) {
            let start = tour[..end].iter().rposition(|&v| v == u)?;
            return Some((start, end));
        }
        memory = memory.intersection(&ng_sets[u]);
        memory.insert(u);
    }
    None
}

/// Filter sets grown by decremental ng tightening, one per location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NgOverrides {
    sets: Vec<CustomerSet>,
}

impl NgOverrides {
    /// Empty filters for `locations` locations.
    pub fn new(locations: usize) -> Self {
        Self {
            sets: vec![CustomerSet::EMPTY; locations],
        }
    }

    /// Filter sets indexed by location.
    pub fn sets(&self) -> &[CustomerSet] {
        &self.sets
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Checks `tour` against the full ng-neighbourhoods and tightens the
    /// filters along every cycle found. Returns `true` if the tour had a
    /// cycle.
    pub fn tighten(&mut self, ng_sets: &[CustomerSet], tour: &[usize]) -> bool {
        let mut found = false;
        let mut memory = CustomerSet::EMPTY;
        for (end, &u) in tour.iter().enumerate() {
            if memory.contains(u) {
                found = true;
                for &v in tour[..end].iter().rev().take_while(|&&v| v != u) {
                    debug_assert!(ng_sets[v].contains(u));
                    self.sets[v].insert(u);
                }
            }
            memory = memory.intersection(&ng_sets[u]);
            memory.insert(u);
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_ng(n: usize) -> Vec<CustomerSet> {
        (0..n).map(|i| (1..n).filter(|&j| j != i).collect()).collect()
    }

    #[test]
    fn test_elementary_tour_has_no_cycle() {
        let ng = full_ng(6);
        let mut overrides = NgOverrides::new(6);
        assert!(!overrides.tighten(&ng, &[1, 2, 3, 4, 5]));
        assert!(overrides.sets().iter().all(|s| s.is_empty()));
    }

    #[test]
    fn test_cycle_tightens_customers_between_visits() {
        let ng = full_ng(6);
        let mut overrides = NgOverrides::new(6);
        // 2 is revisited after 3 and 4
        assert!(overrides.tighten(&ng, &[1, 2, 3, 4, 2, 5]));
        assert!(overrides.sets()[3].contains(2));
        assert!(overrides.sets()[4].contains(2));
        assert!(!overrides.sets()[1].contains(2));
        assert!(overrides.sets()[2].is_empty());
        assert_eq!(find_ng_cycle(&ng, &[1, 2, 3, 4, 2, 5]), Some((1, 4)));
    }

    #[test]
    fn test_forgotten_customer_is_not_a_cycle() {
        // 3 does not remember 1, so 1 -> 3 -> 1 is a legal ng-route
        let mut ng = full_ng(4);
        ng[3] = CustomerSet::from_indices([2]);
        let mut overrides = NgOverrides::new(4);
        assert!(!overrides.tighten(&ng, &[1, 3, 1]));
        assert_eq!(find_ng_cycle(&ng, &[1, 3, 1]), None);
    }

    #[test]
    fn test_tightened_filter_blocks_cycle_in_memory() {
        let ng = full_ng(5);
        let mut overrides = NgOverrides::new(5);
        overrides.tighten(&ng, &[1, 2, 1]);
        // replay the memory with the tightened filters
        let mut memory = CustomerSet::EMPTY;
        for &u in &[1usize, 2] {
            memory = memory.intersection(&overrides.sets()[u]);
            memory.insert(u);
        }
        assert!(memory.contains(1));
    }
}
