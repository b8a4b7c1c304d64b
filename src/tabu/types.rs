//! Tabu memory for edge-exchange moves.

use std::collections::HashMap;

/// Undirected edge, stored with the smaller node first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge(usize, usize);

impl Edge {
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Edge(a, b)
        } else {
            Edge(b, a)
        }
    }

    pub fn nodes(&self) -> (usize, usize) {
        (self.0, self.1)
    }
}

/// Recently removed edges with the iteration at which they stop being tabu.
///
/// Never holds more than `capacity` entries: inserting into a full list
/// evicts the entry that would expire first.
#[derive(Debug, Clone)]
pub struct TabuList {
    expiry: HashMap<Edge, usize>,
    capacity: usize,
}

impl TabuList {
    /// Creates an empty list. A zero capacity is raised to one.
    ///
    /// Storage grows with the entries, not with `capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            expiry: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.expiry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expiry.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether re-adding `edge` is forbidden at `iteration`.
    pub fn is_tabu(&self, edge: Edge, iteration: usize) -> bool {
        self.expiry.get(&edge).is_some_and(|&until| iteration < until)
    }

    /// Forbids `edge` until iteration `until` (exclusive).
    pub fn insert(&mut self, edge: Edge, until: usize) {
        if !self.expiry.contains_key(&edge) && self.expiry.len() >= self.capacity {
            let oldest = self
                .expiry
                .iter()
                .min_by_key(|&(e, &u)| (u, *e))
                .map(|(e, _)| *e);
            if let Some(e) = oldest {
                self.expiry.remove(&e);
            }
        }
        self.expiry.insert(edge, until);
    }

    /// Drops entries that are no longer tabu at `iteration`.
    pub fn evict_expired(&mut self, iteration: usize) {
        self.expiry.retain(|_, until| *until > iteration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_is_unordered() {
        assert_eq!(Edge::new(3, 7), Edge::new(7, 3));
        assert_eq!(Edge::new(7, 3).nodes(), (3, 7));
    }

    #[test]
    fn test_expiry() {
        let mut list = TabuList::new(4);
        list.insert(Edge::new(1, 2), 5);
        assert!(list.is_tabu(Edge::new(2, 1), 0));
        assert!(list.is_tabu(Edge::new(1, 2), 4));
        assert!(!list.is_tabu(Edge::new(1, 2), 5));
        assert!(!list.is_tabu(Edge::new(1, 3), 0));

        list.evict_expired(5);
        assert!(list.is_empty());
    }

    #[test]
    fn test_capacity_evicts_earliest_expiry() {
        let mut list = TabuList::new(2);
        list.insert(Edge::new(0, 1), 10);
        list.insert(Edge::new(0, 2), 3);
        list.insert(Edge::new(0, 3), 7);
        assert_eq!(list.len(), 2);
        assert!(!list.is_tabu(Edge::new(0, 2), 0));
        assert!(list.is_tabu(Edge::new(0, 1), 0));
        assert!(list.is_tabu(Edge::new(0, 3), 0));
    }

    #[test]
    fn test_unbounded_capacity_and_expiry() {
        let mut list = TabuList::new(usize::MAX);
        list.insert(Edge::new(0, 1), usize::MAX);
        assert_eq!(list.capacity(), usize::MAX);
        assert!(list.is_tabu(Edge::new(1, 0), usize::MAX - 1));
        list.evict_expired(usize::MAX - 1);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_reinsert_refreshes_without_growing() {
        let mut list = TabuList::new(1);
        list.insert(Edge::new(4, 5), 2);
        list.insert(Edge::new(5, 4), 9);
        assert_eq!(list.len(), 1);
        assert!(list.is_tabu(Edge::new(4, 5), 8));
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let list = TabuList::new(0);
        assert_eq!(list.capacity(), 1);
    }
}
