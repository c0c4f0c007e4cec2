//! Free Lists
//!
//! One LIFO stack of vacated locations per size class. Every slot in a
//! class has the same capacity, so any entry satisfies a request and the
//! most recently freed one is handed out first.

use crate::location::Location;

/// Per-size-class sets of reusable locations
#[derive(Debug, Clone, Default)]
pub struct FreeLists {
    lists: Vec<Vec<Location>>,
}

impl FreeLists {
    /// Create empty lists for `classes` size classes
    pub fn new(classes: usize) -> Self {
        Self {
            lists: vec![Vec::new(); classes],
        }
    }

    /// Push a vacated location onto the list of its size class
    pub fn push(&mut self, location: Location) {
        self.lists[location.size_class() as usize].push(location);
    }

    /// Take any free location of `class`
    pub fn pop(&mut self, class: u8) -> Option<Location> {
        self.lists.get_mut(class as usize)?.pop()
    }

    /// Number of free slots in `class`
    pub fn len(&self, class: u8) -> usize {
        self.lists.get(class as usize).map_or(0, Vec::len)
    }

    /// Number of free slots across all classes
    pub fn total(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Free slot count per class, indexed by class
    pub fn counts(&self) -> Vec<usize> {
        self.lists.iter().map(Vec::len).collect()
    }

    /// Linear membership check (for testing/debugging)
    pub fn contains(&self, location: Location) -> bool {
        self.lists
            .get(location.size_class() as usize)
            .map_or(false, |list| list.contains(&location))
    }

    /// Iterate over every free location
    pub fn iter(&self) -> impl Iterator<Item = Location> + '_ {
        self.lists.iter().flatten().copied()
    }
}
