use std::fmt;

use crate::nfa::StateId;

/// A set of NFA states with O(1) insertion, membership and clearing.
///
/// This is the classic sparse set: `dense` holds the members in insertion
/// order and `sparse` maps a state to its slot in `dense`. A state is a
/// member iff those two agree, so `clear` only has to reset the length.
#[derive(Clone)]
pub struct StateSet {
    len: usize,
    dense: Vec<StateId>,
    sparse: Vec<usize>,
}

impl StateSet {
    /// Create a set able to hold states `0..capacity`.
    pub fn new(capacity: usize) -> StateSet {
        StateSet { len: 0, dense: vec![0; capacity], sparse: vec![0; capacity] }
    }

    /// Insert `id`, returning false if it was already present.
    ///
    /// Panics if `id` is outside the capacity this set was created with.
    #[inline]
    pub fn insert(&mut self, id: StateId) -> bool {
        if self.contains(id) {
            return false;
        }
        let i = self.len;
        assert!(i < self.capacity(), "{} exceeds capacity of {}", id, self.capacity());
        self.dense[i] = id;
        self.sparse[id] = i;
        self.len += 1;
        true
    }

    #[inline]
    pub fn contains(&self, id: StateId) -> bool {
        match self.sparse.get(id) {
            Some(&i) => i < self.len && self.dense[i] == id,
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.dense.len()
    }

    /// The members, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.dense[..self.len].iter().copied()
    }

    /// The members in ascending order, for comparisons that shouldn't
    /// depend on insertion order.
    pub fn to_sorted_vec(&self) -> Vec<StateId> {
        let mut ids: Vec<StateId> = self.iter().collect();
        ids.sort_unstable();
        ids
    }
}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
