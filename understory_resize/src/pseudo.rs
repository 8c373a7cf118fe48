// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Enter/leave tracking over chains of pseudo-class-associated ancestors.
//!
//! A pointer or click event only matters to the watcher when it changes which
//! hover- or activation-associated elements contain its target. The watcher records
//! that chain (root→target, associated members only) per event family and asks
//! [`ChainState::update_path`] what changed.
//!
//! ```
//! use understory_resize::pseudo::{ChainEvent, ChainState};
//!
//! let mut chain: ChainState<u32> = ChainState::new();
//! assert_eq!(chain.update_path(&[1, 2]), vec![ChainEvent::Enter(1), ChainEvent::Enter(2)]);
//! assert_eq!(chain.update_path(&[1, 3]), vec![ChainEvent::Leave(2), ChainEvent::Enter(3)]);
//! assert!(chain.update_path(&[1, 3]).is_empty());
//! ```

/// The last recorded chain and the transitions to a new one.
///
/// Leaves are reported inner-most first, then enters outer-most first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChainState<K: Copy + Eq> {
    current: Vec<K>,
}

/// A change between two successive chains.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChainEvent<K> {
    /// The target moved into this element.
    Enter(K),
    /// The target moved out of this element.
    Leave(K),
}

impl<K: Copy + Eq> ChainState<K> {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self {
            current: Vec::new(),
        }
    }

    /// The recorded root→target chain.
    pub fn current_path(&self) -> &[K] {
        &self.current
    }

    /// Forget the chain, returning the leaves it implies.
    pub fn clear(&mut self) -> Vec<ChainEvent<K>> {
        let out = self.current.iter().rev().map(|&k| ChainEvent::Leave(k)).collect();
        self.current.clear();
        out
    }

    /// Record `new_path` and return the transitions from the previous chain.
    pub fn update_path(&mut self, new_path: &[K]) -> Vec<ChainEvent<K>> {
        // Shared prefix: the deepest common ancestor.
        let lca = self
            .current
            .iter()
            .zip(new_path)
            .take_while(|(a, b)| a == b)
            .count();

        let mut out: Vec<_> = self.current[lca..]
            .iter()
            .rev()
            .map(|&k| ChainEvent::Leave(k))
            .collect();
        out.extend(new_path[lca..].iter().map(|&k| ChainEvent::Enter(k)));

        self.current.clear();
        self.current.extend_from_slice(new_path);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_chain_enters_outer_to_inner() {
        let mut c: ChainState<u32> = ChainState::new();
        assert_eq!(
            c.update_path(&[1, 2, 3]),
            vec![ChainEvent::Enter(1), ChainEvent::Enter(2), ChainEvent::Enter(3)]
        );
        assert_eq!(c.current_path(), &[1, 2, 3]);
    }

    #[test]
    fn leaving_to_nothing() {
        let mut c: ChainState<u32> = ChainState::new();
        let _ = c.update_path(&[1, 2]);
        assert_eq!(
            c.update_path(&[]),
            vec![ChainEvent::Leave(2), ChainEvent::Leave(1)]
        );
        assert!(c.clear().is_empty());
    }

    // Shared prefix [1, 2]; only the tails change.
    #[test]
    fn branch_change_keeps_the_shared_prefix() {
        let mut c: ChainState<u32> = ChainState::new();
        let _ = c.update_path(&[1, 2, 3, 4]);
        assert_eq!(
            c.update_path(&[1, 2, 9]),
            vec![ChainEvent::Leave(4), ChainEvent::Leave(3), ChainEvent::Enter(9)]
        );
    }

    #[test]
    fn clear_leaves_inner_to_outer() {
        let mut c: ChainState<u32> = ChainState::new();
        let _ = c.update_path(&[5, 6]);
        assert_eq!(c.clear(), vec![ChainEvent::Leave(6), ChainEvent::Leave(5)]);
        assert!(c.current_path().is_empty());
    }
}
