//! Pluggable rebalancing policies.
//!
//! A policy is a value owned by the map and invoked explicitly through four
//! hooks; it may reshape the tree with rotations but must keep the search
//! order and the sentinel pairing intact. The per-node `aux` scalar is
//! policy scratch space: height for [`Avl`], random priority for [`Treap`].

mod avl;
mod treap;

pub use avl::Avl;
pub use treap::{treap_sort, treap_sort_seeded, Treap};

use crate::error::Result;
use crate::node::NodeId;
use crate::tree::LinkedTree;

/// Rebalancing hooks called by the sorted map around its own mutations.
///
/// The map only ever passes positions produced by its own insert/delete
/// logic, so rotation-precondition failures inside a hook indicate a
/// programming error, not a runtime condition.
pub trait BalanceStrategy<K, V> {
    /// Called right after a sentinel was expanded into the internal `node`.
    fn after_insert(&mut self, tree: &mut LinkedTree<K, V>, node: NodeId) -> Result<()>;

    /// Called before `node` is spliced out, while it is still linked.
    /// Policies that must steer the splice hook in here; the treap rotates
    /// the doomed node down to the fringe so the splice cannot break its
    /// heap order. The default does nothing.
    fn before_remove(&mut self, _tree: &mut LinkedTree<K, V>, _node: NodeId) -> Result<()> {
        Ok(())
    }

    /// Called after a splice with the parent of the removed node (`None`
    /// when the root itself was removed).
    fn after_remove(&mut self, tree: &mut LinkedTree<K, V>, anchor: Option<NodeId>) -> Result<()>;

    /// Called after an existing entry's value was overwritten in place.
    fn after_access(&mut self, tree: &mut LinkedTree<K, V>, node: NodeId) -> Result<()>;
}

/// No rebalancing: a plain binary search tree.
///
/// Adversarial (sorted) insert orders degenerate to O(n) height; callers
/// wanting guarantees pick [`Avl`] or [`Treap`] instead.
#[derive(Clone, Copy, Debug, Default)]
pub struct Plain;

impl<K, V> BalanceStrategy<K, V> for Plain {
    fn after_insert(&mut self, _tree: &mut LinkedTree<K, V>, _node: NodeId) -> Result<()> {
        Ok(())
    }

    fn after_remove(
        &mut self,
        _tree: &mut LinkedTree<K, V>,
        _anchor: Option<NodeId>,
    ) -> Result<()> {
        Ok(())
    }

    fn after_access(&mut self, _tree: &mut LinkedTree<K, V>, _node: NodeId) -> Result<()> {
        Ok(())
    }
}
