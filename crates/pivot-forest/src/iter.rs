//! Ordered iteration over map entries.
//!
//! The iterator walks parent links (leftmost descent, then in-order
//! successor steps), so it needs no stack and no recursion regardless of
//! tree shape. It is a one-shot ascending sequence; the shared borrow of
//! the map keeps the tree from mutating underneath it.

use crate::node::NodeId;
use crate::tree::LinkedTree;

/// Ascending in-order iterator, optionally bounded by an exclusive end
/// position (used by `sub_map`).
pub struct Iter<'a, K, V> {
    tree: &'a LinkedTree<K, V>,
    curr: Option<NodeId>,
    end: Option<NodeId>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(
        tree: &'a LinkedTree<K, V>,
        curr: Option<NodeId>,
        end: Option<NodeId>,
        remaining: usize,
    ) -> Self {
        Self {
            tree,
            curr,
            end,
            remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.curr?;
        if Some(node) == self.end {
            self.curr = None;
            return None;
        }
        self.curr = self.tree.next_internal(node);
        self.remaining = self.remaining.saturating_sub(1);
        self.tree.entry_ref(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl<K, V> std::iter::FusedIterator for Iter<'_, K, V> {}
