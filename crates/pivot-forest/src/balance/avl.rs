//! Height-balanced (AVL) rebalancing.
//!
//! Each internal node stores its height in `aux`; a sentinel counts as
//! height −1. After an insert or a splice the policy walks from the given
//! position up to the root, recomputing heights and applying a trinode
//! restructuring wherever the children's heights differ by more than one.

use super::BalanceStrategy;
use crate::error::{Result, TreeError};
use crate::node::NodeId;
use crate::tree::LinkedTree;

/// AVL policy. Stateless: all bookkeeping lives in the nodes' `aux` fields.
#[derive(Clone, Copy, Debug, Default)]
pub struct Avl;

impl Avl {
    pub fn new() -> Self {
        Avl
    }
}

fn height<K, V>(tree: &LinkedTree<K, V>, child: Option<NodeId>) -> i64 {
    match child {
        Some(c) if tree.is_int(c) => tree.aux_of(c) as i64,
        _ => -1,
    }
}

fn recompute_height<K, V>(tree: &mut LinkedTree<K, V>, p: NodeId) {
    let h = 1 + height(tree, tree.l(p)).max(height(tree, tree.r(p)));
    tree.set_aux_of(p, h as u64);
}

fn is_balanced<K, V>(tree: &LinkedTree<K, V>, p: NodeId) -> bool {
    (height(tree, tree.l(p)) - height(tree, tree.r(p))).abs() <= 1
}

/// The child of `p` with the larger height. Ties resolve to the side `p`
/// itself is on (left for the root), so a zig-zag is never manufactured
/// when a single rotation would do.
fn taller_child<K, V>(tree: &LinkedTree<K, V>, p: NodeId) -> Result<NodeId> {
    let left = tree.l(p);
    let right = tree.r(p);
    let lh = height(tree, left);
    let rh = height(tree, right);
    let take_left = if lh != rh {
        lh > rh
    } else {
        match tree.p(p) {
            None => true,
            Some(parent) => tree.l(parent) == Some(p),
        }
    };
    let chosen = if take_left { left } else { right };
    chosen.ok_or(TreeError::IllegalState("imbalanced node without children"))
}

/// Upward rebalancing walk shared by the insert and delete hooks.
fn rebalance<K, V>(tree: &mut LinkedTree<K, V>, mut from: Option<NodeId>) -> Result<()> {
    while let Some(node) = from {
        recompute_height(tree, node);
        let mut top = node;
        if !is_balanced(tree, node) {
            let child = taller_child(tree, node)?;
            let grandchild = taller_child(tree, child)?;
            top = tree.restructure(grandchild)?;
            if let Some(left) = tree.l(top) {
                if tree.is_int(left) {
                    recompute_height(tree, left);
                }
            }
            if let Some(right) = tree.r(top) {
                if tree.is_int(right) {
                    recompute_height(tree, right);
                }
            }
            recompute_height(tree, top);
        }
        from = tree.p(top);
    }
    Ok(())
}

impl<K, V> BalanceStrategy<K, V> for Avl {
    fn after_insert(&mut self, tree: &mut LinkedTree<K, V>, node: NodeId) -> Result<()> {
        rebalance(tree, Some(node))
    }

    fn after_remove(&mut self, tree: &mut LinkedTree<K, V>, anchor: Option<NodeId>) -> Result<()> {
        rebalance(tree, anchor)
    }

    fn after_access(&mut self, _tree: &mut LinkedTree<K, V>, _node: NodeId) -> Result<()> {
        // A value overwrite does not change the shape.
        Ok(())
    }
}
