//! Randomized-priority (treap) rebalancing.
//!
//! Every internal node gets an independently drawn `u64` priority at
//! insertion, stored in `aux` and never recomputed. Keeping the priorities
//! in max-heap order bounds the expected height at O(log n) without any
//! height bookkeeping.

use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use super::BalanceStrategy;
use crate::error::Result;
use crate::map::SortedMap;
use crate::node::NodeId;
use crate::tree::LinkedTree;

/// Treap policy: owns the priority generator.
///
/// Use [`Treap::with_seed`] for reproducible shapes (tests, benchmarks);
/// [`Treap::new`] seeds from OS entropy.
#[derive(Clone, Debug)]
pub struct Treap {
    rng: Xoshiro256PlusPlus,
}

impl Treap {
    pub fn new() -> Self {
        Self {
            rng: Xoshiro256PlusPlus::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }
}

impl Default for Treap {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> BalanceStrategy<K, V> for Treap {
    fn after_insert(&mut self, tree: &mut LinkedTree<K, V>, node: NodeId) -> Result<()> {
        tree.set_aux_of(node, self.rng.next_u64());
        // Bubble up while the heap order is violated.
        while let Some(parent) = tree.p(node) {
            if tree.aux_of(node) <= tree.aux_of(parent) {
                break;
            }
            tree.rotate(node)?;
        }
        Ok(())
    }

    fn before_remove(&mut self, tree: &mut LinkedTree<K, V>, node: NodeId) -> Result<()> {
        // Rotate the doomed node down, always promoting its higher-priority
        // child, until at most one internal child remains. The generic
        // splice then hoists a strictly lower-priority subtree into place,
        // so the heap order survives deletion.
        loop {
            let (Some(left), Some(right)) = (tree.l(node), tree.r(node)) else {
                return Ok(());
            };
            if !(tree.is_int(left) && tree.is_int(right)) {
                return Ok(());
            }
            let promoted = if tree.aux_of(left) >= tree.aux_of(right) {
                left
            } else {
                right
            };
            tree.rotate(promoted)?;
        }
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

// ── Bulk sorting through a treap ──────────────────────────────────────────

/// Sort keys by inserting them into a fresh treap map and draining it in
/// order. Duplicate keys collapse (map semantics). O(n log n) expected.
pub fn treap_sort<K, I>(keys: I) -> Result<Vec<K>>
where
    K: PartialOrd,
    I: IntoIterator<Item = K>,
{
    sort_with(Treap::new(), keys)
}

/// [`treap_sort`] with a fixed priority seed, for reproducible tree shapes.
pub fn treap_sort_seeded<K, I>(seed: u64, keys: I) -> Result<Vec<K>>
where
    K: PartialOrd,
    I: IntoIterator<Item = K>,
{
    sort_with(Treap::with_seed(seed), keys)
}

fn sort_with<K, I>(policy: Treap, keys: I) -> Result<Vec<K>>
where
    K: PartialOrd,
    I: IntoIterator<Item = K>,
{
    let mut map: SortedMap<K, (), Treap> = SortedMap::with_strategy(policy);
    for key in keys {
        map.put(key, ())?;
    }
    Ok(map.into_keys())
}
