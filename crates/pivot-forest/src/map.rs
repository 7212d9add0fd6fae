//! Sorted map over a sentinel-leaf binary search tree.
//!
//! Every key-bearing node has exactly two children; a missed search
//! terminates at a sentinel that doubles as the insertion point for that
//! key. All operations are iterative: the descent is a loop and ordered
//! iteration walks parent links, so stack use stays O(1) even on degenerate
//! plain-policy trees.
//!
//! Complexity (h = tree height):
//! - `get` / `put` / `remove` / neighbour queries: O(h)
//! - `entry_set`: O(n); `sub_map`: O(h + len(output))

use std::cmp::Ordering;

use crate::balance::{Avl, BalanceStrategy, Plain, Treap};
use crate::error::{Result, TreeError};
use crate::iter::Iter;
use crate::node::NodeId;
use crate::tree::LinkedTree;

/// Three-way comparison through `PartialOrd`, the default key ordering.
/// Returns `None` for incomparable values (NaN), which the map reports as
/// [`TreeError::IncompatibleKey`].
pub fn natural_order<K: PartialOrd>(a: &K, b: &K) -> Option<Ordering> {
    a.partial_cmp(b)
}

/// Sorted map keyed by a total order, with a pluggable rebalancing policy.
///
/// `S` is the balance policy (a value, injected at construction and fixed
/// for the map's lifetime), `C` the comparator. Both default to the plain
/// BST policy and the natural key order.
pub struct SortedMap<K, V, S = Plain, C = fn(&K, &K) -> Option<Ordering>>
where
    C: Fn(&K, &K) -> Option<Ordering>,
{
    tree: LinkedTree<K, V>,
    strategy: S,
    comparator: C,
    len: usize,
}

/// Plain (unbalanced) binary search tree map.
pub type BstMap<K, V> = SortedMap<K, V, Plain>;
/// Height-balanced sorted map.
pub type AvlMap<K, V> = SortedMap<K, V, Avl>;
/// Randomized-priority sorted map.
pub type TreapMap<K, V> = SortedMap<K, V, Treap>;

impl<K: PartialOrd, V> SortedMap<K, V> {
    /// An empty plain-BST map with the natural key ordering.
    pub fn new() -> Self {
        Self::with_strategy(Plain)
    }
}

impl<K: PartialOrd, V> Default for SortedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialOrd, V> AvlMap<K, V> {
    /// An empty height-balanced map with the natural key ordering.
    pub fn new() -> Self {
        SortedMap::with_strategy(Avl::new())
    }
}

impl<K: PartialOrd, V> Default for AvlMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialOrd, V> TreapMap<K, V> {
    /// An empty treap map with entropy-seeded priorities.
    pub fn new() -> Self {
        SortedMap::with_strategy(Treap::new())
    }

    /// An empty treap map with a fixed priority seed (reproducible shape).
    pub fn with_seed(seed: u64) -> Self {
        SortedMap::with_strategy(Treap::with_seed(seed))
    }
}

impl<K: PartialOrd, V, S> SortedMap<K, V, S> {
    /// An empty map with the given balance policy and natural key ordering.
    pub fn with_strategy(strategy: S) -> Self {
        Self::with_strategy_and_comparator(strategy, natural_order::<K>)
    }
}

impl<K, V, C> SortedMap<K, V, Plain, C>
where
    C: Fn(&K, &K) -> Option<Ordering>,
{
    /// An empty plain-BST map ordered by the injected comparator.
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_strategy_and_comparator(Plain, comparator)
    }
}

impl<K, V, S, C> SortedMap<K, V, S, C>
where
    C: Fn(&K, &K) -> Option<Ordering>,
{
    pub fn with_strategy_and_comparator(strategy: S, comparator: C) -> Self {
        Self {
            tree: LinkedTree::with_sentinel_root(),
            strategy,
            comparator,
            len: 0,
        }
    }

    fn cmp_keys(&self, a: &K, b: &K) -> Result<Ordering> {
        (self.comparator)(a, b).ok_or(TreeError::IncompatibleKey)
    }

    // ── Size ──────────────────────────────────────────────────────────────

    /// Number of entries. Always `(node_count − 1) / 2`: only internal
    /// nodes carry entries, and sentinels pair them off exactly.
    pub fn size(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // ── Position API ──────────────────────────────────────────────────────

    /// Descend from the root comparing keys; returns the matching internal
    /// node, or the sentinel where the search ran out (which is exactly the
    /// slot a subsequent insert of `key` would fill).
    pub fn search(&self, key: &K) -> Result<NodeId> {
        let Some(mut p) = self.tree.root() else {
            return Err(TreeError::IllegalState("map tree has no root"));
        };
        loop {
            let Some((node_key, _)) = self.tree.entry_ref(p) else {
                return Ok(p);
            };
            match self.cmp_keys(key, node_key)? {
                Ordering::Equal => return Ok(p),
                Ordering::Less => match self.tree.l(p) {
                    Some(child) => p = child,
                    None => return Ok(p),
                },
                Ordering::Greater => match self.tree.r(p) {
                    Some(child) => p = child,
                    None => return Ok(p),
                },
            }
        }
    }

    /// Fails with `InvalidPosition` if `p` refers to a removed node.
    pub fn validate(&self, p: NodeId) -> Result<()> {
        self.tree.validate(p)
    }

    /// The entry at a position (`None` for a sentinel).
    pub fn entry(&self, p: NodeId) -> Result<Option<(&K, &V)>> {
        self.tree.entry(p)
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    pub fn get(&self, key: &K) -> Result<Option<&V>> {
        let p = self.search(key)?;
        Ok(self.tree.entry_ref(p).map(|(_, v)| v))
    }

    pub fn contains_key(&self, key: &K) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Entry with the least key, or `None` on an empty map.
    pub fn first_entry(&self) -> Option<(&K, &V)> {
        let root = self.tree.root()?;
        self.tree
            .first_internal(root)
            .and_then(|n| self.tree.entry_ref(n))
    }

    /// Entry with the greatest key, or `None` on an empty map.
    pub fn last_entry(&self) -> Option<(&K, &V)> {
        let root = self.tree.root()?;
        self.tree
            .last_internal(root)
            .and_then(|n| self.tree.entry_ref(n))
    }

    fn ceiling_node(&self, key: &K) -> Result<Option<NodeId>> {
        let p = self.search(key)?;
        Ok(if self.tree.is_int(p) {
            Some(p)
        } else {
            // Sentinel landing: climb to the first ancestor reached via a
            // left-child step.
            self.tree.next_internal(p)
        })
    }

    fn floor_node(&self, key: &K) -> Result<Option<NodeId>> {
        let p = self.search(key)?;
        Ok(if self.tree.is_int(p) {
            Some(p)
        } else {
            self.tree.prev_internal(p)
        })
    }

    /// Entry with the least key `>= key`.
    pub fn ceiling_entry(&self, key: &K) -> Result<Option<(&K, &V)>> {
        Ok(self.ceiling_node(key)?.and_then(|n| self.tree.entry_ref(n)))
    }

    /// Entry with the greatest key `<= key`.
    pub fn floor_entry(&self, key: &K) -> Result<Option<(&K, &V)>> {
        Ok(self.floor_node(key)?.and_then(|n| self.tree.entry_ref(n)))
    }

    /// Entry with the least key strictly greater than `key`. On an exact
    /// match this is the in-order successor; on a miss the sentinel climb
    /// already lands there.
    pub fn higher_entry(&self, key: &K) -> Result<Option<(&K, &V)>> {
        let p = self.search(key)?;
        Ok(self.tree.next_internal(p).and_then(|n| self.tree.entry_ref(n)))
    }

    /// Entry with the greatest key strictly less than `key`.
    pub fn lower_entry(&self, key: &K) -> Result<Option<(&K, &V)>> {
        let p = self.search(key)?;
        Ok(self.tree.prev_internal(p).and_then(|n| self.tree.entry_ref(n)))
    }

    // ── Ordered iteration ─────────────────────────────────────────────────

    /// Ascending in-order iterator over all entries.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let start = self
            .tree
            .root()
            .and_then(|root| self.tree.first_internal(root));
        Iter::new(&self.tree, start, None, self.len)
    }

    /// All entries, ascending by key.
    pub fn entry_set(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }

    /// Entries with keys in the half-open range `[from, to)`, ascending.
    /// Comparator failures surface here; the returned iterator never
    /// compares keys again.
    pub fn sub_map(&self, from: &K, to: &K) -> Result<Iter<'_, K, V>> {
        if self.cmp_keys(from, to)? != Ordering::Less {
            return Ok(Iter::new(&self.tree, None, None, 0));
        }
        let start = self.ceiling_node(from)?;
        let end = self.ceiling_node(to)?;
        Ok(Iter::new(&self.tree, start, end, self.len))
    }

    /// Consume the map into its entries, ascending by key.
    pub fn into_entries(mut self) -> Vec<(K, V)> {
        let mut order = Vec::with_capacity(self.len);
        let mut curr = self
            .tree
            .root()
            .and_then(|root| self.tree.first_internal(root));
        while let Some(node) = curr {
            order.push(node);
            curr = self.tree.next_internal(node);
        }
        order
            .into_iter()
            .filter_map(|id| self.tree.take_entry_at(id))
            .collect()
    }

    /// Consume the map into its keys, ascending.
    pub fn into_keys(self) -> Vec<K> {
        self.into_entries().into_iter().map(|(k, _)| k).collect()
    }

    // ── Invariant checks (exercised by the test suites) ───────────────────

    /// Verify search order, sentinel pairing, link coherence and size
    /// arithmetic over the whole tree.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        let Some(root) = self.tree.root() else {
            return Err("map tree has no root".to_owned());
        };
        if self.tree.p(root).is_some() {
            return Err("root has a parent link".to_owned());
        }
        let mut stack = vec![root];
        let mut total = 0usize;
        let mut internal = 0usize;
        while let Some(node) = stack.pop() {
            total += 1;
            let left = self.tree.l(node);
            let right = self.tree.r(node);
            if self.tree.is_int(node) {
                internal += 1;
                let (Some(left), Some(right)) = (left, right) else {
                    return Err("internal node with a missing child".to_owned());
                };
                if self.tree.p(left) != Some(node) || self.tree.p(right) != Some(node) {
                    return Err("child with a stale parent link".to_owned());
                }
                stack.push(left);
                stack.push(right);
            } else if left.is_some() || right.is_some() {
                return Err("sentinel with children".to_owned());
            }
        }
        if total != self.tree.node_count() {
            return Err(format!(
                "unreachable nodes: walked {total}, arena holds {}",
                self.tree.node_count()
            ));
        }
        if internal != self.len || total != 2 * self.len + 1 {
            return Err(format!(
                "size mismatch: len {} vs {internal} internal of {total} nodes",
                self.len
            ));
        }
        let mut prev: Option<&K> = None;
        for (key, _) in self.iter() {
            if let Some(prev_key) = prev {
                if (self.comparator)(prev_key, key) != Some(Ordering::Less) {
                    return Err("keys are not strictly ascending".to_owned());
                }
            }
            prev = Some(key);
        }
        Ok(())
    }

    /// Verify the AVL height invariant and the stored heights.
    pub fn check_height_balance(&self) -> std::result::Result<(), String> {
        fn walk<K, V>(
            tree: &LinkedTree<K, V>,
            node: Option<NodeId>,
        ) -> std::result::Result<i64, String> {
            let Some(n) = node else { return Ok(-1) };
            if !tree.is_int(n) {
                return Ok(-1);
            }
            let lh = walk(tree, tree.l(n))?;
            let rh = walk(tree, tree.r(n))?;
            if (lh - rh).abs() > 1 {
                return Err(format!("imbalanced node: child heights {lh} and {rh}"));
            }
            let height = 1 + lh.max(rh);
            if tree.aux_of(n) as i64 != height {
                return Err(format!(
                    "stale stored height {} (expected {height})",
                    tree.aux_of(n)
                ));
            }
            Ok(height)
        }
        walk(&self.tree, self.tree.root()).map(|_| ())
    }

    /// Verify the treap max-heap priority order.
    pub fn check_heap_order(&self) -> std::result::Result<(), String> {
        let Some(root) = self.tree.root() else {
            return Err("map tree has no root".to_owned());
        };
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if !self.tree.is_int(node) {
                continue;
            }
            for child in [self.tree.l(node), self.tree.r(node)].into_iter().flatten() {
                if self.tree.is_int(child) {
                    if self.tree.aux_of(child) > self.tree.aux_of(node) {
                        return Err("child priority exceeds its parent's".to_owned());
                    }
                    stack.push(child);
                }
            }
        }
        Ok(())
    }
}

impl<K, V, S, C> SortedMap<K, V, S, C>
where
    S: BalanceStrategy<K, V>,
    C: Fn(&K, &K) -> Option<Ordering>,
{
    /// Insert or overwrite. Returns the previous value when the key was
    /// already present.
    pub fn put(&mut self, key: K, value: V) -> Result<Option<V>> {
        let p = self.search(&key)?;
        if self.tree.is_int(p) {
            let old = self.tree.replace_value(p, value);
            self.strategy.after_access(&mut self.tree, p)?;
            return Ok(old);
        }
        // Expand the sentinel: it becomes internal and grows two fresh
        // sentinel children.
        let displaced = self.tree.set_entry(p, Some((key, value)))?;
        debug_assert!(displaced.is_none());
        self.tree.add_left(p, None)?;
        self.tree.add_right(p, None)?;
        self.len += 1;
        self.strategy.after_insert(&mut self.tree, p)?;
        Ok(None)
    }

    /// Remove the entry for `key`, if present, returning its value. An
    /// absent key is a no-op returning `None`.
    pub fn remove(&mut self, key: &K) -> Result<Option<V>> {
        let found = self.search(key)?;
        if !self.tree.is_int(found) {
            return Ok(None);
        }
        self.strategy.before_remove(&mut self.tree, found)?;
        let mut target = found;
        let (Some(left), Some(right)) = (self.tree.l(target), self.tree.r(target)) else {
            return Err(TreeError::IllegalState("internal node with a missing child"));
        };
        if self.tree.is_int(left) && self.tree.is_int(right) {
            // Two internal children: move the in-order successor's entry
            // here and splice the successor out instead. The successor is
            // the leftmost internal node of the right subtree, so it has at
            // most one internal child.
            let Some(succ) = self.tree.first_internal(right) else {
                return Err(TreeError::IllegalState("internal node with a missing child"));
            };
            self.tree.swap_entries(target, succ);
            target = succ;
        }
        let (entry, parent) = self.tree.splice(target)?;
        self.len -= 1;
        self.strategy.after_remove(&mut self.tree, parent)?;
        Ok(Some(entry.1))
    }
}

impl<'a, K, V, S, C> IntoIterator for &'a SortedMap<K, V, S, C>
where
    C: Fn(&K, &K) -> Option<Ordering>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}
