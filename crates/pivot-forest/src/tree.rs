//! Linked binary tree store with an arena backend and a rotation engine.
//!
//! Nodes live in a slot arena addressed by [`NodeId`] handles (`u32` index +
//! generation). Freed slots go on a free list; freeing bumps the slot
//! generation so stale handles fail [`LinkedTree::validate`] instead of
//! reading reused memory.
//!
//! Complexity:
//! - `add_root` / `add_left` / `add_right` / `validate`: O(1)
//! - `rotate`: O(1)
//! - `restructure`: O(1) (one or two rotations)

use crate::error::{Result, TreeError};
use crate::node::{Node, NodeId};

struct Slot<K, V> {
    ver: u32,
    live: bool,
    node: Node<K, V>,
}

/// Parent-linked binary tree over an arena of slots.
///
/// The store itself is shape-agnostic: it does not know about search keys or
/// sentinels beyond `entry: None` meaning "no entry". Ordering and the
/// two-children-per-internal-node discipline are maintained by the map layer.
pub struct LinkedTree<K, V> {
    slots: Vec<Slot<K, V>>,
    free: Vec<u32>,
    root: Option<NodeId>,
    occupied: usize,
}

impl<K, V> Default for LinkedTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> LinkedTree<K, V> {
    /// An empty tree with no root node.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: None,
            occupied: 0,
        }
    }

    /// A tree holding a single sentinel root, the empty-map shape.
    pub(crate) fn with_sentinel_root() -> Self {
        let mut tree = Self::new();
        let id = tree.alloc(Node::new(None, None));
        tree.root = Some(id);
        tree
    }

    // ── Arena plumbing ────────────────────────────────────────────────────

    fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        self.occupied += 1;
        match self.free.pop() {
            Some(idx) => {
                let slot = &mut self.slots[idx as usize];
                slot.node = node;
                slot.live = true;
                NodeId { idx, ver: slot.ver }
            }
            None => {
                let idx = self.slots.len() as u32;
                self.slots.push(Slot {
                    ver: 0,
                    live: true,
                    node,
                });
                NodeId { idx, ver: 0 }
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        let slot = &mut self.slots[id.idx as usize];
        slot.node = Node::new(None, None);
        slot.ver = slot.ver.wrapping_add(1);
        slot.live = false;
        self.free.push(id.idx);
        self.occupied -= 1;
    }

    fn n(&self, id: NodeId) -> &Node<K, V> {
        &self.slots[id.idx as usize].node
    }

    fn n_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        &mut self.slots[id.idx as usize].node
    }

    // Unchecked link readers for in-crate traversal. Callers hold handles
    // that were validated at the API boundary and never outlive a splice.

    pub(crate) fn p(&self, id: NodeId) -> Option<NodeId> {
        self.n(id).parent
    }

    pub(crate) fn l(&self, id: NodeId) -> Option<NodeId> {
        self.n(id).left
    }

    pub(crate) fn r(&self, id: NodeId) -> Option<NodeId> {
        self.n(id).right
    }

    pub(crate) fn is_int(&self, id: NodeId) -> bool {
        self.n(id).entry.is_some()
    }

    pub(crate) fn aux_of(&self, id: NodeId) -> u64 {
        self.n(id).aux
    }

    pub(crate) fn set_aux_of(&mut self, id: NodeId, value: u64) {
        self.n_mut(id).aux = value;
    }

    pub(crate) fn entry_ref(&self, id: NodeId) -> Option<(&K, &V)> {
        self.n(id).entry.as_ref().map(|(k, v)| (k, v))
    }

    pub(crate) fn replace_value(&mut self, id: NodeId, value: V) -> Option<V> {
        self.n_mut(id)
            .entry
            .as_mut()
            .map(|e| std::mem::replace(&mut e.1, value))
    }

    pub(crate) fn take_entry_at(&mut self, id: NodeId) -> Option<(K, V)> {
        self.n_mut(id).entry.take()
    }

    /// Swap the entries of two distinct nodes, leaving links and aux values
    /// in place. Used by the successor-copy step of deletion.
    pub(crate) fn swap_entries(&mut self, a: NodeId, b: NodeId) {
        let ai = a.idx as usize;
        let bi = b.idx as usize;
        if ai == bi {
            return;
        }
        let (lo, hi) = if ai < bi { (ai, bi) } else { (bi, ai) };
        let (head, tail) = self.slots.split_at_mut(hi);
        std::mem::swap(&mut head[lo].node.entry, &mut tail[0].node.entry);
    }

    // ── Public accessors ──────────────────────────────────────────────────

    /// Root position, or `None` for a tree with no nodes at all.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of live nodes (internal and sentinel).
    pub fn node_count(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Fails with `InvalidPosition` if `p` refers to a defunct node.
    pub fn validate(&self, p: NodeId) -> Result<()> {
        match self.slots.get(p.idx as usize) {
            Some(slot) if slot.live && slot.ver == p.ver => Ok(()),
            _ => Err(TreeError::InvalidPosition),
        }
    }

    pub fn parent(&self, p: NodeId) -> Result<Option<NodeId>> {
        self.validate(p)?;
        Ok(self.n(p).parent)
    }

    pub fn left(&self, p: NodeId) -> Result<Option<NodeId>> {
        self.validate(p)?;
        Ok(self.n(p).left)
    }

    pub fn right(&self, p: NodeId) -> Result<Option<NodeId>> {
        self.validate(p)?;
        Ok(self.n(p).right)
    }

    /// Whether `p` carries an entry.
    pub fn is_internal(&self, p: NodeId) -> Result<bool> {
        self.validate(p)?;
        Ok(self.is_int(p))
    }

    pub fn is_sentinel(&self, p: NodeId) -> Result<bool> {
        Ok(!self.is_internal(p)?)
    }

    /// The entry at `p`, or `None` for a sentinel.
    pub fn entry(&self, p: NodeId) -> Result<Option<(&K, &V)>> {
        self.validate(p)?;
        Ok(self.entry_ref(p))
    }

    /// Per-node auxiliary scalar (balance-strategy scratch).
    pub fn aux(&self, p: NodeId) -> Result<u64> {
        self.validate(p)?;
        Ok(self.n(p).aux)
    }

    pub fn set_aux(&mut self, p: NodeId, value: u64) -> Result<()> {
        self.validate(p)?;
        self.n_mut(p).aux = value;
        Ok(())
    }

    // ── Structural updates ────────────────────────────────────────────────

    /// Place a node at the root of an empty tree.
    pub fn add_root(&mut self, entry: Option<(K, V)>) -> Result<NodeId> {
        if self.root.is_some() {
            return Err(TreeError::IllegalState("tree already has a root"));
        }
        let id = self.alloc(Node::new(entry, None));
        self.root = Some(id);
        Ok(id)
    }

    /// Attach a new left child under `p`.
    pub fn add_left(&mut self, p: NodeId, entry: Option<(K, V)>) -> Result<NodeId> {
        self.validate(p)?;
        if self.n(p).left.is_some() {
            return Err(TreeError::IllegalState("position already has a left child"));
        }
        let child = self.alloc(Node::new(entry, Some(p)));
        self.n_mut(p).left = Some(child);
        Ok(child)
    }

    /// Attach a new right child under `p`.
    pub fn add_right(&mut self, p: NodeId, entry: Option<(K, V)>) -> Result<NodeId> {
        self.validate(p)?;
        if self.n(p).right.is_some() {
            return Err(TreeError::IllegalState("position already has a right child"));
        }
        let child = self.alloc(Node::new(entry, Some(p)));
        self.n_mut(p).right = Some(child);
        Ok(child)
    }

    /// Replace the entry at `p`, returning the previous one. Setting `Some`
    /// on a sentinel turns it internal; the caller is responsible for
    /// attaching its sentinel children afterwards.
    pub fn set_entry(&mut self, p: NodeId, entry: Option<(K, V)>) -> Result<Option<(K, V)>> {
        self.validate(p)?;
        Ok(std::mem::replace(&mut self.n_mut(p).entry, entry))
    }

    /// Relink `child` (possibly `None`) as the oriented child of `parent`.
    fn relink(&mut self, parent: NodeId, child: Option<NodeId>, make_left_child: bool) {
        if make_left_child {
            self.n_mut(parent).left = child;
        } else {
            self.n_mut(parent).right = child;
        }
        if let Some(c) = child {
            self.n_mut(c).parent = Some(parent);
        }
    }

    // ── Rotation engine ───────────────────────────────────────────────────

    /// Rotate `x` above its parent `y`, switching between these shapes
    /// depending on which side `x` is on:
    ///
    /// ```text
    ///        y                 x
    ///       / \               / \
    ///      x  t2     <->    t0   y
    ///     / \                   / \
    ///    t0  t1                t1  t2
    /// ```
    ///
    /// `y`'s old parent (if any) adopts `x`; otherwise `x` becomes the root.
    pub fn rotate(&mut self, x: NodeId) -> Result<()> {
        self.validate(x)?;
        let y = self
            .p(x)
            .ok_or(TreeError::IllegalState("cannot rotate the root"))?;
        let z = self.p(y);
        if self.l(y) == Some(x) {
            // Right rotation: x's right subtree becomes y's left.
            let moved = self.r(x);
            self.relink(y, moved, true);
            self.n_mut(x).right = Some(y);
        } else {
            // Left rotation: x's left subtree becomes y's right.
            let moved = self.l(x);
            self.relink(y, moved, false);
            self.n_mut(x).left = Some(y);
        }
        self.n_mut(y).parent = Some(x);
        self.n_mut(x).parent = z;
        match z {
            None => self.root = Some(x),
            Some(g) => {
                if self.l(g) == Some(y) {
                    self.n_mut(g).left = Some(x);
                } else {
                    self.n_mut(g).right = Some(x);
                }
            }
        }
        Ok(())
    }

    /// Trinode restructuring around `x`, its parent and grandparent.
    ///
    /// When `x` and its parent lie on the same side of their parents, a
    /// single rotation of the parent suffices; otherwise `x` is rotated
    /// twice (zig-zag). Either way the middle-valued node ends on top and is
    /// returned as the new subtree root.
    pub fn restructure(&mut self, x: NodeId) -> Result<NodeId> {
        self.validate(x)?;
        let y = self
            .p(x)
            .ok_or(TreeError::IllegalState("cannot restructure without a grandparent"))?;
        let z = self
            .p(y)
            .ok_or(TreeError::IllegalState("cannot restructure without a grandparent"))?;
        let aligned = (self.r(y) == Some(x) && self.r(z) == Some(y))
            || (self.l(y) == Some(x) && self.l(z) == Some(y));
        if aligned {
            self.rotate(y)?;
            Ok(y)
        } else {
            self.rotate(x)?;
            self.rotate(x)?;
            Ok(x)
        }
    }

    /// Splice out an internal node with at most one internal child: the
    /// surviving child (internal, or one of the sentinels) takes its place,
    /// and the node plus its other, sentinel child are freed. Returns the
    /// removed entry and the old parent, the anchor for delete rebalancing.
    pub(crate) fn splice(&mut self, p: NodeId) -> Result<((K, V), Option<NodeId>)> {
        self.validate(p)?;
        let (Some(left), Some(right)) = (self.l(p), self.r(p)) else {
            return Err(TreeError::IllegalState("cannot splice a sentinel"));
        };
        let (leaf, replacement) = if self.is_int(left) {
            (right, left)
        } else {
            (left, right)
        };
        if self.is_int(leaf) {
            return Err(TreeError::IllegalState(
                "cannot splice a node with two internal children",
            ));
        }
        let parent = self.p(p);
        match parent {
            None => {
                self.n_mut(replacement).parent = None;
                self.root = Some(replacement);
            }
            Some(par) => {
                let as_left = self.l(par) == Some(p);
                self.relink(par, Some(replacement), as_left);
            }
        }
        let entry = self
            .n_mut(p)
            .entry
            .take()
            .ok_or(TreeError::IllegalState("cannot splice a sentinel"))?;
        self.release(leaf);
        self.release(p);
        Ok((entry, parent))
    }

    // ── In-order navigation over internal nodes ───────────────────────────

    /// Leftmost internal node of the subtree at `sub` (`None` if `sub` is a
    /// sentinel).
    pub(crate) fn first_internal(&self, sub: NodeId) -> Option<NodeId> {
        if !self.is_int(sub) {
            return None;
        }
        let mut curr = sub;
        while let Some(left) = self.l(curr) {
            if self.is_int(left) {
                curr = left;
            } else {
                break;
            }
        }
        Some(curr)
    }

    /// Rightmost internal node of the subtree at `sub`.
    pub(crate) fn last_internal(&self, sub: NodeId) -> Option<NodeId> {
        if !self.is_int(sub) {
            return None;
        }
        let mut curr = sub;
        while let Some(right) = self.r(curr) {
            if self.is_int(right) {
                curr = right;
            } else {
                break;
            }
        }
        Some(curr)
    }

    /// In-order successor of `curr` among internal nodes. `curr` may be a
    /// sentinel, in which case this climbs to the first ancestor reached via
    /// a left-child step (the ceiling of the sentinel's key gap).
    pub(crate) fn next_internal(&self, mut curr: NodeId) -> Option<NodeId> {
        if let Some(right) = self.r(curr) {
            if self.is_int(right) {
                return self.first_internal(right);
            }
        }
        let mut parent = self.p(curr);
        while let Some(par) = parent {
            if self.r(par) == Some(curr) {
                curr = par;
                parent = self.p(par);
            } else {
                return Some(par);
            }
        }
        None
    }

    /// In-order predecessor of `curr` among internal nodes; mirror of
    /// [`Self::next_internal`].
    pub(crate) fn prev_internal(&self, mut curr: NodeId) -> Option<NodeId> {
        if let Some(left) = self.l(curr) {
            if self.is_int(left) {
                return self.last_internal(left);
            }
        }
        let mut parent = self.p(curr);
        while let Some(par) = parent {
            if self.l(par) == Some(curr) {
                curr = par;
                parent = self.p(par);
            } else {
                return Some(par);
            }
        }
        None
    }
}
