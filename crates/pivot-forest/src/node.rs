//! Arena node primitives shared by the tree store and the map layer.

/// Opaque handle to a tree position.
///
/// A handle pairs an arena slot index with the slot's generation at the time
/// the node was created. Splicing a node out of the tree bumps the slot
/// generation, so handles to removed nodes stay permanently detectable as
/// defunct even after the slot itself is reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) idx: u32,
    pub(crate) ver: u32,
}

/// One linked tree node.
///
/// `entry: None` marks a sentinel leaf ("no key here yet"). Internal nodes
/// carry an entry and, by map-level invariant, exactly two children. The
/// parent link is non-owning and only used for upward traversal.
#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) entry: Option<(K, V)>,
    /// Strategy scratch value: the AVL policy stores the node height here,
    /// the treap policy stores the node's random priority. Unused by the
    /// plain policy.
    pub(crate) aux: u64,
}

impl<K, V> Node<K, V> {
    pub(crate) fn new(entry: Option<(K, V)>, parent: Option<NodeId>) -> Self {
        Self {
            parent,
            left: None,
            right: None,
            entry,
            aux: 0,
        }
    }
}
