//! Sorted maps over linked binary search trees with sentinel leaves.
//!
//! The tree keeps explicit sentinel ("no entry yet") leaves: every
//! key-bearing node has exactly two children, and a search that misses
//! terminates at the sentinel that a subsequent insert of that key would
//! fill. Positions are generational handles into a slot arena, so a handle
//! to a removed node fails with [`TreeError::InvalidPosition`] instead of
//! reading reused memory.
//!
//! Rebalancing is a pluggable policy value held by the map:
//! - [`Plain`] — no balancing, O(n) worst-case height
//! - [`Avl`] — height-balanced via trinode restructuring, O(log n)
//! - [`Treap`] — randomized max-heap priorities, expected O(log n)
//!
//! Complexity (n = entries, h = height):
//! - `get` / `put` / `remove` / neighbour queries: O(h)
//! - `rotate` / `restructure`: O(1)
//! - `entry_set`: O(n); `sub_map`: O(h + len(output))
//!
//! Single-threaded by design: wrap the whole map in one lock if shared.

pub mod balance;
pub mod error;
pub mod iter;
pub mod map;
mod node;
pub mod tree;

pub use balance::{treap_sort, treap_sort_seeded, Avl, BalanceStrategy, Plain, Treap};
pub use error::{Result, TreeError};
pub use iter::Iter;
pub use map::{natural_order, AvlMap, BstMap, SortedMap, TreapMap};
pub use node::NodeId;
pub use tree::LinkedTree;
