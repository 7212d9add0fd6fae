use thiserror::Error;

pub type Result<T> = std::result::Result<T, TreeError>;

/// Error kinds shared by the tree store and the sorted maps.
///
/// All errors are synchronous and non-retryable: an operation either
/// completes while keeping the tree invariants, or it fails before touching
/// the structure.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// The handle refers to a node that is no longer in the tree.
    #[error("position is no longer in the tree")]
    InvalidPosition,

    /// A structural precondition was violated (rotating the root,
    /// restructuring without a grandparent, adding a second root). These are
    /// programming-contract failures, not recoverable runtime conditions.
    #[error("illegal tree state: {0}")]
    IllegalState(&'static str),

    /// The comparator could not order two keys (e.g. a NaN key under the
    /// natural float ordering).
    #[error("key is not comparable under the map ordering")]
    IncompatibleKey,
}
