use thiserror::Error;

/// Alias for `core::result::Result<T, ImtError>`.
pub type Result<T> = core::result::Result<T, ImtError>;

/// Errors from incremental Merkle tree operations.
///
/// All of them are detected before any node is written, so a failed call
/// leaves the tree exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ImtError {
    /// Construction parameters are unusable (zero depth or zero arity).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// More initial leaves were supplied than `arity^depth`.
    #[error("capacity exceeded (capacity {capacity}, count {count})")]
    CapacityExceeded {
        /// Maximum number of leaves for the tree dimensions.
        capacity: usize,
        /// Number of leaves that were supplied.
        count: usize,
    },
    /// Insert was attempted on a tree that already holds `arity^depth` leaves.
    #[error("tree is full (capacity {capacity})")]
    TreeFull {
        /// Maximum number of leaves for the tree dimensions.
        capacity: usize,
    },
    /// The leaf index does not address a populated leaf.
    #[error("leaf index {index} out of range (size {size})")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Current number of leaves.
        size: usize,
    },
    /// A proof could not be decoded from bytes.
    #[error("invalid proof: {0}")]
    InvalidProof(String),
}
