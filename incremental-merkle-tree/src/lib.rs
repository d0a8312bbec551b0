//! Incremental Merkle tree (IMT) with fixed depth and configurable arity.
//!
//! Leaves are appended at the next free index and committed to a single root.
//! Every mutation only rehashes the path from the touched leaf to the root;
//! positions beyond the populated prefix of a level are never materialized and
//! are instead filled from a table of precomputed "zero" subtree values.
//!
//! # Core types
//!
//! - [`IncrementalMerkleTree`] — the tree (insert, update, delete, proofs).
//! - [`MerkleProof`] — a detached membership proof for one leaf.
//! - [`NodeHasher`] — the pluggable combining function, implemented for any
//!   `Fn(&[N]) -> N`.
//!
//! The engine never looks inside node values beyond equality, so `N` can be a
//! digest, a field element or, in tests, a plain integer.
//!
//! ```
//! use incremental_merkle_tree::IncrementalMerkleTree;
//!
//! let sum = |children: &[u64]| children.iter().sum::<u64>();
//! let mut tree = IncrementalMerkleTree::new(sum, 2, 0u64, 2).expect("valid dimensions");
//! for leaf in [1, 2, 3] {
//!     tree.insert(leaf).expect("tree has room");
//! }
//! assert_eq!(*tree.root(), 6);
//!
//! let proof = tree.create_proof(2).expect("leaf exists");
//! assert!(tree.verify_proof(&proof));
//! ```

#![warn(missing_docs)]

mod error;
pub(crate) mod hash;
pub(crate) mod proof;
pub(crate) mod tree;
mod zeroes;


#[cfg(feature = "blake3")]
pub use hash::Blake3Hasher;
pub use error::{ImtError, Result};
pub use hash::{NodeHasher, capacity_for};
pub use proof::{MerkleProof, verify_proof};
pub use tree::IncrementalMerkleTree;
