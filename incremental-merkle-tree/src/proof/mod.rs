//! Membership proofs for the incremental Merkle tree.
//!
//! A [`MerkleProof`] carries the leaf, the root it claims to belong to, and
//! for every level the siblings of the path node plus the path node's
//! position among them. Verification rebuilds each children group, hashes it,
//! and compares the final value with the claimed root. No tree is needed.

use bincode::{Decode, Encode};

use crate::{ImtError, NodeHasher, Result};


/// A detached membership proof for one leaf.
///
/// `siblings` and `path_indices` are ordered by increasing level, leaf level
/// first. Each sibling group lists the other `arity - 1` children of the path
/// node's parent left to right, with the path node's own slot left out;
/// `path_indices[l]` is where that slot goes back in.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct MerkleProof<N> {
    /// Root of the tree when the proof was created.
    pub root: N,
    /// The proven leaf value.
    pub leaf: N,
    /// Index of the leaf in the tree.
    pub leaf_index: usize,
    /// Sibling nodes at each level.
    pub siblings: Vec<Vec<N>>,
    /// Position of the path node within its children group at each level.
    pub path_indices: Vec<usize>,
}

impl<N: Clone + PartialEq> MerkleProof<N> {
    /// Number of levels covered by the proof.
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }

    /// Recompute the root from the leaf and the authentication path.
    ///
    /// Returns `None` if the proof is structurally malformed: the sibling and
    /// path index sequences differ in length, or a path index points past the
    /// end of its children group.
    pub fn calculate_root<H>(&self, hasher: &H) -> Option<N>
    where
        H: NodeHasher<N> + ?Sized,
    {
        if self.siblings.len() != self.path_indices.len() {
            return None;
        }

        let mut node = self.leaf.clone();
        for (group, &position) in self.siblings.iter().zip(&self.path_indices) {
            if position > group.len() {
                return None;
            }
            let mut children = Vec::with_capacity(group.len() + 1);
            children.extend_from_slice(&group[..position]);
            children.push(node);
            children.extend_from_slice(&group[position..]);
            node = hasher.combine(&children);
        }
        Some(node)
    }

    /// Returns `true` if the recomputed root equals the proof's root.
    ///
    /// Malformed proofs verify to `false`; this never errors.
    pub fn verify<H>(&self, hasher: &H) -> bool
    where
        H: NodeHasher<N> + ?Sized,
    {
        self.calculate_root(hasher)
            .is_some_and(|root| root == self.root)
    }
}

impl<N: Encode> MerkleProof<N> {
    /// Encode to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let config = bincode::config::standard().with_big_endian();
        bincode::encode_to_vec(self, config)
            .map_err(|e| ImtError::InvalidProof(format!("encode error: {}", e)))
    }
}

impl<N: Decode<()>> MerkleProof<N> {
    /// Decode from bytes using bincode.
    ///
    /// Rejects proofs whose sibling and path index sequences differ in length.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_limit::<{ 100 * 1024 * 1024 }>(); // 100MB limit
        let (proof, _): (Self, _) = bincode::decode_from_slice(bytes, config)
            .map_err(|e| ImtError::InvalidProof(format!("decode error: {}", e)))?;
        if proof.siblings.len() != proof.path_indices.len() {
            return Err(ImtError::InvalidProof(format!(
                "{} sibling groups but {} path indices",
                proof.siblings.len(),
                proof.path_indices.len()
            )));
        }
        Ok(proof)
    }
}

/// Verify `proof` with an explicit hasher.
///
/// `None` stands for an absent proof and verifies to `false`. With the tree's
/// own hasher this agrees with
/// [`IncrementalMerkleTree::verify_proof`](crate::IncrementalMerkleTree::verify_proof).
pub fn verify_proof<N, H>(proof: Option<&MerkleProof<N>>, hasher: &H) -> bool
where
    N: Clone + PartialEq,
    H: NodeHasher<N> + ?Sized,
{
    proof.is_some_and(|proof| proof.verify(hasher))
}
