use std::fmt;

use tracing::{debug, trace};

use crate::{
    ImtError, MerkleProof, NodeHasher, Result,
    hash::{capacity_for, validate_dimensions},
    zeroes::ZeroTable,
};

/// An incremental Merkle tree of fixed depth and arity.
///
/// Nodes are stored level by level: level 0 holds the leaves, level `depth`
/// holds the single root. Each level keeps only its populated prefix; a
/// position at or past the end of a level stands for the zero value of that
/// level and is never materialized.
///
/// Leaves are appended with [`insert`](Self::insert) and can then be
/// overwritten with [`update`](Self::update) or reset to the zero leaf with
/// [`delete`](Self::delete). Each of those rehashes only the `depth` nodes on
/// the path to the root, so a mutation costs `depth` hash calls.
///
/// The tree has no internal synchronization. Share it across threads behind a
/// lock or give it a single owner; proofs it produces are plain values and can
/// be sent anywhere.
#[derive(Clone)]
pub struct IncrementalMerkleTree<N, H> {
    nodes: Vec<Vec<N>>,
    zeroes: ZeroTable<N>,
    hasher: H,
    depth: usize,
    arity: usize,
}

impl<N, H> IncrementalMerkleTree<N, H>
where
    N: Clone + PartialEq,
    H: NodeHasher<N>,
{
    /// Create an empty tree.
    ///
    /// The root of the new tree is the precomputed all-zero root, so no
    /// traversal happens beyond building the zero table.
    pub fn new(hasher: H, depth: usize, zero_value: N, arity: usize) -> Result<Self> {
        Self::with_leaves(hasher, depth, zero_value, arity, Vec::new())
    }

    /// Create a tree pre-populated with `leaves`, hashed bottom-up.
    ///
    /// Fails with [`ImtError::InvalidArgument`] if `depth` or `arity` is zero
    /// and with [`ImtError::CapacityExceeded`] if there are more than
    /// `arity^depth` leaves.
    pub fn with_leaves(
        hasher: H,
        depth: usize,
        zero_value: N,
        arity: usize,
        leaves: Vec<N>,
    ) -> Result<Self> {
        validate_dimensions(depth, arity)?;
        let capacity = capacity_for(arity, depth);
        if leaves.len() > capacity {
            return Err(ImtError::CapacityExceeded {
                capacity,
                count: leaves.len(),
            });
        }

        let zeroes = ZeroTable::compute(&hasher, zero_value, depth, arity);

        let mut nodes = Vec::with_capacity(depth + 1);
        if leaves.is_empty() {
            nodes.resize(depth, Vec::new());
            nodes.push(vec![zeroes.empty_root().clone()]);
        } else {
            nodes.push(leaves);
            for level in 0..depth {
                let children = &nodes[level];
                let zero = zeroes.at(level);
                let parents: Vec<N> = (0..children.len().div_ceil(arity))
                    .map(|parent| {
                        hasher.combine(&gather_children(children, zero, parent * arity, arity))
                    })
                    .collect();
                nodes.push(parents);
            }
        }

        debug!(
            depth,
            arity,
            leaves = nodes[0].len(),
            capacity,
            "constructed incremental merkle tree"
        );

        Ok(IncrementalMerkleTree {
            nodes,
            zeroes,
            hasher,
            depth,
            arity,
        })
    }

    /// Append `leaf` at the next free index and return that index.
    pub fn insert(&mut self, leaf: N) -> Result<usize> {
        let index = self.size();
        let capacity = self.capacity();
        if index >= capacity {
            debug!(capacity, "insert refused, tree is full");
            return Err(ImtError::TreeFull { capacity });
        }

        trace!(index, "insert leaf");
        self.rehash_path(index, leaf);
        Ok(index)
    }

    /// Overwrite the leaf at `index`.
    ///
    /// Writing the value the leaf already holds is a no-op: nothing is stored
    /// and the hasher is not called.
    pub fn update(&mut self, index: usize, leaf: N) -> Result<()> {
        self.check_index(index)?;
        if self.nodes[0][index] == leaf {
            debug!(index, "update skipped, leaf unchanged");
            return Ok(());
        }

        trace!(index, "update leaf");
        self.rehash_path(index, leaf);
        Ok(())
    }

    /// Reset the leaf at `index` to the zero leaf.
    ///
    /// The slot stays populated, so [`size`](Self::size) does not shrink.
    pub fn delete(&mut self, index: usize) -> Result<()> {
        let zero = self.zeroes.at(0).clone();
        self.update(index, zero)
    }

    /// Produce a membership proof for the leaf at `index`.
    ///
    /// The proof is a snapshot; later mutations of the tree do not affect it.
    pub fn create_proof(&self, index: usize) -> Result<MerkleProof<N>> {
        self.check_index(index)?;

        let mut siblings = Vec::with_capacity(self.depth);
        let mut path_indices = Vec::with_capacity(self.depth);
        let mut position = index;
        for level in 0..self.depth {
            let offset = position % self.arity;
            let group = gather_children(
                &self.nodes[level],
                self.zeroes.at(level),
                position - offset,
                self.arity,
            );
            siblings.push(
                group
                    .into_iter()
                    .enumerate()
                    .filter(|(i, _)| *i != offset)
                    .map(|(_, node)| node)
                    .collect(),
            );
            path_indices.push(offset);
            position /= self.arity;
        }

        Ok(MerkleProof {
            root: self.root().clone(),
            leaf: self.nodes[0][index].clone(),
            leaf_index: index,
            siblings,
            path_indices,
        })
    }

    /// Verify `proof` with this tree's hasher.
    ///
    /// Equivalent to [`MerkleProof::verify`] with the same hasher; it does not
    /// check that the proof was produced by this particular tree.
    pub fn verify_proof(&self, proof: &MerkleProof<N>) -> bool {
        proof.verify(&self.hasher)
    }

    /// Store `leaf` at `index` and rehash every ancestor up to the root.
    fn rehash_path(&mut self, mut index: usize, leaf: N) {
        let mut node = leaf;
        for level in 0..self.depth {
            let zero = self.zeroes.at(level);
            let level_nodes = &mut self.nodes[level];
            if index < level_nodes.len() {
                level_nodes[index] = node;
            } else {
                level_nodes.resize(index, zero.clone());
                level_nodes.push(node);
            }

            let start = index - index % self.arity;
            let children = gather_children(level_nodes, zero, start, self.arity);
            node = self.hasher.combine(&children);
            index /= self.arity;
        }
        self.nodes[self.depth] = vec![node];
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let size = self.size();
        if index >= size {
            return Err(ImtError::IndexOutOfRange { index, size });
        }
        Ok(())
    }
}

impl<N, H> IncrementalMerkleTree<N, H> {
    /// The current root.
    pub fn root(&self) -> &N {
        &self.nodes[self.depth][0]
    }

    /// Number of edges from a leaf to the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of children per internal node.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Number of populated leaves, deleted ones included.
    pub fn size(&self) -> usize {
        self.nodes[0].len()
    }

    /// Returns `true` if no leaf has been inserted.
    pub fn is_empty(&self) -> bool {
        self.nodes[0].is_empty()
    }

    /// Maximum number of leaves, `arity^depth`.
    pub fn capacity(&self) -> usize {
        capacity_for(self.arity, self.depth)
    }

    /// Returns `true` if no further leaf can be inserted.
    pub fn is_full(&self) -> bool {
        self.size() >= self.capacity()
    }

    /// A copy of the populated leaves.
    pub fn leaves(&self) -> Vec<N>
    where
        N: Clone,
    {
        self.nodes[0].clone()
    }

    /// The leaf at `index`, if populated.
    pub fn leaf(&self, index: usize) -> Option<&N> {
        self.nodes[0].get(index)
    }

    /// The populated prefix of `level` (0 = leaves, `depth` = root).
    pub fn nodes_at_level(&self, level: usize) -> Option<&[N]> {
        self.nodes.get(level).map(Vec::as_slice)
    }

    /// The zero value of each level below the root, starting with the zero
    /// leaf.
    ///
    /// The table is fixed at construction and handed out read-only.
    pub fn zeroes(&self) -> &[N] {
        self.zeroes.levels()
    }

    /// Index of the first leaf equal to `leaf`.
    ///
    /// Matching uses `N`'s `PartialEq`, so node types with several encodings
    /// of the same value only match the identical encoding.
    pub fn index_of(&self, leaf: &N) -> Option<usize>
    where
        N: PartialEq,
    {
        self.nodes[0].iter().position(|l| l == leaf)
    }

    /// The hasher this tree combines nodes with.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }
}

impl<N: fmt::Debug, H> fmt::Debug for IncrementalMerkleTree<N, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncrementalMerkleTree")
            .field("depth", &self.depth)
            .field("arity", &self.arity)
            .field("zeroes", &self.zeroes.levels())
            .field("nodes", &self.nodes)
            .finish_non_exhaustive()
    }
}

/// The `arity` children starting at `start`, with the level's zero value
/// substituted for every position past the populated prefix.
fn gather_children<N: Clone>(level_nodes: &[N], zero: &N, start: usize, arity: usize) -> Vec<N> {
    (start..start + arity)
        .map(|i| level_nodes.get(i).unwrap_or(zero).clone())
        .collect()
}
