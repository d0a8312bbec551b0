//! Zero-value table: the value of a fully empty subtree at every level.

use crate::NodeHasher;

/// Precomputed zero values for a tree of fixed depth and arity.
///
/// `levels[0]` is the caller's zero leaf and
/// `levels[l + 1] = hash(arity copies of levels[l])`. The table holds one
/// entry per level below the root; `empty_root` is one more application of the
/// hash, i.e. the root of a tree with no leaves.
#[derive(Debug, Clone)]
pub(crate) struct ZeroTable<N> {
    levels: Vec<N>,
    empty_root: N,
}

impl<N: Clone> ZeroTable<N> {
    /// Build the table. Performs exactly `depth` hash calls.
    pub(crate) fn compute<H>(hasher: &H, zero_value: N, depth: usize, arity: usize) -> Self
    where
        H: NodeHasher<N> + ?Sized,
    {
        let mut levels = Vec::with_capacity(depth);
        let mut zero = zero_value;
        for _ in 0..depth {
            let children = vec![zero.clone(); arity];
            levels.push(zero);
            zero = hasher.combine(&children);
        }
        ZeroTable {
            levels,
            empty_root: zero,
        }
    }
}

impl<N> ZeroTable<N> {
    /// The zero value standing in for an absent node at `level`.
    pub(crate) fn at(&self, level: usize) -> &N {
        &self.levels[level]
    }

    pub(crate) fn levels(&self) -> &[N] {
        &self.levels
    }

    pub(crate) fn empty_root(&self) -> &N {
        &self.empty_root
    }
}
