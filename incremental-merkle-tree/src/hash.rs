use crate::{ImtError, Result};

/// Combines the `arity` children of a node, left to right, into the parent.
///
/// Implementations must be deterministic and free of side effects: the tree
/// relies on `combine` producing the same parent for the same children both
/// when it rehashes a path and when a proof is verified elsewhere.
///
/// Any `Fn(&[N]) -> N` is a `NodeHasher<N>`, so closures and plain functions
/// can be passed directly.
pub trait NodeHasher<N> {
    /// Hash an ordered sequence of children into their parent.
    fn combine(&self, children: &[N]) -> N;
}

impl<N, F> NodeHasher<N> for F
where
    F: Fn(&[N]) -> N,
{
    fn combine(&self, children: &[N]) -> N {
        self(children)
    }
}

/// A [`NodeHasher`] over 32-byte digests: `blake3(child_0 || ... || child_n)`.
#[cfg(feature = "blake3")]
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Hasher;

#[cfg(feature = "blake3")]
impl NodeHasher<[u8; 32]> for Blake3Hasher {
    fn combine(&self, children: &[[u8; 32]]) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        for child in children {
            hasher.update(child);
        }
        *hasher.finalize().as_bytes()
    }
}

/// Maximum number of leaves of a tree: `arity^depth`.
///
/// Saturates at `usize::MAX`; such a tree can never be filled in memory, so
/// the bound is effectively unlimited.
pub fn capacity_for(arity: usize, depth: usize) -> usize {
    u32::try_from(depth)
        .ok()
        .and_then(|depth| arity.checked_pow(depth))
        .unwrap_or(usize::MAX)
}

/// Validate that depth and arity are both positive.
pub(crate) fn validate_dimensions(depth: usize, arity: usize) -> Result<()> {
    if depth == 0 {
        return Err(ImtError::InvalidArgument(
            "depth must be positive".to_string(),
        ));
    }
    if arity == 0 {
        return Err(ImtError::InvalidArgument(
            "arity must be positive".to_string(),
        ));
    }
    Ok(())
}
