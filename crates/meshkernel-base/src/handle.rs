use std::fmt::Debug;
use std::hash::Hash;

/// A stable, `Copy` identity for an entity stored in one of the mesh's
/// per-kind arenas.
///
/// Unlike a raw pointer into a heap-allocated entity, an arena slot is
/// reused once freed; `generation` lets a handle captured before a removal
/// be detected as stale (see [`InvalidHandle`](../../meshkernel_mesh/error/enum.MeshError.html))
/// rather than silently aliasing whatever was allocated into the same slot
/// afterwards.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle<K> {
    kind: K,
    index: u32,
    generation: u32,
}

impl<K: Copy> Handle<K> {
    /// Constructs a handle from its raw parts. Only arena implementations
    /// should call this directly.
    #[inline(always)]
    pub fn new(kind: K, index: u32, generation: u32) -> Self {
        Handle { kind, index, generation }
    }

    /// The entity kind this handle was created with.
    #[inline(always)]
    pub fn kind(&self) -> K { self.kind }

    /// The arena slot index.
    #[inline(always)]
    pub fn index(&self) -> u32 { self.index }

    /// The generation stamped into the slot at creation time.
    #[inline(always)]
    pub fn generation(&self) -> u32 { self.generation }
}

impl<K: Debug> Debug for Handle<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Handle({:?}#{}@{})", self.kind, self.index, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_generations_are_distinct_handles() {
        let a = Handle::new(7u8, 3, 0);
        let b = Handle::new(7u8, 3, 1);
        assert_ne!(a, b);
        assert_eq!(a.index(), b.index());
    }
}
