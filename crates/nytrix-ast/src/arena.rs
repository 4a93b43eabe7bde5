use bumpalo::Bump;

pub use bumpalo::collections::Vec as ArenaVec;

/// The per-parse arena. Owns every `Expr`, `Stmt`, and copied string the
/// parser produces (`spec.md` §3.2): freeing the arena invalidates every
/// node atomically, and no node holds a resource needing individual
/// teardown.
///
/// Backed by `bumpalo`, the arena crate used elsewhere in this retrieval
/// pack (`logicaffeine` depends on it directly) for exactly this shape of
/// allocation discipline. `ArenaVec` (a re-export of
/// `bumpalo::collections::Vec`) gives parameter lists, statement bodies,
/// and call-argument vectors the doubling growth `spec.md` requires, for
/// free.
pub struct Arena {
    bump: Bump,
}

impl Arena {
    pub fn new() -> Arena {
        Arena { bump: Bump::new() }
    }

    pub fn alloc<T>(&self, value: T) -> &T {
        self.bump.alloc(value)
    }

    pub fn alloc_str(&self, s: &str) -> &str {
        self.bump.alloc_str(s)
    }

    pub fn vec<T>(&self) -> ArenaVec<'_, T> {
        ArenaVec::new_in(&self.bump)
    }

    pub fn vec_with_capacity<T>(&self, capacity: usize) -> ArenaVec<'_, T> {
        ArenaVec::with_capacity_in(capacity, &self.bump)
    }

    /// Bytes currently allocated across all chunks, for diagnostics/tests.
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

impl Default for Arena {
    fn default() -> Arena {
        Arena::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_returns_stable_reference() {
        let arena = Arena::new();
        let a = arena.alloc(42i64);
        let b = arena.alloc(43i64);
        assert_eq!(*a, 42);
        assert_eq!(*b, 43);
    }

    #[test]
    fn vec_grows_and_keeps_contents() {
        let arena = Arena::new();
        let mut v = arena.vec::<i64>();
        for i in 0..1000 {
            v.push(i);
        }
        assert_eq!(v.len(), 1000);
        assert_eq!(v[999], 999);
    }
}
