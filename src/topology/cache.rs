//! Cache invalidation utilities shared across mesh structures.
//!
//! Meshes look nodes up by id far less often than they mutate, so the
//! id→position table is built on first use after a mutation and dropped on
//! the next one. [`IdIndexCache`] owns that table so accessors never touch a
//! dirty flag directly.

use hashbrown::HashMap;
use once_cell::sync::OnceCell;

/// Anything that caches derived mesh state (id maps, bounding ranges, …)
/// should implement this.
pub trait InvalidateCache {
    /// Invalidate *all* internal caches so future queries recompute correctly.
    fn invalidate_cache(&mut self);
}

// Blanket impl for Box<T>
impl<T: InvalidateCache + ?Sized> InvalidateCache for Box<T> {
    #[inline]
    fn invalidate_cache(&mut self) {
        (**self).invalidate_cache();
    }
}

/// Lazily rebuilt map from node id to position in the owning node table,
/// bundled with whatever extra summary `S` the rebuild scan computes.
#[derive(Clone, Debug, Default)]
pub struct IdIndexCache<S = ()> {
    built: OnceCell<(HashMap<i32, usize>, S)>,
}

impl<S> IdIndexCache<S> {
    pub fn new() -> Self {
        Self {
            built: OnceCell::new(),
        }
    }

    /// `true` when the next lookup will trigger a rebuild.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.built.get().is_none()
    }

    /// Returns the cached index, building it with `rebuild` if stale.
    #[inline]
    pub fn get_or_rebuild<F>(&self, rebuild: F) -> &(HashMap<i32, usize>, S)
    where
        F: FnOnce() -> (HashMap<i32, usize>, S),
    {
        self.built.get_or_init(rebuild)
    }

    /// Position of `id`, rebuilding if stale.
    #[inline]
    pub fn position<F>(&self, id: i32, rebuild: F) -> Option<usize>
    where
        F: FnOnce() -> (HashMap<i32, usize>, S),
    {
        self.get_or_rebuild(rebuild).0.get(&id).copied()
    }

    /// Keep a fresh index fresh across an append without a full rescan.
    /// Does nothing when the cache is already dirty.
    #[inline]
    pub fn record_append(&mut self, id: i32, pos: usize, update: impl FnOnce(&mut S)) {
        if let Some((map, summary)) = self.built.get_mut() {
            map.insert(id, pos);
            update(summary);
        }
    }
}

impl<S> InvalidateCache for IdIndexCache<S> {
    #[inline]
    fn invalidate_cache(&mut self) {
        self.built.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn build(ids: &[i32]) -> (HashMap<i32, usize>, ()) {
        (ids.iter().enumerate().map(|(i, id)| (*id, i)).collect(), ())
    }

    #[test]
    fn rebuilds_once_until_invalidated() {
        let ids = [7, 3, 9];
        let calls = Cell::new(0);
        let mut cache = IdIndexCache::<()>::new();
        assert!(cache.is_dirty());

        let rebuild = || {
            calls.set(calls.get() + 1);
            build(&ids)
        };
        assert_eq!(cache.position(3, rebuild), Some(1));
        assert_eq!(cache.position(9, || build(&ids)), Some(2));
        assert_eq!(calls.get(), 1);
        assert!(!cache.is_dirty());

        cache.invalidate_cache();
        assert!(cache.is_dirty());
        assert_eq!(cache.position(4, || build(&ids)), None);
    }

    #[test]
    fn append_keeps_fresh_cache_fresh() {
        let mut cache = IdIndexCache::<usize>::new();
        cache.get_or_rebuild(|| (HashMap::new(), 0));
        cache.record_append(5, 0, |n| *n += 1);
        assert_eq!(cache.position(5, || unreachable!()), Some(0));
        assert_eq!(cache.get_or_rebuild(|| unreachable!()).1, 1);
    }
}
