//! # IDs
//! Process-unique handles, namespaced by type. `Id<EmbeddedResource>` and `Id<Page>` may share a
//! numeric value, but can never be compared with each other.
//!
//! Ids are handed out in increasing order per namespace. They are not stable across runs and must
//! not be written to disk.

use std::sync::atomic::{AtomicU64, Ordering};

type Counters = parking_lot::RwLock<hashbrown::HashMap<std::any::TypeId, AtomicU64>>;

fn counters() -> &'static Counters {
    static COUNTERS: std::sync::OnceLock<Counters> = std::sync::OnceLock::new();
    COUNTERS.get_or_init(Counters::default)
}

pub struct Id<T: std::any::Any> {
    id: std::num::NonZeroU64,
    _namespace: std::marker::PhantomData<fn() -> T>,
}
impl<T: std::any::Any> Id<T> {
    /// Allocate a fresh id in `T`'s namespace.
    ///
    /// # Panics
    /// If all `u64::MAX - 1` ids of this namespace have been used.
    #[must_use]
    pub fn new() -> Self {
        let ty = std::any::TypeId::of::<T>();
        let read = counters().upgradable_read();
        let previous = if let Some(counter) = read.get(&ty) {
            counter.fetch_add(1, Ordering::Relaxed)
        } else {
            // First id of this namespace.
            let mut write = parking_lot::RwLockUpgradableReadGuard::upgrade(read);
            write
                .entry(ty)
                .or_insert_with(|| AtomicU64::new(0))
                .fetch_add(1, Ordering::Relaxed)
        };
        let Some(id) = previous
            .checked_add(1)
            .and_then(std::num::NonZeroU64::new)
        else {
            panic!("{} id space exhausted", std::any::type_name::<T>());
        };
        Self {
            id,
            _namespace: std::marker::PhantomData,
        }
    }
    /// The raw numeric value. Ids from different namespaces may share it!
    #[must_use]
    pub fn get(&self) -> u64 {
        self.id.get()
    }
}
impl<T: std::any::Any> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}
impl<T: std::any::Any> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: std::any::Any> Copy for Id<T> {}
impl<T: std::any::Any> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl<T: std::any::Any> Eq for Id<T> {}
impl<T: std::any::Any> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<T: std::any::Any> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}
impl<T: std::any::Any> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
impl<T: std::any::Any> std::fmt::Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = std::any::type_name::<T>();
        let short = name.rsplit("::").next().unwrap_or(name);
        write!(f, "{short}#{}", self.id)
    }
}
impl<T: std::any::Any> std::fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}
