//! Singleton instance cache keyed by kind
//!
//! Construction runs without the lock held. A constructor may re-enter the
//! cache, even for the kind it is building; whichever instance is stored
//! first wins and every caller gets that one back.

use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::kind::Kind;

pub struct InstanceCache<T> {
    instances: Mutex<HashMap<Kind, T>>,
}

impl<T: Clone> InstanceCache<T> {
    pub fn new() -> Self {
        Self {
            instances: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, kind: Kind) -> Option<T> {
        self.instances.lock().get(&kind).cloned()
    }

    pub fn contains(&self, kind: Kind) -> bool {
        self.instances.lock().contains_key(&kind)
    }

    /// Stores `instance` unless one is already present for `kind`
    pub fn insert_if_absent(&self, kind: Kind, instance: T) -> bool {
        match self.instances.lock().entry(kind) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(instance);
                true
            }
        }
    }

    /// Returns the instance for `kind`, building it with `factory` if absent.
    ///
    /// Presence is checked again right before storing. If a re-entrant call
    /// stored an instance while `factory` ran, the freshly built one is
    /// dropped and the stored one is returned.
    pub fn get_or_create<E>(&self, kind: Kind, factory: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        if let Some(existing) = self.get(kind) {
            return Ok(existing);
        }

        let built = factory()?;

        match self.instances.lock().entry(kind) {
            Entry::Occupied(stored) => {
                debug!("{} was stored during its own construction, keeping the first instance", kind);
                Ok(stored.get().clone())
            }
            Entry::Vacant(slot) => {
                debug!("Cached new instance of {}", kind);
                Ok(slot.insert(built).clone())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.instances.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> Default for InstanceCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Service;
    struct Other;

    #[test]
    fn test_get_or_create_is_singleton() {
        let cache: InstanceCache<Arc<String>> = InstanceCache::new();
        let builds = AtomicUsize::new(0);

        let build = || -> Result<Arc<String>, ()> {
            builds.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new("service".to_string()))
        };

        let first = cache.get_or_create(Kind::of::<Service>(), build).unwrap();
        let second = cache.get_or_create(Kind::of::<Service>(), build).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reentrant_construction_keeps_first_stored() {
        let cache: InstanceCache<Arc<String>> = InstanceCache::new();
        let kind = Kind::of::<Service>();

        let outer = cache
            .get_or_create(kind, || -> Result<Arc<String>, ()> {
                // Construction asks for its own kind before it has finished
                let inner = cache.get_or_create(kind, || Ok(Arc::new("inner".to_string())))?;
                assert_eq!(inner.as_str(), "inner");
                Ok(Arc::new("outer".to_string()))
            })
            .unwrap();

        let again = cache.get_or_create(kind, || -> Result<_, ()> { Ok(Arc::new("late".to_string())) }).unwrap();

        assert_eq!(outer.as_str(), "inner");
        assert!(Arc::ptr_eq(&outer, &again));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_construction_stores_nothing() {
        let cache: InstanceCache<Arc<String>> = InstanceCache::new();

        let result = cache.get_or_create(Kind::of::<Service>(), || Err("boom"));

        assert_eq!(result.unwrap_err(), "boom");
        assert!(!cache.contains(Kind::of::<Service>()));
    }

    #[test]
    fn test_insert_if_absent() {
        let cache: InstanceCache<u32> = InstanceCache::new();

        assert!(cache.insert_if_absent(Kind::of::<Service>(), 1));
        assert!(!cache.insert_if_absent(Kind::of::<Service>(), 2));
        assert!(cache.insert_if_absent(Kind::of::<Other>(), 3));

        assert_eq!(cache.get(Kind::of::<Service>()), Some(1));
        assert_eq!(cache.len(), 2);
    }
}
