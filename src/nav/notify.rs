//! Handler lists for change notifications
//!
//! Shared by view-model property notifications and multi-page
//! current-page events. Handlers are invoked outside the lock so a handler
//! may subscribe or unsubscribe while being called.

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Handle returned by `subscribe`, used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Handler<A> = Arc<dyn Fn(&A) + Send + Sync>;

pub struct Handlers<A> {
    next_id: AtomicU64,
    entries: Mutex<Vec<(SubscriptionId, Handler<A>)>>,
}

impl<A> Handlers<A> {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe(&self, handler: Handler<A>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.lock().push((id, handler));
        id
    }

    /// Returns false when the id was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|(existing, _)| *existing != id);
        entries.len() != before
    }

    pub fn emit(&self, event: &A) {
        let snapshot: Vec<Handler<A>> = self
            .entries
            .lock()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in snapshot {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<A> Default for Handlers<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_emit_reaches_all_subscribers() {
        let handlers: Handlers<u32> = Handlers::new();
        let total = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let total = total.clone();
            handlers.subscribe(Arc::new(move |value: &u32| {
                total.fetch_add(*value as usize, Ordering::SeqCst);
            }));
        }

        handlers.emit(&2);
        assert_eq!(total.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_unsubscribe() {
        let handlers: Handlers<()> = Handlers::new();
        let id = handlers.subscribe(Arc::new(|_: &()| {}));

        assert_eq!(handlers.len(), 1);
        assert!(handlers.unsubscribe(id));
        assert!(!handlers.unsubscribe(id));
        assert!(handlers.is_empty());
    }

    #[test]
    fn test_handler_can_unsubscribe_itself() {
        let handlers: Arc<Handlers<()>> = Arc::new(Handlers::new());
        let own_id = Arc::new(Mutex::new(None));

        let inner = handlers.clone();
        let slot = own_id.clone();
        let id = handlers.subscribe(Arc::new(move |_: &()| {
            if let Some(id) = *slot.lock() {
                inner.unsubscribe(id);
            }
        }));
        *own_id.lock() = Some(id);

        handlers.emit(&());
        assert!(handlers.is_empty());
    }
}
