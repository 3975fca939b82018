//! View-model contract and property change notification

use log::trace;
use parking_lot::RwLock;
use std::any::Any;
use std::sync::Arc;

use super::kind::Kind;
use super::notify::{Handlers, SubscriptionId};

/// Raised after a view-model property is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChanged {
    pub property: String,
}

/// Change-notification hub each view-model exposes to its view
#[derive(Default)]
pub struct PropertyNotifier {
    handlers: Handlers<PropertyChanged>,
}

impl PropertyNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&PropertyChanged) + Send + Sync + 'static,
    {
        self.handlers.subscribe(Arc::new(handler))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.handlers.unsubscribe(id)
    }

    pub fn raise(&self, property: impl Into<String>) {
        let event = PropertyChanged {
            property: property.into(),
        };
        trace!("Property changed: {}", event.property);
        self.handlers.emit(&event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}

/// A view-model property that notifies on every write, even when the new
/// value equals the old one
pub struct Property<T> {
    name: &'static str,
    value: RwLock<T>,
}

impl<T> Property<T> {
    pub fn new(name: &'static str, value: T) -> Self {
        Self {
            name,
            value: RwLock::new(value),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn set(&self, notifier: &PropertyNotifier, value: T) {
        *self.value.write() = value;
        notifier.raise(self.name);
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.value.read())
    }
}

impl<T: Clone> Property<T> {
    pub fn get(&self) -> T {
        self.value.read().clone()
    }
}

/// State-holding counterpart of a page
pub trait ViewModel: ViewModelAny + Send + Sync + 'static {
    fn notifier(&self) -> &PropertyNotifier;
}

/// Parameterless construction used when the factory builds a view-model
pub trait ViewModelConstruct: ViewModel + Sized {
    fn construct() -> anyhow::Result<Self>;
}

/// Runtime type access for `dyn ViewModel`
pub trait ViewModelAny {
    fn kind(&self) -> Kind;
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: ViewModel> ViewModelAny for T {
    fn kind(&self) -> Kind {
        Kind::of::<T>()
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Downcast a shared view-model to its concrete type
pub fn downcast_view_model<VM: ViewModel>(view_model: Arc<dyn ViewModel>) -> Option<Arc<VM>> {
    view_model.into_any().downcast::<VM>().ok()
}

/// Compares the allocation only, ignoring vtables
pub fn same_view_model(a: &Arc<dyn ViewModel>, b: &Arc<dyn ViewModel>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
