//! View -> view-model registry

use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;

use super::error::NavError;
use super::kind::{Kind, ViewKind, ViewModelKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryEntry {
    pub view: ViewKind,
    pub view_model: ViewModelKind,
}

#[derive(Default)]
struct RegistryInner {
    /// Registration order, used by reverse lookups
    entries: Vec<RegistryEntry>,
    index: HashMap<Kind, usize>,
}

/// Thread-safe registry of view kinds and their view-model kinds.
///
/// Registration is rare and lookups frequent, so one lock covers the
/// whole registry.
#[derive(Default)]
pub struct ViewRegistry {
    inner: Mutex<RegistryInner>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mapping unless the view kind is already registered.
    ///
    /// The first registration wins; returns whether a new entry was added.
    pub fn register(&self, view: ViewKind, view_model: ViewModelKind) -> bool {
        let mut inner = self.inner.lock();
        if let Some(&existing) = inner.index.get(&view.kind()) {
            debug!(
                "View {} already registered with {}, ignoring {}",
                view,
                inner.entries[existing].view_model,
                view_model
            );
            return false;
        }

        let position = inner.entries.len();
        inner.entries.push(RegistryEntry { view, view_model });
        inner.index.insert(view.kind(), position);
        debug!("Registered view {} -> {}", view, view_model);
        true
    }

    pub fn lookup_view_model_kind(&self, view: ViewKind) -> Result<ViewModelKind, NavError> {
        self.view_model_kind_by_id(view.kind())
            .ok_or(NavError::NotRegistered { kind: view.name() })
    }

    /// First view kind registered against `view_model`, if any
    pub fn lookup_view_kind(&self, view_model: ViewModelKind) -> Option<ViewKind> {
        self.view_kind_for_view_model(view_model.kind())
    }

    /// View-model kind mapped to a live page's runtime kind
    pub fn view_model_kind_by_id(&self, view: Kind) -> Option<ViewModelKind> {
        let inner = self.inner.lock();
        inner
            .index
            .get(&view)
            .map(|&position| inner.entries[position].view_model)
    }

    /// Resolves the registered token for a live page's runtime kind
    pub fn view_kind_by_id(&self, view: Kind) -> Option<ViewKind> {
        let inner = self.inner.lock();
        inner
            .index
            .get(&view)
            .map(|&position| inner.entries[position].view)
    }

    pub(crate) fn view_kind_for_view_model(&self, view_model: Kind) -> Option<ViewKind> {
        self.inner
            .lock()
            .entries
            .iter()
            .find(|entry| entry.view_model.kind() == view_model)
            .map(|entry| entry.view)
    }

    pub fn entries(&self) -> Vec<RegistryEntry> {
        self.inner.lock().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
