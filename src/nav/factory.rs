//! Builds and wires view/view-model pairs
//!
//! Views and view-models are singletons per kind: the first request builds
//! them through their kind's constructor and the instance cache keeps them
//! for the factory's lifetime.

use log::{debug, info};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use super::analytics::AnalyticsBridge;
use super::cache::InstanceCache;
use super::error::NavError;
use super::kind::{Kind, ViewKind, ViewModelKind};
use super::page::{Page, PageConstruct, PageContext, downcast_page};
use super::registry::ViewRegistry;
use super::view_model::{ViewModel, ViewModelConstruct, downcast_view_model};

/// A cached singleton, either side of a pair
#[derive(Clone)]
pub enum Instance {
    Page(Arc<dyn Page>),
    ViewModel(Arc<dyn ViewModel>),
}

impl Instance {
    pub fn into_page(self) -> Option<Arc<dyn Page>> {
        match self {
            Instance::Page(page) => Some(page),
            Instance::ViewModel(_) => None,
        }
    }

    pub fn into_view_model(self) -> Option<Arc<dyn ViewModel>> {
        match self {
            Instance::ViewModel(view_model) => Some(view_model),
            Instance::Page(_) => None,
        }
    }
}

/// A view bound to its view-model
#[derive(Clone)]
pub struct Pair {
    pub view: Arc<dyn Page>,
    pub view_model: Arc<dyn ViewModel>,
}

pub struct PairFactory {
    registry: ViewRegistry,
    cache: InstanceCache<Instance>,
    /// Multi-page container kinds that already carry a page-changed listener
    watched: Mutex<HashSet<Kind>>,
    /// View kinds whose constructor is running, per building thread
    constructing: Mutex<HashSet<(ThreadId, Kind)>>,
    analytics: AnalyticsBridge,
}

/// Marks a view kind as under construction on this thread until dropped
struct Constructing<'a> {
    set: &'a Mutex<HashSet<(ThreadId, Kind)>>,
    key: (ThreadId, Kind),
}

impl<'a> Constructing<'a> {
    fn enter(set: &'a Mutex<HashSet<(ThreadId, Kind)>>, kind: Kind) -> Self {
        let key = (thread::current().id(), kind);
        set.lock().insert(key);
        Self { set, key }
    }
}

impl Drop for Constructing<'_> {
    fn drop(&mut self) {
        self.set.lock().remove(&self.key);
    }
}

impl PairFactory {
    pub fn new(analytics: AnalyticsBridge) -> Self {
        Self {
            registry: ViewRegistry::new(),
            cache: InstanceCache::new(),
            watched: Mutex::new(HashSet::new()),
            constructing: Mutex::new(HashSet::new()),
            analytics,
        }
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &InstanceCache<Instance> {
        &self.cache
    }

    pub fn analytics(&self) -> &AnalyticsBridge {
        &self.analytics
    }

    /// Maps `V` to `VM`; a second registration for `V` is ignored
    pub fn register<V: PageConstruct, VM: ViewModelConstruct>(&self) -> bool {
        self.registry.register(ViewKind::of::<V>(), ViewModelKind::of::<VM>())
    }

    /// Resolves or builds the view and view-model for `view_kind` and binds
    /// them together.
    ///
    /// A view constructor asking for its own pair gets `ConstructionCycle`;
    /// it can still reach its view-model through `PageContext::view_model`
    /// or `get_view_model_for_view_kind`.
    pub fn create_pair(&self, view_kind: ViewKind) -> Result<Pair, NavError> {
        let view_model_kind = self.registry.lookup_view_model_kind(view_kind)?;
        if self.is_constructing(view_kind.kind()) {
            return Err(NavError::ConstructionCycle { kind: view_kind.name() });
        }

        let view = self.resolve_view(view_kind)?;
        self.watch_multi_page(view_kind, &view);

        let view_model = self.resolve_view_model(view_model_kind)?;
        view.core().set_binding_context(view_model.clone());

        Ok(Pair { view, view_model })
    }

    fn resolve_view(&self, view_kind: ViewKind) -> Result<Arc<dyn Page>, NavError> {
        let instance = self.cache.get_or_create(view_kind.kind(), || {
            debug!("Creating view {}", view_kind);
            let _constructing = Constructing::enter(&self.constructing, view_kind.kind());
            let ctx = PageContext::new(self, view_kind);
            view_kind
                .construct(&ctx)
                .map(Instance::Page)
                .map_err(|cause| NavError::ViewConstructionFailed {
                    kind: view_kind.name(),
                    cause: cause.into(),
                })
        })?;

        instance
            .into_page()
            .ok_or(NavError::InstanceMismatch { kind: view_kind.name() })
    }

    pub(crate) fn resolve_view_model(&self, kind: ViewModelKind) -> Result<Arc<dyn ViewModel>, NavError> {
        let instance = self.cache.get_or_create(kind.kind(), || {
            debug!("Creating view-model {}", kind);
            kind.construct()
                .map(Instance::ViewModel)
                .map_err(|cause| NavError::ViewModelConstructionFailed {
                    kind: kind.name(),
                    cause: cause.into(),
                })
        })?;

        instance
            .into_view_model()
            .ok_or(NavError::InstanceMismatch { kind: kind.name() })
    }

    fn is_constructing(&self, kind: Kind) -> bool {
        self.constructing.lock().contains(&(thread::current().id(), kind))
    }

    fn watch_multi_page(&self, view_kind: ViewKind, view: &Arc<dyn Page>) {
        let Some(multi_page) = view.as_multi_page() else {
            return;
        };
        if !self.watched.lock().insert(view_kind.kind()) {
            return;
        }

        let analytics = self.analytics.clone();
        multi_page.subscribe_current_page_changed(Arc::new(move |page: &Option<Arc<dyn Page>>| {
            let to = analytics.page_name(page.as_ref());
            analytics.log_transition(None, to.as_deref());
        }));
        info!("Watching sub-page changes of {}", view_kind);
    }

    /// Number of multi-page kinds wired with a page-changed listener
    pub fn watched_multi_pages(&self) -> usize {
        self.watched.lock().len()
    }

    /// Typed `create_pair`, returning the concrete view
    pub fn get_view<V: PageConstruct>(&self) -> Result<Arc<V>, NavError> {
        let kind = ViewKind::of::<V>();
        let pair = self.create_pair(kind)?;
        downcast_page::<V>(pair.view).ok_or(NavError::InstanceMismatch { kind: kind.name() })
    }

    /// A view-model by its own type, built on first use without consulting
    /// the registry
    pub fn get_view_model<VM: ViewModelConstruct>(&self) -> Result<Arc<VM>, NavError> {
        let kind = ViewModelKind::of::<VM>();
        let view_model = self.resolve_view_model(kind)?;
        downcast_view_model::<VM>(view_model).ok_or(NavError::InstanceMismatch { kind: kind.name() })
    }

    /// The view-model mapped to `view_kind`; builds the whole pair when the
    /// view-model does not exist yet.
    ///
    /// Called from inside the constructor of `view_kind` itself, only the
    /// view-model is resolved. The outer `create_pair` binds it afterwards.
    pub fn get_view_model_for_view_kind(&self, view_kind: ViewKind) -> Result<Arc<dyn ViewModel>, NavError> {
        let view_model_kind = self.registry.lookup_view_model_kind(view_kind)?;

        if let Some(existing) = self.cache.get(view_model_kind.kind()).and_then(Instance::into_view_model) {
            return Ok(existing);
        }
        if self.is_constructing(view_kind.kind()) {
            debug!("{} resolved its view-model while being constructed", view_kind);
            return self.resolve_view_model(view_model_kind);
        }

        Ok(self.create_pair(view_kind)?.view_model)
    }

    /// The live view registered against `view_model_kind`; never constructs
    pub fn get_view_for_view_model_kind(&self, view_model_kind: ViewModelKind) -> Option<Arc<dyn Page>> {
        self.view_for_view_model(view_model_kind.kind())
    }

    fn view_for_view_model(&self, view_model: Kind) -> Option<Arc<dyn Page>> {
        let view_kind = self.registry.view_kind_for_view_model(view_model)?;
        self.cache.get(view_kind.kind()).and_then(Instance::into_page)
    }

    /// The view-model for a live page.
    ///
    /// A page the cache has not seen yet is stored first, so a page built
    /// outside the factory becomes the singleton for its kind.
    pub fn registered_view_model(&self, view: &Arc<dyn Page>) -> Result<Arc<dyn ViewModel>, NavError> {
        let kind = view.kind();
        let view_kind = self
            .registry
            .view_kind_by_id(kind)
            .ok_or(NavError::NotRegistered { kind: kind.name() })?;

        if self.cache.insert_if_absent(kind, Instance::Page(view.clone())) {
            debug!("Adopted externally built view {}", kind);
        }

        self.get_view_model_for_view_kind(view_kind)
    }

    /// The live view for a view-model, if its kind is registered and built
    pub fn registered_view(&self, view_model: &Arc<dyn ViewModel>) -> Option<Arc<dyn Page>> {
        self.view_for_view_model(view_model.kind())
    }
}
