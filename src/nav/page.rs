//! Page (view) contract, navigation containers and multi-page carousels

use parking_lot::RwLock;
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use super::error::NavError;
use super::factory::PairFactory;
use super::kind::{Kind, ViewKind, ViewModelKind};
use super::notify::{Handler, Handlers, SubscriptionId};
use super::view_model::{ViewModel, ViewModelConstruct, downcast_view_model};

/// State every page carries regardless of its content
pub struct PageCore {
    title: RwLock<Option<String>>,
    binding_context: RwLock<Option<Arc<dyn ViewModel>>>,
    parent: RwLock<Option<Weak<dyn Page>>>,
    navigation_bar: AtomicBool,
}

impl PageCore {
    pub fn new() -> Self {
        Self {
            title: RwLock::new(None),
            binding_context: RwLock::new(None),
            parent: RwLock::new(None),
            navigation_bar: AtomicBool::new(true),
        }
    }

    pub fn with_title(title: impl Into<String>) -> Self {
        let core = Self::new();
        core.set_title(title);
        core
    }

    pub fn title(&self) -> Option<String> {
        self.title.read().clone()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        *self.title.write() = Some(title.into());
    }

    /// The view-model this page binds against
    pub fn binding_context(&self) -> Option<Arc<dyn ViewModel>> {
        self.binding_context.read().clone()
    }

    pub fn set_binding_context(&self, view_model: Arc<dyn ViewModel>) {
        *self.binding_context.write() = Some(view_model);
    }

    pub fn parent(&self) -> Option<Arc<dyn Page>> {
        self.parent.read().as_ref().and_then(Weak::upgrade)
    }

    pub fn set_parent(&self, parent: &Arc<dyn Page>) {
        *self.parent.write() = Some(Arc::downgrade(parent));
    }

    /// Returns true when a parent link was present
    pub fn clear_parent(&self) -> bool {
        self.parent.write().take().is_some()
    }

    pub fn has_navigation_bar(&self) -> bool {
        self.navigation_bar.load(Ordering::Acquire)
    }

    pub fn set_has_navigation_bar(&self, visible: bool) {
        self.navigation_bar.store(visible, Ordering::Release);
    }
}

impl Default for PageCore {
    fn default() -> Self {
        Self::new()
    }
}

/// Visual counterpart of a view-model.
///
/// Implementors embed a [`PageCore`] and expose it through `core()`. Pages
/// hosting switchable sub-pages return themselves from `as_multi_page()`.
pub trait Page: PageAny + Send + Sync + 'static {
    fn core(&self) -> &PageCore;

    fn title(&self) -> Option<String> {
        self.core().title()
    }

    /// Name reported to analytics; `None` falls back to the type name
    fn analytics_name(&self) -> Option<String> {
        None
    }

    fn as_multi_page(&self) -> Option<&dyn MultiPage> {
        None
    }

    fn as_container(&self) -> Option<&NavigationContainer> {
        None
    }
}

/// Construction used by the pair factory when a page is first requested
pub trait PageConstruct: Page + Sized {
    fn construct(ctx: &PageContext<'_>) -> anyhow::Result<Self>;
}

/// Runtime type access for `dyn Page`
pub trait PageAny {
    fn kind(&self) -> Kind;
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Page> PageAny for T {
    fn kind(&self) -> Kind {
        Kind::of::<T>()
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

pub fn downcast_page<V: Page>(page: Arc<dyn Page>) -> Option<Arc<V>> {
    page.into_any().downcast::<V>().ok()
}

/// Compares the allocation only, ignoring vtables
pub fn same_page(a: &Arc<dyn Page>, b: &Arc<dyn Page>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Handed to a page constructor; lets construction reach back into the
/// factory that is building it
pub struct PageContext<'a> {
    factory: &'a PairFactory,
    kind: ViewKind,
}

impl<'a> PageContext<'a> {
    pub(crate) fn new(factory: &'a PairFactory, kind: ViewKind) -> Self {
        Self { factory, kind }
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    pub fn factory(&self) -> &'a PairFactory {
        self.factory
    }

    /// The view-model registered for the page under construction.
    ///
    /// Resolves or builds only the view-model, so it is safe to call while
    /// the page itself does not exist yet.
    pub fn view_model(&self) -> Result<Arc<dyn ViewModel>, NavError> {
        let view_model_kind: ViewModelKind = self.factory.registry().lookup_view_model_kind(self.kind)?;
        self.factory.resolve_view_model(view_model_kind)
    }

    /// A view-model by its own type, built on first use
    pub fn view_model_of<VM: ViewModelConstruct>(&self) -> Result<Arc<VM>, NavError> {
        let kind = ViewModelKind::of::<VM>();
        let view_model = self.factory.resolve_view_model(kind)?;
        downcast_view_model::<VM>(view_model).ok_or(NavError::InstanceMismatch { kind: kind.name() })
    }
}

/// Wraps a root page so it can host a push/pop navigation stack
pub struct NavigationContainer {
    core: PageCore,
    root: Arc<dyn Page>,
}

impl NavigationContainer {
    /// Title comes from the root page, or `fallback_title` when it has none
    pub fn wrap(root: Arc<dyn Page>, fallback_title: &str) -> Arc<Self> {
        let title = root.title().unwrap_or_else(|| fallback_title.to_string());
        let container = Arc::new(Self {
            core: PageCore::with_title(title),
            root,
        });

        let as_page: Arc<dyn Page> = container.clone();
        container.root.core().set_parent(&as_page);
        container
    }

    pub fn root(&self) -> &Arc<dyn Page> {
        &self.root
    }
}

impl Page for NavigationContainer {
    fn core(&self) -> &PageCore {
        &self.core
    }

    fn as_container(&self) -> Option<&NavigationContainer> {
        Some(self)
    }
}

pub type PageChangedHandler = Handler<Option<Arc<dyn Page>>>;

/// A page hosting several sub-pages with one of them current
pub trait MultiPage: Send + Sync {
    fn current_page(&self) -> Option<Arc<dyn Page>>;

    fn subscribe_current_page_changed(&self, handler: PageChangedHandler) -> SubscriptionId;

    fn unsubscribe_current_page_changed(&self, id: SubscriptionId) -> bool;
}

/// Reusable multi-page state; pages embed it and return it from
/// `Page::as_multi_page`
pub struct Carousel {
    pages: RwLock<Vec<Arc<dyn Page>>>,
    current: RwLock<Option<usize>>,
    changed: Handlers<Option<Arc<dyn Page>>>,
}

impl Carousel {
    pub fn new() -> Self {
        Self {
            pages: RwLock::new(Vec::new()),
            current: RwLock::new(None),
            changed: Handlers::new(),
        }
    }

    /// The first page added becomes current without raising an event
    pub fn add_page(&self, page: Arc<dyn Page>) {
        let mut pages = self.pages.write();
        pages.push(page);
        let mut current = self.current.write();
        if current.is_none() {
            *current = Some(0);
        }
    }

    pub fn len(&self) -> usize {
        self.pages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn current_index(&self) -> Option<usize> {
        *self.current.read()
    }

    /// Switches the current sub-page; false when out of range or unchanged
    pub fn set_current(&self, index: usize) -> bool {
        let page = {
            let pages = self.pages.read();
            let Some(page) = pages.get(index).cloned() else {
                return false;
            };
            let mut current = self.current.write();
            if *current == Some(index) {
                return false;
            }
            *current = Some(index);
            page
        };

        self.changed.emit(&Some(page));
        true
    }
}

impl Default for Carousel {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiPage for Carousel {
    fn current_page(&self) -> Option<Arc<dyn Page>> {
        let index = (*self.current.read())?;
        self.pages.read().get(index).cloned()
    }

    fn subscribe_current_page_changed(&self, handler: PageChangedHandler) -> SubscriptionId {
        self.changed.subscribe(handler)
    }

    fn unsubscribe_current_page_changed(&self, id: SubscriptionId) -> bool {
        self.changed.unsubscribe(id)
    }
}
