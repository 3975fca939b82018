//! Navigation coordinator
//!
//! Owns the home and login slots and drives every transition through the
//! navigation host. At most one stack-mutating transition runs at a time; a
//! request that arrives while another is in flight is dropped and reported
//! as [`Transition::Skipped`].

use log::{debug, info};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::analytics::{AnalyticsBridge, AnalyticsSink};
use super::error::NavError;
use super::factory::PairFactory;
use super::host::{Alert, NavigationHost};
use super::kind::{ViewKind, ViewModelKind};
use super::page::{NavigationContainer, Page, PageConstruct, same_page};
use super::view_model::{ViewModel, ViewModelConstruct};
use crate::config::NavigationConfig;

/// Outcome of a stack-mutating operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Completed,
    /// Dropped because another transition was in flight; nothing changed
    Skipped,
}

impl Transition {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Transition::Skipped)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationState {
    /// No home page set yet
    Uninitialized,
    HomeSet,
    /// A transition is in flight
    Navigating,
}

#[derive(Default)]
struct Slots {
    home: Option<Arc<dyn Page>>,
    login: Option<Arc<dyn Page>>,
}

/// Holds the in-flight flag for the duration of a transition
struct InFlight<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct NavigationCoordinator {
    factory: PairFactory,
    host: Arc<dyn NavigationHost>,
    /// Guards slot assignment and main-page swaps; never held while building
    slots: Mutex<Slots>,
    navigating: AtomicBool,
    config: NavigationConfig,
}

impl NavigationCoordinator {
    pub fn new(host: Arc<dyn NavigationHost>, sink: Arc<dyn AnalyticsSink>, config: NavigationConfig) -> Self {
        let analytics = AnalyticsBridge::new(sink).with_enabled(config.analytics_enabled);
        Self::with_analytics(host, analytics, config)
    }

    pub fn with_analytics(host: Arc<dyn NavigationHost>, analytics: AnalyticsBridge, config: NavigationConfig) -> Self {
        Self {
            factory: PairFactory::new(analytics),
            host,
            slots: Mutex::new(Slots::default()),
            navigating: AtomicBool::new(false),
            config,
        }
    }

    pub fn factory(&self) -> &PairFactory {
        &self.factory
    }

    pub fn host(&self) -> &Arc<dyn NavigationHost> {
        &self.host
    }

    pub fn analytics(&self) -> &AnalyticsBridge {
        self.factory.analytics()
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn state(&self) -> NavigationState {
        if self.navigating.load(Ordering::Acquire) {
            NavigationState::Navigating
        } else if self.slots.lock().home.is_some() {
            NavigationState::HomeSet
        } else {
            NavigationState::Uninitialized
        }
    }

    /// Top of the modal stack, else top of the navigation stack; a
    /// multi-page container reports its current sub-page
    pub fn current_view(&self) -> Option<Arc<dyn Page>> {
        let top = self
            .host
            .modal_stack()
            .pop()
            .or_else(|| self.host.navigation_stack().pop())?;

        if let Some(current) = top.as_multi_page().and_then(|multi_page| multi_page.current_page()) {
            return Some(current);
        }
        Some(top)
    }

    /// The home slot; the navigation container when home was wrapped
    pub fn home_view(&self) -> Option<Arc<dyn Page>> {
        self.slots.lock().home.clone()
    }

    pub fn login_view(&self) -> Option<Arc<dyn Page>> {
        self.slots.lock().login.clone()
    }

    pub fn register<V: PageConstruct, VM: ViewModelConstruct>(&self) -> bool {
        self.factory.register::<V, VM>()
    }

    /// Builds `kind`'s pair and stores it as home, optionally wrapped in a
    /// navigation container and optionally made the main page
    pub fn set_home_kind(&self, kind: ViewKind, wrap: bool, show: bool) -> Result<(), NavError> {
        let from = self.current_name();
        let pair = self.factory.create_pair(kind)?;

        let home: Arc<dyn Page> = if wrap {
            NavigationContainer::wrap(pair.view, &self.config.container_title_fallback)
        } else {
            pair.view
        };

        {
            let mut slots = self.slots.lock();
            slots.home = Some(home.clone());
            if show {
                self.host.set_main_page(home.clone());
            }
        }
        info!("Home view set to {} (wrapped: {}, shown: {})", kind, wrap, show);

        let to = self.analytics().page_name(Some(&home));
        self.log(from, to);
        Ok(())
    }

    /// Typed `set_home_kind`, shown according to `show_home_on_set`
    pub fn set_home<V: PageConstruct>(&self, wrap: bool) -> Result<(), NavError> {
        self.set_home_kind(ViewKind::of::<V>(), wrap, self.config.show_home_on_set)
    }

    pub fn set_login_kind(&self, kind: ViewKind, show: bool) -> Result<(), NavError> {
        let from = self.current_name();
        let pair = self.factory.create_pair(kind)?;
        let login = pair.view;

        {
            let mut slots = self.slots.lock();
            slots.login = Some(login.clone());
            if show {
                self.host.set_main_page(login.clone());
            }
        }
        info!("Login view set to {} (shown: {})", kind, show);

        let to = self.analytics().page_name(Some(&login));
        self.log(from, to);
        Ok(())
    }

    /// Typed `set_login_kind`, shown according to `show_login_on_set`
    pub fn set_login<V: PageConstruct>(&self) -> Result<(), NavError> {
        self.set_login_kind(ViewKind::of::<V>(), self.config.show_login_on_set)
    }

    /// Shows the login page: as the main page when there is none yet,
    /// otherwise modally over whatever is shown
    pub async fn show_login(&self, animate: bool) -> Result<Transition, NavError> {
        let login = self
            .login_view()
            .ok_or(NavError::precondition("show_login", "set_login has not been called"))?;
        let Some(_guard) = self.begin("show_login") else {
            return Ok(Transition::Skipped);
        };

        let from = self.current_name();
        let became_main = {
            let _slots = self.slots.lock();
            if self.host.main_page().is_none() {
                self.host.set_main_page(login.clone());
                true
            } else {
                false
            }
        };
        if !became_main {
            self.present(login, animate, true, "show_login").await?;
        }
        let to = self.current_name();

        self.log(from, to);
        Ok(Transition::Completed)
    }

    /// Returns to home: swaps the main page when login (or nothing) is
    /// shown, otherwise pops the navigation stack back to its root
    pub async fn show_home(&self) -> Result<Transition, NavError> {
        let home = self
            .home_view()
            .ok_or(NavError::precondition("show_home", "set_home has not been called"))?;
        let Some(_guard) = self.begin("show_home") else {
            return Ok(Transition::Skipped);
        };

        let from = self.current_name();
        let swapped = {
            let slots = self.slots.lock();
            let showing_login = match (self.host.main_page(), slots.login.as_ref()) {
                (None, _) => true,
                (Some(main), Some(login)) => same_page(&main, login),
                (Some(_), None) => false,
            };
            if showing_login {
                self.host.set_main_page(home);
            }
            showing_login
        };
        if !swapped {
            self.host
                .pop_to_root(self.config.animate_home_return)
                .await
                .map_err(NavError::io("show_home"))?;
        }
        let to = self.current_name();

        self.log(from, to);
        Ok(Transition::Completed)
    }

    pub async fn navigate_forward_kind(&self, kind: ViewKind, animated: bool) -> Result<Transition, NavError> {
        self.show_view(kind, animated, false, "navigate_forward").await
    }

    pub async fn navigate_forward<V: PageConstruct>(&self, animated: bool) -> Result<Transition, NavError> {
        self.navigate_forward_kind(ViewKind::of::<V>(), animated).await
    }

    pub async fn show_modal_kind(&self, kind: ViewKind, animated: bool) -> Result<Transition, NavError> {
        self.show_view(kind, animated, true, "show_modal").await
    }

    pub async fn show_modal<V: PageConstruct>(&self, animated: bool) -> Result<Transition, NavError> {
        self.show_modal_kind(ViewKind::of::<V>(), animated).await
    }

    pub async fn hide_modal(&self, animated: bool) -> Result<Transition, NavError> {
        if self.host.modal_depth() == 0 {
            return Err(NavError::precondition("hide_modal", "No modal found"));
        }
        let Some(_guard) = self.begin("hide_modal") else {
            return Ok(Transition::Skipped);
        };

        let from = self.current_name();
        self.host
            .pop_modal(animated)
            .await
            .map_err(NavError::io("hide_modal"))?;
        let to = self.current_name();

        self.log(from, to);
        Ok(Transition::Completed)
    }

    pub async fn navigate_back(&self, animated: bool) -> Result<Transition, NavError> {
        if self.host.stack_depth() <= 1 {
            return Err(NavError::precondition(
                "navigate_back",
                "Already at the start of the navigation stack",
            ));
        }
        let Some(_guard) = self.begin("navigate_back") else {
            return Ok(Transition::Skipped);
        };

        let from = self.current_name();
        self.host.pop(animated).await.map_err(NavError::io("navigate_back"))?;
        let to = self.current_name();

        self.log(from, to);
        Ok(Transition::Completed)
    }

    pub fn hide_navigation_bar(&self) {
        self.set_navigation_bar(false);
    }

    pub fn show_navigation_bar(&self) {
        self.set_navigation_bar(true);
    }

    fn set_navigation_bar(&self, visible: bool) {
        if let Some(home) = self.home_view() {
            self.host.set_navigation_bar_visible(&home, visible);
            debug!("Navigation bar visible: {}", visible);
        }
    }

    /// Two-button alert over the current view (or home); true when accepted
    pub async fn display_alert(
        &self,
        title: &str,
        message: &str,
        accept: &str,
        cancel: &str,
    ) -> Result<bool, NavError> {
        let alert = Alert {
            title: title.to_string(),
            message: message.to_string(),
            accept: accept.to_string(),
            cancel: Some(cancel.to_string()),
        };
        self.present_alert("display_alert", alert).await
    }

    /// Single-button notice over the current view (or home)
    pub async fn display_notice(&self, title: &str, message: &str, cancel: &str) -> Result<(), NavError> {
        let alert = Alert {
            title: title.to_string(),
            message: message.to_string(),
            accept: cancel.to_string(),
            cancel: None,
        };
        self.present_alert("display_notice", alert).await.map(|_| ())
    }

    async fn present_alert(&self, operation: &'static str, alert: Alert) -> Result<bool, NavError> {
        let on = self
            .current_view()
            .or_else(|| self.home_view())
            .ok_or(NavError::precondition(operation, "No page to present the alert on"))?;

        self.host.show_alert(on, alert).await.map_err(NavError::io(operation))
    }

    pub fn get_view<V: PageConstruct>(&self) -> Result<Arc<V>, NavError> {
        self.factory.get_view::<V>()
    }

    pub fn get_view_model<VM: ViewModelConstruct>(&self) -> Result<Arc<VM>, NavError> {
        self.factory.get_view_model::<VM>()
    }

    pub fn get_view_model_for_view<V: PageConstruct>(&self) -> Result<Arc<dyn ViewModel>, NavError> {
        self.factory.get_view_model_for_view_kind(ViewKind::of::<V>())
    }

    pub fn get_view_for_view_model<VM: ViewModelConstruct>(&self) -> Option<Arc<dyn Page>> {
        self.factory.get_view_for_view_model_kind(ViewModelKind::of::<VM>())
    }

    pub fn registered_view_model(&self, view: &Arc<dyn Page>) -> Result<Arc<dyn ViewModel>, NavError> {
        self.factory.registered_view_model(view)
    }

    pub fn registered_view(&self, view_model: &Arc<dyn ViewModel>) -> Option<Arc<dyn Page>> {
        self.factory.registered_view(view_model)
    }

    async fn show_view(
        &self,
        kind: ViewKind,
        animated: bool,
        modal: bool,
        operation: &'static str,
    ) -> Result<Transition, NavError> {
        if self.home_view().is_none() {
            return Err(NavError::precondition(operation, "set_home has not been called"));
        }
        let Some(_guard) = self.begin(operation) else {
            return Ok(Transition::Skipped);
        };

        let pair = self.factory.create_pair(kind)?;

        let from = self.current_name();
        self.present(pair.view, animated, modal, operation).await?;
        let to = self.current_name();

        self.log(from, to);
        Ok(Transition::Completed)
    }

    /// Pushes `view`, detaching it from any container it is still attached to
    async fn present(
        &self,
        view: Arc<dyn Page>,
        animated: bool,
        modal: bool,
        operation: &'static str,
    ) -> Result<(), NavError> {
        if view.core().clear_parent() {
            debug!("Detached {} from its previous container", view.kind());
        }

        let pushed = if modal {
            self.host.push_modal(view, animated).await
        } else {
            self.host.push(view, animated).await
        };
        pushed.map_err(NavError::io(operation))
    }

    fn begin(&self, operation: &'static str) -> Option<InFlight<'_>> {
        let guard = InFlight::acquire(&self.navigating);
        if guard.is_none() {
            debug!("{} dropped, another navigation is in flight", operation);
        }
        guard
    }

    fn current_name(&self) -> Option<String> {
        self.analytics().page_name(self.current_view().as_ref())
    }

    fn log(&self, from: Option<String>, to: Option<String>) {
        self.analytics().log_transition(from.as_deref(), to.as_deref());
    }
}
