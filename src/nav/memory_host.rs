//! In-process navigation host
//!
//! Keeps the main page, the navigation stack and the modal stack in memory.
//! Animated transitions sleep for the configured delay so callers observe a
//! real suspension point. Used by the demo binary and by tests.

use async_trait::async_trait;
use log::{debug, warn};
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use super::host::{Alert, HostError, NavigationHost};
use super::page::Page;
use crate::config::NavigationConfig;

/// Host operations that can be made to fail once, for testing error paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostOp {
    Push,
    PushModal,
    Pop,
    PopModal,
    PopToRoot,
    Alert,
}

#[derive(Default)]
struct HostState {
    main: Option<Arc<dyn Page>>,
    stack: Vec<Arc<dyn Page>>,
    modals: Vec<Arc<dyn Page>>,
}

/// A presented alert together with the title of the page it was shown on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedAlert {
    pub on: Option<String>,
    pub alert: Alert,
}

pub struct MemoryHost {
    state: Mutex<HostState>,
    transition_delay: Duration,
    failures: Mutex<HashSet<HostOp>>,
    alert_responses: Mutex<VecDeque<bool>>,
    alerts: Mutex<Vec<PresentedAlert>>,
}

impl MemoryHost {
    pub fn new(transition_delay: Duration) -> Self {
        Self {
            state: Mutex::new(HostState::default()),
            transition_delay,
            failures: Mutex::new(HashSet::new()),
            alert_responses: Mutex::new(VecDeque::new()),
            alerts: Mutex::new(Vec::new()),
        }
    }

    pub fn from_config(config: &NavigationConfig) -> Self {
        Self::new(config.transition_delay())
    }

    /// Transitions complete without sleeping, animated or not
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    /// The next `op` fails with a `HostError`
    pub fn fail_next(&self, op: HostOp) {
        self.failures.lock().insert(op);
    }

    /// Queues the answer for the next alert; unanswered alerts resolve to false
    pub fn respond_to_alert(&self, accept: bool) {
        self.alert_responses.lock().push_back(accept);
    }

    pub fn presented_alerts(&self) -> Vec<PresentedAlert> {
        self.alerts.lock().clone()
    }

    fn check_failure(&self, op: HostOp) -> Result<(), HostError> {
        if self.failures.lock().remove(&op) {
            warn!("Injected failure for {:?}", op);
            return Err(HostError::new(format!("{:?} failed", op)));
        }
        Ok(())
    }

    async fn settle(&self, animated: bool) {
        if animated && !self.transition_delay.is_zero() {
            tokio::time::sleep(self.transition_delay).await;
        } else {
            tokio::task::yield_now().await;
        }
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::from_config(&NavigationConfig::default())
    }
}

#[async_trait]
impl NavigationHost for MemoryHost {
    fn main_page(&self) -> Option<Arc<dyn Page>> {
        self.state.lock().main.clone()
    }

    fn set_main_page(&self, page: Arc<dyn Page>) {
        let mut state = self.state.lock();
        state.modals.clear();
        state.stack = match page.as_container() {
            Some(container) => vec![container.root().clone()],
            None => vec![page.clone()],
        };
        state.main = Some(page);
        debug!("Main page replaced, stack depth {}", state.stack.len());
    }

    fn navigation_stack(&self) -> Vec<Arc<dyn Page>> {
        self.state.lock().stack.clone()
    }

    fn modal_stack(&self) -> Vec<Arc<dyn Page>> {
        self.state.lock().modals.clone()
    }

    async fn push(&self, page: Arc<dyn Page>, animated: bool) -> Result<(), HostError> {
        self.check_failure(HostOp::Push)?;
        let Some(main) = self.main_page() else {
            return Err(HostError::new("no main page to push onto"));
        };
        if main.as_container().is_none() {
            return Err(HostError::new("push requires a navigation container as main page"));
        }

        self.settle(animated).await;

        page.core().set_parent(&main);
        let mut state = self.state.lock();
        state.stack.push(page);
        debug!("Pushed page, stack depth {}", state.stack.len());
        Ok(())
    }

    async fn push_modal(&self, page: Arc<dyn Page>, animated: bool) -> Result<(), HostError> {
        self.check_failure(HostOp::PushModal)?;
        self.settle(animated).await;

        let mut state = self.state.lock();
        state.modals.push(page);
        debug!("Pushed modal, modal depth {}", state.modals.len());
        Ok(())
    }

    async fn pop(&self, animated: bool) -> Result<(), HostError> {
        self.check_failure(HostOp::Pop)?;
        if self.stack_depth() <= 1 {
            return Err(HostError::new("cannot pop the root page"));
        }

        self.settle(animated).await;

        let popped = self.state.lock().stack.pop();
        if let Some(page) = popped {
            page.core().clear_parent();
        }
        Ok(())
    }

    async fn pop_modal(&self, animated: bool) -> Result<(), HostError> {
        self.check_failure(HostOp::PopModal)?;
        if self.modal_depth() == 0 {
            return Err(HostError::new("no modal to pop"));
        }

        self.settle(animated).await;

        self.state.lock().modals.pop();
        Ok(())
    }

    async fn pop_to_root(&self, animated: bool) -> Result<(), HostError> {
        self.check_failure(HostOp::PopToRoot)?;
        self.settle(animated).await;

        let removed: Vec<Arc<dyn Page>> = {
            let mut state = self.state.lock();
            let keep = state.stack.len().min(1);
            state.stack.split_off(keep)
        };
        for page in &removed {
            page.core().clear_parent();
        }
        debug!("Popped {} page(s) back to root", removed.len());
        Ok(())
    }

    fn set_navigation_bar_visible(&self, page: &Arc<dyn Page>, visible: bool) {
        page.core().set_has_navigation_bar(visible);
    }

    async fn show_alert(&self, on: Arc<dyn Page>, alert: Alert) -> Result<bool, HostError> {
        self.check_failure(HostOp::Alert)?;
        tokio::task::yield_now().await;

        self.alerts.lock().push(PresentedAlert {
            on: on.title(),
            alert,
        });
        Ok(self.alert_responses.lock().pop_front().unwrap_or(false))
    }
}
