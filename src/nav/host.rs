//! Boundary to the UI toolkit that owns the real navigation stack

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use super::page::Page;

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct HostError {
    message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An alert presented to the user; `cancel` is absent for single-button notices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub accept: String,
    pub cancel: Option<String>,
}

/// Capabilities the coordinator needs from the toolkit.
///
/// The coordinator never mutates stacks directly; every change goes through
/// these calls. Mutations complete only once the transition has settled.
#[async_trait]
pub trait NavigationHost: Send + Sync {
    /// The active root page, if one has been set
    fn main_page(&self) -> Option<Arc<dyn Page>>;

    /// Replaces the active root without pushing
    fn set_main_page(&self, page: Arc<dyn Page>);

    /// Non-modal stack, bottom first
    fn navigation_stack(&self) -> Vec<Arc<dyn Page>>;

    /// Modal stack, bottom first
    fn modal_stack(&self) -> Vec<Arc<dyn Page>>;

    async fn push(&self, page: Arc<dyn Page>, animated: bool) -> Result<(), HostError>;

    async fn push_modal(&self, page: Arc<dyn Page>, animated: bool) -> Result<(), HostError>;

    async fn pop(&self, animated: bool) -> Result<(), HostError>;

    async fn pop_modal(&self, animated: bool) -> Result<(), HostError>;

    async fn pop_to_root(&self, animated: bool) -> Result<(), HostError>;

    fn set_navigation_bar_visible(&self, page: &Arc<dyn Page>, visible: bool);

    /// Presents `alert` over `on`, on the toolkit's UI thread whatever the
    /// caller's thread; resolves to true when the accept button was chosen
    async fn show_alert(&self, on: Arc<dyn Page>, alert: Alert) -> Result<bool, HostError>;

    fn stack_depth(&self) -> usize {
        self.navigation_stack().len()
    }

    fn modal_depth(&self) -> usize {
        self.modal_stack().len()
    }
}
