//! View/view-model navigation
//!
//! `NavigationCoordinator` is the entry point. It owns a `PairFactory`
//! (registry plus singleton cache) and drives a `NavigationHost`.

pub mod analytics;
pub mod cache;
pub mod coordinator;
pub mod error;
pub mod factory;
pub mod host;
pub mod kind;
pub mod memory_host;
pub mod notify;
pub mod page;
pub mod registry;
pub mod view_model;

pub use analytics::{AnalyticsBridge, AnalyticsSink, LogSink, MemorySink, NullSink, TransitionRecord};
pub use cache::InstanceCache;
pub use coordinator::{NavigationCoordinator, NavigationState, Transition};
pub use error::NavError;
pub use factory::{Instance, Pair, PairFactory};
pub use host::{Alert, HostError, NavigationHost};
pub use kind::{Kind, ViewKind, ViewModelKind};
pub use memory_host::{HostOp, MemoryHost, PresentedAlert};
pub use notify::SubscriptionId;
pub use page::{Carousel, MultiPage, NavigationContainer, Page, PageConstruct, PageContext, PageCore};
pub use registry::{RegistryEntry, ViewRegistry};
pub use view_model::{Property, PropertyChanged, PropertyNotifier, ViewModel, ViewModelConstruct};
