pub mod config;
pub mod nav;

pub use config::NavigationConfig;
pub use nav::{
    NavError, NavigationCoordinator, NavigationHost, Page, PageConstruct, Transition, ViewKind, ViewModel,
    ViewModelConstruct, ViewModelKind,
};
