//! Pages, view-models and fixtures shared by the integration tests

#![allow(dead_code)]

use std::cell::Cell;
use std::sync::Arc;
use std::time::Duration;

use mvvm_navigation::NavigationConfig;
use mvvm_navigation::nav::{
    Carousel, MemoryHost, MemorySink, MultiPage, NavigationCoordinator, Page, PageConstruct, PageContext, PageCore,
    Property, PropertyNotifier, ViewModel, ViewModelConstruct,
};

macro_rules! simple_page {
    ($name:ident) => {
        pub struct $name {
            core: PageCore,
        }

        impl Page for $name {
            fn core(&self) -> &PageCore {
                &self.core
            }
        }

        impl PageConstruct for $name {
            fn construct(_ctx: &PageContext<'_>) -> anyhow::Result<Self> {
                Ok(Self { core: PageCore::new() })
            }
        }
    };
}

macro_rules! simple_view_model {
    ($name:ident) => {
        #[derive(Default)]
        pub struct $name {
            notifier: PropertyNotifier,
        }

        impl ViewModel for $name {
            fn notifier(&self) -> &PropertyNotifier {
                &self.notifier
            }
        }

        impl ViewModelConstruct for $name {
            fn construct() -> anyhow::Result<Self> {
                Ok(Self::default())
            }
        }
    };
}

simple_page!(LoginPage);
simple_page!(HomePage);
simple_page!(DetailsPage);
simple_page!(UnregisteredPage);
simple_view_model!(LoginViewModel);
simple_view_model!(DetailsViewModel);
simple_view_model!(OrphanViewModel);

pub struct HomeViewModel {
    notifier: PropertyNotifier,
    pub greeting: Property<String>,
}

impl ViewModel for HomeViewModel {
    fn notifier(&self) -> &PropertyNotifier {
        &self.notifier
    }
}

impl ViewModelConstruct for HomeViewModel {
    fn construct() -> anyhow::Result<Self> {
        Ok(Self {
            notifier: PropertyNotifier::new(),
            greeting: Property::new("Greeting", "Hello".to_string()),
        })
    }
}

thread_local! {
    static PROFILE_BUILDS: Cell<usize> = const { Cell::new(0) };
}

/// Profile constructions on the current thread
pub fn profile_builds() -> usize {
    PROFILE_BUILDS.with(Cell::get)
}

/// Announces itself by asking the factory for its own view-model before it
/// has finished being built
pub struct ProfilePage {
    core: PageCore,
}

impl Page for ProfilePage {
    fn core(&self) -> &PageCore {
        &self.core
    }
}

impl PageConstruct for ProfilePage {
    fn construct(ctx: &PageContext<'_>) -> anyhow::Result<Self> {
        PROFILE_BUILDS.with(|builds| builds.set(builds.get() + 1));

        let core = PageCore::with_title("Profile");
        core.set_binding_context(ctx.factory().get_view_model_for_view_kind(ctx.kind())?);
        Ok(Self { core })
    }
}

simple_view_model!(ProfileViewModel);

pub struct PhotoPage {
    core: PageCore,
    number: usize,
}

impl Page for PhotoPage {
    fn core(&self) -> &PageCore {
        &self.core
    }

    fn analytics_name(&self) -> Option<String> {
        Some(format!("Photo {}", self.number))
    }
}

pub struct GalleryPage {
    core: PageCore,
    pub carousel: Carousel,
}

impl Page for GalleryPage {
    fn core(&self) -> &PageCore {
        &self.core
    }

    fn as_multi_page(&self) -> Option<&dyn MultiPage> {
        Some(&self.carousel)
    }
}

impl PageConstruct for GalleryPage {
    fn construct(_ctx: &PageContext<'_>) -> anyhow::Result<Self> {
        let carousel = Carousel::new();
        for number in 1..=3 {
            carousel.add_page(Arc::new(PhotoPage {
                core: PageCore::new(),
                number,
            }));
        }
        Ok(Self {
            core: PageCore::new(),
            carousel,
        })
    }
}

simple_view_model!(GalleryViewModel);

pub struct FailingPage {
    core: PageCore,
}

impl Page for FailingPage {
    fn core(&self) -> &PageCore {
        &self.core
    }
}

impl PageConstruct for FailingPage {
    fn construct(_ctx: &PageContext<'_>) -> anyhow::Result<Self> {
        anyhow::bail!("template could not be loaded")
    }
}

pub struct Harness {
    pub coordinator: NavigationCoordinator,
    pub host: Arc<MemoryHost>,
    pub sink: Arc<MemorySink>,
}

impl Harness {
    pub fn with_config(config: NavigationConfig) -> Self {
        let host = Arc::new(MemoryHost::from_config(&config));
        let sink = Arc::new(MemorySink::new());
        let coordinator = NavigationCoordinator::new(host.clone(), sink.clone(), config);

        coordinator.register::<LoginPage, LoginViewModel>();
        coordinator.register::<HomePage, HomeViewModel>();
        coordinator.register::<DetailsPage, DetailsViewModel>();
        coordinator.register::<GalleryPage, GalleryViewModel>();
        coordinator.register::<ProfilePage, ProfileViewModel>();
        coordinator.register::<FailingPage, DetailsViewModel>();

        Self { coordinator, host, sink }
    }

    /// No animation delay
    pub fn instant() -> Self {
        Self::with_config(NavigationConfig::instant())
    }

    /// Animated transitions suspend long enough for a second request to
    /// arrive while the first is in flight
    pub fn animated() -> Self {
        Self::with_config(
            NavigationConfig::builder()
                .transition_delay(Duration::from_millis(20))
                .build(),
        )
    }

    pub fn current_name(&self) -> Option<String> {
        let current = self.coordinator.current_view();
        self.coordinator.analytics().page_name(current.as_ref())
    }

    pub fn pairs(&self) -> Vec<(Option<String>, Option<String>)> {
        self.sink.pairs()
    }
}

pub fn name(value: &str) -> Option<String> {
    Some(value.to_string())
}
