//! Sample pages and view-models driven by the demo session

use log::debug;
use std::sync::Arc;

use mvvm_navigation::nav::{
    Carousel, MultiPage, Page, PageConstruct, PageContext, PageCore, Property, PropertyNotifier, ViewModel,
    ViewModelConstruct,
};

pub struct LoginPage {
    core: PageCore,
}

impl Page for LoginPage {
    fn core(&self) -> &PageCore {
        &self.core
    }
}

impl PageConstruct for LoginPage {
    fn construct(_ctx: &PageContext<'_>) -> anyhow::Result<Self> {
        Ok(Self {
            core: PageCore::with_title("Sign in"),
        })
    }
}

pub struct LoginViewModel {
    notifier: PropertyNotifier,
    pub username: Property<String>,
}

impl ViewModel for LoginViewModel {
    fn notifier(&self) -> &PropertyNotifier {
        &self.notifier
    }
}

impl ViewModelConstruct for LoginViewModel {
    fn construct() -> anyhow::Result<Self> {
        Ok(Self {
            notifier: PropertyNotifier::new(),
            username: Property::new("Username", String::new()),
        })
    }
}

pub struct HomePage {
    core: PageCore,
}

impl Page for HomePage {
    fn core(&self) -> &PageCore {
        &self.core
    }
}

impl PageConstruct for HomePage {
    fn construct(_ctx: &PageContext<'_>) -> anyhow::Result<Self> {
        Ok(Self {
            core: PageCore::with_title("Inbox"),
        })
    }
}

pub struct HomeViewModel {
    notifier: PropertyNotifier,
    pub unread: Property<u32>,
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
            unread: Property::new("Unread", 3),
        })
    }
}

/// Subscribes to its view-model while being built
pub struct DetailsPage {
    core: PageCore,
    view_model: Arc<DetailsViewModel>,
}

impl DetailsPage {
    pub fn view_model(&self) -> &Arc<DetailsViewModel> {
        &self.view_model
    }
}

impl Page for DetailsPage {
    fn core(&self) -> &PageCore {
        &self.core
    }
}

impl PageConstruct for DetailsPage {
    fn construct(ctx: &PageContext<'_>) -> anyhow::Result<Self> {
        let view_model = ctx.view_model_of::<DetailsViewModel>()?;
        view_model.notifier().subscribe(|changed| {
            debug!("DetailsPage saw {} change", changed.property);
        });

        Ok(Self {
            core: PageCore::with_title("Message"),
            view_model,
        })
    }
}

pub struct DetailsViewModel {
    notifier: PropertyNotifier,
    pub subject: Property<String>,
}

impl ViewModel for DetailsViewModel {
    fn notifier(&self) -> &PropertyNotifier {
        &self.notifier
    }
}

impl ViewModelConstruct for DetailsViewModel {
    fn construct() -> anyhow::Result<Self> {
        Ok(Self {
            notifier: PropertyNotifier::new(),
            subject: Property::new("Subject", String::new()),
        })
    }
}

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
    carousel: Carousel,
}

impl GalleryPage {
    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }
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
            core: PageCore::with_title("Attachments"),
            carousel,
        })
    }
}

#[derive(Default)]
pub struct GalleryViewModel {
    notifier: PropertyNotifier,
}

impl ViewModel for GalleryViewModel {
    fn notifier(&self) -> &PropertyNotifier {
        &self.notifier
    }
}

impl ViewModelConstruct for GalleryViewModel {
    fn construct() -> anyhow::Result<Self> {
        Ok(Self::default())
    }
}

pub struct SettingsPage {
    core: PageCore,
}

impl Page for SettingsPage {
    fn core(&self) -> &PageCore {
        &self.core
    }

    fn analytics_name(&self) -> Option<String> {
        Some("Preferences".to_string())
    }
}

impl PageConstruct for SettingsPage {
    fn construct(_ctx: &PageContext<'_>) -> anyhow::Result<Self> {
        Ok(Self {
            core: PageCore::with_title("Settings"),
        })
    }
}

#[derive(Default)]
pub struct SettingsViewModel {
    notifier: PropertyNotifier,
}

impl ViewModel for SettingsViewModel {
    fn notifier(&self) -> &PropertyNotifier {
        &self.notifier
    }
}

impl ViewModelConstruct for SettingsViewModel {
    fn construct() -> anyhow::Result<Self> {
        Ok(Self::default())
    }
}
