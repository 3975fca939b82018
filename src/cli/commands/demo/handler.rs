//! Scripted navigation session over the in-memory host

use anyhow::{Context, Result};
use colored::*;
use log::info;
use std::sync::Arc;

use mvvm_navigation::config::NavigationConfig;
use mvvm_navigation::nav::{
    AnalyticsBridge, AnalyticsSink, MemoryHost, MemorySink, NavigationCoordinator, NavigationHost, Transition,
    TransitionRecord, ViewKind, ViewModel,
};

use super::pages::{
    DetailsPage, DetailsViewModel, GalleryPage, GalleryViewModel, HomePage, HomeViewModel, LoginPage,
    LoginViewModel, SettingsPage, SettingsViewModel,
};
use super::{DemoCommands, OutputFormat};

pub async fn handle_demo_command(args: DemoCommands, mut config: NavigationConfig) -> Result<()> {
    if let Some(delay_ms) = args.delay_ms {
        config.transition_delay_ms = delay_ms;
    }
    if args.quiet {
        config.analytics_enabled = false;
    }

    let host = Arc::new(MemoryHost::from_config(&config));
    let sink = Arc::new(MemorySink::new());
    let analytics =
        AnalyticsBridge::new(sink.clone() as Arc<dyn AnalyticsSink>).with_enabled(config.analytics_enabled);
    let coordinator = NavigationCoordinator::with_analytics(host.clone() as Arc<dyn NavigationHost>, analytics, config);

    let skipped = run_session(&coordinator, &host).await?;

    match args.format {
        OutputFormat::Plain => print_plain(&sink.records(), skipped),
        OutputFormat::Json => print_json(&sink.records())?,
    }
    Ok(())
}

/// Returns how many requests were dropped by the in-flight guard
async fn run_session(coordinator: &NavigationCoordinator, host: &MemoryHost) -> Result<usize> {
    coordinator.register::<LoginPage, LoginViewModel>();
    coordinator.register::<HomePage, HomeViewModel>();
    coordinator.register::<DetailsPage, DetailsViewModel>();
    coordinator.register::<GalleryPage, GalleryViewModel>();
    coordinator.register::<SettingsPage, SettingsViewModel>();

    coordinator
        .set_login_kind(ViewKind::of::<LoginPage>(), true)
        .context("Failed to set login view")?;
    coordinator
        .set_home_kind(ViewKind::of::<HomePage>(), true, false)
        .context("Failed to set home view")?;

    let login = coordinator.get_view_model::<LoginViewModel>()?;
    login.username.set(login.notifier(), "demo".to_string());
    coordinator.show_home().await.context("Failed to show home")?;
    let home = coordinator.get_view_model::<HomeViewModel>()?;
    info!("Signed in as '{}' with {} unread", login.username.get(), home.unread.get());

    coordinator.navigate_forward::<DetailsPage>(true).await?;
    let details = coordinator.get_view::<DetailsPage>()?;
    details
        .view_model()
        .subject
        .set(details.view_model().notifier(), "Quarterly report".to_string());

    coordinator.navigate_forward::<GalleryPage>(true).await?;
    let gallery = coordinator.get_view::<GalleryPage>()?;
    gallery.carousel().set_current(1);
    gallery.carousel().set_current(2);
    coordinator.navigate_back(true).await?;

    // A double tap: the second request lands while the first is animating
    let (first, second) = tokio::join!(
        coordinator.show_modal::<SettingsPage>(true),
        coordinator.show_modal::<SettingsPage>(true)
    );
    let skipped = [first?, second?]
        .iter()
        .filter(|outcome| **outcome == Transition::Skipped)
        .count();
    coordinator.hide_modal(true).await?;

    coordinator.show_login(true).await?;
    host.respond_to_alert(true);
    let stay = coordinator
        .display_alert("Session expired", "Sign in again?", "Sign in", "Later")
        .await?;
    info!("Alert answered: {}", if stay { "accept" } else { "cancel" });
    coordinator.hide_modal(true).await?;

    coordinator.hide_navigation_bar();
    coordinator.show_home().await?;
    coordinator.show_navigation_bar();

    info!("Demo session finished with {} skipped request(s)", skipped);
    Ok(skipped)
}

fn print_plain(records: &[TransitionRecord], skipped: usize) {
    if records.is_empty() {
        println!("No transitions recorded.");
    }

    for record in records {
        println!(
            "{} {} {} {}",
            record.at.format("%H:%M:%S%.3f").to_string().dimmed(),
            record.from.as_deref().unwrap_or("-").yellow(),
            "→".dimmed(),
            record.to.as_deref().unwrap_or("-").green().bold()
        );
    }

    println!("\nTransitions recorded: {}", records.len());
    if skipped > 0 {
        println!("{} {}", "Skipped while in flight:".yellow(), skipped);
    }
}

fn print_json(records: &[TransitionRecord]) -> Result<()> {
    for record in records {
        let line = serde_json::to_string(record).context("Failed to serialize transition record")?;
        println!("{}", line);
    }
    Ok(())
}
