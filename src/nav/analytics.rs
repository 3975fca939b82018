//! Page-transition analytics
//!
//! The bridge derives page names and forwards `(from, to)` pairs to a sink.
//! Telemetry must never abort navigation: sink errors and panics are logged
//! and swallowed here.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use super::page::Page;

/// External destination for page-navigation events
pub trait AnalyticsSink: Send + Sync {
    fn log_page_navigation(&self, from: Option<&str>, to: Option<&str>) -> anyhow::Result<()>;
}

/// One page transition as seen by analytics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: Option<String>,
    pub to: Option<String>,
    pub at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct AnalyticsBridge {
    sink: Arc<dyn AnalyticsSink>,
    enabled: bool,
}

impl AnalyticsBridge {
    pub fn new(sink: Arc<dyn AnalyticsSink>) -> Self {
        Self { sink, enabled: true }
    }

    pub fn disabled() -> Self {
        Self {
            sink: Arc::new(NullSink),
            enabled: false,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Human-readable page name, `None` when there is no page.
    ///
    /// Navigation containers report their root page; other pages report
    /// their analytics name or their type name without a `Page` suffix.
    pub fn page_name(&self, page: Option<&Arc<dyn Page>>) -> Option<String> {
        let page = page?;
        if let Some(container) = page.as_container() {
            return self.page_name(Some(container.root()));
        }

        page.analytics_name()
            .or_else(|| Some(default_page_name(page.kind().name())))
    }

    pub fn log_transition(&self, from: Option<&str>, to: Option<&str>) {
        if !self.enabled {
            return;
        }

        debug!("Page navigation: {:?} -> {:?}", from, to);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.sink.log_page_navigation(from, to)));

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Analytics sink failed for {:?} -> {:?}: {:#}", from, to, e),
            Err(_) => warn!("Analytics sink panicked for {:?} -> {:?}", from, to),
        }
    }
}

fn default_page_name(type_name: &str) -> String {
    match type_name.strip_suffix("Page") {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => type_name.to_string(),
    }
}

/// Writes every transition through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl AnalyticsSink for LogSink {
    fn log_page_navigation(&self, from: Option<&str>, to: Option<&str>) -> anyhow::Result<()> {
        info!(
            "Page navigation: {} -> {}",
            from.unwrap_or("<none>"),
            to.unwrap_or("<none>")
        );
        Ok(())
    }
}

/// Keeps transitions in memory, in arrival order
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<TransitionRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<TransitionRecord> {
        self.records.lock().clone()
    }

    /// `(from, to)` pairs without timestamps
    pub fn pairs(&self) -> Vec<(Option<String>, Option<String>)> {
        self.records
            .lock()
            .iter()
            .map(|record| (record.from.clone(), record.to.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl AnalyticsSink for MemorySink {
    fn log_page_navigation(&self, from: Option<&str>, to: Option<&str>) -> anyhow::Result<()> {
        self.records.lock().push(TransitionRecord {
            from: from.map(str::to_string),
            to: to.map(str::to_string),
            at: Utc::now(),
        });
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AnalyticsSink for NullSink {
    fn log_page_navigation(&self, _from: Option<&str>, _to: Option<&str>) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::page::{NavigationContainer, PageCore};

    struct InboxPage {
        core: PageCore,
    }

    impl Page for InboxPage {
        fn core(&self) -> &PageCore {
            &self.core
        }
    }

    struct Settings {
        core: PageCore,
    }

    impl Page for Settings {
        fn core(&self) -> &PageCore {
            &self.core
        }

        fn analytics_name(&self) -> Option<String> {
            Some("Preferences".to_string())
        }
    }

    struct FailingSink;

    impl AnalyticsSink for FailingSink {
        fn log_page_navigation(&self, _from: Option<&str>, _to: Option<&str>) -> anyhow::Result<()> {
            anyhow::bail!("collector offline")
        }
    }

    struct PanickingSink;

    impl AnalyticsSink for PanickingSink {
        fn log_page_navigation(&self, _from: Option<&str>, _to: Option<&str>) -> anyhow::Result<()> {
            panic!("sink bug")
        }
    }

    #[test]
    fn test_page_names() {
        let bridge = AnalyticsBridge::new(Arc::new(NullSink));
        let inbox: Arc<dyn Page> = Arc::new(InboxPage { core: PageCore::new() });
        let settings: Arc<dyn Page> = Arc::new(Settings { core: PageCore::new() });
        let wrapped: Arc<dyn Page> = NavigationContainer::wrap(inbox.clone(), "[Title not set]");

        assert_eq!(bridge.page_name(None), None);
        assert_eq!(bridge.page_name(Some(&inbox)), Some("Inbox".to_string()));
        assert_eq!(bridge.page_name(Some(&settings)), Some("Preferences".to_string()));
        assert_eq!(bridge.page_name(Some(&wrapped)), Some("Inbox".to_string()));
    }

    #[test]
    fn test_default_page_name_keeps_bare_page() {
        assert_eq!(default_page_name("Page"), "Page");
        assert_eq!(default_page_name("LoginPage"), "Login");
        assert_eq!(default_page_name("Dashboard"), "Dashboard");
    }

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = Arc::new(MemorySink::new());
        let bridge = AnalyticsBridge::new(sink.clone());

        bridge.log_transition(None, Some("Home"));
        bridge.log_transition(Some("Home"), Some("Details"));

        assert_eq!(
            sink.pairs(),
            vec![
                (None, Some("Home".to_string())),
                (Some("Home".to_string()), Some("Details".to_string())),
            ]
        );
    }

    #[test]
    fn test_sink_failures_are_swallowed() {
        AnalyticsBridge::new(Arc::new(FailingSink)).log_transition(Some("A"), Some("B"));
        AnalyticsBridge::new(Arc::new(PanickingSink)).log_transition(Some("A"), Some("B"));
    }

    #[test]
    fn test_disabled_bridge_skips_sink() {
        let sink = Arc::new(MemorySink::new());
        let bridge = AnalyticsBridge::new(sink.clone()).with_enabled(false);

        bridge.log_transition(Some("A"), Some("B"));
        assert!(sink.is_empty());
    }
}
