//! Navigation configuration with builder pattern
//!
//! Loaded from `config.toml` in the user config directory; every field has a
//! default so a partial or missing file is fine.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Title given to a navigation container whose root page has none
    #[serde(default = "default_container_title_fallback")]
    pub container_title_fallback: String,
    /// Whether `set_home` makes the home page the main page by default
    #[serde(default = "default_true")]
    pub show_home_on_set: bool,
    /// Whether `set_login` makes the login page the main page by default
    #[serde(default)]
    pub show_login_on_set: bool,
    #[serde(default = "default_true")]
    pub animate_home_return: bool,
    #[serde(default = "default_true")]
    pub analytics_enabled: bool,
    /// Simulated animation time of the in-memory host
    #[serde(default = "default_transition_delay_ms")]
    pub transition_delay_ms: u64,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_container_title_fallback() -> String {
    "[Title not set]".to_string()
}

fn default_true() -> bool {
    true
}

fn default_transition_delay_ms() -> u64 {
    250
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            container_title_fallback: default_container_title_fallback(),
            show_home_on_set: true,
            show_login_on_set: false,
            animate_home_return: true,
            analytics_enabled: true,
            transition_delay_ms: default_transition_delay_ms(),
            log_file: None,
        }
    }
}

impl NavigationConfig {
    pub fn builder() -> NavigationConfigBuilder {
        NavigationConfigBuilder::new()
    }

    /// No simulated animation time, for tests and scripted runs
    pub fn instant() -> Self {
        Self {
            transition_delay_ms: 0,
            animate_home_return: false,
            ..Self::default()
        }
    }

    /// Analytics off, otherwise default
    pub fn quiet() -> Self {
        Self {
            analytics_enabled: false,
            ..Self::default()
        }
    }

    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("mvvm-nav")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".mvvm-nav")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Loads the user configuration, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading navigation config from: {:?}", path);

        if !path.exists() {
            info!("Config file {:?} doesn't exist, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: NavigationConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        debug!("Loaded navigation config: {:?}", config);
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create config directory: {:?}", dir))?;
                info!("Created config directory: {:?}", dir);
            }
        }

        fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        info!("Config saved to {:?}", path);
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config to TOML")
    }
}

#[derive(Debug)]
pub struct NavigationConfigBuilder {
    config: NavigationConfig,
}

impl NavigationConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: NavigationConfig::default(),
        }
    }

    pub fn container_title_fallback(mut self, title: impl Into<String>) -> Self {
        self.config.container_title_fallback = title.into();
        self
    }

    pub fn show_home_on_set(mut self, show: bool) -> Self {
        self.config.show_home_on_set = show;
        self
    }

    pub fn show_login_on_set(mut self, show: bool) -> Self {
        self.config.show_login_on_set = show;
        self
    }

    pub fn animate_home_return(mut self, animate: bool) -> Self {
        self.config.animate_home_return = animate;
        self
    }

    pub fn analytics_enabled(mut self, enabled: bool) -> Self {
        self.config.analytics_enabled = enabled;
        self
    }

    pub fn transition_delay(mut self, delay: Duration) -> Self {
        self.config.transition_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_file = Some(path.into());
        self
    }

    pub fn build(self) -> NavigationConfig {
        self.config
    }
}

impl Default for NavigationConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("mvvm-nav-config-{}-{}", std::process::id(), name))
            .join("config.toml")
    }

    #[test]
    fn test_defaults() {
        let config = NavigationConfig::default();
        assert_eq!(config.container_title_fallback, "[Title not set]");
        assert!(config.show_home_on_set);
        assert!(!config.show_login_on_set);
        assert!(config.analytics_enabled);
        assert_eq!(config.transition_delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_presets() {
        assert_eq!(NavigationConfig::instant().transition_delay(), Duration::ZERO);
        assert!(!NavigationConfig::quiet().analytics_enabled);
    }

    #[test]
    fn test_builder() {
        let config = NavigationConfig::builder()
            .container_title_fallback("Untitled")
            .transition_delay(Duration::from_millis(20))
            .analytics_enabled(false)
            .build();

        assert_eq!(config.container_title_fallback, "Untitled");
        assert_eq!(config.transition_delay_ms, 20);
        assert!(!config.analytics_enabled);
    }

    #[test]
    fn test_partial_file_uses_defaults_for_missing_fields() {
        let config: NavigationConfig = toml::from_str("transition_delay_ms = 5\n").unwrap();
        assert_eq!(config.transition_delay_ms, 5);
        assert_eq!(config.container_title_fallback, "[Title not set]");
        assert!(config.animate_home_return);
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let config = NavigationConfig::load_from(&scratch_path("missing")).unwrap();
        assert_eq!(config, NavigationConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = scratch_path("roundtrip");
        let config = NavigationConfig::builder().show_login_on_set(true).log_file("nav.log").build();

        config.save_to(&path).unwrap();
        let loaded = NavigationConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let path = scratch_path("malformed");
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).unwrap();
        }
        fs::write(&path, "transition_delay_ms = \"soon\"").unwrap();

        let err = NavigationConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));

        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }
}
