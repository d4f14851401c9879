//! Harness configuration.
//!
//! A [`HarnessConfig`] carries everything a test run shares: the base URL
//! that page paths resolve against, the default action timeout and poll
//! interval stamped onto locators, and the browser launch settings. It can
//! be built fluently or loaded from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::browser::BrowserConfig;
use crate::locator::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
use crate::result::NavegarResult;

/// Shared configuration for one test run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Base URL that relative paths resolve against (None = paths are used
    /// verbatim)
    pub base_url: Option<String>,
    /// Default auto-wait timeout for locators, in milliseconds
    pub action_timeout_ms: u64,
    /// Default polling interval for locators, in milliseconds
    pub poll_interval_ms: u64,
    /// Browser launch settings
    pub browser: BrowserConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            action_timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            browser: BrowserConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// Create a new configuration with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the default action timeout in milliseconds
    #[must_use]
    pub const fn with_action_timeout_ms(mut self, ms: u64) -> Self {
        self.action_timeout_ms = ms;
        self
    }

    /// Set the default polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Set the browser launch settings
    #[must_use]
    pub fn with_browser(mut self, browser: BrowserConfig) -> Self {
        self.browser = browser;
        self
    }

    /// Resolve a page path against the configured base URL.
    ///
    /// Absolute URLs pass through untouched; without a base URL, paths are
    /// used verbatim.
    #[must_use]
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        match &self.base_url {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            None => path.to_string(),
        }
    }

    /// Parse a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json_str(json: &str) -> NavegarResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> NavegarResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
