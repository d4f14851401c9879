//! Page handle: the capability a page object drives a browser tab through.
//!
//! A [`PageHandle`] pairs an engine page with the shared harness
//! configuration. It resolves relative paths against the configured base
//! URL, stamps the configured timeouts onto the locators it creates, and
//! forwards element operations to the engine. Page objects hold a clone of
//! the handle (composition, not inheritance); the browser owns the tab
//! itself.

use std::sync::Arc;
use std::time::Duration;

use crate::browser::Page;
use crate::config::HarnessConfig;
use crate::locator::{Locator, Selector};
use crate::result::NavegarResult;

/// Handle to one browser tab, bound to the harness configuration.
#[derive(Debug, Clone)]
pub struct PageHandle {
    page: Page,
    config: Arc<HarnessConfig>,
}

impl PageHandle {
    /// Bind an engine page to a configuration.
    #[must_use]
    pub fn new(page: Page, config: Arc<HarnessConfig>) -> Self {
        Self { page, config }
    }

    /// The underlying engine page.
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// The harness configuration.
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Navigate to a path (resolved against the base URL) and suspend until
    /// the load completes.
    ///
    /// # Errors
    ///
    /// Navigation failures propagate unmodified.
    pub async fn navigate(&self, path: &str) -> NavegarResult<()> {
        let url = self.config.resolve_url(path);
        tracing::debug!(%url, "navigating");
        self.page.goto(&url).await
    }

    /// Current URL of the tab.
    #[must_use]
    pub fn url(&self) -> String {
        self.page.current_url()
    }

    fn locator(&self, selector: Selector) -> Locator {
        Locator::from_selector(selector)
            .with_timeout(Duration::from_millis(self.config.action_timeout_ms))
            .with_poll_interval(Duration::from_millis(self.config.poll_interval_ms))
    }

    /// Locator for the form control associated with a label.
    #[must_use]
    pub fn by_label(&self, text: impl Into<String>) -> Locator {
        self.locator(Selector::label(text))
    }

    /// Locator for an element by ARIA role and accessible name.
    #[must_use]
    pub fn by_role(&self, role: impl Into<String>, name: impl Into<String>) -> Locator {
        self.locator(Selector::role(role, name))
    }

    /// Fill the located element with text, auto-waiting for actionability.
    ///
    /// # Errors
    ///
    /// Locator-resolution and actionability failures propagate unmodified.
    pub async fn fill(&self, locator: &Locator, text: &str) -> NavegarResult<()> {
        tracing::debug!(locator = %locator.describe(), "fill");
        self.page.fill(locator, text).await
    }

    /// Click the located element, auto-waiting for actionability.
    ///
    /// # Errors
    ///
    /// Locator-resolution and actionability failures propagate unmodified.
    pub async fn click(&self, locator: &Locator) -> NavegarResult<()> {
        tracing::debug!(locator = %locator.describe(), "click");
        self.page.click(locator).await
    }

    /// Whether the located element is currently visible (single probe).
    ///
    /// # Errors
    ///
    /// Engine failures propagate unmodified.
    pub async fn is_visible(&self, locator: &Locator) -> NavegarResult<bool> {
        self.page.is_visible(locator).await
    }

    /// Text content (or input value) of the located element.
    ///
    /// # Errors
    ///
    /// Engine failures propagate unmodified.
    pub async fn text_content(&self, locator: &Locator) -> NavegarResult<Option<String>> {
        self.page.text_content(locator).await
    }

    /// Count of elements matching the locator (single probe).
    ///
    /// # Errors
    ///
    /// Engine failures propagate unmodified.
    pub async fn count(&self, locator: &Locator) -> NavegarResult<usize> {
        self.page.count(locator).await
    }
}

#[cfg(test)]
#[cfg(not(feature = "browser"))]
mod tests {
    use super::*;

    fn handle() -> PageHandle {
        let config = Arc::new(
            HarnessConfig::new()
                .with_base_url("https://app.example.test")
                .with_action_timeout_ms(50)
                .with_poll_interval_ms(5),
        );
        PageHandle::new(Page::default(), config)
    }

    #[tokio::test]
    async fn test_navigate_resolves_against_base_url() {
        let page = handle();
        page.navigate("/login").await.unwrap();
        assert_eq!(page.url(), "https://app.example.test/login");
    }

    #[tokio::test]
    async fn test_navigate_absolute_url() {
        let page = handle();
        page.navigate("https://other.example.test/x").await.unwrap();
        assert_eq!(page.url(), "https://other.example.test/x");
    }

    #[test]
    fn test_locators_carry_configured_timeouts() {
        let page = handle();
        let locator = page.by_label("E-mail");
        assert_eq!(locator.options().timeout, Duration::from_millis(50));
        assert_eq!(locator.options().poll_interval, Duration::from_millis(5));
    }

    #[tokio::test]
    async fn test_fill_and_click_flow_through_engine() {
        let page = handle();
        page.page().add_labeled_input("E-mail");
        page.page().add_button("Log in");

        page.fill(&page.by_label("E-mail"), "usuario@teste.com")
            .await
            .unwrap();
        page.click(&page.by_role("button", "Log in")).await.unwrap();

        assert_eq!(page.page().actions().len(), 2);
    }

    #[tokio::test]
    async fn test_clones_share_the_tab() {
        let page = handle();
        let other = page.clone();

        page.navigate("/login").await.unwrap();
        assert_eq!(other.url(), "https://app.example.test/login");
    }
}
