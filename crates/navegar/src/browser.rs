//! Browser control for headless testing.
//!
//! When compiled with the `browser` feature, pages are driven over the
//! Chrome DevTools Protocol via chromiumoxide. Without the feature, a
//! scriptable in-process mock stands in: tests seed it with labeled inputs,
//! buttons and headings, attach click handlers that mutate the mock DOM
//! (standing in for the application under test), and read back an ordered
//! action log.
//!
//! Both implementations expose the same async surface, so page objects and
//! specs are written once.

use serde::{Deserialize, Serialize};

use crate::result::NavegarResult;

/// Browser launch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

// ============================================================================
// Real CDP Implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use super::BrowserConfig;
    use crate::locator::{js_string, Locator};
    use crate::result::{NavegarError, NavegarResult};
    use crate::wait::{poll_until, WaitOptions};
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Browser instance with a live CDP connection
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
        inner: Arc<Mutex<CdpBrowser>>,
        #[allow(dead_code)]
        handle: tokio::task::JoinHandle<()>,
    }

    impl Browser {
        /// Launch a new browser instance
        ///
        /// # Errors
        ///
        /// Returns error if the browser cannot be launched
        pub async fn launch(config: BrowserConfig) -> NavegarResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height);

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .build()
                .map_err(|e| NavegarError::BrowserLaunchError {
                    message: e.to_string(),
                })?;

            let (browser, mut handler) = CdpBrowser::launch(cdp_config).await.map_err(|e| {
                NavegarError::BrowserLaunchError {
                    message: e.to_string(),
                }
            })?;

            // Drive the CDP event loop until the connection drops
            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            Ok(Self {
                config,
                inner: Arc::new(Mutex::new(browser)),
                handle,
            })
        }

        /// Open a new page (browser tab)
        ///
        /// # Errors
        ///
        /// Returns error if the page cannot be created
        pub async fn new_page(&self) -> NavegarResult<Page> {
            let browser = self.inner.lock().await;
            let cdp_page =
                browser
                    .new_page("about:blank")
                    .await
                    .map_err(|e| NavegarError::PageError {
                        message: e.to_string(),
                    })?;

            Ok(Page {
                inner: Arc::new(Mutex::new(cdp_page)),
                url: Arc::new(std::sync::Mutex::new(String::from("about:blank"))),
            })
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser
        ///
        /// # Errors
        ///
        /// Returns error if the browser refuses to close
        pub async fn close(self) -> NavegarResult<()> {
            let mut browser = self.inner.lock().await;
            browser
                .close()
                .await
                .map_err(|e| NavegarError::BrowserLaunchError {
                    message: e.to_string(),
                })?;
            Ok(())
        }
    }

    /// A browser page driven over CDP. Cloning yields another handle to the
    /// same tab.
    #[derive(Debug, Clone)]
    pub struct Page {
        inner: Arc<Mutex<CdpPage>>,
        url: Arc<std::sync::Mutex<String>>,
    }

    impl Page {
        /// Navigate to a URL and wait for the load to complete
        ///
        /// # Errors
        ///
        /// Returns error if navigation fails or times out
        pub async fn goto(&self, url: &str) -> NavegarResult<()> {
            let page = self.inner.lock().await;
            page.goto(url)
                .await
                .map_err(|e| NavegarError::NavigationError {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            page.wait_for_navigation()
                .await
                .map_err(|e| NavegarError::NavigationError {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            *self.url.lock().unwrap_or_else(std::sync::PoisonError::into_inner) =
                url.to_string();
            Ok(())
        }

        /// Evaluate a JavaScript expression on the page
        async fn eval<T: serde::de::DeserializeOwned>(&self, expr: &str) -> NavegarResult<T> {
            let page = self.inner.lock().await;
            let result = page
                .evaluate(expr)
                .await
                .map_err(|e| NavegarError::PageError {
                    message: e.to_string(),
                })?;
            result.into_value().map_err(|e| NavegarError::PageError {
                message: e.to_string(),
            })
        }

        fn visibility_expr(locator: &Locator) -> String {
            let query = locator.selector().to_query();
            if locator.options().visible {
                format!(
                    "(() => {{ const el = {query}; if (!el) return false; \
                     return !!(el.offsetWidth || el.offsetHeight \
                     || el.getClientRects().length); }})()"
                )
            } else {
                format!("(() => {{ const el = {query}; return el !== null; }})()")
            }
        }

        /// Wait until the locator resolves to an actionable element.
        async fn wait_for_actionable(&self, locator: &Locator) -> NavegarResult<()> {
            let options = WaitOptions::new()
                .with_timeout(locator.options().timeout.as_millis() as u64)
                .with_poll_interval(locator.options().poll_interval.as_millis() as u64);
            let expr = Self::visibility_expr(locator);

            let waited = poll_until(&options, || async { self.eval::<bool>(&expr).await }).await;
            match waited {
                Ok(()) => {}
                Err(NavegarError::Timeout { ms }) => {
                    return Err(NavegarError::LocatorNotFound {
                        selector: locator.describe(),
                        ms,
                    })
                }
                Err(e) => return Err(e),
            }

            if locator.options().strict {
                let count: u64 = self.eval(&locator.selector().to_count_query()).await?;
                if count > 1 {
                    return Err(NavegarError::ElementNotActionable {
                        selector: locator.describe(),
                        message: format!("strict mode violation: {count} elements match"),
                    });
                }
            }
            Ok(())
        }

        /// Fill the located element with text, auto-waiting for
        /// actionability
        ///
        /// # Errors
        ///
        /// Returns error if the element never resolves, is ambiguous in
        /// strict mode, or rejects input
        pub async fn fill(&self, locator: &Locator, text: &str) -> NavegarResult<()> {
            self.wait_for_actionable(locator).await?;
            let expr = format!(
                "(() => {{ const el = {query}; if (!el) return false; \
                 el.focus(); el.value = {text}; \
                 el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                 el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                 return true; }})()",
                query = locator.selector().to_query(),
                text = js_string(text)
            );
            if self.eval::<bool>(&expr).await? {
                Ok(())
            } else {
                Err(NavegarError::ElementNotActionable {
                    selector: locator.describe(),
                    message: "element disappeared before fill".to_string(),
                })
            }
        }

        /// Click the located element, auto-waiting for actionability
        ///
        /// # Errors
        ///
        /// Returns error if the element never resolves or is ambiguous in
        /// strict mode
        pub async fn click(&self, locator: &Locator) -> NavegarResult<()> {
            self.wait_for_actionable(locator).await?;
            let expr = format!(
                "(() => {{ const el = {query}; if (!el) return false; \
                 el.click(); return true; }})()",
                query = locator.selector().to_query()
            );
            if self.eval::<bool>(&expr).await? {
                Ok(())
            } else {
                Err(NavegarError::ElementNotActionable {
                    selector: locator.describe(),
                    message: "element disappeared before click".to_string(),
                })
            }
        }

        /// Check whether the located element is currently visible (single
        /// probe, no waiting)
        ///
        /// # Errors
        ///
        /// Returns error if the page evaluation fails
        pub async fn is_visible(&self, locator: &Locator) -> NavegarResult<bool> {
            let query = locator.selector().to_query();
            let expr = format!(
                "(() => {{ const el = {query}; if (!el) return false; \
                 return !!(el.offsetWidth || el.offsetHeight \
                 || el.getClientRects().length); }})()"
            );
            self.eval(&expr).await
        }

        /// Get the text content (or input value) of the located element
        ///
        /// # Errors
        ///
        /// Returns error if the page evaluation fails
        pub async fn text_content(&self, locator: &Locator) -> NavegarResult<Option<String>> {
            let query = locator.selector().to_query();
            let expr = format!(
                "(() => {{ const el = {query}; if (!el) return null; \
                 return ('value' in el && el.value) ? el.value : el.textContent; }})()"
            );
            self.eval(&expr).await
        }

        /// Count elements matching the locator (single probe)
        ///
        /// # Errors
        ///
        /// Returns error if the page evaluation fails
        pub async fn count(&self, locator: &Locator) -> NavegarResult<usize> {
            let count: u64 = self.eval(&locator.selector().to_count_query()).await?;
            Ok(count as usize)
        }

        /// Get the current URL
        #[must_use]
        pub fn current_url(&self) -> String {
            self.url
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .clone()
        }
    }
}

// ============================================================================
// Mock Implementation (when `browser` feature is NOT enabled)
// ============================================================================

#[cfg(not(feature = "browser"))]
mod mock {
    use super::BrowserConfig;
    use crate::locator::{Locator, Selector};
    use crate::result::{NavegarError, NavegarResult};
    use crate::wait::{poll_until, WaitOptions};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

    /// Browser instance (mock when `browser` feature disabled)
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
    }

    impl Browser {
        /// Launch a new browser instance (mock)
        ///
        /// # Errors
        ///
        /// Never fails in mock mode
        pub async fn launch(config: BrowserConfig) -> NavegarResult<Self> {
            Ok(Self { config })
        }

        /// Open a new page (mock)
        ///
        /// # Errors
        ///
        /// Never fails in mock mode
        pub async fn new_page(&self) -> NavegarResult<Page> {
            Ok(Page::default())
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser (mock)
        ///
        /// # Errors
        ///
        /// Never fails in mock mode
        pub async fn close(self) -> NavegarResult<()> {
            Ok(())
        }
    }

    /// One dispatched page interaction, in dispatch order.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ActionRecord {
        /// A navigation request
        Navigate {
            /// Requested URL
            url: String,
        },
        /// A fill on a located element
        Fill {
            /// Locator description
            target: String,
            /// Text that was filled
            value: String,
        },
        /// A click on a located element
        Click {
            /// Locator description
            target: String,
        },
    }

    /// Kinds of element the mock DOM models
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum MockElementKind {
        /// Text input associated with a label
        LabeledInput,
        /// Clickable button
        Button,
        /// Heading (h1-h6)
        Heading,
        /// Plain text node
        Text,
    }

    /// An element in the mock DOM
    #[derive(Debug, Clone)]
    pub struct MockElement {
        /// Element kind
        pub kind: MockElementKind,
        /// Label text, accessible name, or heading text
        pub name: String,
        /// Current input value
        pub value: String,
        /// Whether the element is visible
        pub visible: bool,
    }

    /// The mock DOM: a flat accessibility tree the tests script directly.
    #[derive(Debug, Default)]
    pub struct MockDom {
        elements: Vec<MockElement>,
    }

    impl MockDom {
        /// Add a visible text input with the given label
        pub fn add_labeled_input(&mut self, label: impl Into<String>) {
            self.elements.push(MockElement {
                kind: MockElementKind::LabeledInput,
                name: label.into(),
                value: String::new(),
                visible: true,
            });
        }

        /// Add a visible button with the given accessible name
        pub fn add_button(&mut self, name: impl Into<String>) {
            self.elements.push(MockElement {
                kind: MockElementKind::Button,
                name: name.into(),
                value: String::new(),
                visible: true,
            });
        }

        /// Add a visible heading with the given text
        pub fn add_heading(&mut self, name: impl Into<String>) {
            self.elements.push(MockElement {
                kind: MockElementKind::Heading,
                name: name.into(),
                value: String::new(),
                visible: true,
            });
        }

        /// Add a hidden heading with the given text
        pub fn add_hidden_heading(&mut self, name: impl Into<String>) {
            self.elements.push(MockElement {
                kind: MockElementKind::Heading,
                name: name.into(),
                value: String::new(),
                visible: false,
            });
        }

        /// Show or hide every element with the given name
        pub fn set_visible(&mut self, name: &str, visible: bool) {
            for el in self.elements.iter_mut().filter(|el| el.name == name) {
                el.visible = visible;
            }
        }

        /// Current value of the input with the given label
        #[must_use]
        pub fn input_value(&self, label: &str) -> Option<String> {
            self.elements
                .iter()
                .find(|el| el.kind == MockElementKind::LabeledInput && el.name == label)
                .map(|el| el.value.clone())
        }

        fn matches(el: &MockElement, selector: &Selector) -> bool {
            match selector {
                Selector::Label(label) => {
                    el.kind == MockElementKind::LabeledInput && el.name == *label
                }
                Selector::Role { role, name } => {
                    let kind_ok = match role.as_str() {
                        "button" => el.kind == MockElementKind::Button,
                        "heading" => el.kind == MockElementKind::Heading,
                        "textbox" => el.kind == MockElementKind::LabeledInput,
                        _ => false,
                    };
                    kind_ok && el.name == *name
                }
                Selector::Text(text) => el.name.contains(text.as_str()),
                // The mock models an accessibility tree, not a CSS engine
                Selector::Css(_) | Selector::TestId(_) => false,
            }
        }

        fn matching(&self, selector: &Selector) -> Vec<&MockElement> {
            self.elements
                .iter()
                .filter(|el| Self::matches(el, selector))
                .collect()
        }

        fn matching_mut(&mut self, selector: &Selector) -> Vec<&mut MockElement> {
            self.elements
                .iter_mut()
                .filter(|el| Self::matches(el, selector))
                .collect()
        }
    }

    type ClickHandler = Box<dyn FnMut(&mut MockDom) + Send>;

    #[derive(Default)]
    struct PageState {
        url: String,
        dom: MockDom,
        handlers: HashMap<String, ClickHandler>,
        actions: Vec<ActionRecord>,
    }

    /// A mock browser page. Cloning yields another handle to the same tab.
    #[derive(Clone, Default)]
    pub struct Page {
        state: Arc<Mutex<PageState>>,
    }

    impl std::fmt::Debug for Page {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            let state = self.lock();
            f.debug_struct("Page")
                .field("url", &state.url)
                .field("elements", &state.dom.elements.len())
                .field("actions", &state.actions.len())
                .finish()
        }
    }

    impl Page {
        fn lock(&self) -> MutexGuard<'_, PageState> {
            self.state.lock().unwrap_or_else(PoisonError::into_inner)
        }

        // -- engine surface (same shape as the CDP page) ------------------

        /// Navigate to a URL
        ///
        /// # Errors
        ///
        /// Never fails in mock mode; the navigation is recorded
        pub async fn goto(&self, url: &str) -> NavegarResult<()> {
            let mut state = self.lock();
            state.url = url.to_string();
            state.actions.push(ActionRecord::Navigate {
                url: url.to_string(),
            });
            Ok(())
        }

        fn actionable_exists(&self, locator: &Locator) -> bool {
            let state = self.lock();
            state
                .dom
                .matching(locator.selector())
                .iter()
                .any(|el| el.visible || !locator.options().visible)
        }

        /// Wait until the locator resolves to an actionable element.
        async fn wait_for_actionable(&self, locator: &Locator) -> NavegarResult<()> {
            let options = WaitOptions::new()
                .with_timeout(locator.options().timeout.as_millis() as u64)
                .with_poll_interval(locator.options().poll_interval.as_millis() as u64);

            let waited =
                poll_until(&options, || async { Ok(self.actionable_exists(locator)) }).await;
            match waited {
                Ok(()) => {}
                Err(NavegarError::Timeout { ms }) => {
                    return Err(NavegarError::LocatorNotFound {
                        selector: locator.describe(),
                        ms,
                    })
                }
                Err(e) => return Err(e),
            }

            if locator.options().strict {
                let count = self.lock().dom.matching(locator.selector()).len();
                if count > 1 {
                    return Err(NavegarError::ElementNotActionable {
                        selector: locator.describe(),
                        message: format!("strict mode violation: {count} elements match"),
                    });
                }
            }
            Ok(())
        }

        /// Fill the located element with text, auto-waiting for
        /// actionability
        ///
        /// # Errors
        ///
        /// Returns error if the element never resolves, is ambiguous in
        /// strict mode, or is not a text input
        pub async fn fill(&self, locator: &Locator, text: &str) -> NavegarResult<()> {
            self.wait_for_actionable(locator).await?;
            let mut state = self.lock();
            let mut matched = state.dom.matching_mut(locator.selector());
            let Some(el) = matched.first_mut() else {
                return Err(NavegarError::LocatorNotFound {
                    selector: locator.describe(),
                    ms: locator.options().timeout.as_millis() as u64,
                });
            };
            if el.kind != MockElementKind::LabeledInput {
                return Err(NavegarError::ElementNotActionable {
                    selector: locator.describe(),
                    message: "element is not a text input".to_string(),
                });
            }
            el.value = text.to_string();
            let record = ActionRecord::Fill {
                target: locator.describe(),
                value: text.to_string(),
            };
            state.actions.push(record);
            Ok(())
        }

        /// Click the located element, auto-waiting for actionability.
        ///
        /// If a click handler is registered for the element's accessible
        /// name, it runs synchronously against the mock DOM (this is how
        /// tests emulate the application's response, e.g. a post-login
        /// redirect).
        ///
        /// # Errors
        ///
        /// Returns error if the element never resolves or is ambiguous in
        /// strict mode
        pub async fn click(&self, locator: &Locator) -> NavegarResult<()> {
            self.wait_for_actionable(locator).await?;
            let mut state = self.lock();
            let Some(name) = state
                .dom
                .matching(locator.selector())
                .first()
                .map(|el| el.name.clone())
            else {
                return Err(NavegarError::LocatorNotFound {
                    selector: locator.describe(),
                    ms: locator.options().timeout.as_millis() as u64,
                });
            };
            state.actions.push(ActionRecord::Click {
                target: locator.describe(),
            });
            if let Some(mut handler) = state.handlers.remove(&name) {
                handler(&mut state.dom);
                state.handlers.insert(name, handler);
            }
            Ok(())
        }

        /// Check whether the located element is currently visible (single
        /// probe, no waiting)
        ///
        /// # Errors
        ///
        /// Never fails in mock mode
        pub async fn is_visible(&self, locator: &Locator) -> NavegarResult<bool> {
            let state = self.lock();
            Ok(state
                .dom
                .matching(locator.selector())
                .iter()
                .any(|el| el.visible))
        }

        /// Get the text content (or input value) of the located element
        ///
        /// # Errors
        ///
        /// Never fails in mock mode
        pub async fn text_content(&self, locator: &Locator) -> NavegarResult<Option<String>> {
            let state = self.lock();
            Ok(state.dom.matching(locator.selector()).first().map(|el| {
                if el.kind == MockElementKind::LabeledInput {
                    el.value.clone()
                } else {
                    el.name.clone()
                }
            }))
        }

        /// Count elements matching the locator (single probe)
        ///
        /// # Errors
        ///
        /// Never fails in mock mode
        pub async fn count(&self, locator: &Locator) -> NavegarResult<usize> {
            let state = self.lock();
            Ok(state.dom.matching(locator.selector()).len())
        }

        /// Get the current URL
        #[must_use]
        pub fn current_url(&self) -> String {
            self.lock().url.clone()
        }

        // -- scripting surface (mock only) --------------------------------

        /// Add a visible text input with the given label
        pub fn add_labeled_input(&self, label: impl Into<String>) {
            self.lock().dom.add_labeled_input(label);
        }

        /// Add a visible button with the given accessible name
        pub fn add_button(&self, name: impl Into<String>) {
            self.lock().dom.add_button(name);
        }

        /// Add a visible heading with the given text
        pub fn add_heading(&self, name: impl Into<String>) {
            self.lock().dom.add_heading(name);
        }

        /// Add a hidden heading with the given text
        pub fn add_hidden_heading(&self, name: impl Into<String>) {
            self.lock().dom.add_hidden_heading(name);
        }

        /// Show or hide every element with the given name
        pub fn set_visible(&self, name: &str, visible: bool) {
            self.lock().dom.set_visible(name, visible);
        }

        /// Current value of the input with the given label
        #[must_use]
        pub fn input_value(&self, label: &str) -> Option<String> {
            self.lock().dom.input_value(label)
        }

        /// Register a handler to run when the named button is clicked
        pub fn on_click(
            &self,
            button_name: impl Into<String>,
            handler: impl FnMut(&mut MockDom) + Send + 'static,
        ) {
            let _ = self
                .lock()
                .handlers
                .insert(button_name.into(), Box::new(handler));
        }

        /// The ordered log of dispatched interactions
        #[must_use]
        pub fn actions(&self) -> Vec<ActionRecord> {
            self.lock().actions.clone()
        }
    }

}

// Re-export based on feature
#[cfg(feature = "browser")]
pub use cdp::{Browser, Page};

#[cfg(not(feature = "browser"))]
pub use mock::{ActionRecord, Browser, MockDom, MockElement, MockElementKind, Page};

/// Launch a browser and open one page in a single call.
///
/// # Errors
///
/// Returns error if the browser cannot be launched or the page cannot be
/// created.
pub async fn launch_page(config: BrowserConfig) -> NavegarResult<(Browser, Page)> {
    let browser = Browser::launch(config).await?;
    let page = browser.new_page().await?;
    Ok((browser, page))
}
