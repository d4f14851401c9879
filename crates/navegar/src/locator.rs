//! Locator abstraction for element selection and interaction.
//!
//! # Design Philosophy
//!
//! - **Deferred**: a locator is a description of how to find an element.
//!   Constructing one never touches the live page; the query is re-evaluated
//!   on every interaction.
//! - **Accessibility-first**: the primary selectors are label text and
//!   ARIA role + accessible name, the same handles a user (or screen
//!   reader) navigates by. CSS and test-id selectors are escape hatches.
//! - **Auto-Waiting**: interactions wait for the element to be present and
//!   actionable before dispatching, bounded by the locator's timeout.

use std::time::Duration;

/// Default timeout for auto-waiting (5 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Default polling interval for auto-waiting (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Quote a string as a JavaScript string literal.
///
/// JSON string syntax is valid JavaScript, so this is safe for arbitrary
/// label and name text (quotes, backslashes, non-ASCII).
pub(crate) fn js_string(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Form control associated with a `<label>` whose text matches
    Label(String),
    /// ARIA role plus accessible name (e.g. role "button", name "Log in")
    Role {
        /// ARIA role (button, heading, textbox, link, ...)
        role: String,
        /// Accessible name to match
        name: String,
    },
    /// CSS selector (e.g. "button.primary")
    Css(String),
    /// Text content selector
    Text(String),
    /// Test ID selector (data-testid attribute)
    TestId(String),
}

impl Selector {
    /// Create a label selector
    #[must_use]
    pub fn label(text: impl Into<String>) -> Self {
        Self::Label(text.into())
    }

    /// Create a role + accessible-name selector
    #[must_use]
    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Role {
            role: role.into(),
            name: name.into(),
        }
    }

    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a test ID selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// CSS candidates that implicitly carry an ARIA role.
    fn implicit_css(role: &str) -> String {
        match role {
            "button" => {
                "button, input[type=\"submit\"], input[type=\"button\"], [role=\"button\"]"
                    .to_string()
            }
            "heading" => "h1, h2, h3, h4, h5, h6, [role=\"heading\"]".to_string(),
            "textbox" => "input, textarea, [role=\"textbox\"]".to_string(),
            "link" => "a[href], [role=\"link\"]".to_string(),
            other => format!("[role=\"{other}\"]"),
        }
    }

    /// Convert to a JavaScript expression evaluating to the first matching
    /// element, or `null`.
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::Label(text) => format!(
                "(() => {{ \
                 const lab = Array.from(document.querySelectorAll('label'))\
                 .find(l => l.textContent.trim() === {text}); \
                 if (!lab) return null; \
                 const id = lab.getAttribute('for'); \
                 return id ? document.getElementById(id) \
                 : lab.querySelector('input, textarea, select'); \
                 }})()",
                text = js_string(text)
            ),
            Self::Role { role, name } => format!(
                "(() => {{ \
                 const name = {name}; \
                 const accName = el => (el.getAttribute('aria-label') \
                 || el.value || el.textContent || '').trim(); \
                 return Array.from(document.querySelectorAll({css}))\
                 .find(el => accName(el) === name) || null; \
                 }})()",
                name = js_string(name),
                css = js_string(&Self::implicit_css(role))
            ),
            Self::Css(css) => format!("document.querySelector({})", js_string(css)),
            Self::Text(text) => format!(
                "Array.from(document.querySelectorAll('*'))\
                 .find(el => el.textContent.includes({})) || null",
                js_string(text)
            ),
            Self::TestId(id) => format!(
                "document.querySelector({})",
                js_string(&format!("[data-testid=\"{id}\"]"))
            ),
        }
    }

    /// Convert to a JavaScript expression evaluating to the number of
    /// matching elements.
    #[must_use]
    pub fn to_count_query(&self) -> String {
        match self {
            Self::Label(_) => format!("({} ? 1 : 0)", self.to_query()),
            Self::Role { role, name } => format!(
                "(() => {{ \
                 const name = {name}; \
                 const accName = el => (el.getAttribute('aria-label') \
                 || el.value || el.textContent || '').trim(); \
                 return Array.from(document.querySelectorAll({css}))\
                 .filter(el => accName(el) === name).length; \
                 }})()",
                name = js_string(name),
                css = js_string(&Self::implicit_css(role))
            ),
            Self::Css(css) => {
                format!("document.querySelectorAll({}).length", js_string(css))
            }
            Self::Text(text) => format!(
                "Array.from(document.querySelectorAll('*'))\
                 .filter(el => el.textContent.includes({})).length",
                js_string(text)
            ),
            Self::TestId(id) => format!(
                "document.querySelectorAll({}).length",
                js_string(&format!("[data-testid=\"{id}\"]"))
            ),
        }
    }

    /// Human-readable description for logs and error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Label(text) => format!("label \"{text}\""),
            Self::Role { role, name } => format!("role {role} \"{name}\""),
            Self::Css(css) => format!("css \"{css}\""),
            Self::Text(text) => format!("text \"{text}\""),
            Self::TestId(id) => format!("test id \"{id}\""),
        }
    }
}

/// Locator options for customizing behavior
#[derive(Debug, Clone)]
pub struct LocatorOptions {
    /// Timeout for auto-waiting
    pub timeout: Duration,
    /// Polling interval for auto-waiting
    pub poll_interval: Duration,
    /// Whether to require a strict single-element match
    pub strict: bool,
    /// Whether the element must be visible to be actionable
    pub visible: bool,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            strict: true,
            visible: true,
        }
    }
}

/// A deferred, re-evaluated query for finding and interacting with one
/// element.
#[derive(Debug, Clone)]
pub struct Locator {
    /// The selector for finding elements
    selector: Selector,
    /// Options for locator behavior
    options: LocatorOptions,
}

impl Locator {
    /// Create a locator from a selector with default options
    #[must_use]
    pub fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            options: LocatorOptions::default(),
        }
    }

    /// Set a custom timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Set a custom polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.options.poll_interval = poll_interval;
        self
    }

    /// Disable strict mode (allow multiple matches, act on the first)
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.options.strict = strict;
        self
    }

    /// Set the visibility requirement for actionability
    #[must_use]
    pub const fn with_visible(mut self, visible: bool) -> Self {
        self.options.visible = visible;
        self
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Get the options
    #[must_use]
    pub const fn options(&self) -> &LocatorOptions {
        &self.options
    }

    /// Human-readable description for logs and error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        self.selector.describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod selector_tests {
        use super::*;

        #[test]
        fn test_label_selector_query() {
            let selector = Selector::label("E-mail");
            let query = selector.to_query();
            assert!(query.contains("querySelectorAll('label')"));
            assert!(query.contains("\"E-mail\""));
            assert!(query.contains("getAttribute('for')"));
        }

        #[test]
        fn test_role_selector_query() {
            let selector = Selector::role("button", "Log in");
            let query = selector.to_query();
            assert!(query.contains("\"Log in\""));
            assert!(query.contains("aria-label"));
            assert!(query.contains("input[type=\\\"submit\\\"]"));
        }

        #[test]
        fn test_heading_role_expands_to_heading_tags() {
            let selector = Selector::role("heading", "Dashboard");
            let query = selector.to_query();
            assert!(query.contains("h1, h2, h3"));
        }

        #[test]
        fn test_unknown_role_falls_back_to_role_attribute() {
            let selector = Selector::role("tabpanel", "Details");
            assert!(selector.to_query().contains("[role=\\\"tabpanel\\\"]"));
        }

        #[test]
        fn test_css_selector_query() {
            let selector = Selector::css("button.primary");
            let query = selector.to_query();
            assert!(query.contains("querySelector"));
            assert!(query.contains("button.primary"));
        }

        #[test]
        fn test_test_id_selector_query() {
            let selector = Selector::test_id("login-submit");
            let query = selector.to_query();
            assert!(query.contains("data-testid"));
            assert!(query.contains("login-submit"));
        }

        #[test]
        fn test_count_query() {
            let selector = Selector::role("button", "Log in");
            let query = selector.to_count_query();
            assert!(query.contains(".length"));
        }

        #[test]
        fn test_query_escapes_quotes_in_text() {
            let selector = Selector::label("Promo \"code\"");
            let query = selector.to_query();
            assert!(query.contains("Promo \\\"code\\\""));
        }

        #[test]
        fn test_describe() {
            assert_eq!(Selector::label("E-mail").describe(), "label \"E-mail\"");
            assert_eq!(
                Selector::role("button", "Log in").describe(),
                "role button \"Log in\""
            );
        }
    }

    mod locator_tests {
        use super::*;

        #[test]
        fn test_from_selector_defaults() {
            let locator = Locator::from_selector(Selector::label("Password"));
            assert!(matches!(locator.selector(), Selector::Label(_)));
            assert_eq!(
                locator.options().timeout,
                Duration::from_millis(DEFAULT_TIMEOUT_MS)
            );
            assert!(locator.options().strict);
            assert!(locator.options().visible);
        }

        #[test]
        fn test_with_timeout() {
            let locator = Locator::from_selector(Selector::label("Password"))
                .with_timeout(Duration::from_secs(10));
            assert_eq!(locator.options().timeout, Duration::from_secs(10));
        }

        #[test]
        fn test_with_strict() {
            let locator =
                Locator::from_selector(Selector::css("button")).with_strict(false);
            assert!(!locator.options().strict);
        }

        #[test]
        fn test_describe_passthrough() {
            let locator = Locator::from_selector(Selector::role("button", "Log in"));
            assert_eq!(locator.describe(), "role button \"Log in\"");
        }
    }

    mod js_string_tests {
        use super::*;

        #[test]
        fn test_plain_text() {
            assert_eq!(js_string("E-mail"), "\"E-mail\"");
        }

        #[test]
        fn test_escapes_backslash_and_quote() {
            assert_eq!(js_string("a\"b\\c"), "\"a\\\"b\\\\c\"");
        }
    }
}
