//! Result and error types for Navegar.

use thiserror::Error;

/// Result type for Navegar operations
pub type NavegarResult<T> = Result<T, NavegarError>;

/// Errors that can occur while driving a page.
///
/// Every failure propagates unmodified to the calling test; no layer of
/// this crate retries or recovers.
#[derive(Debug, Error)]
pub enum NavegarError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or set CHROMIUM_PATH")]
    BrowserNotFound,

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunchError {
        /// Error message
        message: String,
    },

    /// Page error
    #[error("Page error: {message}")]
    PageError {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Operation timed out
    #[error("Operation timed out after {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
    },

    /// No element matched the locator within its timeout
    #[error("No element matching {selector} within {ms}ms")]
    LocatorNotFound {
        /// Locator description
        selector: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// An element matched but could not receive the requested action
    #[error("Element {selector} not actionable: {message}")]
    ElementNotActionable {
        /// Locator description
        selector: String,
        /// Error message
        message: String,
    },

    /// Assertion failed (from `expect()`)
    #[error("Assertion failed: {message}")]
    AssertionError {
        /// Error message, including the last observed state
        message: String,
    },

    /// Fixture error (unknown name or type mismatch)
    #[error("Fixture error: {message}")]
    FixtureError {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
