//! Web-first assertions.
//!
//! An expectation polls the page until the condition holds or the locator's
//! timeout elapses, then fails with the expectation and the last observed
//! state. Polling is the only retry mechanism in this crate; a failed
//! assertion is reported to the surrounding test, never recovered.

use crate::locator::Locator;
use crate::page::PageHandle;
use crate::result::{NavegarError, NavegarResult};
use crate::wait::{poll_until, WaitOptions};

/// Smart assertion builder over a locator.
#[derive(Debug, Clone, Copy)]
pub struct Expect<'a> {
    page: &'a PageHandle,
    locator: &'a Locator,
}

/// Create an expectation for a locator.
#[must_use]
pub const fn expect<'a>(page: &'a PageHandle, locator: &'a Locator) -> Expect<'a> {
    Expect { page, locator }
}

impl Expect<'_> {
    fn wait_options(&self) -> WaitOptions {
        WaitOptions::new()
            .with_timeout(self.locator.options().timeout.as_millis() as u64)
            .with_poll_interval(self.locator.options().poll_interval.as_millis() as u64)
    }

    fn failure(&self, expected: &str, ms: u64, last_observed: &str) -> NavegarError {
        NavegarError::AssertionError {
            message: format!(
                "expected {} {expected} within {ms}ms; last observed: {last_observed}",
                self.locator.describe()
            ),
        }
    }

    /// Assert the element becomes visible.
    ///
    /// # Errors
    ///
    /// Returns [`NavegarError::AssertionError`] if the element is still
    /// hidden or absent when the timeout elapses; engine failures propagate
    /// unmodified.
    pub async fn to_be_visible(&self) -> NavegarResult<()> {
        tracing::debug!(locator = %self.locator.describe(), "expect visible");
        let polled = poll_until(&self.wait_options(), || async {
            self.page.is_visible(self.locator).await
        })
        .await;
        match polled {
            Ok(()) => Ok(()),
            Err(NavegarError::Timeout { ms }) => {
                Err(self.failure("to be visible", ms, "hidden or absent"))
            }
            Err(e) => Err(e),
        }
    }

    /// Assert the element becomes hidden (or is absent).
    ///
    /// # Errors
    ///
    /// Returns [`NavegarError::AssertionError`] if the element is still
    /// visible when the timeout elapses; engine failures propagate
    /// unmodified.
    pub async fn to_be_hidden(&self) -> NavegarResult<()> {
        let polled = poll_until(&self.wait_options(), || async {
            Ok(!self.page.is_visible(self.locator).await?)
        })
        .await;
        match polled {
            Ok(()) => Ok(()),
            Err(NavegarError::Timeout { ms }) => {
                Err(self.failure("to be hidden", ms, "visible"))
            }
            Err(e) => Err(e),
        }
    }

    /// Assert the element's text becomes exactly `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`NavegarError::AssertionError`] if the text never matches
    /// before the timeout; engine failures propagate unmodified.
    pub async fn to_have_text(&self, expected: &str) -> NavegarResult<()> {
        let polled = poll_until(&self.wait_options(), || async {
            Ok(self.page.text_content(self.locator).await?.as_deref() == Some(expected))
        })
        .await;
        match polled {
            Ok(()) => Ok(()),
            Err(NavegarError::Timeout { ms }) => {
                let last = self.page.text_content(self.locator).await?;
                Err(self.failure(
                    &format!("to have text \"{expected}\""),
                    ms,
                    &last.map_or_else(|| "no element".to_string(), |t| format!("\"{t}\"")),
                ))
            }
            Err(e) => Err(e),
        }
    }

    /// Assert the element's text comes to contain `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`NavegarError::AssertionError`] if the text never contains
    /// the fragment before the timeout; engine failures propagate
    /// unmodified.
    pub async fn to_contain_text(&self, expected: &str) -> NavegarResult<()> {
        let polled = poll_until(&self.wait_options(), || async {
            Ok(self
                .page
                .text_content(self.locator)
                .await?
                .is_some_and(|t| t.contains(expected)))
        })
        .await;
        match polled {
            Ok(()) => Ok(()),
            Err(NavegarError::Timeout { ms }) => {
                let last = self.page.text_content(self.locator).await?;
                Err(self.failure(
                    &format!("to contain text \"{expected}\""),
                    ms,
                    &last.map_or_else(|| "no element".to_string(), |t| format!("\"{t}\"")),
                ))
            }
            Err(e) => Err(e),
        }
    }

    /// Assert the number of matching elements becomes `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`NavegarError::AssertionError`] if the count never matches
    /// before the timeout; engine failures propagate unmodified.
    pub async fn to_have_count(&self, expected: usize) -> NavegarResult<()> {
        let polled = poll_until(&self.wait_options(), || async {
            Ok(self.page.count(self.locator).await? == expected)
        })
        .await;
        match polled {
            Ok(()) => Ok(()),
            Err(NavegarError::Timeout { ms }) => {
                let last = self.page.count(self.locator).await?;
                Err(self.failure(&format!("to have count {expected}"), ms, &last.to_string()))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[cfg(not(feature = "browser"))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::browser::Page;
    use crate::config::HarnessConfig;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn handle() -> PageHandle {
        let config = Arc::new(
            HarnessConfig::new()
                .with_action_timeout_ms(100)
                .with_poll_interval_ms(5),
        );
        PageHandle::new(Page::default(), config)
    }

    #[tokio::test]
    async fn test_visible_passes_immediately() {
        let page = handle();
        page.page().add_heading("Dashboard");

        let heading = page.by_role("heading", "Dashboard");
        expect(&page, &heading).to_be_visible().await.unwrap();
    }

    #[tokio::test]
    async fn test_visible_passes_once_revealed() {
        let page = handle();
        page.page().add_hidden_heading("Dashboard");

        let engine = page.page().clone();
        let reveal = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            engine.set_visible("Dashboard", true);
        });

        let heading = page.by_role("heading", "Dashboard");
        expect(&page, &heading).to_be_visible().await.unwrap();
        reveal.await.unwrap();
    }

    #[tokio::test]
    async fn test_visible_fails_within_bounded_time() {
        let page = handle();
        let heading = page.by_role("heading", "Dashboard");
        let started = Instant::now();

        let result = expect(&page, &heading).to_be_visible().await;

        match result {
            Err(NavegarError::AssertionError { message }) => {
                assert!(message.contains("to be visible"));
                assert!(message.contains("hidden or absent"));
            }
            other => panic!("expected AssertionError, got {other:?}"),
        }
        // Polls for the configured 100ms, then reports; never hangs
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_hidden_assertion() {
        let page = handle();
        page.page().add_hidden_heading("Spinner");

        let spinner = page.by_role("heading", "Spinner");
        expect(&page, &spinner).to_be_hidden().await.unwrap();
    }

    #[tokio::test]
    async fn test_have_text_reports_last_observed() {
        let page = handle();
        page.page().add_heading("Welcome");

        let heading = page.by_role("heading", "Welcome");
        let result = expect(&page, &heading).to_have_text("Dashboard").await;

        match result {
            Err(NavegarError::AssertionError { message }) => {
                assert!(message.contains("\"Dashboard\""));
                assert!(message.contains("\"Welcome\""));
            }
            other => panic!("expected AssertionError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_contain_text_passes() {
        let page = handle();
        page.page().add_heading("Dashboard overview");

        let heading = page.by_role("heading", "Dashboard overview");
        expect(&page, &heading)
            .to_contain_text("Dashboard")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_have_count() {
        let page = handle();
        page.page().add_button("Log in");

        let buttons = page.by_role("button", "Log in");
        expect(&page, &buttons).to_have_count(1).await.unwrap();

        let result = expect(&page, &buttons).to_have_count(2).await;
        match result {
            Err(NavegarError::AssertionError { message }) => {
                assert!(message.contains("to have count 2"));
                assert!(message.contains("last observed: 1"));
            }
            other => panic!("expected AssertionError, got {other:?}"),
        }
    }
}
