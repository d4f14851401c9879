//! Login page object.

use crate::locator::Locator;
use crate::page::PageHandle;
use crate::pages::PageObject;
use crate::result::NavegarResult;

/// The login form: email and password inputs plus a submit button, located
/// by their user-facing handles.
#[derive(Debug, Clone)]
pub struct LoginPage {
    page: PageHandle,
    email_input: Locator,
    password_input: Locator,
    submit_button: Locator,
}

impl LoginPage {
    /// URL path of the login screen
    pub const PATH: &'static str = "/login";

    /// Describe the login form's locators over a page handle.
    ///
    /// Pure description: nothing touches the live page until `open` or
    /// `do_login`.
    #[must_use]
    pub fn new(page: &PageHandle) -> Self {
        Self {
            email_input: page.by_label("E-mail"),
            password_input: page.by_label("Password"),
            submit_button: page.by_role("button", "Log in"),
            page: page.clone(),
        }
    }

    /// Navigate to the login screen.
    ///
    /// # Errors
    ///
    /// Navigation failures propagate unmodified.
    pub async fn open(&self) -> NavegarResult<()> {
        self.page.navigate(Self::PATH).await
    }

    /// Fill the email and password fields and activate the submit button,
    /// in that order.
    ///
    /// Each step suspends until the element is actionable; the first
    /// failure aborts the remainder and propagates. No assertion is made
    /// about the resulting page state; that belongs to the calling test.
    ///
    /// # Errors
    ///
    /// Locator-resolution and actionability failures propagate unmodified.
    pub async fn do_login(&self, email: &str, password: &str) -> NavegarResult<()> {
        tracing::debug!(email, "submitting login form");
        self.page.fill(&self.email_input, email).await?;
        self.page.fill(&self.password_input, password).await?;
        self.page.click(&self.submit_button).await
    }
}

impl PageObject for LoginPage {
    fn url_path(&self) -> &str {
        Self::PATH
    }

    fn handle(&self) -> &PageHandle {
        &self.page
    }
}
