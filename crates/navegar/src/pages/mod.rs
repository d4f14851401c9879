//! Page objects: one type per screen, wrapping a page handle and its
//! locators so specs never touch raw selectors.
//!
//! A page object *holds* a [`PageHandle`] (composition, not inheritance)
//! and computes its locators once at construction. Construction is pure
//! description; the first live interaction happens inside an operation.

use std::sync::Arc;

use crate::fixture::FixtureRegistry;
use crate::page::PageHandle;

mod login;

pub use login::LoginPage;

/// Trait for page objects representing one screen or flow.
pub trait PageObject {
    /// URL path this page lives at (e.g. "/login")
    fn url_path(&self) -> &str;

    /// The page handle this object drives
    fn handle(&self) -> &PageHandle;

    /// Page name for logging/debugging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Registry wiring every page object this crate ships.
///
/// The analog of a fixture-extension file: specs build a `TestContext` over
/// this and request page objects by name. Growing the system means one more
/// `register` call here.
#[must_use]
pub fn standard_fixtures() -> Arc<FixtureRegistry> {
    let mut registry = FixtureRegistry::new();
    registry.register("login_page", LoginPage::new);
    Arc::new(registry)
}
