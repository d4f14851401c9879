//! Navegar: page-object end-to-end testing for browser UIs
//!
//! Navegar (Spanish: "to navigate/browse") layers a page-object model over
//! a driven browser page: accessibility-first locators, composite page
//! actions, per-test fixture injection, and web-first (polling) assertions.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     NAVEGAR Architecture                          │
//! ├──────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌─────────────┐    ┌──────────────┐          │
//! │   │ Test Spec  │───►│ TestContext │───►│ Page Object  │          │
//! │   │ (Rust)     │    │ (fixtures)  │    │ (locators +  │          │
//! │   │            │    │             │    │  actions)    │          │
//! │   └────────────┘    └─────────────┘    └──────┬───────┘          │
//! │                                               ▼                   │
//! │                     ┌─────────────┐    ┌──────────────┐          │
//! │                     │ expect()    │───►│ PageHandle → │          │
//! │                     │ (polling)   │    │ browser page │          │
//! │                     └─────────────┘    └──────────────┘          │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! With the `browser` feature, pages are real Chromium tabs driven over
//! CDP; without it, a scriptable mock page backs unit and integration
//! tests.

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

mod assertion;
mod browser;
mod config;
mod fixture;
mod locator;
mod page;
/// Page objects shipped with the harness (login) and the trait they share.
pub mod pages;
mod result;
/// Wait mechanisms: polling options and the `poll_until` helper.
pub mod wait;

pub use assertion::{expect, Expect};
#[cfg(not(feature = "browser"))]
pub use browser::{ActionRecord, MockDom, MockElement, MockElementKind};
pub use browser::{launch_page, Browser, BrowserConfig, Page};
pub use config::HarnessConfig;
pub use fixture::{FixtureRegistry, TestContext};
pub use locator::{
    Locator, LocatorOptions, Selector, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS,
};
pub use page::PageHandle;
pub use pages::{standard_fixtures, LoginPage, PageObject};
pub use result::{NavegarError, NavegarResult};
