//! Driver layer for browser automation.
//!
//! The scraping pipeline talks to a browser only through the traits in
//! [`browser`], so it can run against a real WebDriver session or an
//! in-memory fake.
//!
//! - [`browser::BrowserLauncher`]: opens one isolated session
//! - [`browser::BrowserSession`]: navigation, element text/links, clicks and bounded waits
//! - [`browser::driver::FantocciniLauncher`]: WebDriver-backed launcher
//! - [`browser::launch`]: Chrome capabilities built from configuration
pub mod browser;

pub use browser::{BrowserLauncher, BrowserSession, WaitOutcome};
