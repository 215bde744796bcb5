//! Browser abstraction used by the consent step and the extractor.
//!
//! The extractor only needs a handful of WebDriver primitives: navigate,
//! wait until an element satisfies a condition, look up children, and read
//! text or attributes. They are expressed as two traits so the production
//! adapter ([`webdriver::WebDriverBrowser`], backed by `thirtyfour`) and the
//! in-memory fake used by the tests are interchangeable.
//!
//! # Conditions
//!
//! | Condition | Meaning |
//! |-----------|---------|
//! | [`Condition::Present`] | element exists in the DOM |
//! | [`Condition::Visible`] | element exists and is displayed |
//! | [`Condition::Clickable`] | element is displayed and enabled |

pub mod webdriver;

#[cfg(test)]
pub mod mock;

use std::fmt;
use std::time::Duration;

/// How an element is located on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locator {
    Css(&'static str),
    Id(&'static str),
    Tag(&'static str),
    XPath(&'static str),
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css={s}"),
            Locator::Id(s) => write!(f, "id={s}"),
            Locator::Tag(s) => write!(f, "tag={s}"),
            Locator::XPath(s) => write!(f, "xpath={s}"),
        }
    }
}

/// State an element must reach before a wait succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Present,
    Visible,
    Clickable,
}

/// A page-level browser handle.
///
/// Every call is awaited to completion before the next is issued; nothing in
/// the crate drives a session from more than one place at a time.
pub trait Browser {
    type Element: PageElement;

    /// Load `url` in the current window.
    async fn goto(&self, url: &str) -> Result<(), BrowserError>;

    /// Poll for the first element matching `locator` until it satisfies
    /// `condition`, giving up after `timeout`.
    async fn wait_for(
        &self,
        locator: &Locator,
        condition: Condition,
        timeout: Duration,
    ) -> Result<Self::Element, BrowserError>;
}

/// An element handle returned by a [`Browser`].
pub trait PageElement: Sized {
    /// First descendant matching `locator`.
    async fn find(&self, locator: &Locator) -> Result<Self, BrowserError>;

    /// All descendants matching `locator`, in document order.
    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self>, BrowserError>;

    /// Attribute (or reflected property) value, `None` when absent.
    async fn attr(&self, name: &str) -> Result<Option<String>, BrowserError>;

    /// Rendered text.
    async fn text(&self) -> Result<String, BrowserError>;

    async fn click(&self) -> Result<(), BrowserError>;
}

/// Errors that can occur during browser operations
#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Timed out after {timeout:?} waiting for {locator} to be {condition:?}")]
    Timeout {
        locator: Locator,
        condition: Condition,
        timeout: Duration,
    },

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Attribute '{attr}' missing on {locator}")]
    MissingAttribute { locator: Locator, attr: &'static str },

    #[error("Interaction failed: {0}")]
    Interaction(String),

    #[error("WebDriver error: {0}")]
    Driver(String),
}
