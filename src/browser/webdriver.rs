//! `thirtyfour` adapter for the [`Browser`] traits.

use super::{Browser, BrowserError, Condition, Locator, PageElement};
use std::time::Duration;
use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;
use tracing::{debug, instrument};

/// How often explicit waits re-check their condition.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

fn by(locator: &Locator) -> By {
    match *locator {
        Locator::Css(s) => By::Css(s),
        Locator::Id(s) => By::Id(s),
        Locator::Tag(s) => By::Tag(s),
        Locator::XPath(s) => By::XPath(s),
    }
}

fn driver_err(e: WebDriverError) -> BrowserError {
    BrowserError::Driver(e.to_string())
}

/// A live WebDriver session.
pub struct WebDriverBrowser {
    driver: WebDriver,
}

impl WebDriverBrowser {
    pub fn new(driver: WebDriver) -> Self {
        Self { driver }
    }

    /// End the remote session.
    pub async fn quit(self) -> Result<(), BrowserError> {
        self.driver.quit().await.map_err(driver_err)
    }
}

impl Browser for WebDriverBrowser {
    type Element = WebDriverElement;

    #[instrument(level = "debug", skip(self))]
    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        self.driver
            .goto(url)
            .await
            .map_err(|e| BrowserError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    #[instrument(level = "debug", skip(self), fields(%locator))]
    async fn wait_for(
        &self,
        locator: &Locator,
        condition: Condition,
        timeout: Duration,
    ) -> Result<WebDriverElement, BrowserError> {
        let query = self.driver.query(by(locator)).wait(timeout, POLL_INTERVAL);
        let query = match condition {
            Condition::Present => query,
            Condition::Visible => query.and_displayed(),
            Condition::Clickable => query.and_clickable(),
        };

        match query.first().await {
            Ok(element) => Ok(WebDriverElement(element)),
            Err(e) => {
                debug!(error = %e, "Element query gave up");
                Err(BrowserError::Timeout {
                    locator: *locator,
                    condition,
                    timeout,
                })
            }
        }
    }
}

/// Element handle within a [`WebDriverBrowser`] session.
pub struct WebDriverElement(WebElement);

impl PageElement for WebDriverElement {
    async fn find(&self, locator: &Locator) -> Result<Self, BrowserError> {
        self.0
            .find(by(locator))
            .await
            .map(WebDriverElement)
            .map_err(|e| BrowserError::ElementNotFound(format!("{locator}: {e}")))
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self>, BrowserError> {
        let elements = self.0.find_all(by(locator)).await.map_err(driver_err)?;
        Ok(elements.into_iter().map(WebDriverElement).collect())
    }

    /// Reflected property first, then the raw attribute. `href` comes back
    /// absolute this way.
    async fn attr(&self, name: &str) -> Result<Option<String>, BrowserError> {
        match self.0.prop(name).await.map_err(driver_err)? {
            Some(value) => Ok(Some(value)),
            None => self.0.attr(name).await.map_err(driver_err),
        }
    }

    async fn text(&self) -> Result<String, BrowserError> {
        self.0.text().await.map_err(driver_err)
    }

    async fn click(&self) -> Result<(), BrowserError> {
        self.0
            .click()
            .await
            .map_err(|e| BrowserError::Interaction(e.to_string()))
    }
}

