//! Environment bootstrap: everything that has to happen once before the
//! first channel is checked.
//!
//! 1. [`driver::resolve_driver_binary`] finds or downloads geckodriver
//! 2. [`session::Session::start`] spawns it and opens a headless Firefox session
//! 3. [`consent::dismiss_consent`] clicks through the cookie interstitial
//!
//! Failures in the first two steps are fatal for the run. The consent step
//! never fails.

pub mod consent;
pub mod driver;
pub mod session;

/// Errors that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("driver download failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("{0} not found in archive")]
    MissingEntry(String),

    #[error("driver did not start: {0}")]
    DriverStart(String),

    #[error("WebDriver session could not be created: {0}")]
    Session(#[from] thirtyfour::error::WebDriverError),
}
