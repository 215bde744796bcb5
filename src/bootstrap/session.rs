//! Driver process and WebDriver session lifecycle.

use super::BootstrapError;
use super::driver::DriverBinary;
use crate::browser::webdriver::WebDriverBrowser;
use crate::config;
use futures::FutureExt;
use std::net::{Ipv4Addr, SocketAddr, TcpListener};
use std::panic::AssertUnwindSafe;
use std::process::Stdio;
use std::time::{Duration, Instant};
use thirtyfour::common::capabilities::firefox::{FirefoxCapabilities, FirefoxPreferences};
use thirtyfour::prelude::*;
use tokio::net::TcpStream;
use tokio::process::{Child, Command};
use tracing::{info, instrument, warn};

/// A headless Firefox session and the geckodriver serving it.
///
/// The driver process is killed when the session is dropped, so a session
/// that failed half-way through [`Session::start`] leaves nothing behind.
pub struct Session {
    browser: WebDriverBrowser,
    driver: Child,
}

impl Session {
    /// Spawn geckodriver on a free loopback port and open a headless session.
    #[instrument(level = "info", skip_all, fields(program = %binary.program().display()))]
    pub async fn start(binary: &DriverBinary) -> Result<Self, BootstrapError> {
        let port = free_port()?;
        let mut driver = Command::new(binary.program())
            .arg("--port")
            .arg(port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        wait_until_listening(&mut driver, port, config::DRIVER_START_TIMEOUT).await?;
        info!(port, "geckodriver is listening");

        let webdriver = WebDriver::new(format!("http://127.0.0.1:{port}"), capabilities()?).await?;
        info!("Headless Firefox session started");

        Ok(Self {
            browser: WebDriverBrowser::new(webdriver),
            driver,
        })
    }

    pub fn browser(&self) -> &WebDriverBrowser {
        &self.browser
    }

    /// End the browser session and stop the driver. Failures are logged only.
    pub async fn quit(self) {
        info!("Quitting webdriver");
        let Session { browser, mut driver } = self;
        if let Err(e) = browser.quit().await {
            warn!(error = %e, "Failed to end WebDriver session cleanly");
        }
        if let Err(e) = driver.kill().await {
            warn!(error = %e, "Failed to stop geckodriver");
        }
    }
}

/// Headless Firefox pinned to [`config::BROWSER_LOCALE`], so listing pages
/// render publish times in the language the date parser reads.
fn capabilities() -> WebDriverResult<FirefoxCapabilities> {
    let mut prefs = FirefoxPreferences::new();
    prefs.set("intl.accept_languages", config::BROWSER_LOCALE)?;
    prefs.set("intl.locale.requested", config::BROWSER_LOCALE)?;

    let mut caps = DesiredCapabilities::firefox();
    caps.set_headless()?;
    caps.set_preferences(prefs)?;
    Ok(caps)
}

/// Run `work` against `resource`, then hand `resource` to `release`.
///
/// `release` runs even if `work` panics; the panic is resumed afterwards.
pub async fn run_then_release<S, T>(
    resource: S,
    work: impl AsyncFnOnce(&S) -> T,
    release: impl AsyncFnOnce(S),
) -> T {
    let outcome = AssertUnwindSafe(work(&resource)).catch_unwind().await;
    release(resource).await;
    match outcome {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

/// Ask the OS for an unused loopback port.
fn free_port() -> std::io::Result<u16> {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?;
    Ok(listener.local_addr()?.port())
}

async fn wait_until_listening(
    driver: &mut Child,
    port: u16,
    timeout: Duration,
) -> Result<(), BootstrapError> {
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    let start = Instant::now();
    loop {
        if TcpStream::connect(addr).await.is_ok() {
            return Ok(());
        }
        if let Some(status) = driver.try_wait()? {
            return Err(BootstrapError::DriverStart(format!(
                "exited early with {status}"
            )));
        }
        if start.elapsed() > timeout {
            return Err(BootstrapError::DriverStart(format!(
                "not listening on port {port} after {timeout:?}"
            )));
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}
