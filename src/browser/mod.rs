//! Browser session
//!
//! Starts or attaches to a browser and hands out one page per track

mod connection;
mod headless;

pub use connection::connect_to_browser;
pub use headless::launch_browser;

use std::time::Duration;

use anyhow::Result;
use chromiumoxide::Browser;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::JsExecutor;
use crate::orchestrator::PageSource;

pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    /// We started the browser, so we stop it
    owned: bool,
}

impl BrowserSession {
    pub async fn start(config: &Config) -> AppResult<Self> {
        let (browser, mut handler, owned) = match config.browser_debug_port {
            Some(port) => {
                let (browser, handler) = connect_to_browser(port).await?;
                (browser, handler, false)
            }
            None => {
                let (browser, handler) = launch_browser(config).await?;
                (browser, handler, true)
            }
        };

        // drive browser events in the background
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        // let the browser state settle
        sleep(Duration::from_millis(300)).await;

        Ok(Self {
            browser,
            handler_task,
            owned,
        })
    }

    pub async fn shutdown(mut self) {
        if self.owned {
            if let Err(e) = self.browser.close().await {
                warn!("⚠️ Browser close failed: {}", e);
            }
            if let Err(e) = self.browser.wait().await {
                warn!("⚠️ Browser exit wait failed: {}", e);
            }
        }
        self.handler_task.abort();
        debug!("Browser session closed");
    }
}

impl PageSource for BrowserSession {
    type Page = JsExecutor;

    async fn open_page(&self) -> Result<JsExecutor> {
        let page = self.browser.new_page("about:blank").await?;
        Ok(JsExecutor::new(page))
    }

    async fn release(&self, page: JsExecutor) {
        if let Err(e) = page.into_page().close().await {
            debug!("Page close failed: {}", e);
        }
    }
}
