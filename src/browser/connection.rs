use chromiumoxide::{Browser, Handler};
use tracing::{debug, error, info};

use crate::error::AppResult;

/// Attach to a browser already running with remote debugging enabled
pub async fn connect_to_browser(port: u16) -> AppResult<(Browser, Handler)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("Connecting to browser: {}", browser_url);

    let (browser, handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("Failed to connect to browser: {}", e);
        e
    })?;
    debug!("Browser connected");

    Ok((browser, handler))
}
