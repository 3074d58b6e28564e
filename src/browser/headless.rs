use std::path::Path;

use chromiumoxide::{Browser, BrowserConfig, Handler};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Launch a fresh browser
pub async fn launch_browser(config: &Config) -> AppResult<(Browser, Handler)> {
    info!("🚀 Launching browser (headless: {})...", config.headless);

    let mut builder = BrowserConfig::builder()
        .window_size(1920, 1080)
        .args(vec![
            "--disable-gpu",           // required for headless on Windows
            "--no-sandbox",            // sandbox permission issues crash containers
            "--disable-dev-shm-usage", // small /dev/shm
        ]);
    builder = if config.headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };
    if let Some(executable) = &config.chrome_executable {
        debug!("Browser executable: {}", executable);
        builder = builder.chrome_executable(Path::new(executable));
    }

    let browser_config = builder.build().map_err(|e| {
        error!("Invalid browser configuration: {}", e);
        AppError::Browser(format!("invalid browser configuration: {}", e))
    })?;

    let (browser, handler) = Browser::launch(browser_config).await.map_err(|e| {
        error!("Failed to launch browser: {}", e);
        AppError::Browser(format!("failed to launch browser: {}", e))
    })?;
    debug!("Browser launched");

    Ok((browser, handler))
}
