use anyhow::Result;
use speaker_scrape::utils::logging;
use speaker_scrape::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load config
    let config = Config::load()?;

    // Logging
    logging::init(config.verbose_logging);

    // Initialize and run
    App::initialize(config).await?.run().await?;

    Ok(())
}
