//! Batch track processor - orchestration layer
//!
//! ## Responsibilities
//!
//! Entry point of the application; owns the browser and the run:
//!
//! 1. **Initialization**: logging banner, browser session
//! 2. **Scheduling**: one task per track, at most `max_concurrent_tracks`
//!    running at once (Semaphore), each on its own page
//! 3. **Run deadline**: tracks still running when it passes are reported
//!    unavailable, finished tracks are kept
//! 4. **Aggregation**: results are fed to the `Aggregator` as they complete
//! 5. **Handoff**: the dataset goes to the JSON export and the final summary

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant as StdInstant;

use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use tokio::time::{sleep, timeout_at, Instant};
use tracing::{error, info, warn};

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::error::{AppResult, TrackError};
use crate::export::write_dataset_json;
use crate::infrastructure::SpeakerPage;
use crate::models::{Dataset, Track, TrackHarvest};
use crate::orchestrator::aggregator::Aggregator;
use crate::orchestrator::track_processor::process_track;
use crate::utils::logging;
use crate::workflow::CardFlow;

/// Hands out one independent page per track
pub trait PageSource: Send + Sync + 'static {
    type Page: SpeakerPage + 'static;

    fn open_page(&self) -> impl Future<Output = Result<Self::Page>> + Send;

    /// Give a page back once its track is done
    fn release(&self, page: Self::Page) -> impl Future<Output = ()> + Send {
        async move { drop(page) }
    }
}

/// Application
pub struct App {
    config: Arc<Config>,
    session: Arc<BrowserSession>,
}

impl App {
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::log_startup(&config);
        let session = BrowserSession::start(&config).await?;
        Ok(Self {
            config: Arc::new(config),
            session: Arc::new(session),
        })
    }

    /// Scrape all tracks, export, summarize
    pub async fn run(self) -> Result<Dataset> {
        let started = StdInstant::now();

        let dataset = harvest_tracks(self.session.clone(), self.config.clone()).await;

        match Arc::try_unwrap(self.session) {
            Ok(session) => session.shutdown().await,
            Err(_) => warn!("⚠️ Browser session still in use, leaving it open"),
        }

        if dataset.total_records() == 0 {
            error!("❌ No data extracted");
        }
        if let Some(path) = export_dataset(&dataset, &self.config)? {
            info!("✓ Saved JSON: {}", path.display());
        }

        logging::print_run_summary(&dataset, self.config.tracks.len(), started.elapsed());
        Ok(dataset)
    }
}

/// Write the JSON export whenever any track reported back, records or not,
/// so a failed run still shows where data went missing
pub fn export_dataset(dataset: &Dataset, config: &Config) -> AppResult<Option<PathBuf>> {
    if dataset.sections.is_empty() && dataset.unavailable.is_empty() {
        return Ok(None);
    }
    write_dataset_json(dataset, config).map(Some)
}

/// Run every configured track and merge the results
///
/// Never fails as a whole: tracks that could not be scraped are listed in
/// `Dataset::unavailable`.
pub async fn harvest_tracks<S: PageSource>(source: Arc<S>, config: Arc<Config>) -> Dataset {
    let semaphore = Arc::new(Semaphore::new(config.max_concurrent_tracks));
    let deadline = Instant::now() + config.run_timeout();
    let mut aggregator = Aggregator::new(&config.tracks);

    let mut pending: FuturesUnordered<_> = config
        .tracks
        .iter()
        .cloned()
        .map(|track| {
            let handle = tokio::spawn(run_track(
                source.clone(),
                config.clone(),
                semaphore.clone(),
                track.clone(),
                deadline,
            ));
            async move { (track, handle.await) }
        })
        .collect();

    while let Some((track, joined)) = pending.next().await {
        match joined {
            Ok(Ok(harvest)) => aggregator.accept(harvest),
            Ok(Err(e)) => {
                error!("[{}] ❌ {}", track.id, e);
                aggregator.mark_unavailable(&e);
            }
            Err(e) => {
                error!("[{}] ❌ Track task failed: {}", track.id, e);
                aggregator.mark_unavailable(&TrackError::unavailable(&track.id, format!("task failed: {}", e)));
            }
        }
    }

    aggregator.finish()
}

/// One track from permit to released page, bounded by the run deadline
async fn run_track<S: PageSource>(
    source: Arc<S>,
    config: Arc<Config>,
    semaphore: Arc<Semaphore>,
    track: Track,
    deadline: Instant,
) -> Result<TrackHarvest, TrackError> {
    let work = async {
        let _permit = semaphore
            .acquire_owned()
            .await
            .map_err(|e| TrackError::unavailable(&track.id, format!("scheduler closed: {}", e)))?;

        let page = source
            .open_page()
            .await
            .map_err(|e| TrackError::unavailable(&track.id, format!("could not open page: {}", e)))?;

        let flow = CardFlow::new(&config);
        let result = process_track(&page, &track, &flow, &config).await;
        source.release(page).await;

        // be gentle with the site before the permit frees up
        sleep(config.track_pause()).await;
        result
    };

    match timeout_at(deadline, work).await {
        Ok(result) => result,
        Err(_) => Err(TrackError::unavailable(
            &track.id,
            format!("run timeout ({}s) reached", config.run_timeout_secs),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UnavailableTrack;

    fn config_in(dir: &tempfile::TempDir) -> Config {
        Config {
            output_dir: dir.path().display().to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_failed_run_still_exported() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = Dataset {
            sections: Vec::new(),
            unavailable: vec![UnavailableTrack {
                track: Track::new("AI", "AI", "/speakers/ai"),
                reason: "card list did not render within 10000ms".to_string(),
            }],
        };

        let path = export_dataset(&dataset, &config_in(&dir)).unwrap().unwrap();
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written["metadata"]["total_speakers"], 0);
        assert_eq!(written["unavailable_tracks"][0]["track"], "AI");
    }

    #[test]
    fn test_nothing_to_export() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(export_dataset(&Dataset::default(), &config_in(&dir)).unwrap(), None);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
