//! Track processor - orchestration layer
//!
//! ## Responsibilities
//!
//! Traverses one track on one page:
//!
//! 1. **Navigate** to the track URL
//! 2. **Wait** for the card list to render (track-fatal on timeout) and to
//!    stop growing, since the grid arrives in batches
//! 3. **Enumerate** cards in DOM order
//! 4. **Capture** each card through `CardFlow`, strictly one at a time
//!
//! Two modals on one page is undefined behavior on the site, hence no
//! concurrency inside a track. A failing card never stops the track.

use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::TrackError;
use crate::infrastructure::SpeakerPage;
use crate::models::{CardOutcome, HandleCoverage, SpeakerCardRef, Track, TrackHarvest};
use crate::utils::logging;
use crate::utils::wait::poll_until;
use crate::workflow::{CardCtx, CardFlow};

/// Traverse one track
///
/// # Returns
/// One entry per card, in card order; `TrackError::Unavailable` when the
/// page or its card list never shows up
pub async fn process_track<P: SpeakerPage>(
    page: &P,
    track: &Track,
    flow: &CardFlow,
    config: &Config,
) -> Result<TrackHarvest, TrackError> {
    let url = track.url(&config.base_url);
    logging::log_track_start(track, &url);

    page.goto(&url)
        .await
        .map_err(|e| TrackError::unavailable(&track.id, format!("navigation to {} failed: {}", url, e)))?;

    let cards = wait_for_cards(page, config)
        .await
        .map_err(|e| TrackError::unavailable(&track.id, format!("card list probe failed: {}", e)))?
        .ok_or_else(|| {
            TrackError::unavailable(
                &track.id,
                format!("card list did not render within {}ms", config.card_list_timeout_ms),
            )
        })?;

    if let Err(e) = page.dismiss_cookie_banner().await {
        warn!("[{}] ⚠️ Cookie banner check failed: {}", track.id, e);
    }

    info!("[{}] Found {} speakers (extracting in page order)", track.id, cards.len());

    let total = cards.len();
    let mut entries = Vec::with_capacity(total);
    for card in &cards {
        let ctx = CardCtx::new(track, url.as_str(), card.index, total);
        entries.push(flow.run(page, track, card, &ctx).await);
    }

    let harvest = TrackHarvest {
        track: track.clone(),
        entries,
    };
    log_harvest(&harvest);
    Ok(harvest)
}

/// Wait for the first cards, then until the count holds still for the
/// settle window; both within the card list timeout
async fn wait_for_cards<P: SpeakerPage>(
    page: &P,
    config: &Config,
) -> anyhow::Result<Option<Vec<SpeakerCardRef>>> {
    let deadline = Instant::now() + config.card_list_timeout();
    let first = poll_until(config.card_list_timeout(), config.poll_interval(), move || list_rendered_cards(page)).await?;
    let Some(mut cards) = first else {
        return Ok(None);
    };

    let mut stable_since = Instant::now();
    loop {
        let now = Instant::now();
        if now >= deadline || now.duration_since(stable_since) >= config.card_settle() {
            break;
        }
        sleep_until((now + config.poll_interval()).min(deadline)).await;

        if let Some(latest) = list_rendered_cards(page).await? {
            if latest.len() != cards.len() {
                debug!("Card list changed {} -> {}", cards.len(), latest.len());
                cards = latest;
                stable_since = Instant::now();
            }
        }
    }

    Ok(Some(cards))
}

async fn list_rendered_cards<P: SpeakerPage>(page: &P) -> anyhow::Result<Option<Vec<SpeakerCardRef>>> {
    let mut cards = page.list_cards().await?;
    if cards.is_empty() {
        return Ok(None);
    }
    // indices follow DOM order, whatever the page reported
    for (index, card) in cards.iter_mut().enumerate() {
        card.index = index;
    }
    Ok(Some(cards))
}

fn log_harvest(harvest: &TrackHarvest) {
    let captured: Vec<_> = harvest
        .entries
        .iter()
        .filter_map(|entry| match entry {
            CardOutcome::Captured(record) => Some(record),
            _ => None,
        })
        .collect();
    let failed = harvest
        .entries
        .iter()
        .filter(|e| matches!(e, CardOutcome::Failed { .. }))
        .count();

    if let Some(first) = captured.first() {
        info!("[{}] First speaker: {}", harvest.track.id, first.name);
    }
    logging::log_track_complete(
        &harvest.track,
        harvest.entries.len(),
        captured.len(),
        failed,
        HandleCoverage::of(captured.iter().copied()),
    );
}
