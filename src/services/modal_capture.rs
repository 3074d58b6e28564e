//! Modal capture driver - service layer
//!
//! Captures one card's raw fields through its modal. Three phases, each with
//! its own timeout:
//!
//! 1. open-wait: click the card, wait for modal content
//! 2. extract: read the slots of the populated modal
//! 3. close-wait: dismiss, wait for the card list to be interactive again
//!
//! Only the open-wait phase is retried.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::CaptureError;
use crate::infrastructure::{ModalProbe, SpeakerPage};
use crate::models::{RawSpeakerFields, SpeakerCardRef};
use crate::services::record_builder::clean_text;
use crate::utils::wait::poll_until;
use crate::workflow::CardCtx;

/// Bounded retry with linear backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first one included
    pub max_attempts: u32,
    /// Backoff unit
    pub backoff: Duration,
}

impl RetryPolicy {
    /// `retries` extra attempts after the first
    pub fn new(retries: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: retries + 1,
            backoff,
        }
    }

    /// Delay before the attempt following `failed_attempt` (1-based)
    pub fn delay(&self, failed_attempt: u32) -> Duration {
        self.backoff * failed_attempt
    }

    pub fn should_retry(&self, failed_attempt: u32) -> bool {
        failed_attempt < self.max_attempts
    }
}

/// Per-phase timeouts of the capture protocol
#[derive(Debug, Clone, Copy)]
pub struct CaptureTimeouts {
    pub modal_open: Duration,
    pub modal_close: Duration,
    pub card_list: Duration,
    pub poll_interval: Duration,
}

impl CaptureTimeouts {
    pub fn from_config(config: &Config) -> Self {
        Self {
            modal_open: config.modal_timeout(),
            modal_close: config.modal_close_timeout(),
            card_list: config.card_list_timeout(),
            poll_interval: config.poll_interval(),
        }
    }
}

/// Why an open-wait attempt ended without content
enum OpenFailure {
    TimedOut,
    Browser(anyhow::Error),
}

/// Modal capture driver
///
/// Stateless between cards; the page is the only session state.
pub struct ModalCaptureDriver {
    retry: RetryPolicy,
    timeouts: CaptureTimeouts,
}

impl ModalCaptureDriver {
    pub fn new(config: &Config) -> Self {
        Self::with_policy(
            RetryPolicy::new(config.modal_retries, Duration::from_millis(config.retry_backoff_ms)),
            CaptureTimeouts::from_config(config),
        )
    }

    pub fn with_policy(retry: RetryPolicy, timeouts: CaptureTimeouts) -> Self {
        Self { retry, timeouts }
    }

    /// Capture one card
    ///
    /// The modal is always closed before returning, success or not.
    pub async fn capture<P: SpeakerPage>(
        &self,
        page: &P,
        card: &SpeakerCardRef,
        ctx: &CardCtx,
    ) -> Result<RawSpeakerFields, CaptureError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let opened = self.open_and_wait(page, card).await;
            self.close_and_settle(page, ctx).await;

            match opened {
                Ok(fields) => return self.extract(fields, card),
                Err(OpenFailure::Browser(e)) => return Err(CaptureError::interaction(e)),
                Err(OpenFailure::TimedOut) if self.retry.should_retry(attempt) => {
                    let delay = self.retry.delay(attempt);
                    warn!(
                        "{} ⏳ Modal not rendered (attempt {}/{}), retrying in {:?}",
                        ctx, attempt, self.retry.max_attempts, delay
                    );
                    sleep(delay).await;
                }
                Err(OpenFailure::TimedOut) => {
                    return Err(CaptureError::ModalTimeout {
                        attempts: attempt,
                        timeout_ms: self.timeouts.modal_open.as_millis() as u64,
                    })
                }
            }
        }
    }

    /// Phase 1: click, then wait for populated content
    async fn open_and_wait<P: SpeakerPage>(
        &self,
        page: &P,
        card: &SpeakerCardRef,
    ) -> Result<RawSpeakerFields, OpenFailure> {
        page.open_card(card).await.map_err(OpenFailure::Browser)?;

        let expected = card
            .summary_name
            .as_deref()
            .map(clean_text)
            .filter(|n| !n.is_empty())
            .map(|n| n.to_lowercase());
        let expected = expected.as_deref();

        let found = poll_until(self.timeouts.modal_open, self.timeouts.poll_interval, move || {
            probe_populated(page, expected)
        })
        .await
        .map_err(OpenFailure::Browser)?;

        found.ok_or(OpenFailure::TimedOut)
    }

    /// Phase 2: the name slot must hold text
    fn extract(
        &self,
        mut fields: RawSpeakerFields,
        card: &SpeakerCardRef,
    ) -> Result<RawSpeakerFields, CaptureError> {
        let readable = fields
            .name
            .as_deref()
            .is_some_and(|name| !clean_text(name).is_empty());
        if !readable {
            return Err(CaptureError::ExtractionIncomplete);
        }

        if fields.image_url.as_deref().map_or(true, |src| src.trim().is_empty()) {
            fields.image_url = card.summary_image.clone();
        }
        Ok(fields)
    }

    /// Phase 3: dismiss and wait for the card list; reload the track page when
    /// the modal will not go away
    async fn close_and_settle<P: SpeakerPage>(&self, page: &P, ctx: &CardCtx) {
        if let Err(e) = page.close_modal().await {
            debug!("{} Dismiss failed: {}", ctx, e);
        }

        if self.wait_interactive(page, self.timeouts.modal_close).await {
            return;
        }

        warn!("{} ⚠️ Modal did not close, reloading track page", ctx);
        if let Err(e) = page.goto(&ctx.track_url).await {
            warn!("{} ⚠️ Reload failed: {}", ctx, e);
            return;
        }
        if !self.wait_interactive(page, self.timeouts.card_list).await {
            warn!("{} ⚠️ Card list did not come back after reload", ctx);
        }
    }

    async fn wait_interactive<P: SpeakerPage>(&self, page: &P, timeout: Duration) -> bool {
        let settled = poll_until(timeout, self.timeouts.poll_interval, move || probe_interactive(page)).await;
        matches!(settled, Ok(Some(())))
    }
}

async fn probe_populated<P: SpeakerPage>(
    page: &P,
    expected: Option<&str>,
) -> anyhow::Result<Option<RawSpeakerFields>> {
    match page.probe_modal().await? {
        ModalProbe::Ready(fields) if is_stale(&fields, expected) => {
            debug!("Modal still shows the previous speaker");
            Ok(None)
        }
        ModalProbe::Ready(fields) => Ok(Some(fields)),
        ModalProbe::Closed | ModalProbe::Rendering => Ok(None),
    }
}

async fn probe_interactive<P: SpeakerPage>(page: &P) -> anyhow::Result<Option<()>> {
    Ok(page.cards_interactive().await?.then_some(()))
}

/// A populated modal whose name is not the clicked card's
fn is_stale(fields: &RawSpeakerFields, expected: Option<&str>) -> bool {
    let (Some(expected), Some(name)) = (expected, fields.name.as_deref()) else {
        return false;
    };
    let name = clean_text(name).to_lowercase();
    !name.is_empty() && name != expected
}
