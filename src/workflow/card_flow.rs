//! Card flow - workflow layer
//!
//! The full lifecycle of one card:
//! capture modal → build record → outcome
//!
//! Every failure ends up as a `CardOutcome`; nothing escapes to the track.

use tracing::{debug, warn};

use crate::config::Config;
use crate::infrastructure::SpeakerPage;
use crate::models::{CardOutcome, SpeakerCardRef, Track};
use crate::services::{build_record, ModalCaptureDriver};
use crate::workflow::card_ctx::CardCtx;

/// Card flow
///
/// Holds no page; borrows one per run
pub struct CardFlow {
    driver: ModalCaptureDriver,
}

impl CardFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            driver: ModalCaptureDriver::new(config),
        }
    }

    pub async fn run<P: SpeakerPage>(
        &self,
        page: &P,
        track: &Track,
        card: &SpeakerCardRef,
        ctx: &CardCtx,
    ) -> CardOutcome {
        let raw = match self.driver.capture(page, card, ctx).await {
            Ok(raw) => raw,
            Err(error) => {
                warn!("{} ❌ Skipped: {}", ctx, error);
                return CardOutcome::Failed {
                    index: card.index,
                    error,
                };
            }
        };

        match build_record(&raw, track, card.index) {
            Ok(record) => {
                debug!(
                    "{} ✓ {} | X:{} IG:{} LI:{}",
                    ctx,
                    record.name,
                    record.x_handle.is_some(),
                    record.instagram_handle.is_some(),
                    record.linkedin_handle.is_some()
                );
                CardOutcome::Captured(record)
            }
            Err(reason) => {
                debug!("{} Discarded: {}", ctx, reason);
                CardOutcome::Discarded {
                    index: card.index,
                    reason,
                }
            }
        }
    }
}
