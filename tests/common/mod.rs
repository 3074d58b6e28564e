//! Scripted in-memory site for driving the scraper without a browser
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use speaker_scrape::models::{RawAnchor, RawSpeakerFields, SpeakerCardRef};
use speaker_scrape::{Config, ModalProbe, PageSource, SpeakerPage, Track};
use tokio::time::Instant;

pub const BASE_URL: &str = "https://conf.test";

/// How a card's modal behaves
#[derive(Debug, Clone)]
pub enum Script {
    Renders(RawSpeakerFields),
    NeverRenders,
    /// Content only shows up from this (1-based) attempt on
    RendersOnAttempt(u32, RawSpeakerFields),
    /// Name slot rendered but empty
    BlankName,
    /// Renders, then ignores every dismiss
    StuckOpen(RawSpeakerFields),
}

#[derive(Debug, Clone)]
pub struct FakeCard {
    pub summary_name: Option<String>,
    pub script: Script,
}

pub fn speaker(name: &str, hrefs: &[&str]) -> RawSpeakerFields {
    RawSpeakerFields {
        name: Some(name.to_string()),
        title: Some(format!("{} title", name)),
        image_url: Some(format!("https://cdn.conf.test/{}.png", name.replace(' ', "_"))),
        anchors: hrefs.iter().map(|h| RawAnchor::href(*h)).collect(),
    }
}

pub fn card(fields: RawSpeakerFields) -> FakeCard {
    FakeCard {
        summary_name: fields.name.clone(),
        script: Script::Renders(fields),
    }
}

pub fn scripted(name: &str, script: Script) -> FakeCard {
    FakeCard {
        summary_name: Some(name.to_string()),
        script,
    }
}

#[derive(Debug, Clone, Default)]
struct FakeTrackPage {
    /// `None`: the card list never renders
    cards: Option<Vec<FakeCard>>,
    load_delay: Duration,
    /// Appended to `cards` this long after the page loaded
    late_batch: Option<(Duration, Vec<FakeCard>)>,
}

/// All track pages of the fake site, keyed by URL
#[derive(Debug, Default)]
pub struct FakeSite {
    pages: HashMap<String, FakeTrackPage>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_track(mut self, track: &Track, cards: Vec<FakeCard>) -> Self {
        self.pages.insert(
            track.url(BASE_URL),
            FakeTrackPage {
                cards: Some(cards),
                ..Default::default()
            },
        );
        self
    }

    pub fn with_slow_track(mut self, track: &Track, cards: Vec<FakeCard>, delay: Duration) -> Self {
        self.pages.insert(
            track.url(BASE_URL),
            FakeTrackPage {
                cards: Some(cards),
                load_delay: delay,
                late_batch: None,
            },
        );
        self
    }

    /// Renders `first` on load and `later` once `after` has passed
    pub fn with_batched_track(mut self, track: &Track, first: Vec<FakeCard>, later: Vec<FakeCard>, after: Duration) -> Self {
        self.pages.insert(
            track.url(BASE_URL),
            FakeTrackPage {
                cards: Some(first),
                load_delay: Duration::ZERO,
                late_batch: Some((after, later)),
            },
        );
        self
    }

    pub fn with_empty_track(mut self, track: &Track) -> Self {
        self.pages.insert(track.url(BASE_URL), FakeTrackPage::default());
        self
    }
}

#[derive(Debug, Default)]
struct PageState {
    url: Option<String>,
    loaded_at: Option<Instant>,
    open: Option<usize>,
    attempts: HashMap<usize, u32>,
    reloads: usize,
}

/// One tab on the fake site
pub struct FakePage {
    site: Arc<FakeSite>,
    state: Mutex<PageState>,
}

impl FakePage {
    pub fn new(site: Arc<FakeSite>) -> Self {
        Self {
            site,
            state: Mutex::new(PageState::default()),
        }
    }

    pub fn attempts(&self, index: usize) -> u32 {
        self.state.lock().unwrap().attempts.get(&index).copied().unwrap_or(0)
    }

    pub fn loads(&self) -> usize {
        self.state.lock().unwrap().reloads
    }

    fn current(&self, state: &PageState) -> Option<Vec<FakeCard>> {
        let page = state.url.as_ref().and_then(|url| self.site.pages.get(url))?;
        let mut cards = page.cards.clone()?;
        if let (Some((after, later)), Some(loaded_at)) = (&page.late_batch, state.loaded_at) {
            if loaded_at.elapsed() >= *after {
                cards.extend(later.iter().cloned());
            }
        }
        Some(cards)
    }
}

impl SpeakerPage for FakePage {
    async fn goto(&self, url: &str) -> Result<()> {
        let page = self
            .site
            .pages
            .get(url)
            .ok_or_else(|| anyhow!("404 {}", url))?;
        tokio::time::sleep(page.load_delay).await;

        let mut state = self.state.lock().unwrap();
        state.url = Some(url.to_string());
        state.loaded_at = Some(Instant::now());
        state.open = None;
        state.reloads += 1;
        Ok(())
    }

    async fn list_cards(&self) -> Result<Vec<SpeakerCardRef>> {
        let state = self.state.lock().unwrap();
        Ok(self
            .current(&state)
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, card)| SpeakerCardRef {
                index,
                speaker_id: Some(format!("sp-{}", index)),
                summary_name: card.summary_name,
                summary_image: None,
            })
            .collect())
    }

    async fn dismiss_cookie_banner(&self) -> Result<()> {
        Ok(())
    }

    async fn open_card(&self, card: &SpeakerCardRef) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        assert!(state.open.is_none(), "card #{} opened while another modal was open", card.index);
        *state.attempts.entry(card.index).or_default() += 1;
        state.open = Some(card.index);
        Ok(())
    }

    async fn probe_modal(&self) -> Result<ModalProbe> {
        let state = self.state.lock().unwrap();
        let Some(index) = state.open else {
            return Ok(ModalProbe::Closed);
        };
        let cards = self.current(&state).unwrap_or_default();
        let attempts = state.attempts.get(&index).copied().unwrap_or(0);

        Ok(match &cards[index].script {
            Script::Renders(fields) | Script::StuckOpen(fields) => ModalProbe::Ready(fields.clone()),
            Script::NeverRenders => ModalProbe::Rendering,
            Script::RendersOnAttempt(from, fields) if attempts >= *from => ModalProbe::Ready(fields.clone()),
            Script::RendersOnAttempt(..) => ModalProbe::Rendering,
            Script::BlankName => ModalProbe::Ready(RawSpeakerFields {
                name: Some("   ".to_string()),
                ..Default::default()
            }),
        })
    }

    async fn close_modal(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let cards = self.current(&state).unwrap_or_default();
        let stuck = state
            .open
            .is_some_and(|i| matches!(cards[i].script, Script::StuckOpen(_)));
        if !stuck {
            state.open = None;
        }
        Ok(())
    }

    async fn cards_interactive(&self) -> Result<bool> {
        let state = self.state.lock().unwrap();
        Ok(state.open.is_none() && self.current(&state).is_some_and(|c| !c.is_empty()))
    }
}

/// Hands out fake pages and tracks how many are open at once
pub struct FakeSource {
    site: Arc<FakeSite>,
    active: AtomicUsize,
    pub peak: AtomicUsize,
    pub opened: AtomicUsize,
}

impl FakeSource {
    pub fn new(site: FakeSite) -> Arc<Self> {
        Arc::new(Self {
            site: Arc::new(site),
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            opened: AtomicUsize::new(0),
        })
    }
}

impl PageSource for FakeSource {
    type Page = FakePage;

    async fn open_page(&self) -> Result<FakePage> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(FakePage::new(self.site.clone()))
    }

    async fn release(&self, _page: FakePage) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

pub fn track(id: &str) -> Track {
    Track::new(id, id, format!("/speakers/{}", id.to_lowercase()))
}

/// Millisecond timeouts so scripted failures resolve fast
pub fn fast_config(tracks: Vec<Track>) -> Config {
    Config {
        base_url: BASE_URL.to_string(),
        tracks,
        max_concurrent_tracks: 2,
        card_list_timeout_ms: 100,
        modal_timeout_ms: 40,
        card_settle_ms: 20,
        modal_close_timeout_ms: 40,
        poll_interval_ms: 5,
        modal_retries: 2,
        retry_backoff_ms: 1,
        track_pause_ms: 0,
        run_timeout_secs: 30,
        ..Config::default()
    }
}
