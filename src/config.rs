use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::Track;

/// Default config file, read when present
pub const DEFAULT_CONFIG_FILE: &str = "speakers.toml";

/// Program configuration
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site root the track paths hang off
    pub base_url: String,
    /// Tracks to scrape, in output order
    pub tracks: Vec<Track>,
    /// Tracks scraped at the same time (one page each)
    pub max_concurrent_tracks: usize,
    /// Attach to an already running browser on this port instead of launching one
    pub browser_debug_port: Option<u16>,
    /// Launch the browser headless
    pub headless: bool,
    /// Browser binary used when launching
    pub chrome_executable: Option<String>,
    /// Wait for the card list of a track to render
    pub card_list_timeout_ms: u64,
    /// Card count must hold still this long before a track is enumerated
    /// (the grid renders in batches)
    pub card_settle_ms: u64,
    /// Wait for a modal to populate after the click
    pub modal_timeout_ms: u64,
    /// Wait for the card list to be interactive after closing a modal
    pub modal_close_timeout_ms: u64,
    /// Interval between DOM probes while waiting
    pub poll_interval_ms: u64,
    /// Extra open attempts after a modal timeout
    pub modal_retries: u32,
    /// Backoff unit between open attempts (multiplied by the attempt number)
    pub retry_backoff_ms: u64,
    /// Pause between tracks on the same session
    pub track_pause_ms: u64,
    /// Whole-run deadline
    pub run_timeout_secs: u64,
    /// Directory the JSON export is written to
    pub output_dir: String,
    /// Export file name prefix
    pub output_basename: String,
    /// Debug-level logging
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://www.nft.nyc".to_string(),
            tracks: default_tracks(),
            max_concurrent_tracks: 2,
            browser_debug_port: None,
            headless: true,
            chrome_executable: None,
            card_list_timeout_ms: 10_000,
            card_settle_ms: 1_500,
            modal_timeout_ms: 1_200,
            modal_close_timeout_ms: 1_000,
            poll_interval_ms: 100,
            modal_retries: 2,
            retry_backoff_ms: 300,
            track_pause_ms: 500,
            run_timeout_secs: 1_800,
            output_dir: ".".to_string(),
            output_basename: "speakers_all_tracks".to_string(),
            verbose_logging: false,
        }
    }
}

fn default_tracks() -> Vec<Track> {
    [
        ("FEATURED", "/speakers"),
        ("COMMUNITY", "/speakers/community"),
        ("AI", "/speakers/ai"),
        ("ART", "/speakers/art"),
        ("ENTERTAINMENT", "/speakers/entertainment"),
        ("LEGAL", "/speakers/legal"),
        ("BRANDS", "/speakers/brands"),
        ("FUTURE", "/speakers/future"),
        ("GAMING", "/speakers/gaming"),
        ("BTC & ORDINALS", "/speakers/bitcoin"),
    ]
    .into_iter()
    .map(|(id, path)| Track::new(id, id, path))
    .collect()
}

impl Config {
    /// Config file (`SPEAKER_CONFIG`, else `speakers.toml` when it exists),
    /// then environment overrides
    pub fn load() -> AppResult<Self> {
        let base = match std::env::var("SPEAKER_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            Err(_) => Self::default(),
        };
        base.with_env().validated()
    }

    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::io(path.display().to_string(), e))?;
        Self::from_toml_str(&content).map_err(|source| AppError::Config {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Environment variables override whatever is already set
    pub fn with_env(self) -> Self {
        let default = self;
        Self {
            base_url: std::env::var("BASE_URL").unwrap_or(default.base_url),
            tracks: default.tracks,
            max_concurrent_tracks: env_parse("MAX_CONCURRENT_TRACKS").unwrap_or(default.max_concurrent_tracks),
            browser_debug_port: env_parse("BROWSER_DEBUG_PORT").or(default.browser_debug_port),
            headless: env_parse("HEADLESS").unwrap_or(default.headless),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().or(default.chrome_executable),
            card_list_timeout_ms: env_parse("CARD_LIST_TIMEOUT_MS").unwrap_or(default.card_list_timeout_ms),
            card_settle_ms: env_parse("CARD_SETTLE_MS").unwrap_or(default.card_settle_ms),
            modal_timeout_ms: env_parse("MODAL_TIMEOUT_MS").unwrap_or(default.modal_timeout_ms),
            modal_close_timeout_ms: env_parse("MODAL_CLOSE_TIMEOUT_MS").unwrap_or(default.modal_close_timeout_ms),
            poll_interval_ms: env_parse("POLL_INTERVAL_MS").unwrap_or(default.poll_interval_ms),
            modal_retries: env_parse("MODAL_RETRIES").unwrap_or(default.modal_retries),
            retry_backoff_ms: env_parse("RETRY_BACKOFF_MS").unwrap_or(default.retry_backoff_ms),
            track_pause_ms: env_parse("TRACK_PAUSE_MS").unwrap_or(default.track_pause_ms),
            run_timeout_secs: env_parse("RUN_TIMEOUT_SECS").unwrap_or(default.run_timeout_secs),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(default.output_dir),
            output_basename: std::env::var("OUTPUT_BASENAME").unwrap_or(default.output_basename),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(default.verbose_logging),
        }
    }

    pub fn validated(self) -> AppResult<Self> {
        if self.max_concurrent_tracks == 0 {
            return Err(AppError::invalid_config("max_concurrent_tracks", "0"));
        }
        if self.tracks.is_empty() {
            return Err(AppError::invalid_config("tracks", "[]"));
        }
        if let Some(track) = self.tracks.iter().find(|t| t.id.trim().is_empty()) {
            return Err(AppError::invalid_config("tracks.id", &track.path));
        }
        // results are keyed by track id
        let duplicate = {
            let mut ids = HashSet::new();
            self.tracks.iter().find(|t| !ids.insert(t.id.as_str())).map(|t| t.id.clone())
        };
        if let Some(id) = duplicate {
            return Err(AppError::invalid_config("tracks.id", id));
        }
        Ok(self)
    }

    pub fn card_list_timeout(&self) -> Duration {
        Duration::from_millis(self.card_list_timeout_ms)
    }

    pub fn card_settle(&self) -> Duration {
        Duration::from_millis(self.card_settle_ms)
    }

    pub fn modal_timeout(&self) -> Duration {
        Duration::from_millis(self.modal_timeout_ms)
    }

    pub fn modal_close_timeout(&self) -> Duration {
        Duration::from_millis(self.modal_close_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn track_pause(&self) -> Duration {
        Duration::from_millis(self.track_pause_ms)
    }

    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.run_timeout_secs)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
