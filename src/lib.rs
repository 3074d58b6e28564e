//! # Speaker Scrape
//!
//! Extracts speaker records from a multi-track conference site whose speaker
//! details only show up in modals.
//!
//! ## Architecture
//!
//! Four layers:
//!
//! ### ① Infrastructure
//! - `infrastructure/` - owns the scarce resource (Page), exposes capabilities
//! - `JsExecutor` - the only page owner; implements `SpeakerPage`
//!
//! ### ② Services
//! - `services/` - single-item capabilities
//! - `social_handle` - href → canonical X / Instagram / LinkedIn URL
//! - `record_builder` - raw fields → `SpeakerRecord`
//! - `modal_capture` - open-wait / extract / close-wait with retries
//!
//! ### ③ Workflow
//! - `workflow/` - the lifecycle of one card
//! - `CardCtx` - which card of which track
//! - `CardFlow` - capture → build → outcome
//!
//! ### ④ Orchestration
//! - `orchestrator/batch_processor` - browser, concurrency, run deadline
//! - `orchestrator/track_processor` - one track, cards in order
//! - `orchestrator/aggregator` - ordered, deduplicated dataset
//!
//! `export/` consumes the finished dataset.

pub mod browser;
pub mod config;
pub mod error;
pub mod export;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

pub use browser::BrowserSession;
pub use config::Config;
pub use error::{AppError, AppResult, CaptureError, DiscardReason, TrackError};
pub use infrastructure::{JsExecutor, ModalProbe, SpeakerPage};
pub use models::{Dataset, SpeakerRecord, Track};
pub use orchestrator::{harvest_tracks, process_track, Aggregator, App, PageSource};
pub use workflow::{CardCtx, CardFlow};
