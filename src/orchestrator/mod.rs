//! Orchestration layer
//!
//! ## Responsibilities
//!
//! Scheduling and merging; the "command center" of the run.
//!
//! ### `batch_processor` - all tracks
//! - owns the browser session and the run deadline
//! - bounds cross-track concurrency (Semaphore)
//! - feeds finished tracks to the aggregator
//!
//! ### `track_processor` - one track
//! - navigates, waits for the card list
//! - walks the cards in order through `CardFlow`
//!
//! ### `aggregator` - the dataset
//! - configured track order, then card order
//! - first-seen-wins deduplication, per-track statistics
//!
//! ## Layering
//!
//! ```text
//! batch_processor (Vec<Track>)
//!     ↓
//! track_processor (Vec<SpeakerCardRef>)
//!     ↓
//! workflow::CardFlow (one card)
//!     ↓
//! services (capture / build / normalize)
//!     ↓
//! infrastructure (SpeakerPage, JsExecutor)
//! ```

pub mod aggregator;
pub mod batch_processor;
pub mod track_processor;

pub use aggregator::Aggregator;
pub use batch_processor::{harvest_tracks, App, PageSource};
pub use track_processor::process_track;
