//! Ordered deduplicating aggregator - orchestration layer
//!
//! Track results arrive in completion order; the dataset comes out in
//! configured track order, then card order. The first record seen for a
//! dedup key wins, later ones are dropped and counted against their own
//! track.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::error::TrackError;
use crate::models::{
    CardFailure, CardOutcome, Dataset, DedupKey, Track, TrackHarvest, TrackSection, TrackStats,
    UnavailableTrack,
};

/// Collects per-track results, merges them once everything is in
///
/// Explicit state: one aggregator per run, nothing global.
pub struct Aggregator {
    tracks: Vec<Track>,
    harvests: HashMap<String, TrackHarvest>,
    unavailable: HashMap<String, String>,
}

impl Aggregator {
    pub fn new(tracks: &[Track]) -> Self {
        Self {
            tracks: tracks.to_vec(),
            harvests: HashMap::new(),
            unavailable: HashMap::new(),
        }
    }

    pub fn accept(&mut self, harvest: TrackHarvest) {
        if !self.is_configured(&harvest.track.id) {
            warn!("⚠️ Ignoring result for unconfigured track {}", harvest.track.id);
            return;
        }
        self.unavailable.remove(&harvest.track.id);
        self.harvests.insert(harvest.track.id.clone(), harvest);
    }

    pub fn mark_unavailable(&mut self, error: &TrackError) {
        let TrackError::Unavailable { track, reason } = error;
        if !self.is_configured(track) {
            warn!("⚠️ Ignoring failure for unconfigured track {}", track);
            return;
        }
        self.harvests.remove(track);
        self.unavailable.insert(track.clone(), reason.clone());
    }

    fn is_configured(&self, track_id: &str) -> bool {
        self.tracks.iter().any(|t| t.id == track_id)
    }

    /// Merge everything in configured order
    pub fn finish(mut self) -> Dataset {
        let mut seen = HashSet::new();
        let mut dataset = Dataset::default();

        for track in &self.tracks {
            match self.harvests.remove(&track.id) {
                Some(harvest) => dataset.sections.push(merge_track(harvest, &mut seen)),
                None => {
                    let reason = self
                        .unavailable
                        .remove(&track.id)
                        .unwrap_or_else(|| "no result reported".to_string());
                    dataset.unavailable.push(UnavailableTrack {
                        track: track.clone(),
                        reason,
                    });
                }
            }
        }

        dataset
    }
}

/// Merge one track into the running seen-set
fn merge_track(harvest: TrackHarvest, seen: &mut HashSet<DedupKey>) -> TrackSection {
    let TrackHarvest { track, mut entries } = harvest;
    entries.sort_by_key(CardOutcome::index);

    let mut stats = TrackStats {
        seen: entries.len(),
        ..Default::default()
    };
    let mut records = Vec::new();

    for entry in entries {
        match entry {
            CardOutcome::Captured(record) => {
                if seen.insert(record.dedup_key()) {
                    stats.kept += 1;
                    records.push(record);
                } else {
                    stats.duplicates += 1;
                }
            }
            CardOutcome::Discarded { .. } => stats.discarded += 1,
            CardOutcome::Failed { index, error } => {
                stats.failed += 1;
                stats.failures.push(CardFailure {
                    index,
                    reason: error.to_string(),
                });
            }
        }
    }

    TrackSection {
        track,
        records,
        stats,
    }
}
