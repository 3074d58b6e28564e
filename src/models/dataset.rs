use serde::Serialize;

use crate::error::{CaptureError, DiscardReason};
use crate::models::speaker::SpeakerRecord;
use crate::models::track::Track;

/// What became of one card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardOutcome {
    Captured(SpeakerRecord),
    Discarded { index: usize, reason: DiscardReason },
    Failed { index: usize, error: CaptureError },
}

impl CardOutcome {
    pub fn index(&self) -> usize {
        match self {
            CardOutcome::Captured(record) => record.original_index,
            CardOutcome::Discarded { index, .. } | CardOutcome::Failed { index, .. } => *index,
        }
    }
}

/// Finished traversal of one track, in card order
#[derive(Debug, Clone)]
pub struct TrackHarvest {
    pub track: Track,
    pub entries: Vec<CardOutcome>,
}

/// Why a card produced no record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardFailure {
    pub index: usize,
    pub reason: String,
}

/// Per-track counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackStats {
    /// Cards discovered on the page
    pub seen: usize,
    /// Records emitted into the dataset
    pub kept: usize,
    /// Records dropped because an earlier record had the same key
    pub duplicates: usize,
    /// Cards whose capture failed
    pub failed: usize,
    /// Records dropped for an empty name
    pub discarded: usize,
    pub failures: Vec<CardFailure>,
}

/// One track's slice of the dataset
#[derive(Debug, Clone, Serialize)]
pub struct TrackSection {
    pub track: Track,
    pub records: Vec<SpeakerRecord>,
    pub stats: TrackStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnavailableTrack {
    pub track: Track,
    pub reason: String,
}

/// Final ordered, deduplicated output of a run
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dataset {
    /// Completed tracks, in configured order
    pub sections: Vec<TrackSection>,
    /// Tracks that never rendered or ran out of time
    pub unavailable: Vec<UnavailableTrack>,
}

impl Dataset {
    /// All records in output order
    pub fn records(&self) -> impl Iterator<Item = &SpeakerRecord> {
        self.sections.iter().flat_map(|s| s.records.iter())
    }

    pub fn section(&self, track_id: &str) -> Option<&TrackSection> {
        self.sections.iter().find(|s| s.track.id == track_id)
    }

    pub fn total_records(&self) -> usize {
        self.sections.iter().map(|s| s.records.len()).sum()
    }

    pub fn coverage(&self) -> HandleCoverage {
        HandleCoverage::of(self.records())
    }
}

/// How many records carry each handle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HandleCoverage {
    pub with_x: usize,
    pub with_instagram: usize,
    pub with_linkedin: usize,
}

impl HandleCoverage {
    pub fn of<'a>(records: impl IntoIterator<Item = &'a SpeakerRecord>) -> Self {
        records.into_iter().fold(Self::default(), |mut acc, r| {
            acc.with_x += r.x_handle.is_some() as usize;
            acc.with_instagram += r.instagram_handle.is_some() as usize;
            acc.with_linkedin += r.linkedin_handle.is_some() as usize;
            acc
        })
    }
}
