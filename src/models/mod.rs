pub mod dataset;
pub mod speaker;
pub mod track;

pub use dataset::{
    CardFailure, CardOutcome, Dataset, HandleCoverage, TrackHarvest, TrackSection, TrackStats,
    UnavailableTrack,
};
pub use speaker::{DedupKey, RawAnchor, RawSpeakerFields, SpeakerCardRef, SpeakerRecord};
pub use track::Track;
