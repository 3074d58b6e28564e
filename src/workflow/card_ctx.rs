//! Card context
//!
//! "Which card of which track am I on", carried for logging and recovery

use std::fmt::Display;

use crate::models::Track;

#[derive(Debug, Clone)]
pub struct CardCtx {
    pub track_id: String,
    /// Page to reload when the modal gets stuck
    pub track_url: String,
    /// 0-based card position
    pub index: usize,
    pub total: usize,
}

impl CardCtx {
    pub fn new(track: &Track, track_url: impl Into<String>, index: usize, total: usize) -> Self {
        Self {
            track_id: track.id.clone(),
            track_url: track_url.into(),
            index,
            total,
        }
    }
}

impl Display for CardCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} {}/{}]", self.track_id, self.index + 1, self.total)
    }
}
