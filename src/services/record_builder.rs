//! Speaker record builder - service layer
//!
//! Turns raw modal fields into a `SpeakerRecord`. Pure, no page access.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::DiscardReason;
use crate::models::{RawSpeakerFields, SpeakerRecord, Track};
use crate::services::social_handle::{normalize_handle, Platform};

static ABSOLUTE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://[a-z0-9-]+(?:\.[a-z0-9-]+)*(?::\d+)?(?:[/?#]\S*)?$")
        .expect("url pattern is valid")
});

/// Build a record from one card's raw fields
///
/// A name that cleans down to nothing discards the record.
pub fn build_record(
    raw: &RawSpeakerFields,
    track: &Track,
    index: usize,
) -> Result<SpeakerRecord, DiscardReason> {
    let name = raw.name.as_deref().map(clean_text).unwrap_or_default();
    if name.is_empty() {
        return Err(DiscardReason::EmptyName);
    }

    let mut record = SpeakerRecord {
        name,
        title: raw.title.as_deref().map(clean_text).unwrap_or_default(),
        image_url: raw.image_url.as_deref().and_then(absolute_url),
        x_handle: None,
        instagram_handle: None,
        linkedin_handle: None,
        source_track: track.id.clone(),
        original_index: index,
    };

    // Text without an href is not enough to identify a profile
    for handle in raw
        .anchors
        .iter()
        .filter_map(|a| a.href.as_deref())
        .filter_map(normalize_handle)
    {
        let slot = match handle.platform {
            Platform::X => &mut record.x_handle,
            Platform::Instagram => &mut record.instagram_handle,
            Platform::LinkedIn => &mut record.linkedin_handle,
        };
        if slot.is_none() {
            *slot = Some(handle.url);
        }
    }

    Ok(record)
}

/// Drop control characters, collapse whitespace runs, trim
///
/// Control characters that are also whitespace (`\n`, `\t`) separate words.
pub fn clean_text(text: &str) -> String {
    let visible: String = text
        .chars()
        .filter(|c| c.is_whitespace() || !c.is_control())
        .collect();
    visible.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn absolute_url(url: &str) -> Option<String> {
    let url = url.trim();
    ABSOLUTE_URL_RE.is_match(url).then(|| url.to_string())
}
