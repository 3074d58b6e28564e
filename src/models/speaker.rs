use serde::{Deserialize, Serialize};

/// Reference to one summary card inside a rendered track
///
/// Transient: only lives while its track is being traversed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerCardRef {
    /// 0-based DOM position; defines within-track order
    pub index: usize,
    /// `data-speakerid` of the card, when the site renders one
    #[serde(default)]
    pub speaker_id: Option<String>,
    /// Name printed on the card itself
    #[serde(default)]
    pub summary_name: Option<String>,
    /// Image shown on the card
    #[serde(default)]
    pub summary_image: Option<String>,
}

/// One anchor from the modal's social icon row
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawAnchor {
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl RawAnchor {
    pub fn href(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            text: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            href: None,
            text: Some(text.into()),
        }
    }
}

/// Unvalidated modal content
///
/// `None` means the slot was not rendered at all, `Some("")` means it was
/// rendered empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSpeakerFields {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub anchors: Vec<RawAnchor>,
}

/// Canonical output unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeakerRecord {
    pub name: String,
    pub title: String,
    pub image_url: Option<String>,
    pub x_handle: Option<String>,
    pub instagram_handle: Option<String>,
    pub linkedin_handle: Option<String>,
    /// Track the record was captured under
    pub source_track: String,
    /// Card position within that track
    pub original_index: usize,
}

impl SpeakerRecord {
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::new(&self.name, self.x_handle.as_deref())
    }
}

/// Identity of a speaker across tracks: normalized name plus X handle
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    name: String,
    x_handle: Option<String>,
}

impl DedupKey {
    pub fn new(name: &str, x_handle: Option<&str>) -> Self {
        Self {
            name: name
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase(),
            x_handle: x_handle.map(str::to_lowercase),
        }
    }
}
