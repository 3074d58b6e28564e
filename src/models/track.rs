use serde::{Deserialize, Serialize};

/// One conference track with its own card list
///
/// Tracks are configuration, never discovered at runtime; their order in
/// the config is the output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Stable key, e.g. "AI", "GAMING"
    pub id: String,
    /// Display label; falls back to the id
    #[serde(default)]
    pub label: String,
    /// Path relative to the base URL, or an absolute URL
    pub path: String,
}

impl Track {
    pub fn new(id: impl Into<String>, label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            path: path.into(),
        }
    }

    pub fn label(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }

    /// Full URL of the track page
    pub fn url(&self, base_url: &str) -> String {
        if self.path.starts_with("http://") || self.path.starts_with("https://") {
            return self.path.clone();
        }
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }
}
