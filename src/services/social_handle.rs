//! Social handle normalization - service layer
//!
//! Turns an anchor href into a canonical profile URL for X, Instagram or
//! LinkedIn. An unrecognized or malformed href yields `None`: a missing
//! handle is an ordinary state, never an error.

use std::sync::LazyLock;

use phf::phf_set;
use regex::Regex;

/// Supported platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    X,
    Instagram,
    LinkedIn,
}

/// A validated handle in canonical URL form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialHandle {
    pub platform: Platform,
    pub url: String,
}

// Path words that are site pages, not profiles. Compared lower-cased.
static RESERVED_X: phf::Set<&'static str> = phf_set! {
    "home", "explore", "i", "intent", "share", "login", "logout", "signup",
    "search", "hashtag", "settings", "messages", "notifications", "uwt",
    "nftnyc", "twitter", "x",
};

static RESERVED_INSTAGRAM: phf::Set<&'static str> = phf_set! {
    "explore", "accounts", "direct", "p", "reel", "reels", "stories", "tv",
    "uwt", "nftnyc", "instagram",
};

static RESERVED_LINKEDIN: phf::Set<&'static str> = phf_set! {
    "feed", "jobs", "help", "about", "login", "signup", "linkedin", "nftnyc",
};

static HOST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:https?://)?(?:[a-z0-9-]+\.)*(x\.com|twitter\.com|instagram\.com|linkedin\.com)(/[^?#]*)?")
        .expect("host pattern is valid")
});

static X_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/@?([A-Za-z0-9_]{1,15})(?:/|$)").expect("x pattern is valid"));

static INSTAGRAM_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/@?([A-Za-z0-9_.]{1,30})(?:/|$)").expect("instagram pattern is valid")
});

static LINKEDIN_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^/(in|company)/([A-Za-z0-9_%-]{3,100})(?:/|$)").expect("linkedin pattern is valid")
});

/// Classify and canonicalize an href
///
/// Idempotent: a canonical URL normalizes to itself.
pub fn normalize_handle(raw: &str) -> Option<SocialHandle> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    // Host must be the platform domain or a subdomain of it ("notx.com" is neither)
    let caps = HOST_RE.captures(raw)?;
    let domain = caps.get(1)?.as_str().to_ascii_lowercase();
    let path = caps.get(2).map(|m| m.as_str()).unwrap_or("");

    match domain.as_str() {
        "x.com" | "twitter.com" => normalize_x(path),
        "instagram.com" => normalize_instagram(path),
        "linkedin.com" => normalize_linkedin(path),
        _ => None,
    }
}

/// Canonical URL for one platform, if the href belongs to it
pub fn normalize_for(platform: Platform, raw: &str) -> Option<String> {
    normalize_handle(raw)
        .filter(|h| h.platform == platform)
        .map(|h| h.url)
}

fn normalize_x(path: &str) -> Option<SocialHandle> {
    let handle = X_PATH_RE.captures(path)?.get(1)?.as_str();
    if handle.chars().all(|c| c.is_ascii_digit()) || RESERVED_X.contains(handle.to_lowercase().as_str()) {
        return None;
    }
    Some(SocialHandle {
        platform: Platform::X,
        url: format!("https://x.com/{handle}"),
    })
}

fn normalize_instagram(path: &str) -> Option<SocialHandle> {
    let handle = INSTAGRAM_PATH_RE.captures(path)?.get(1)?.as_str();
    if handle.starts_with('.')
        || handle.ends_with('.')
        || RESERVED_INSTAGRAM.contains(handle.to_lowercase().as_str())
    {
        return None;
    }
    Some(SocialHandle {
        platform: Platform::Instagram,
        url: format!("https://www.instagram.com/{handle}"),
    })
}

fn normalize_linkedin(path: &str) -> Option<SocialHandle> {
    let caps = LINKEDIN_PATH_RE.captures(path)?;
    let kind = caps.get(1)?.as_str().to_ascii_lowercase();
    let slug = caps.get(2)?.as_str();
    if RESERVED_LINKEDIN.contains(slug.to_lowercase().as_str()) {
        return None;
    }
    Some(SocialHandle {
        platform: Platform::LinkedIn,
        url: format!("https://www.linkedin.com/{kind}/{slug}"),
    })
}
