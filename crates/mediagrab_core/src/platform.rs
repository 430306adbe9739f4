use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Twitter,
    Snapchat,
    Unknown,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Instagram => write!(f, "instagram"),
            Platform::Twitter => write!(f, "twitter"),
            Platform::Snapchat => write!(f, "snapchat"),
            Platform::Unknown => write!(f, "unknown"),
        }
    }
}

/// Classification result for a single pasted URL. Recomputed on every input
/// change; the `url` field carries the caller's text verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkInfo {
    pub platform: Platform,
    pub is_valid: bool,
    pub url: String,
}

static INSTAGRAM_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[r"instagram\.com/(p|reel|tv)/", r"instagram\.com/.*/.*"])
});

static TWITTER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(twitter\.com|x\.com)/.*/status/",
        r"(twitter\.com|x\.com)/.*/video/",
    ])
});

static SNAPCHAT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"snapchat\.com/add/",
        r"snapchat\.com/t/",
        r"snapchat\.com/story/",
    ])
});

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("classifier pattern compiles"))
        .collect()
}

/// Maps a raw URL string to its platform. Pure and idempotent.
///
/// The lists are tried in a fixed order (Instagram, then Twitter/X, then
/// Snapchat); the first matching pattern wins. Some malformed URLs could
/// satisfy several of the loose patterns, so the order is the tie-break.
pub fn classify(url: &str) -> LinkInfo {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return LinkInfo {
            platform: Platform::Unknown,
            is_valid: false,
            url: url.to_string(),
        };
    }

    let normalized = trimmed.to_lowercase();
    let tables = [
        (Platform::Instagram, &*INSTAGRAM_PATTERNS),
        (Platform::Twitter, &*TWITTER_PATTERNS),
        (Platform::Snapchat, &*SNAPCHAT_PATTERNS),
    ];

    for (platform, patterns) in tables {
        if patterns.iter().any(|p| p.is_match(&normalized)) {
            return LinkInfo {
                platform,
                is_valid: true,
                url: url.to_string(),
            };
        }
    }

    LinkInfo {
        platform: Platform::Unknown,
        is_valid: false,
        url: url.to_string(),
    }
}
