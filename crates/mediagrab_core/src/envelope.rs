use serde::{Deserialize, Serialize};

use crate::{MediaItem, MediaType, Platform};

/// The uniform envelope every adapter produces, regardless of which
/// underlying strategy succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_items: Vec<MediaItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
}

impl DownloadResponse {
    /// Builds a success envelope.
    ///
    /// Invariant: a successful response carries at least one item and every
    /// item has a non-empty URL. Items with empty URLs are dropped here, and
    /// an empty result degrades to a failure envelope.
    pub fn resolved(platform: Platform, media_items: Vec<MediaItem>) -> Self {
        let media_items: Vec<MediaItem> = media_items
            .into_iter()
            .filter(|item| !item.url.is_empty())
            .collect();
        if media_items.is_empty() {
            return Self::failed(platform, "no downloadable media found");
        }
        let media_type = media_items.first().map(|item| item.media_type);
        Self {
            success: true,
            media_items,
            error: None,
            platform: Some(platform),
            media_type,
        }
    }

    pub fn failed(platform: Platform, message: impl Into<String>) -> Self {
        Self {
            success: false,
            media_items: Vec::new(),
            error: Some(message.into()),
            platform: Some(platform),
            media_type: None,
        }
    }
}
