use std::sync::LazyLock;

use async_trait::async_trait;
use futures_util::FutureExt;
use mediagrab_core::{MediaItem, MediaType, Platform};
use regex::Regex;
use scraper::{Html, Selector};

use crate::chain::{run_chain, StrategyFuture};
use crate::client::{HttpClient, RelayProxy};
use crate::orchestrator::ProviderAdapter;
use crate::scan::{json_string_field, loose_key_value, IMAGE_EXT};
use crate::types::{ExtractError, StrategyError};

// Snapchat content is private by default; there is no structured API worth
// attempting, so failure gets this fixed explanation instead of a generic
// error.
const PRIVATE_NOTE: &str = "Snapchat snaps are usually private and need an authenticated \
     session; only public stories can be fetched";

#[derive(Debug, Clone)]
pub struct SnapchatEndpoints {
    /// Fetch-through relay for the story page HTML.
    pub page_relay: RelayProxy,
}

impl Default for SnapchatEndpoints {
    fn default() -> Self {
        Self {
            page_relay: RelayProxy::default(),
        }
    }
}

static SNAP_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"snapchat\.com/.*/([^/?]+)").expect("pattern compiles"));

pub struct SnapchatAdapter {
    client: HttpClient,
    endpoints: SnapchatEndpoints,
}

impl SnapchatAdapter {
    pub fn new(client: HttpClient, endpoints: SnapchatEndpoints) -> Self {
        Self { client, endpoints }
    }

    /// The single Snapchat strategy: fetch the page through the relay and
    /// scan its HTML for a playable source.
    async fn via_page_scrape(&self, url: &str) -> Result<Vec<MediaItem>, StrategyError> {
        let html = self
            .client
            .get_text(&self.endpoints.page_relay.wrap(url))
            .await?;

        if let Some(video) = find_video(&html) {
            return Ok(vec![MediaItem::new(video, MediaType::Video)]);
        }
        if let Some(image) = find_image(&html) {
            return Ok(vec![MediaItem::new(image, MediaType::Image)]);
        }
        Ok(Vec::new())
    }
}

#[async_trait]
impl ProviderAdapter for SnapchatAdapter {
    fn platform(&self) -> Platform {
        Platform::Snapchat
    }

    async fn extract(&self, url: &str) -> Result<Vec<MediaItem>, ExtractError> {
        if !SNAP_ID.is_match(url) {
            return Err(ExtractError::InvalidUrl(
                "not a recognizable Snapchat link".to_string(),
            ));
        }

        let strategies: Vec<(&'static str, StrategyFuture<'_>)> =
            vec![("relayed page", self.via_page_scrape(url).boxed())];

        run_chain("snapchat", strategies)
            .await
            .ok_or_else(|| ExtractError::Exhausted(PRIVATE_NOTE.to_string()))
    }
}

/// A `<video src>` tag outranks the embedded-JSON keys.
fn find_video(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    if let Ok(selector) = Selector::parse("video[src]") {
        if let Some(src) = doc
            .select(&selector)
            .next()
            .and_then(|element| element.value().attr("src"))
        {
            if !src.is_empty() {
                return Some(src.to_string());
            }
        }
    }
    json_string_field(html, "video_url").or_else(|| loose_key_value(html, "videoUrl"))
}

/// Only unambiguous image sources count: an `<img src>` with a known image
/// extension, or the embedded-JSON image keys.
fn find_image(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    if let Ok(selector) = Selector::parse("img[src]") {
        for element in doc.select(&selector) {
            if let Some(src) = element.value().attr("src") {
                if IMAGE_EXT.is_match(src) {
                    return Some(src.to_string());
                }
            }
        }
    }
    json_string_field(html, "image_url").or_else(|| loose_key_value(html, "imageUrl"))
}

#[cfg(test)]
mod tests {
    use super::{find_image, find_video};

    #[test]
    fn video_tag_outranks_json_keys_and_images() {
        let html = r#"<html><body>
            <img src="https://cdn.example/poster.jpg">
            <video src="https://cdn.example/story.mp4"></video>
            <script>{"video_url":"https://cdn.example/other.mp4"}</script>
        </body></html>"#;
        assert_eq!(
            find_video(html).as_deref(),
            Some("https://cdn.example/story.mp4")
        );
    }

    #[test]
    fn json_video_key_is_found_when_no_tag_is_present() {
        let html = r#"<script>{"video_url":"https://cdn.example/story.mp4"}</script>"#;
        assert_eq!(
            find_video(html).as_deref(),
            Some("https://cdn.example/story.mp4")
        );
    }

    #[test]
    fn images_are_restricted_to_known_extensions() {
        let html = r#"<img src="https://cdn.example/sprite.svg">
            <img src="https://cdn.example/snap.webp">"#;
        assert_eq!(
            find_image(html).as_deref(),
            Some("https://cdn.example/snap.webp")
        );
    }

    #[test]
    fn loose_image_key_is_the_last_resort() {
        let html = "var imageUrl = 'https://cdn.example/snap.png';";
        assert_eq!(
            find_image(html).as_deref(),
            Some("https://cdn.example/snap.png")
        );
    }
}
