use std::sync::LazyLock;

use async_trait::async_trait;
use futures_util::FutureExt;
use mediagrab_core::{MediaItem, MediaType, Platform};
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

use crate::chain::{run_chain, StrategyFuture};
use crate::client::{HttpClient, RelayProxy};
use crate::orchestrator::ProviderAdapter;
use crate::scan::{first_string, json_string_field, unescape_embedded_url, IMAGE_EXT};
use crate::types::{ExtractError, StrategyError};

const EXHAUSTED_NOTE: &str =
    "could not extract this Instagram media; the post may be private, removed, or the link malformed";

/// Endpoint set for the Instagram chain. Defaults point at the live
/// third-party services; tests aim every field at a mock server.
#[derive(Debug, Clone)]
pub struct InstagramEndpoints {
    /// Primary unofficial search API (form-encoded `ajaxSearch` POST).
    pub search_api: String,
    /// Lookalike mirror of the search API, same request and response shape.
    pub mirror_search_api: String,
    /// Plain fetch-through relay for the post page HTML.
    pub page_relay: RelayProxy,
    /// JSON relay that wraps the fetched body in a `{contents}` envelope.
    pub contents_relay: RelayProxy,
    /// Last-resort media-info API, fetched through `contents_relay`.
    pub media_info_api: String,
}

impl Default for InstagramEndpoints {
    fn default() -> Self {
        Self {
            search_api: "https://api.saveig.app/api/ajaxSearch".to_string(),
            mirror_search_api: "https://snapinsta.app/api/ajaxSearch".to_string(),
            page_relay: RelayProxy::default(),
            contents_relay: RelayProxy::new("https://api.allorigins.win/get?url="),
            media_info_api: "https://www.instagram.com/api/v1/media/info/?url=".to_string(),
        }
    }
}

static SHORTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"instagram\.com/(?:p|reel|tv)/([^/?]+)").expect("pattern compiles")
});

pub struct InstagramAdapter {
    client: HttpClient,
    endpoints: InstagramEndpoints,
}

impl InstagramAdapter {
    pub fn new(client: HttpClient, endpoints: InstagramEndpoints) -> Self {
        Self { client, endpoints }
    }

    /// Strategy (shared by the primary API and its mirror): form-encoded
    /// search POST answered with `{status, items: []}` where items carry
    /// heterogeneous url/type/thumbnail spellings.
    async fn via_search_api(
        &self,
        endpoint: &str,
        url: &str,
    ) -> Result<Vec<MediaItem>, StrategyError> {
        let body = self
            .client
            .post_form(endpoint, &[("q", url), ("t", "media"), ("lang", "en")])
            .await?;

        if body.get("status").and_then(Value::as_str) != Some("ok") {
            return Err(StrategyError::NoMedia);
        }

        let mut media = Vec::new();
        for item in body.get("items").and_then(Value::as_array).into_iter().flatten() {
            let Some(media_url) = first_string(item, &["url", "downloadUrl", "video", "image"])
            else {
                continue;
            };
            if is_video_item(item, media_url) {
                media.push(
                    MediaItem::new(media_url, MediaType::Video).with_thumbnail(
                        first_string(item, &["thumbnail", "image"]).map(str::to_string),
                    ),
                );
            } else if is_image_item(item, media_url) {
                media.push(MediaItem::new(media_url, MediaType::Image));
            }
        }
        Ok(media)
    }

    /// Strategy: fetch the post page through the relay, parse the inline
    /// shared-data blob, and fall back to a raw key scan over the same HTML
    /// when structured parsing yields nothing.
    async fn via_page_scrape(&self, url: &str) -> Result<Vec<MediaItem>, StrategyError> {
        let html = self
            .client
            .get_text(&self.endpoints.page_relay.wrap(url))
            .await?;

        let structured = parse_shared_data(&html);
        if !structured.is_empty() {
            return Ok(structured);
        }
        Ok(scan_media_keys(&html))
    }

    /// Last-resort strategy: media-info JSON fetched through the
    /// `{contents}`-envelope relay.
    async fn via_media_info(&self, url: &str) -> Result<Vec<MediaItem>, StrategyError> {
        let target = format!(
            "{}{}",
            self.endpoints.media_info_api,
            urlencoding::encode(url)
        );
        let envelope = self
            .client
            .get_json(&self.endpoints.contents_relay.wrap(&target))
            .await?;
        let contents = envelope
            .get("contents")
            .and_then(Value::as_str)
            .ok_or_else(|| StrategyError::Parse("relay envelope missing contents".to_string()))?;
        let body: Value =
            serde_json::from_str(contents).map_err(|err| StrategyError::Parse(err.to_string()))?;

        let Some(item) = body.pointer("/items/0") else {
            return Ok(Vec::new());
        };

        let thumbnail = item
            .pointer("/image_versions2/candidates/0/url")
            .and_then(Value::as_str);
        if let Some(video) = item
            .pointer("/video_versions/0/url")
            .and_then(Value::as_str)
        {
            return Ok(vec![MediaItem::new(video, MediaType::Video)
                .with_thumbnail(thumbnail.map(str::to_string))]);
        }
        if let Some(image) = thumbnail {
            return Ok(vec![MediaItem::new(image, MediaType::Image)]);
        }
        Ok(Vec::new())
    }
}

#[async_trait]
impl ProviderAdapter for InstagramAdapter {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    async fn extract(&self, url: &str) -> Result<Vec<MediaItem>, ExtractError> {
        // Post shortcode is required before anything goes on the wire; the
        // classifier accepts looser profile-style paths than the chain can
        // resolve.
        if !SHORTCODE.is_match(url) {
            return Err(ExtractError::InvalidUrl(
                "not an Instagram post, reel, or tv link".to_string(),
            ));
        }

        let strategies: Vec<(&'static str, StrategyFuture<'_>)> = vec![
            (
                "search api",
                self.via_search_api(&self.endpoints.search_api, url).boxed(),
            ),
            (
                "mirror search api",
                self.via_search_api(&self.endpoints.mirror_search_api, url)
                    .boxed(),
            ),
            ("relayed page", self.via_page_scrape(url).boxed()),
            ("media info api", self.via_media_info(url).boxed()),
        ];

        run_chain("instagram", strategies)
            .await
            .ok_or_else(|| ExtractError::Exhausted(EXHAUSTED_NOTE.to_string()))
    }
}

fn is_video_item(item: &Value, media_url: &str) -> bool {
    item.get("type").and_then(Value::as_str) == Some("video")
        || media_url.contains(".mp4")
        || item.get("video").is_some()
}

fn is_image_item(item: &Value, media_url: &str) -> bool {
    item.get("type").and_then(Value::as_str) == Some("image")
        || IMAGE_EXT.is_match(media_url)
        || item.get("image").is_some()
}

/// Walks `entry_data.PostPage[0].graphql.shortcode_media` out of the
/// `window._sharedData` blob, including carousel children.
fn parse_shared_data(html: &str) -> Vec<MediaItem> {
    let Some(blob) = extract_shared_data_json(html) else {
        return Vec::new();
    };
    let Ok(root) = serde_json::from_str::<Value>(&blob) else {
        return Vec::new();
    };
    let Some(media) = root.pointer("/entry_data/PostPage/0/graphql/shortcode_media") else {
        return Vec::new();
    };

    let mut items = Vec::new();
    if let Some(edges) = media
        .pointer("/edge_sidecar_to_children/edges")
        .and_then(Value::as_array)
    {
        for edge in edges {
            if let Some(item) = edge.get("node").and_then(media_from_node) {
                items.push(item);
            }
        }
    } else if let Some(item) = media_from_node(media) {
        items.push(item);
    }
    items
}

fn media_from_node(node: &Value) -> Option<MediaItem> {
    let is_video = node.get("is_video").and_then(Value::as_bool).unwrap_or(false)
        || node.get("video_url").is_some();
    if is_video {
        let url = node.get("video_url").and_then(Value::as_str)?;
        Some(MediaItem::new(url, MediaType::Video).with_thumbnail(
            node.get("display_url")
                .and_then(Value::as_str)
                .map(str::to_string),
        ))
    } else {
        let url = node.get("display_url").and_then(Value::as_str)?;
        Some(MediaItem::new(url, MediaType::Image))
    }
}

fn extract_shared_data_json(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse("script").ok()?;
    for script in doc.select(&selector) {
        let text: String = script.text().collect();
        if let Some(idx) = text.find("window._sharedData") {
            if let Some(start) = text[idx..].find('{') {
                let json = text[idx + start..].trim_end().trim_end_matches(';');
                return Some(json.to_string());
            }
        }
    }
    None
}

/// Raw fallback over the page source: the first `"video_url"` occurrence
/// wins, else the first `"display_url"`.
fn scan_media_keys(html: &str) -> Vec<MediaItem> {
    if let Some(raw) = json_string_field(html, "video_url") {
        return vec![MediaItem::new(
            unescape_embedded_url(&raw),
            MediaType::Video,
        )];
    }
    if let Some(raw) = json_string_field(html, "display_url") {
        return vec![MediaItem::new(
            unescape_embedded_url(&raw),
            MediaType::Image,
        )];
    }
    Vec::new()
}
