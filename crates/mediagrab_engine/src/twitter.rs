use std::sync::LazyLock;

use async_trait::async_trait;
use futures_util::FutureExt;
use mediagrab_core::{MediaItem, MediaType, Platform};
use regex::Regex;
use serde_json::Value;

use crate::chain::{run_chain, StrategyFuture};
use crate::client::HttpClient;
use crate::orchestrator::ProviderAdapter;
use crate::scan::first_string;
use crate::types::{ExtractError, StrategyError};

const EXHAUSTED_NOTE: &str =
    "could not extract this Twitter/X media; the tweet may be private or deleted";

/// Endpoint set for the Twitter/X chain; the numeric status id is appended
/// to each base.
#[derive(Debug, Clone)]
pub struct TwitterEndpoints {
    /// Primary status API, answering `{tweet: {media: {...}}}`.
    pub status_api: String,
    /// Fallback status API, answering a flat `{media: []}` list.
    pub fallback_api: String,
}

impl Default for TwitterEndpoints {
    fn default() -> Self {
        Self {
            status_api: "https://api.fxtwitter.com/status/".to_string(),
            fallback_api: "https://api.vxtwitter.com/tweet/".to_string(),
        }
    }
}

static STATUS_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:twitter\.com|x\.com)/\w+/status/(\d+)").expect("pattern compiles")
});

/// Numeric status id from a tweet URL, if present.
fn status_id(url: &str) -> Option<&str> {
    STATUS_ID
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

pub struct TwitterAdapter {
    client: HttpClient,
    endpoints: TwitterEndpoints,
}

impl TwitterAdapter {
    pub fn new(client: HttpClient, endpoints: TwitterEndpoints) -> Self {
        Self { client, endpoints }
    }

    async fn via_status_api(&self, id: &str) -> Result<Vec<MediaItem>, StrategyError> {
        let body = self
            .client
            .get_json(&format!("{}{id}", self.endpoints.status_api))
            .await?;
        let Some(media) = body.pointer("/tweet/media") else {
            return Ok(Vec::new());
        };

        let mut items = Vec::new();
        for video in media.get("videos").and_then(Value::as_array).into_iter().flatten() {
            let url = first_string(video, &["url", "video_url"])
                .or_else(|| video.pointer("/source/url").and_then(Value::as_str));
            if let Some(url) = url {
                items.push(MediaItem::new(url, MediaType::Video).with_thumbnail(
                    first_string(video, &["thumbnail_url", "preview_image_url"])
                        .map(str::to_string),
                ));
            }
        }
        for photo in media.get("photos").and_then(Value::as_array).into_iter().flatten() {
            if let Some(url) = first_string(photo, &["url", "media_url_https"]) {
                items.push(MediaItem::new(url, MediaType::Image));
            }
        }
        for gif in media
            .get("animated_gif")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
        {
            let Some(variants) = gif.pointer("/video_info/variants").and_then(Value::as_array)
            else {
                continue;
            };
            if let Some(url) = best_mp4_variant(variants) {
                items.push(MediaItem::new(url, MediaType::Gif).with_thumbnail(
                    first_string(gif, &["media_url_https", "preview_image_url"])
                        .map(str::to_string),
                ));
            }
        }
        Ok(items)
    }

    async fn via_fallback_api(&self, id: &str) -> Result<Vec<MediaItem>, StrategyError> {
        let body = self
            .client
            .get_json(&format!("{}{id}", self.endpoints.fallback_api))
            .await?;

        let mut items = Vec::new();
        for media in body.get("media").and_then(Value::as_array).into_iter().flatten() {
            let thumbnail = media
                .get("media_url_https")
                .and_then(Value::as_str)
                .map(str::to_string);
            match media.get("type").and_then(Value::as_str) {
                Some("video") => {
                    let Some(variants) =
                        media.pointer("/video_info/variants").and_then(Value::as_array)
                    else {
                        continue;
                    };
                    if let Some(url) = best_mp4_variant(variants) {
                        items.push(
                            MediaItem::new(url, MediaType::Video).with_thumbnail(thumbnail),
                        );
                    }
                }
                Some("photo") => {
                    if let Some(url) = first_string(media, &["media_url_https", "url"]) {
                        items.push(MediaItem::new(url, MediaType::Image));
                    }
                }
                Some("animated_gif") => {
                    if let Some(url) = media
                        .pointer("/video_info/variants/0/url")
                        .and_then(Value::as_str)
                    {
                        items.push(MediaItem::new(url, MediaType::Gif).with_thumbnail(thumbnail));
                    }
                }
                _ => {}
            }
        }
        Ok(items)
    }
}

#[async_trait]
impl ProviderAdapter for TwitterAdapter {
    fn platform(&self) -> Platform {
        Platform::Twitter
    }

    async fn extract(&self, url: &str) -> Result<Vec<MediaItem>, ExtractError> {
        let Some(id) = status_id(url) else {
            return Err(ExtractError::InvalidUrl(
                "not a Twitter/X status link with a numeric id".to_string(),
            ));
        };

        let strategies: Vec<(&'static str, StrategyFuture<'_>)> = vec![
            ("status api", self.via_status_api(id).boxed()),
            ("fallback api", self.via_fallback_api(id).boxed()),
        ];

        run_chain("twitter", strategies)
            .await
            .ok_or_else(|| ExtractError::Exhausted(EXHAUSTED_NOTE.to_string()))
    }
}

/// URL of the `video/mp4` variant with the highest bitrate. A missing
/// bitrate counts as zero; ties keep the earliest variant.
fn best_mp4_variant(variants: &[Value]) -> Option<&str> {
    let mut best: Option<(&str, i64)> = None;
    for variant in variants {
        if variant.get("content_type").and_then(Value::as_str) != Some("video/mp4") {
            continue;
        }
        let Some(url) = variant.get("url").and_then(Value::as_str) else {
            continue;
        };
        let bitrate = variant.get("bitrate").and_then(Value::as_i64).unwrap_or(0);
        match best {
            Some((_, current)) if bitrate <= current => {}
            _ => best = Some((url, bitrate)),
        }
    }
    best.map(|(url, _)| url)
}
