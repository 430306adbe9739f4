use async_trait::async_trait;
use grab_logging::grab_warn;
use mediagrab_core::{DownloadResponse, MediaItem, Platform};

use crate::client::{ClientSettings, HttpClient};
use crate::instagram::{InstagramAdapter, InstagramEndpoints};
use crate::snapchat::{SnapchatAdapter, SnapchatEndpoints};
use crate::twitter::{TwitterAdapter, TwitterEndpoints};
use crate::types::{ExtractError, StrategyError};

/// Platform-specific extraction logic: one adapter owns one ordered fallback
/// chain and normalizes whatever its endpoints answer into `MediaItem`s.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn platform(&self) -> Platform;
    async fn extract(&self, url: &str) -> Result<Vec<MediaItem>, ExtractError>;
}

/// Dispatches a classified URL to the matching adapter and folds the result
/// into the uniform response envelope.
pub struct MediaExtractor {
    adapters: Vec<Box<dyn ProviderAdapter>>,
}

impl MediaExtractor {
    /// Extractor with the stock Instagram, Twitter/X, and Snapchat adapters.
    pub fn new(settings: ClientSettings) -> Result<Self, StrategyError> {
        let client = HttpClient::new(settings)?;
        Ok(Self::with_adapters(vec![
            Box::new(InstagramAdapter::new(
                client.clone(),
                InstagramEndpoints::default(),
            )),
            Box::new(TwitterAdapter::new(
                client.clone(),
                TwitterEndpoints::default(),
            )),
            Box::new(SnapchatAdapter::new(client, SnapchatEndpoints::default())),
        ]))
    }

    pub fn with_adapters(adapters: Vec<Box<dyn ProviderAdapter>>) -> Self {
        Self { adapters }
    }

    /// Resolves `url` into a response envelope.
    ///
    /// Never returns an error and never panics: adapter faults become
    /// failure envelopes. `Unknown` or uninstalled platforms fail
    /// immediately without any network call.
    pub async fn extract(&self, url: &str, platform: Platform) -> DownloadResponse {
        let Some(adapter) = self
            .adapters
            .iter()
            .find(|adapter| adapter.platform() == platform)
        else {
            return DownloadResponse::failed(platform, "unsupported or unrecognized link");
        };

        match adapter.extract(url).await {
            Ok(items) => DownloadResponse::resolved(platform, items),
            Err(err) => {
                grab_warn!("{platform}: extraction failed: {err}");
                DownloadResponse::failed(platform, err.to_string())
            }
        }
    }
}
