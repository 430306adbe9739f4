use std::time::Duration;

use bytes::Bytes;
use reqwest::header::ACCEPT;
use url::Url;

use crate::types::StrategyError;

/// Outbound HTTP settings shared by every strategy.
///
/// The default enforces no timeouts: the third-party endpoints are unowned
/// and occasionally very slow, and a hung call is bounded only by the
/// network stack's own limits. Callers that want a bound set the fields.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            request_timeout: None,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_string(),
        }
    }
}

/// Thin wrapper over `reqwest::Client` with the request shapes the
/// strategies need and uniform `StrategyError` mapping.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(settings: ClientSettings) -> Result<Self, StrategyError> {
        let mut builder = reqwest::Client::builder().user_agent(settings.user_agent);
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let inner = builder
            .build()
            .map_err(|err| StrategyError::Network(err.to_string()))?;
        Ok(Self { inner })
    }

    pub(crate) async fn get_text(&self, url: &str) -> Result<String, StrategyError> {
        let response = self.inner.get(parse_url(url)?).send().await?;
        let response = check_status(response)?;
        Ok(response.text().await?)
    }

    pub(crate) async fn get_json(&self, url: &str) -> Result<serde_json::Value, StrategyError> {
        let response = self
            .inner
            .get(parse_url(url)?)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let response = check_status(response)?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|err| StrategyError::Parse(err.to_string()))
    }

    pub(crate) async fn post_form(
        &self,
        url: &str,
        fields: &[(&str, &str)],
    ) -> Result<serde_json::Value, StrategyError> {
        let response = self
            .inner
            .post(parse_url(url)?)
            .header(ACCEPT, "application/json")
            .form(fields)
            .send()
            .await?;
        let response = check_status(response)?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|err| StrategyError::Parse(err.to_string()))
    }

    pub(crate) async fn get_bytes(&self, url: &str) -> Result<Bytes, StrategyError> {
        let response = self.inner.get(parse_url(url)?).send().await?;
        let response = check_status(response)?;
        Ok(response.bytes().await?)
    }
}

fn parse_url(url: &str) -> Result<Url, StrategyError> {
    Url::parse(url).map_err(|err| StrategyError::InvalidRequest(err.to_string()))
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StrategyError> {
    let status = response.status();
    if !status.is_success() {
        return Err(StrategyError::Status(status.as_u16()));
    }
    Ok(response)
}

/// Fetch-through relay: a third-party service that fetches the target
/// server-side and returns its body. The original clients needed these to
/// bypass cross-origin restrictions; here they double as alternate egress
/// for hosts that reject direct fetches, so the observed endpoints stay.
#[derive(Debug, Clone)]
pub struct RelayProxy {
    base: String,
}

impl RelayProxy {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Request URL for fetching `target` through the relay.
    pub fn wrap(&self, target: &str) -> String {
        format!("{}{}", self.base, urlencoding::encode(target))
    }
}

impl Default for RelayProxy {
    fn default() -> Self {
        Self::new("https://corsproxy.io/?")
    }
}

#[cfg(test)]
mod tests {
    use super::RelayProxy;

    #[test]
    fn relay_percent_encodes_the_target() {
        let relay = RelayProxy::new("https://relay.example/?");
        assert_eq!(
            relay.wrap("https://a.example/p?x=1&y=2"),
            "https://relay.example/?https%3A%2F%2Fa.example%2Fp%3Fx%3D1%26y%3D2"
        );
    }
}
