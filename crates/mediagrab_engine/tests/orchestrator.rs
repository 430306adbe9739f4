use mediagrab_core::{MediaType, Platform};
use mediagrab_engine::{
    ClientSettings, HttpClient, MediaExtractor, TwitterAdapter, TwitterEndpoints,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn twitter_only(server: &MockServer) -> MediaExtractor {
    let client = HttpClient::new(ClientSettings::default()).expect("client builds");
    MediaExtractor::with_adapters(vec![Box::new(TwitterAdapter::new(
        client,
        TwitterEndpoints {
            status_api: format!("{}/status/", server.uri()),
            fallback_api: format!("{}/tweet/", server.uri()),
        },
    ))])
}

#[tokio::test]
async fn unknown_platform_fails_without_any_network_call() {
    grab_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let envelope = twitter_only(&server)
        .extract("https://example.com/whatever", Platform::Unknown)
        .await;

    assert!(!envelope.success);
    assert_eq!(envelope.platform, Some(Platform::Unknown));
    assert!(envelope.error.as_deref().unwrap_or_default().contains("unsupported"));
}

#[tokio::test]
async fn uninstalled_platform_fails_the_same_way() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let envelope = twitter_only(&server)
        .extract("https://instagram.com/p/Cabc123/", Platform::Instagram)
        .await;

    assert!(!envelope.success);
    assert!(envelope.media_items.is_empty());
}

#[tokio::test]
async fn adapter_success_becomes_a_well_formed_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tweet": {"media": {"videos": [{"url": "https://v.example/clip.mp4"}]}}
        })))
        .mount(&server)
        .await;

    let envelope = twitter_only(&server)
        .extract("https://twitter.com/jack/status/20", Platform::Twitter)
        .await;

    assert!(envelope.success);
    assert!(!envelope.media_items.is_empty());
    assert!(envelope.media_items.iter().all(|item| !item.url.is_empty()));
    assert_eq!(envelope.media_type, Some(MediaType::Video));
    assert_eq!(envelope.platform, Some(Platform::Twitter));
    assert!(envelope.error.is_none());
}

#[tokio::test]
async fn adapter_faults_are_folded_into_failure_envelopes() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    // Invalid-input fault: classifier-valid URL the adapter cannot resolve.
    let envelope = twitter_only(&server)
        .extract("https://x.com/someone/video/123", Platform::Twitter)
        .await;

    assert!(!envelope.success);
    assert!(envelope.error.is_some());
    assert_eq!(envelope.platform, Some(Platform::Twitter));
}
