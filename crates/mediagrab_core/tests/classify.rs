use mediagrab_core::{classify, Platform};

fn platform_of(url: &str) -> (Platform, bool) {
    let info = classify(url);
    (info.platform, info.is_valid)
}

#[test]
fn empty_and_whitespace_input_is_unknown_and_invalid() {
    for input in ["", "   ", "\t", "\n  \n"] {
        let info = classify(input);
        assert_eq!(info.platform, Platform::Unknown);
        assert!(!info.is_valid);
        assert_eq!(info.url, input);
    }
}

#[test]
fn instagram_post_reel_and_tv_paths_are_valid() {
    for url in [
        "https://instagram.com/p/CxYz123/",
        "https://www.instagram.com/reel/CxYz123/",
        "https://instagram.com/tv/CxYz123/",
    ] {
        assert_eq!(platform_of(url), (Platform::Instagram, true), "{url}");
    }
}

#[test]
fn instagram_generic_two_segment_path_is_valid() {
    assert_eq!(
        platform_of("https://instagram.com/someuser/tagged/"),
        (Platform::Instagram, true)
    );
}

#[test]
fn twitter_status_and_video_paths_are_valid_on_both_hosts() {
    for url in [
        "https://twitter.com/jack/status/20",
        "https://x.com/jack/status/20",
        "https://x.com/someone/video/123",
    ] {
        assert_eq!(platform_of(url), (Platform::Twitter, true), "{url}");
    }
}

#[test]
fn snapchat_add_t_and_story_paths_are_valid() {
    for url in [
        "https://snapchat.com/add/someuser",
        "https://www.snapchat.com/t/abcDEF",
        "https://snapchat.com/story/someuser",
    ] {
        assert_eq!(platform_of(url), (Platform::Snapchat, true), "{url}");
    }
}

#[test]
fn classification_is_case_insensitive_but_preserves_input() {
    let info = classify("  HTTPS://X.COM/Jack/Status/20  ");
    assert_eq!(info.platform, Platform::Twitter);
    assert!(info.is_valid);
    assert_eq!(info.url, "  HTTPS://X.COM/Jack/Status/20  ");
}

#[test]
fn instagram_wins_when_several_loose_patterns_could_match() {
    // A mangled string satisfying both the Instagram two-segment pattern and
    // the Snapchat /add/ pattern must classify as Instagram.
    let url = "https://instagram.com/x/snapchat.com/add/user";
    assert_eq!(platform_of(url), (Platform::Instagram, true));

    let url = "https://x.com/snapchat.com/add/status/9";
    assert_eq!(platform_of(url), (Platform::Twitter, true));
}

#[test]
fn unrelated_urls_are_unknown() {
    for url in [
        "https://example.com/watch?v=abc",
        "https://instagram.com/justaprofile",
        "not a url at all",
    ] {
        assert_eq!(platform_of(url), (Platform::Unknown, false), "{url}");
    }
}

#[test]
fn classification_round_trips_through_link_info() {
    for url in [
        "https://instagram.com/p/CxYz123/",
        "https://x.com/jack/status/20",
        "https://snapchat.com/t/abcDEF",
        "plain text",
        "",
    ] {
        let first = classify(url);
        let second = classify(&first.url);
        assert_eq!(first.platform, second.platform, "{url}");
        assert_eq!(first.is_valid, second.is_valid, "{url}");
    }
}
