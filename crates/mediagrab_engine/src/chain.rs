use futures_util::future::BoxFuture;
use grab_logging::{grab_debug, grab_warn};
use mediagrab_core::MediaItem;

use crate::types::StrategyError;

/// One extraction attempt within an adapter's ordered chain.
pub(crate) type StrategyFuture<'a> = BoxFuture<'a, Result<Vec<MediaItem>, StrategyError>>;

/// Folds over an adapter's fallback chain.
///
/// Entries run strictly sequentially; the first one yielding at least one
/// item wins and later entries are never polled. A fault or an empty result
/// both count as that strategy failing and advance the chain. Returns `None`
/// once every entry is exhausted.
pub(crate) async fn run_chain(
    platform: &str,
    strategies: Vec<(&'static str, StrategyFuture<'_>)>,
) -> Option<Vec<MediaItem>> {
    for (name, attempt) in strategies {
        match attempt.await {
            Ok(items) if !items.is_empty() => {
                grab_debug!("{platform}: {name} resolved {} media item(s)", items.len());
                return Some(items);
            }
            Ok(_) => grab_debug!("{platform}: {name} returned no media"),
            Err(err) => grab_debug!("{platform}: {name} failed: {err}"),
        }
    }
    grab_warn!("{platform}: all extraction strategies exhausted");
    None
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures_util::FutureExt;
    use mediagrab_core::{MediaItem, MediaType};

    use super::run_chain;
    use crate::types::StrategyError;

    fn video() -> MediaItem {
        MediaItem::new("https://cdn.example/clip.mp4", MediaType::Video)
    }

    #[tokio::test]
    async fn first_non_empty_result_wins_and_later_strategies_never_run() {
        grab_logging::initialize_for_tests();
        let third_calls = AtomicUsize::new(0);

        let result = run_chain(
            "test",
            vec![
                ("empty", async { Ok(Vec::new()) }.boxed()),
                ("hit", async { Ok(vec![video()]) }.boxed()),
                (
                    "never",
                    async {
                        third_calls.fetch_add(1, Ordering::SeqCst);
                        Ok(vec![video()])
                    }
                    .boxed(),
                ),
            ],
        )
        .await;

        assert_eq!(result, Some(vec![video()]));
        assert_eq!(third_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn faults_advance_the_chain_instead_of_aborting_it() {
        let result = run_chain(
            "test",
            vec![
                (
                    "fault",
                    async { Err(StrategyError::Network("connection reset".into())) }.boxed(),
                ),
                ("hit", async { Ok(vec![video()]) }.boxed()),
            ],
        )
        .await;

        assert_eq!(result, Some(vec![video()]));
    }

    #[tokio::test]
    async fn exhausted_chain_yields_none() {
        let result = run_chain(
            "test",
            vec![
                ("fault", async { Err(StrategyError::Status(503)) }.boxed()),
                ("empty", async { Ok(Vec::new()) }.boxed()),
            ],
        )
        .await;

        assert_eq!(result, None);
    }
}
