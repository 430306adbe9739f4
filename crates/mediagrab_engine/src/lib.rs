//! Mediagrab engine: extraction chains over unofficial endpoints, and the
//! media saver.
mod chain;
mod client;
mod filename;
mod instagram;
mod orchestrator;
mod save;
mod scan;
mod snapchat;
mod twitter;
mod types;

pub use client::{ClientSettings, HttpClient, RelayProxy};
pub use filename::media_filename;
pub use instagram::{InstagramAdapter, InstagramEndpoints};
pub use orchestrator::{MediaExtractor, ProviderAdapter};
pub use save::{ensure_output_dir, DirSink, MediaSaver, MediaSink, SaveOutcome, SinkError};
pub use snapchat::{SnapchatAdapter, SnapchatEndpoints};
pub use twitter::{TwitterAdapter, TwitterEndpoints};
pub use types::{ExtractError, StrategyError};
