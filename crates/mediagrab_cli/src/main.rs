//! mediagrab command line: classify a pasted link, resolve its media
//! through the extraction chains, and save whatever comes back.
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use grab_logging::{grab_error, grab_info};
use mediagrab_core::{classify, DownloadResponse};
use mediagrab_engine::{
    ClientSettings, DirSink, HttpClient, MediaExtractor, MediaSaver, SaveOutcome,
};

fn main() -> ExitCode {
    logging::initialize();

    let mut args = std::env::args().skip(1);
    let Some(url) = args.next() else {
        eprintln!("usage: mediagrab <url> [output-dir]");
        return ExitCode::FAILURE;
    };
    let output_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("downloads"));

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            grab_error!("could not start async runtime: {err}");
            return ExitCode::FAILURE;
        }
    };
    runtime.block_on(run(&url, output_dir))
}

async fn run(url: &str, output_dir: PathBuf) -> ExitCode {
    let info = classify(url);
    if !info.is_valid {
        let envelope = DownloadResponse::failed(
            info.platform,
            "link not recognized as Instagram, Twitter/X, or Snapchat",
        );
        print_envelope(&envelope);
        return ExitCode::FAILURE;
    }
    grab_info!("detected {} link", info.platform);

    let extractor = match MediaExtractor::new(ClientSettings::default()) {
        Ok(extractor) => extractor,
        Err(err) => {
            grab_error!("could not build http client: {err}");
            return ExitCode::FAILURE;
        }
    };
    let envelope = extractor.extract(url, info.platform).await;
    print_envelope(&envelope);
    if !envelope.success {
        return ExitCode::FAILURE;
    }

    let client = match HttpClient::new(ClientSettings::default()) {
        Ok(client) => client,
        Err(err) => {
            grab_error!("could not build http client: {err}");
            return ExitCode::FAILURE;
        }
    };
    let saver = MediaSaver::new(client, DirSink::new(output_dir));
    for (index, item) in envelope.media_items.iter().enumerate() {
        let stem = format!("{}-{}", info.platform, index + 1);
        match saver.save(&item.url, &stem, item.media_type).await {
            Ok(SaveOutcome::Saved(path)) => grab_info!("saved {}", path.display()),
            Ok(SaveOutcome::LinkedOnly(path)) => {
                grab_info!("could not fetch the bytes; wrote link file {}", path.display());
            }
            Err(err) => {
                grab_error!("saving {} failed: {err}", item.url);
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}

fn print_envelope(envelope: &DownloadResponse) {
    match serde_json::to_string_pretty(envelope) {
        Ok(json) => println!("{json}"),
        Err(err) => grab_error!("could not serialize response: {err}"),
    }
}
