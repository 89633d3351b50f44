use clap::Parser;
use page_capture::client::{ConnectionState, IngestClient};
use page_capture::messages::{self, Request};
use page_capture::{Capture, CaptureConfig, CaptureError, CaptureOptions, ContentRecord, utils};
use std::path::Path;
use std::process::ExitCode;

mod args;
use args::{Args, Command, SourceArgs};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ::log::error!("{}", e);
            eprintln!("error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<(), CaptureError> {
    let config = CaptureConfig::load(&args.config)?;

    match &args.command {
        Command::Status => {
            match check_connection(&config).await? {
                ConnectionState::Ready => Ok(()),
                ConnectionState::Busy => Err(CaptureError::Rejected(
                    "The ingestion server is processing; capture is disabled".to_string(),
                )),
                ConnectionState::Disconnected(reason) => Err(CaptureError::Connection(reason)),
            }
        }
        Command::Extract { source, save_dir } => {
            let record = builder(source, config)?.extract().await?;
            let json = serde_json::to_string_pretty(&record)?;
            println!("{}", json);
            if let Some(dir) = save_dir {
                save_record(dir, &record, &json)?;
            }
            Ok(())
        }
        Command::Capture {
            source,
            no_links,
            selection_only,
            force,
        } => {
            let options = CaptureOptions {
                capture_links: !no_links,
                capture_selection: *selection_only,
                force_update: *force,
            };
            let outcome = builder(source, config)?.submit(&options).await?;
            println!("{}", outcome.message);
            if let Some(stats) = outcome.stats {
                println!("entities: {}  links: {}", stats.entities, stats.links);
            }
            Ok(())
        }
        Command::Message { request, source } => {
            let request: Request = serde_json::from_str(request)?;
            let capture = builder(source, config)?;
            let extractor = capture.extractor()?;
            let snapshot = capture.snapshot().await?;
            let response = messages::handle(request, &snapshot, &extractor);
            println!("{}", serde_json::to_string(&response)?);
            Ok(())
        }
        Command::Settings {
            server_url,
            auth_token,
        } => {
            // Edit the stored settings, never the environment-overridden copy
            let mut config = config;
            if let Some(url) = server_url {
                config.server.server_url = url.clone();
            }
            if let Some(token) = auth_token {
                config.server.auth_token = token.clone();
            }
            config.save(&args.config)?;
            println!("Settings saved");

            // Reload so the check uses exactly what was persisted
            let config = CaptureConfig::load(&args.config)?;
            check_connection(&config).await?;
            Ok(())
        }
    }
}

fn builder(source: &SourceArgs, config: CaptureConfig) -> Result<Capture, CaptureError> {
    let capture = Capture::new(source.source_type()?).with_config(config.with_env_overrides());
    Ok(match &source.selection {
        Some(selection) => capture.with_selection(selection.clone()),
        None => capture,
    })
}

async fn check_connection(config: &CaptureConfig) -> Result<ConnectionState, CaptureError> {
    let client = IngestClient::new(&config.server)?;
    let state = client.check_connection().await;
    match &state {
        ConnectionState::Ready => println!("Connected to {}", client.base_url()),
        ConnectionState::Busy => println!("{} is processing...", client.base_url()),
        ConnectionState::Disconnected(_) => println!(
            "Not connected. Make sure the ingestion server is running on {}",
            client.base_url()
        ),
    }
    Ok(state)
}

fn save_record(dir: &Path, record: &ContentRecord, json: &str) -> Result<(), CaptureError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.json", utils::sanitize_filename(&record.url)));
    std::fs::write(&path, json)?;
    ::log::info!("Saved record to {}", path.display());
    Ok(())
}
