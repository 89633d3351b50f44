use clap::{Args as ClapArgs, Parser, Subcommand};
use page_capture::{CaptureError, SourceType};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "page-capture")]
#[command(about = "Extracts page content and sends it to an ingestion server")]
#[command(version)]
pub struct Args {
    /// Settings file
    #[arg(long, global = true, default_value = "page-capture.json")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check whether the ingestion server is reachable
    Status,

    /// Print the extracted content of a page as JSON
    Extract {
        #[command(flatten)]
        source: SourceArgs,

        /// Also write the record to <DIR>/<sanitized url>.json
        #[arg(long)]
        save_dir: Option<PathBuf>,
    },

    /// Extract a page and submit it to the ingestion server
    Capture {
        #[command(flatten)]
        source: SourceArgs,

        /// Leave outbound links out of the submission
        #[arg(long)]
        no_links: bool,

        /// Submit only the selected text when there is a selection
        #[arg(long)]
        selection_only: bool,

        /// Ask the server to re-process a page it already has
        #[arg(long)]
        force: bool,
    },

    /// Answer a page-context request such as {"action":"getSelection"}
    Message {
        /// Request JSON
        request: String,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Update and save connection settings, then re-check the connection
    Settings {
        #[arg(long)]
        server_url: Option<String>,

        #[arg(long)]
        auth_token: Option<String>,
    },
}

#[derive(ClapArgs, Debug)]
pub struct SourceArgs {
    /// Page URL; with --html-file it is the URL the file was saved from
    pub url: Option<String>,

    /// Read the page from an HTML file instead of a browser session
    #[arg(long)]
    pub html_file: Option<PathBuf>,

    /// Selected text to report for the page
    #[arg(long)]
    pub selection: Option<String>,
}

impl SourceArgs {
    /// Convert from CLI arguments to a source
    pub fn source_type(&self) -> Result<SourceType, CaptureError> {
        match (&self.html_file, &self.url) {
            (Some(path), url) => Ok(SourceType::File {
                path: path.clone(),
                url: url.clone(),
            }),
            (None, Some(url)) => Ok(SourceType::Live(url.clone())),
            (None, None) => Err(CaptureError::Config(
                "a page URL or --html-file is required".to_string(),
            )),
        }
    }
}
