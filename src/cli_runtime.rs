use anyhow::{Context, Result};
use clap::Parser;

use shortify::api::ApiClient;
use shortify::model::Session;
use shortify::store::SessionStore;

use crate::Commands;

#[derive(Parser)]
#[command(name = "shortify")]
#[command(about = "Shortify URL shortener", long_about = None)]
pub(crate) struct Cli {
    /// Override the API base URL for this invocation
    #[arg(long = "api-url", value_name = "URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            shortify::tui::run_with_options(shortify::tui::TuiRunOptions {
                api_url: cli.api_url,
            })?;
        }
        Some(command) => crate::cli_exec::handle_command(cli.api_url, command)?,
    }

    Ok(())
}

/// Opens the API client against the override URL, the configured URL, or
/// the built-in default, in that order.
pub(crate) fn open_client(api_url: Option<String>) -> Result<ApiClient> {
    let store = SessionStore::open(SessionStore::default_root()?)?;
    let base_url = match api_url {
        Some(url) => url,
        None => store.read_config()?.api_base_url().to_string(),
    };
    ApiClient::open(base_url, store)
}

pub(crate) fn require_session(client: &ApiClient) -> Result<Session> {
    client
        .current_session()
        .context("not signed in (run `shortify login --email ...`)")
}
