use anyhow::{Context, Result};

use shortify::api::ApiClient;

use crate::cli_runtime::{open_client, require_session};
use crate::{Commands, ConfigCommands, ProfileCommands};

mod account;
mod config;
mod dispatch;
mod links;
mod prompt;

pub(super) fn handle_command(api_url: Option<String>, command: Commands) -> Result<()> {
    dispatch::handle_command(api_url, command)
}
