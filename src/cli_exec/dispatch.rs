use super::account::{
    handle_login_command, handle_logout_command, handle_profile_command, handle_register_command,
    handle_whoami_command,
};
use super::config::handle_config_command;
use super::links::{
    handle_analytics_command, handle_delete_command, handle_links_command, handle_shorten_command,
};
use super::*;

pub(super) fn handle_command(api_url: Option<String>, command: Commands) -> Result<()> {
    match command {
        Commands::Register(args) => with_client(api_url, |client| {
            handle_register_command(client, args.name, args.email, args.country, args.password)
        })?,
        Commands::Login(args) => {
            with_client(api_url, |client| {
                handle_login_command(client, args.email, args.password)
            })?
        }
        Commands::Logout => with_client(api_url, handle_logout_command)?,
        Commands::Whoami(args) => {
            with_client(api_url, |client| handle_whoami_command(client, args.json))?
        }
        Commands::Shorten(args) => with_client(api_url, |client| {
            handle_shorten_command(client, args.url, args.json)
        })?,
        Commands::Links(args) => with_client(api_url, |client| {
            handle_links_command(client, args.page, args.limit, args.filter, args.json)
        })?,
        Commands::Delete(args) => with_client(api_url, |client| {
            handle_delete_command(client, args.codes, args.json)
        })?,
        Commands::Analytics(args) => {
            with_client(api_url, |client| handle_analytics_command(client, args.json))?
        }
        Commands::Profile { command } => {
            with_client(api_url, |client| handle_profile_command(client, command))?
        }
        Commands::Config { command } => handle_config_command(command)?,
    }

    Ok(())
}

fn with_client<F>(api_url: Option<String>, f: F) -> Result<()>
where
    F: FnOnce(&ApiClient) -> Result<()>,
{
    let client = open_client(api_url)?;
    f(&client)
}
