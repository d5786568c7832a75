use super::*;

use shortify::store::SessionStore;

pub(super) fn handle_config_command(command: ConfigCommands) -> Result<()> {
    let store = SessionStore::open(SessionStore::default_root()?)?;
    match command {
        ConfigCommands::Show { json } => {
            let cfg = store.read_config()?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&cfg).context("serialize config json")?
                );
            } else {
                println!("api_url: {}", cfg.api_base_url());
            }
        }
        ConfigCommands::Set { api_url } => {
            let Some(api_url) = api_url else {
                anyhow::bail!("nothing to set (pass `--api-url <URL>`)");
            };
            let mut cfg = store.read_config()?;
            cfg.api_base_url = Some(api_url.trim_end_matches('/').to_string());
            store.write_config(&cfg)?;
            println!("Configuration updated");
        }
    }
    Ok(())
}
