use super::*;

pub(super) fn handle_register_command(
    client: &ApiClient,
    name: String,
    email: String,
    country: String,
    password: Option<String>,
) -> Result<()> {
    let password = prompt::resolve_password(password, true)?;
    let req = shortify::api::RegisterRequest {
        name,
        email: email.clone(),
        country,
        password,
    };
    client.register(&req)?;
    println!("Registered and signed in as {}", email);
    Ok(())
}

pub(super) fn handle_login_command(
    client: &ApiClient,
    email: String,
    password: Option<String>,
) -> Result<()> {
    let password = prompt::resolve_password(password, false)?;
    client.login(&email, &password)?;
    println!("Signed in as {}", email);
    Ok(())
}

pub(super) fn handle_logout_command(client: &ApiClient) -> Result<()> {
    client.logout();
    println!("Signed out");
    Ok(())
}

/// Reports the locally stored session without touching the network.
/// Token values stay out of the output.
pub(super) fn handle_whoami_command(client: &ApiClient, json: bool) -> Result<()> {
    let session = require_session(client)?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "user_id": session.user_id,
                "token_type": session.token_type,
                "api_url": client.base_url(),
            }))
            .context("serialize whoami json")?
        );
    } else {
        println!("user_id: {}", session.user_id);
        println!("token_type: {}", session.token_type);
        println!("api_url: {}", client.base_url());
    }
    Ok(())
}

pub(super) fn handle_profile_command(client: &ApiClient, command: ProfileCommands) -> Result<()> {
    match command {
        ProfileCommands::Show { json } => {
            let profile = client.profile()?;
            print_profile(&profile, json)
        }
        ProfileCommands::Update {
            name,
            country,
            json,
        } => {
            let update = shortify::api::ProfileUpdate { name, country };
            let profile = client.update_profile(&update)?;
            print_profile(&profile, json)
        }
    }
}

fn print_profile(profile: &shortify::api::Profile, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(profile).context("serialize profile json")?
        );
    } else {
        println!("name: {}", profile.name);
        println!("email: {}", profile.email);
        println!("country: {}", profile.country);
        println!("member since: {}", profile.created_at);
    }
    Ok(())
}
