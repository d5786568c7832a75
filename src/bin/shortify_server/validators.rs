use super::*;

pub(super) fn validate_register_payload(
    name: &str,
    email: &str,
    country: &str,
    password: &str,
) -> Result<()> {
    if name.trim().is_empty() {
        return Err(anyhow::anyhow!("name is required"));
    }
    if country.trim().is_empty() {
        return Err(anyhow::anyhow!("country is required"));
    }
    validate_email(email)?;
    validate_password(password)
}

pub(super) fn validate_email(email: &str) -> Result<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
                && domain
                    .split_once('.')
                    .is_some_and(|(host, rest)| !host.is_empty() && !rest.is_empty())
        }
        None => false,
    };
    if !valid {
        return Err(anyhow::anyhow!("invalid email address"));
    }
    Ok(())
}

pub(super) fn validate_password(password: &str) -> Result<()> {
    if password.len() < 6 {
        return Err(anyhow::anyhow!("password must be at least 6 characters"));
    }
    Ok(())
}

pub(super) fn validate_target_url(url: &str) -> Result<()> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| anyhow::anyhow!("url must be absolute http or https"))?;
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() {
        return Err(anyhow::anyhow!("url has no host"));
    }
    Ok(())
}
