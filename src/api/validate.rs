use super::*;
use crate::error::ApiError;

/// Local checks run before any credential leaves the process.
pub(super) fn credentials(email: &str, password: &str) -> Result<(), ApiError> {
    email_shape(email)?;
    password_strength(password)
}

pub(super) fn register_fields(req: &RegisterRequest) -> Result<(), ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::Validation("name is required".to_string()));
    }
    if req.country.trim().is_empty() {
        return Err(ApiError::Validation("country is required".to_string()));
    }
    credentials(&req.email, &req.password)
}

pub(super) fn email_shape(email: &str) -> Result<(), ApiError> {
    let ok = match email.split_once('@') {
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
    if ok {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "invalid email address: {email}"
        )))
    }
}

pub(super) fn password_strength(password: &str) -> Result<(), ApiError> {
    if password.len() < 6 {
        return Err(ApiError::Validation(
            "password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

/// Shorten targets must be absolute http(s) URLs; everything else is
/// refused locally.
pub(super) fn target_url(url: &str) -> Result<(), ApiError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|_| ApiError::Validation(format!("invalid URL: {url}")))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ApiError::Validation(format!(
            "URL must use http or https, got {}",
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none() {
        return Err(ApiError::Validation(format!("URL has no host: {url}")));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/api/validate_tests.rs"]
mod tests;
