use super::*;

fn register_request() -> RegisterRequest {
    RegisterRequest {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        country: "UK".to_string(),
        password: "hunter22".to_string(),
    }
}

#[test]
fn accepts_plain_addresses() {
    assert!(email_shape("ada@example.com").is_ok());
    assert!(email_shape("a.b+c@mail.example.org").is_ok());
}

#[test]
fn rejects_malformed_addresses() {
    assert!(email_shape("ada.example.com").is_err());
    assert!(email_shape("@example.com").is_err());
    assert!(email_shape("ada@example").is_err());
    assert!(email_shape("ada@example.").is_err());
    assert!(email_shape("ada@ex@ample.com").is_err());
    assert!(email_shape("ada smith@example.com").is_err());
    assert!(email_shape("").is_err());
}

#[test]
fn password_boundary_is_six_characters() {
    assert!(password_strength("12345").is_err());
    assert!(password_strength("123456").is_ok());
}

#[test]
fn credential_failures_are_validation_errors() {
    let err = credentials("not-an-email", "longenough").unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let err = credentials("ada@example.com", "short").unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[test]
fn register_requires_name_and_country() {
    let mut req = register_request();
    req.name = "   ".to_string();
    assert!(register_fields(&req).is_err());

    let mut req = register_request();
    req.country = String::new();
    assert!(register_fields(&req).is_err());

    assert!(register_fields(&register_request()).is_ok());
}

#[test]
fn target_urls_must_be_absolute_http() {
    assert!(target_url("https://example.com/a?b=c").is_ok());
    assert!(target_url("http://example.com").is_ok());

    assert!(target_url("ftp://example.com").is_err());
    assert!(target_url("example.com/path").is_err());
    assert!(target_url("https://").is_err());
    assert!(target_url("not a url").is_err());
}
