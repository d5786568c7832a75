use super::*;

#[test]
fn server_message_prefers_detail_field() {
    let body = r#"{"detail": "could not validate credentials"}"#;
    assert_eq!(server_message(401, body), "could not validate credentials");
}

#[test]
fn server_message_falls_back_through_known_keys() {
    assert_eq!(server_message(400, r#"{"message": "bad input"}"#), "bad input");
    assert_eq!(server_message(400, r#"{"error": "boom"}"#), "boom");
}

#[test]
fn server_message_skips_empty_and_non_string_values() {
    assert_eq!(
        server_message(500, r#"{"detail": ""}"#),
        "request failed with status 500"
    );
    assert_eq!(
        server_message(500, r#"{"detail": 7}"#),
        "request failed with status 500"
    );
}

#[test]
fn server_message_survives_unparseable_bodies() {
    assert_eq!(
        server_message(502, "<html>bad gateway</html>"),
        "request failed with status 502"
    );
}

#[test]
fn request_specs_accumulate_query_pairs() {
    let spec = RequestSpec::get("/url-shortner/").query("page", 2).query("limit", 10);
    assert_eq!(spec.method, reqwest::Method::GET);
    assert_eq!(
        spec.query,
        vec![
            ("page".to_string(), "2".to_string()),
            ("limit".to_string(), "10".to_string())
        ]
    );
    assert!(spec.body.is_none());
}

#[test]
fn request_specs_carry_json_bodies() {
    let spec = RequestSpec::post("/auth/login")
        .json(serde_json::json!({"email": "ada@example.com"}));
    assert_eq!(spec.method, reqwest::Method::POST);
    assert_eq!(spec.body.unwrap()["email"], "ada@example.com");
}

#[test]
fn base_url_joins_without_double_slashes() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::open(dir.path().to_path_buf()).unwrap();
    let client = ApiClient::open("http://localhost:9/", store).unwrap();
    assert_eq!(client.url("/auth/login"), "http://localhost:9/auth/login");
}
