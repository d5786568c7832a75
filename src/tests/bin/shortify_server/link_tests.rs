use super::*;

#[test]
fn referrer_host_strips_scheme_and_path() {
    assert_eq!(
        referrer_host("https://news.site/article?id=1"),
        Some("news.site".to_string())
    );
    assert_eq!(
        referrer_host("http://a.example.com"),
        Some("a.example.com".to_string())
    );
}

#[test]
fn referrer_host_handles_schemeless_values() {
    assert_eq!(referrer_host("news.site/path"), Some("news.site".to_string()));
}

#[test]
fn referrer_host_rejects_empty_hosts() {
    assert_eq!(referrer_host("https://"), None);
    assert_eq!(referrer_host(""), None);
}

#[test]
fn clicks_default_to_unknown_desktop_direct() {
    let click = click_from_headers(&HeaderMap::new());
    assert_eq!(click.country, "unknown");
    assert_eq!(click.device, "desktop");
    assert_eq!(click.referrer, "direct");
}

#[test]
fn clicks_classify_mobile_user_agents() {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)"
            .parse()
            .unwrap(),
    );
    assert_eq!(click_from_headers(&headers).device, "mobile");

    let mut headers = HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        "Mozilla/5.0 (X11; Linux x86_64)".parse().unwrap(),
    );
    assert_eq!(click_from_headers(&headers).device, "desktop");
}

#[test]
fn clicks_prefer_the_cloudflare_country_header() {
    let mut headers = HeaderMap::new();
    headers.insert("cf-ipcountry", "de".parse().unwrap());
    headers.insert("x-country", "US".parse().unwrap());
    assert_eq!(click_from_headers(&headers).country, "DE");
}

#[test]
fn clicks_fall_back_to_the_plain_country_header() {
    let mut headers = HeaderMap::new();
    headers.insert("x-country", "fr".parse().unwrap());
    assert_eq!(click_from_headers(&headers).country, "FR");
}

#[test]
fn clicks_record_only_the_referrer_host() {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::REFERER,
        "https://news.site/article/42".parse().unwrap(),
    );
    assert_eq!(click_from_headers(&headers).referrer, "news.site");
}

#[test]
fn wire_links_carry_the_request_host() {
    let link = StoredLink {
        id: "id-1".to_string(),
        owner_id: "owner".to_string(),
        url: "https://example.com/a".to_string(),
        code: "abc1234".to_string(),
        created_at_unix: 5,
        clicks: Vec::new(),
    };
    let wire = wire_link(&link, "127.0.0.1:3000");
    assert_eq!(wire.short_url, "http://127.0.0.1:3000/abc1234");
    assert_eq!(wire.click_count, 0);
    assert_eq!(wire.createdon, 5);
}
