use super::*;

fn click(country: &str, device: &str, referrer: &str, at_unix: i64) -> Click {
    Click {
        at_unix,
        country: country.to_string(),
        device: device.to_string(),
        referrer: referrer.to_string(),
    }
}

fn link(code: &str, clicks: Vec<Click>) -> StoredLink {
    StoredLink {
        id: format!("id-{code}"),
        owner_id: "owner".to_string(),
        url: format!("https://example.com/{code}"),
        code: code.to_string(),
        created_at_unix: 1_700_000_000,
        clicks,
    }
}

// 2023-11-14, as a fixed "now" for month arithmetic.
fn mid_november() -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
}

#[test]
fn empty_account_summarizes_to_zeros() {
    let report = summarize(&[], mid_november());
    assert_eq!(report.overview.total_urls, 0);
    assert_eq!(report.overview.total_clicks, 0);
    assert_eq!(report.overview.average_ctr, 0.0);
    assert!(report.top_urls.is_empty());
    assert!(report.global_stats.top_countries.is_empty());
    assert_eq!(report.global_stats.device_breakdown.mobile.clicks, 0);
    assert_eq!(report.global_stats.device_breakdown.desktop.clicks, 0);
}

#[test]
fn overview_counts_links_and_clicks() {
    let a = link(
        "aaa",
        vec![
            click("US", "mobile", "direct", 1_700_000_100),
            click("US", "desktop", "direct", 1_600_000_000),
        ],
    );
    let b = link("bbb", vec![click("DE", "desktop", "news.site", 1_700_000_200)]);

    let report = summarize(&[&a, &b], mid_november());
    assert_eq!(report.overview.total_urls, 2);
    assert_eq!(report.overview.total_clicks, 3);
    assert_eq!(report.overview.this_month_clicks, 2);
    assert_eq!(report.overview.average_ctr, 1.5);
}

#[test]
fn this_month_is_a_calendar_month_not_a_window() {
    // 2023-11-30, with one click on Nov 1 and one a second before it.
    let end_of_november = OffsetDateTime::from_unix_timestamp(1_701_302_400).unwrap();
    let l = link(
        "aaa",
        vec![
            click("US", "mobile", "direct", 1_698_796_800),
            click("US", "mobile", "direct", 1_698_796_799),
        ],
    );

    let report = summarize(&[&l], end_of_november);
    assert_eq!(report.overview.this_month_clicks, 1);
}

#[test]
fn top_urls_rank_by_clicks_with_stable_ties() {
    let a = link("aaa", vec![click("US", "mobile", "direct", 1_700_000_000)]);
    let b = link(
        "bbb",
        vec![
            click("US", "mobile", "direct", 1_700_000_000),
            click("DE", "desktop", "direct", 1_700_000_000),
        ],
    );
    let c = link("ccc", vec![click("FR", "mobile", "direct", 1_700_000_000)]);

    let report = summarize(&[&a, &b, &c], mid_november());
    let codes: Vec<&str> = report.top_urls.iter().map(|l| l.code.as_str()).collect();
    assert_eq!(codes, vec!["bbb", "aaa", "ccc"]);
}

#[test]
fn top_urls_keep_at_most_five() {
    let links: Vec<StoredLink> = (0..7)
        .map(|i| {
            link(
                &format!("lnk{i}"),
                vec![click("US", "mobile", "direct", 1_700_000_000)],
            )
        })
        .collect();
    let refs: Vec<&StoredLink> = links.iter().collect();

    let report = summarize(&refs, mid_november());
    assert_eq!(report.top_urls.len(), 5);
}

#[test]
fn shares_round_to_one_decimal() {
    let l = link(
        "aaa",
        vec![
            click("DE", "mobile", "direct", 1_700_000_000),
            click("DE", "desktop", "direct", 1_700_000_000),
            click("US", "desktop", "direct", 1_700_000_000),
        ],
    );

    let report = summarize(&[&l], mid_november());
    let countries = &report.global_stats.top_countries;
    assert_eq!(countries[0].name, "DE");
    assert_eq!(countries[0].clicks, 2);
    assert_eq!(countries[0].percentage, 66.7);
    assert_eq!(countries[1].name, "US");
    assert_eq!(countries[1].percentage, 33.3);
}

#[test]
fn device_split_partitions_every_click() {
    let l = link(
        "aaa",
        vec![
            click("US", "mobile", "direct", 1_700_000_000),
            click("US", "mobile", "direct", 1_700_000_000),
            click("US", "desktop", "direct", 1_700_000_000),
            click("US", "desktop", "direct", 1_700_000_000),
        ],
    );

    let report = summarize(&[&l], mid_november());
    let split = &report.global_stats.device_breakdown;
    assert_eq!(split.mobile.clicks, 2);
    assert_eq!(split.desktop.clicks, 2);
    assert_eq!(split.mobile.percentage, 50.0);
    assert_eq!(split.desktop.percentage, 50.0);
}

#[test]
fn per_link_breakdown_keeps_top_three_slices() {
    let l = link(
        "aaa",
        vec![
            click("US", "mobile", "direct", 1_700_000_000),
            click("DE", "mobile", "direct", 1_700_000_000),
            click("FR", "mobile", "direct", 1_700_000_000),
            click("BR", "mobile", "direct", 1_700_000_000),
        ],
    );

    let report = summarize(&[&l], mid_november());
    assert_eq!(report.top_urls[0].countries.len(), 3);
}

#[test]
fn referrer_shares_aggregate_across_links() {
    let a = link("aaa", vec![click("US", "mobile", "news.site", 1_700_000_000)]);
    let b = link(
        "bbb",
        vec![
            click("US", "mobile", "news.site", 1_700_000_000),
            click("US", "mobile", "direct", 1_700_000_000),
        ],
    );

    let report = summarize(&[&a, &b], mid_november());
    let referrers = &report.global_stats.top_referrers;
    assert_eq!(referrers[0].name, "news.site");
    assert_eq!(referrers[0].clicks, 2);
    assert_eq!(referrers[1].name, "direct");
    assert_eq!(referrers[1].clicks, 1);
}
