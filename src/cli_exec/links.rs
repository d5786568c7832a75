use super::*;

use shortify::api::{AnalyticsReport, LinkPage};

pub(super) fn handle_shorten_command(client: &ApiClient, url: String, json: bool) -> Result<()> {
    let link = client.shorten(&url)?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&link).context("serialize link json")?
        );
    } else {
        println!("{}", link.short_url);
    }
    Ok(())
}

pub(super) fn handle_links_command(
    client: &ApiClient,
    page: u32,
    limit: u32,
    filter: Option<String>,
    json: bool,
) -> Result<()> {
    let mut page: LinkPage = client.links(page, limit)?;

    if let Some(query) = &filter {
        let matcher = globset::Glob::new(query)
            .with_context(|| format!("invalid glob: {}", query))?
            .compile_matcher();
        page.data
            .retain(|link| matcher.is_match(&link.code) || matcher.is_match(&link.url));
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&page).context("serialize links json")?
        );
        return Ok(());
    }

    if page.data.is_empty() {
        match &filter {
            Some(query) => println!("No links match {}", query),
            None => println!("No links yet (run `shortify shorten <url>`)"),
        }
        return Ok(());
    }

    for link in &page.data {
        println!("{}  {:>6}  {}", link.code, link.click_count, link.url);
    }
    println!(
        "page {} of {} ({} links)",
        page.pagination.current_page, page.pagination.total_pages, page.pagination.total_items
    );
    Ok(())
}

pub(super) fn handle_delete_command(
    client: &ApiClient,
    codes: Vec<String>,
    json: bool,
) -> Result<()> {
    let requested = codes.len();
    let deleted = client.delete_links(&codes)?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "deleted": deleted }))
                .context("serialize delete json")?
        );
    } else {
        println!("Deleted {} of {} links", deleted, requested);
    }
    Ok(())
}

pub(super) fn handle_analytics_command(client: &ApiClient, json: bool) -> Result<()> {
    let report: AnalyticsReport = client.analytics()?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize analytics json")?
        );
        return Ok(());
    }

    let overview = &report.overview;
    println!("total urls:        {}", overview.total_urls);
    println!("total clicks:      {}", overview.total_clicks);
    println!("clicks this month: {}", overview.this_month_clicks);
    println!("avg clicks/link:   {:.1}", overview.average_ctr);

    if !report.top_urls.is_empty() {
        println!();
        println!("top links:");
        for link in &report.top_urls {
            println!("  {}  {:>6}  {}", link.code, link.clicks, link.url);
        }
    }

    let global = &report.global_stats;
    if !global.top_countries.is_empty() {
        println!();
        println!("top countries:");
        for stat in &global.top_countries {
            println!("  {:<12} {:>5.1}%  {:>6}", stat.name, stat.percentage, stat.clicks);
        }
    }

    println!();
    println!("devices:");
    let devices = &global.device_breakdown;
    println!(
        "  {:<12} {:>5.1}%  {:>6}",
        "mobile", devices.mobile.percentage, devices.mobile.clicks
    );
    println!(
        "  {:<12} {:>5.1}%  {:>6}",
        "desktop", devices.desktop.percentage, devices.desktop.clicks
    );

    if !global.top_referrers.is_empty() {
        println!();
        println!("top referrers:");
        for stat in &global.top_referrers {
            println!("  {:<12} {:>5.1}%  {:>6}", stat.name, stat.percentage, stat.clicks);
        }
    }

    Ok(())
}
