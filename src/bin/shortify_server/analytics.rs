use axum::extract::Extension;
use shortify::api::{
    AnalyticsOverview, AnalyticsReport, DeviceSplit, DeviceStat, GlobalStats, LinkAnalytics,
    SliceStat,
};
use time::OffsetDateTime;

use super::*;

pub(crate) async fn analytics_report(
    State(state): State<Arc<AppState>>,
    Extension(subject): Extension<Subject>,
) -> Json<AnalyticsReport> {
    let links = state.links.read().await;
    let mine: Vec<&StoredLink> = links
        .values()
        .filter(|l| l.owner_id == subject.user_id)
        .collect();
    Json(summarize(&mine, OffsetDateTime::now_utc()))
}

fn summarize(links: &[&StoredLink], now: OffsetDateTime) -> AnalyticsReport {
    let total_urls = links.len() as u64;
    let total_clicks: u64 = links.iter().map(|l| l.clicks.len() as u64).sum();
    let this_month_clicks = links
        .iter()
        .flat_map(|l| &l.clicks)
        .filter(|c| same_month(c.at_unix, now))
        .count() as u64;
    let average_ctr = if total_urls == 0 {
        0.0
    } else {
        total_clicks as f64 / total_urls as f64
    };

    let mut ranked: Vec<&&StoredLink> = links.iter().collect();
    ranked.sort_by(|a, b| {
        b.clicks
            .len()
            .cmp(&a.clicks.len())
            .then_with(|| a.code.cmp(&b.code))
    });
    let top_urls: Vec<LinkAnalytics> = ranked.iter().take(5).map(|l| link_breakdown(l)).collect();

    let all_clicks: Vec<&Click> = links.iter().flat_map(|l| &l.clicks).collect();

    AnalyticsReport {
        overview: AnalyticsOverview {
            total_urls,
            total_clicks,
            this_month_clicks,
            average_ctr,
        },
        top_urls,
        global_stats: GlobalStats {
            top_countries: slice_stats(&all_clicks, |c| &c.country, 5),
            device_breakdown: device_split(&all_clicks),
            top_referrers: slice_stats(&all_clicks, |c| &c.referrer, 5),
        },
    }
}

fn link_breakdown(link: &StoredLink) -> LinkAnalytics {
    let clicks: Vec<&Click> = link.clicks.iter().collect();
    LinkAnalytics {
        url: link.url.clone(),
        code: link.code.clone(),
        clicks: clicks.len() as u64,
        countries: slice_stats(&clicks, |c| &c.country, 3),
        devices: device_split(&clicks),
        referrers: slice_stats(&clicks, |c| &c.referrer, 3),
    }
}

/// Counts clicks per label, keeping the `keep` largest shares.
fn slice_stats<F>(clicks: &[&Click], label: F, keep: usize) -> Vec<SliceStat>
where
    F: Fn(&Click) -> &str,
{
    let total = clicks.len() as u64;
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for click in clicks {
        *counts.entry(label(click)).or_insert(0) += 1;
    }

    let mut stats: Vec<SliceStat> = counts
        .into_iter()
        .map(|(name, clicks)| SliceStat {
            name: name.to_string(),
            percentage: percentage(clicks, total),
            clicks,
        })
        .collect();
    stats.sort_by(|a, b| b.clicks.cmp(&a.clicks).then_with(|| a.name.cmp(&b.name)));
    stats.truncate(keep);
    stats
}

fn device_split(clicks: &[&Click]) -> DeviceSplit {
    let total = clicks.len() as u64;
    let mobile = clicks.iter().filter(|c| c.device == "mobile").count() as u64;
    let desktop = total - mobile;
    DeviceSplit {
        mobile: DeviceStat {
            percentage: percentage(mobile, total),
            clicks: mobile,
        },
        desktop: DeviceStat {
            percentage: percentage(desktop, total),
            clicks: desktop,
        },
    }
}

// One decimal place, so 1/3 comes out as 33.3 rather than a float tail.
fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 * 1000.0 / total as f64).round() / 10.0
    }
}

fn same_month(ts: i64, now: OffsetDateTime) -> bool {
    OffsetDateTime::from_unix_timestamp(ts)
        .is_ok_and(|t| t.year() == now.year() && t.month() == now.month())
}

#[cfg(test)]
#[path = "../../tests/bin/shortify_server/analytics_tests.rs"]
mod tests;
