//! Wire types for the Shortify backend. The dev server constructs the
//! same shapes, which keeps both sides of the contract in one place.

use serde::{Deserialize, Serialize};

fn default_token_type() -> String {
    "Bearer".to_string()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub country: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token pair issued on login and registration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,

    #[serde(default = "default_token_type")]
    pub token_type: String,

    pub userid: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Replacement access token from `POST /auth/refresh`. The refresh token
/// itself is not rotated; the caller carries it over.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenRefresh {
    pub access_token: String,

    #[serde(default = "default_token_type")]
    pub token_type: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Profile {
    pub userid: String,
    pub name: String,
    pub email: String,
    pub country: String,
    pub created_at: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateLinkRequest {
    pub url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatedLink {
    pub data: ShortLink,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShortLink {
    pub id: String,
    pub url: String,
    pub code: String,

    #[serde(default)]
    pub short_url: String,

    #[serde(default)]
    pub click_count: u64,

    /// Creation time, unix seconds.
    pub createdon: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LinkPage {
    pub data: Vec<ShortLink>,
    pub pagination: Pagination,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,

    #[serde(default)]
    pub next_page: Option<u32>,

    #[serde(default)]
    pub prev_page: Option<u32>,

    pub total_pages: u32,
    pub total_items: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteLinksRequest {
    pub url_codes: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeletedLinks {
    pub deleted: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub overview: AnalyticsOverview,
    pub top_urls: Vec<LinkAnalytics>,
    pub global_stats: GlobalStats,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AnalyticsOverview {
    pub total_urls: u64,
    pub total_clicks: u64,
    pub this_month_clicks: u64,

    /// Average clicks per link.
    pub average_ctr: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LinkAnalytics {
    pub url: String,
    pub code: String,
    pub clicks: u64,

    #[serde(default)]
    pub countries: Vec<SliceStat>,

    #[serde(default)]
    pub devices: DeviceSplit,

    #[serde(default)]
    pub referrers: Vec<SliceStat>,
}

/// One labelled share of a link's clicks (a country, a referrer).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SliceStat {
    pub name: String,
    pub percentage: f64,
    pub clicks: u64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DeviceSplit {
    pub mobile: DeviceStat,
    pub desktop: DeviceStat,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DeviceStat {
    pub percentage: f64,
    pub clicks: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GlobalStats {
    pub top_countries: Vec<SliceStat>,
    pub device_breakdown: DeviceSplit,
    pub top_referrers: Vec<SliceStat>,
}
