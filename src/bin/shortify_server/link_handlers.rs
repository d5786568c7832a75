use axum::extract::{Extension, Path, Query};
use axum::http::HeaderMap;
use axum::response::Redirect;
use shortify::api::{
    CreateLinkRequest, CreatedLink, DeleteLinksRequest, DeletedLinks, LinkPage, Pagination,
    ShortLink,
};

use super::*;

pub(crate) async fn create_link(
    State(state): State<Arc<AppState>>,
    Extension(subject): Extension<Subject>,
    headers: HeaderMap,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<Response, Response> {
    validate_target_url(&payload.url).map_err(bad_request)?;

    let link = {
        let mut links = state.links.write().await;
        let code = loop {
            let candidate = generate_short_code().map_err(internal_error)?;
            if !links.contains_key(&candidate) {
                break candidate;
            }
        };
        let link = StoredLink {
            id: generate_token_secret().map_err(internal_error)?,
            owner_id: subject.user_id.clone(),
            url: payload.url.clone(),
            code,
            created_at_unix: now_unix(),
            clicks: Vec::new(),
        };
        links.insert(link.code.clone(), link.clone());
        link
    };

    {
        let links = state.links.read().await;
        if let Err(err) = persist_links_to_disk(&state.data_dir, &links) {
            return Err(internal_error(err));
        }
    }

    let wire = wire_link(&link, &request_host(&headers));
    Ok((StatusCode::CREATED, Json(CreatedLink { data: wire })).into_response())
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct ListParams {
    #[serde(default)]
    page: Option<u32>,

    #[serde(default)]
    limit: Option<u32>,
}

pub(crate) async fn list_links(
    State(state): State<Arc<AppState>>,
    Extension(subject): Extension<Subject>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Json<LinkPage> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(10).clamp(1, 100);
    let host = request_host(&headers);

    let links = state.links.read().await;
    let mut mine: Vec<&StoredLink> = links
        .values()
        .filter(|l| l.owner_id == subject.user_id)
        .collect();
    // Newest first; code breaks ties so pages are stable.
    mine.sort_by(|a, b| {
        b.created_at_unix
            .cmp(&a.created_at_unix)
            .then_with(|| a.code.cmp(&b.code))
    });

    let total_items = mine.len() as u64;
    let per_page = limit as u64;
    let total_pages = ((total_items + per_page - 1) / per_page).max(1) as u32;

    let start = (page as usize - 1) * limit as usize;
    let data: Vec<ShortLink> = mine
        .iter()
        .skip(start)
        .take(limit as usize)
        .map(|l| wire_link(l, &host))
        .collect();

    Json(LinkPage {
        data,
        pagination: Pagination {
            current_page: page,
            next_page: (page < total_pages).then_some(page + 1),
            prev_page: (page > 1).then_some(page - 1),
            total_pages,
            total_items,
        },
    })
}

pub(crate) async fn delete_links(
    State(state): State<Arc<AppState>>,
    Extension(subject): Extension<Subject>,
    Json(payload): Json<DeleteLinksRequest>,
) -> Result<Json<DeletedLinks>, Response> {
    let deleted = {
        let mut links = state.links.write().await;
        let mut deleted = 0u64;
        for code in &payload.url_codes {
            if links
                .get(code)
                .is_some_and(|l| l.owner_id == subject.user_id)
            {
                links.remove(code);
                deleted += 1;
            }
        }
        deleted
    };

    if deleted > 0 {
        let links = state.links.read().await;
        if let Err(err) = persist_links_to_disk(&state.data_dir, &links) {
            return Err(internal_error(err));
        }
    }

    Ok(Json(DeletedLinks { deleted }))
}

pub(crate) async fn follow_link(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    headers: HeaderMap,
) -> Result<Response, Response> {
    let target = {
        let mut links = state.links.write().await;
        let Some(link) = links.get_mut(&code) else {
            return Err(not_found());
        };
        link.clicks.push(click_from_headers(&headers));
        link.url.clone()
    };

    {
        let links = state.links.read().await;
        if let Err(err) = persist_links_to_disk(&state.data_dir, &links) {
            return Err(internal_error(err));
        }
    }

    Ok(Redirect::temporary(&target).into_response())
}

fn wire_link(link: &StoredLink, host: &str) -> ShortLink {
    ShortLink {
        id: link.id.clone(),
        url: link.url.clone(),
        code: link.code.clone(),
        short_url: format!("http://{}/{}", host, link.code),
        click_count: link.clicks.len() as u64,
        createdon: link.created_at_unix,
    }
}

fn request_host(headers: &HeaderMap) -> String {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost")
        .to_string()
}

fn click_from_headers(headers: &HeaderMap) -> Click {
    let country = headers
        .get("cf-ipcountry")
        .or_else(|| headers.get("x-country"))
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_uppercase)
        .unwrap_or_else(|| "unknown".to_string());

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let device = if user_agent.contains("mobile")
        || user_agent.contains("android")
        || user_agent.contains("iphone")
    {
        "mobile"
    } else {
        "desktop"
    };

    let referrer = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(referrer_host)
        .unwrap_or_else(|| "direct".to_string());

    Click {
        at_unix: now_unix(),
        country,
        device: device.to_string(),
        referrer,
    }
}

fn referrer_host(value: &str) -> Option<String> {
    let rest = value.split_once("//").map_or(value, |(_, rest)| rest);
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/bin/shortify_server/link_tests.rs"]
mod tests;
