use axum::extract::Extension;
use shortify::api::{
    LoginRequest, LogoutRequest, Profile, ProfileUpdate, RefreshRequest, RegisterRequest,
    TokenGrant, TokenRefresh,
};

use super::*;

pub(crate) async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Response, Response> {
    validate_register_payload(
        &payload.name,
        &payload.email,
        &payload.country,
        &payload.password,
    )
    .map_err(bad_request)?;

    let created_at = now_ts();
    let user = ServerUser {
        id: user_id_for(&payload.email, &created_at),
        name: payload.name.trim().to_string(),
        email: payload.email.clone(),
        country: payload.country.trim().to_string(),
        password_hash: hash_token(&payload.password),
        created_at,
    };

    {
        let mut users = state.users.write().await;
        let mut emails = state.email_index.write().await;
        if emails.contains_key(&payload.email) {
            return Err(conflict("email already registered"));
        }
        emails.insert(user.email.clone(), user.id.clone());
        users.insert(user.id.clone(), user.clone());
    }

    {
        let users = state.users.read().await;
        if let Err(err) = persist_users_to_disk(&state.data_dir, &users) {
            return Err(internal_error(err));
        }
    }

    // Registration signs the account in immediately.
    let grant = issue_grant(&state, &user.id, Some("account created")).await?;
    Ok((StatusCode::CREATED, Json(grant)).into_response())
}

pub(crate) async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenGrant>, Response> {
    let user_id = {
        let emails = state.email_index.read().await;
        emails.get(&payload.email).cloned()
    };
    let Some(user_id) = user_id else {
        return Err(login_rejected());
    };

    let password_ok = {
        let users = state.users.read().await;
        users
            .get(&user_id)
            .is_some_and(|u| u.password_hash == hash_token(&payload.password))
    };
    if !password_ok {
        return Err(login_rejected());
    }

    let grant = issue_grant(&state, &user_id, None).await?;
    Ok(Json(grant))
}

pub(crate) async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<TokenRefresh>, Response> {
    // Counted per attempt, before any validation, so tests can observe
    // exactly how many exchanges reached the server.
    state.refresh_count.fetch_add(1, Ordering::SeqCst);

    let user_id = {
        let refresh_tokens = state.refresh_tokens.read().await;
        refresh_tokens.get(&hash_token(&payload.refresh_token)).cloned()
    };
    let Some(user_id) = user_id else {
        return Err(forbidden("invalid refresh token"));
    };

    let access_token = issue_access(&state, &user_id).await?;
    Ok(Json(TokenRefresh {
        access_token,
        token_type: "Bearer".to_string(),
    }))
}

pub(crate) async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(subject): Extension<Subject>,
    Json(payload): Json<LogoutRequest>,
) -> Result<Json<serde_json::Value>, Response> {
    let removed = {
        let mut refresh_tokens = state.refresh_tokens.write().await;
        let token_hash = hash_token(&payload.refresh_token);
        match refresh_tokens.get(&token_hash) {
            Some(owner) if *owner == subject.user_id => {
                refresh_tokens.remove(&token_hash);
                true
            }
            _ => false,
        }
    };
    if !removed {
        return Err(bad_request(anyhow::anyhow!("invalid refresh token")));
    }
    Ok(Json(serde_json::json!({"message": "logged out"})))
}

pub(crate) async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(subject): Extension<Subject>,
) -> Result<Json<Profile>, Response> {
    let users = state.users.read().await;
    let Some(user) = users.get(&subject.user_id) else {
        return Err(not_found());
    };
    Ok(Json(profile_of(user)))
}

pub(crate) async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(subject): Extension<Subject>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<Profile>, Response> {
    if let Some(name) = &payload.name
        && name.trim().is_empty()
    {
        return Err(bad_request(anyhow::anyhow!("name cannot be empty")));
    }
    if let Some(country) = &payload.country
        && country.trim().is_empty()
    {
        return Err(bad_request(anyhow::anyhow!("country cannot be empty")));
    }

    let updated = {
        let mut users = state.users.write().await;
        let Some(user) = users.get_mut(&subject.user_id) else {
            return Err(not_found());
        };
        if let Some(name) = payload.name {
            user.name = name.trim().to_string();
        }
        if let Some(country) = payload.country {
            user.country = country.trim().to_string();
        }
        profile_of(user)
    };

    {
        let users = state.users.read().await;
        if let Err(err) = persist_users_to_disk(&state.data_dir, &users) {
            return Err(internal_error(err));
        }
    }

    Ok(Json(updated))
}

fn profile_of(user: &ServerUser) -> Profile {
    Profile {
        userid: user.id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        country: user.country.clone(),
        created_at: user.created_at.clone(),
    }
}

fn login_rejected() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({"detail": "incorrect email or password"})),
    )
        .into_response()
}

async fn issue_grant(
    state: &Arc<AppState>,
    user_id: &str,
    message: Option<&str>,
) -> Result<TokenGrant, Response> {
    let access_token = issue_access(state, user_id).await?;

    let refresh_token = generate_token_secret().map_err(internal_error)?;
    {
        let mut refresh_tokens = state.refresh_tokens.write().await;
        refresh_tokens.insert(hash_token(&refresh_token), user_id.to_string());
    }

    Ok(TokenGrant {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        userid: user_id.to_string(),
        message: message.map(str::to_string),
    })
}

async fn issue_access(state: &Arc<AppState>, user_id: &str) -> Result<String, Response> {
    let secret = generate_token_secret().map_err(internal_error)?;
    let issued = IssuedAccess {
        user_id: user_id.to_string(),
        expires_at_unix: now_unix() + state.access_ttl_secs as i64,
    };
    {
        let mut access_tokens = state.access_tokens.write().await;
        access_tokens.insert(hash_token(&secret), issued);
    }
    Ok(secret)
}
