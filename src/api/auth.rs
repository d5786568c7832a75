use super::*;
use crate::error::ApiError;

impl ApiClient {
    /// Creates an account. The backend signs the new user straight in, so
    /// a successful registration establishes a session.
    pub fn register(&self, req: &RegisterRequest) -> Result<Session, ApiError> {
        validate::register_fields(req)?;
        let spec = RequestSpec::post("/auth/register").json(serde_json::json!({
            "name": req.name,
            "email": req.email,
            "country": req.country,
            "password": req.password,
        }));
        let resp = self.success(self.execute(&spec, None)?)?;
        let status = resp.status().as_u16();
        let grant: TokenGrant = self.read_json(resp)?;
        self.install_grant(status, grant)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        validate::credentials(email, password)?;
        let spec = RequestSpec::post("/auth/login").json(serde_json::json!({
            "email": email,
            "password": password,
        }));
        let resp = self.success(self.execute(&spec, None)?)?;
        let status = resp.status().as_u16();
        let grant: TokenGrant = self.read_json(resp)?;
        self.install_grant(status, grant)
    }

    /// Signs out. Server-side invalidation is best-effort; the local
    /// session is cleared on every outcome and the call itself cannot
    /// fail. Calling it while signed out is a no-op.
    pub fn logout(&self) {
        if let Some(session) = self.gate.current() {
            let spec = RequestSpec::post("/auth/logout").json(serde_json::json!({
                "refresh_token": session.refresh_token,
            }));
            // Already-revoked refresh tokens come back 400; not our
            // problem either way.
            self.authorized(spec).ok();
        }
        self.gate.clear();
    }

    pub fn profile(&self) -> Result<Profile, ApiError> {
        let resp = self.authorized(RequestSpec::get("/auth/profile"))?;
        self.read_json(resp)
    }

    pub fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        if update.name.is_none() && update.country.is_none() {
            return Err(ApiError::Validation(
                "nothing to update; pass a new name or country".to_string(),
            ));
        }
        let spec = RequestSpec::put("/auth/profile").json(serde_json::json!({
            "name": update.name,
            "country": update.country,
        }));
        let resp = self.authorized(spec)?;
        self.read_json(resp)
    }

    /// A grant with either credential missing is useless for the refresh
    /// protocol, so it is refused outright rather than stored.
    fn install_grant(&self, status: u16, grant: TokenGrant) -> Result<Session, ApiError> {
        if grant.access_token.is_empty() || grant.refresh_token.is_empty() {
            return Err(ApiError::Server {
                status,
                message: "token grant is missing credentials".to_string(),
            });
        }
        let session = Session {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            token_type: grant.token_type,
            user_id: grant.userid,
        };
        self.gate.install(session.clone())?;
        Ok(session)
    }
}
