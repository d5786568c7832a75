use super::*;
use crate::error::ApiError;

impl ApiClient {
    pub fn shorten(&self, url: &str) -> Result<ShortLink, ApiError> {
        validate::target_url(url)?;
        let spec = RequestSpec::post("/url-shortner/").json(serde_json::json!({
            "url": url,
        }));
        let resp = self.authorized(spec)?;
        let created: CreatedLink = self.read_json(resp)?;
        Ok(created.data)
    }

    /// Fetches one page of the caller's links, newest first.
    pub fn links(&self, page: u32, limit: u32) -> Result<LinkPage, ApiError> {
        let spec = RequestSpec::get("/url-shortner/")
            .query("page", page)
            .query("limit", limit);
        let resp = self.authorized(spec)?;
        self.read_json(resp)
    }

    /// Deletes the named links and reports how many actually went away.
    /// Codes that do not exist or belong to someone else are skipped
    /// server-side, not errors.
    pub fn delete_links(&self, codes: &[String]) -> Result<u64, ApiError> {
        if codes.is_empty() {
            return Err(ApiError::Validation("no link codes given".to_string()));
        }
        let spec = RequestSpec::post("/url-shortner/delete").json(serde_json::json!({
            "url_codes": codes,
        }));
        let resp = self.authorized(spec)?;
        let deleted: DeletedLinks = self.read_json(resp)?;
        Ok(deleted.deleted)
    }
}
