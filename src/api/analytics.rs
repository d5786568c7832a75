use super::*;
use crate::error::ApiError;

impl ApiClient {
    /// Fetches the account-wide analytics rollup: totals, per-link
    /// breakdowns, and the global country/device/referrer splits.
    pub fn analytics(&self) -> Result<AnalyticsReport, ApiError> {
        let resp = self.authorized(RequestSpec::get("/url-shortner/analytics"))?;
        self.read_json(resp)
    }
}
