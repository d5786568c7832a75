use clap::Args;

#[derive(Args)]
pub(crate) struct ShortenArgs {
    /// URL to shorten (absolute, http or https)
    pub(crate) url: String,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct LinksArgs {
    #[arg(long, default_value_t = 1)]
    pub(crate) page: u32,
    /// Links per page
    #[arg(long, default_value_t = 10)]
    pub(crate) limit: u32,
    /// Keep only links whose code or target matches this glob
    #[arg(long, value_name = "GLOB")]
    pub(crate) filter: Option<String>,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct DeleteArgs {
    /// Short codes to delete
    #[arg(required = true)]
    pub(crate) codes: Vec<String>,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct AnalyticsArgs {
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}
