use anyhow::Result;

#[derive(Clone, Debug, Default)]
pub struct TuiRunOptions {
    pub api_url: Option<String>,
}

pub fn run() -> Result<()> {
    crate::tui_dashboard::run(TuiRunOptions::default())
}

pub fn run_with_options(opts: TuiRunOptions) -> Result<()> {
    crate::tui_dashboard::run(opts)
}
