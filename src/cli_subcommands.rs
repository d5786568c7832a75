use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum ProfileCommands {
    /// Show the signed-in user's profile
    Show {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Change profile fields
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        country: Option<String>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommands {
    /// Show the stored client configuration
    Show {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Set configuration values
    Set {
        /// Base URL of the Shortify server
        #[arg(long = "api-url", value_name = "URL")]
        api_url: Option<String>,
    },
}
