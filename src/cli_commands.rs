use clap::Subcommand;

use crate::{ConfigCommands, ProfileCommands};

pub(crate) mod account;
pub(crate) mod links;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Create an account and sign in
    Register(account::RegisterArgs),

    /// Sign in and store the session
    Login(account::LoginArgs),

    /// Sign out and discard the stored session
    Logout,

    /// Show who is signed in on this machine
    Whoami(account::WhoamiArgs),

    /// Shorten a URL
    Shorten(links::ShortenArgs),

    /// List your short links
    Links(links::LinksArgs),

    /// Delete short links by code
    #[command(name = "delete", alias = "rm")]
    Delete(links::DeleteArgs),

    /// Show account-wide click analytics
    Analytics(links::AnalyticsArgs),

    /// Show or update the signed-in profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Show or change client configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}
