//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use snapshop_domain::{ClientConfig, RefreshPolicy};

/// SnapShop - find products from a photo or a query
#[derive(Parser, Debug)]
#[command(
    name = "snapshop",
    version,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Connection settings overriding settings.json
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Overrides for the stored client settings.
#[derive(Args, Debug, Default)]
pub struct ConnectionArgs {
    /// Backend base URL
    #[arg(long, global = true, env = "SNAPSHOP_API_URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "SNAPSHOP_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Country code sent with searches
    #[arg(long, global = true, env = "SNAPSHOP_COUNTRY_CODE")]
    pub country_code: Option<String>,

    /// Currency sent with searches
    #[arg(long, global = true, env = "SNAPSHOP_CURRENCY")]
    pub currency: Option<String>,

    /// Let concurrent requests share a single token refresh
    #[arg(long, global = true)]
    pub single_flight_refresh: bool,
}

impl ConnectionArgs {
    /// Applies the flags on top of `config`.
    #[must_use]
    pub fn apply(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(base_url) = &self.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        if let Some(country_code) = &self.country_code {
            config.country_code.clone_from(country_code);
        }
        if let Some(currency) = &self.currency {
            config.currency.clone_from(currency);
        }
        if self.single_flight_refresh {
            config.refresh_policy = RefreshPolicy::SingleFlight;
        }
        config
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the backend is reachable
    Ping,

    /// Log in and store the session
    Login {
        /// Account e-mail
        #[arg(long)]
        email: String,
        /// Account password
        #[arg(long)]
        password: String,
    },

    /// Create an account and log in
    Signup {
        /// Display name
        #[arg(long)]
        username: String,
        /// Account e-mail
        #[arg(long)]
        email: String,
        /// Account password
        #[arg(long)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Find products matching an image (png, jpg or jpeg)
    Analyze {
        /// Image file
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
    },

    /// Find products matching a text query
    Search {
        /// Search text
        #[arg(value_name = "QUERY", num_args = 1.., required = true)]
        query: Vec<String>,
    },

    /// Manage the wishlist
    #[command(subcommand)]
    Wishlist(WishlistCommand),
}

/// Wishlist subcommands
#[derive(Subcommand, Debug)]
pub enum WishlistCommand {
    /// List saved products
    List,

    /// Save a product
    Add(AddItemArgs),

    /// Remove a saved product
    Remove {
        /// Product id
        #[arg(value_name = "ID")]
        id: String,
    },
}

/// Arguments for `wishlist add`
#[derive(Args, Debug)]
pub struct AddItemArgs {
    /// Product id
    #[arg(long)]
    pub id: String,
    /// Product title
    #[arg(long)]
    pub title: String,
    /// Price
    #[arg(long)]
    pub price: f64,
    /// Currency of the price (defaults to the configured currency)
    #[arg(long)]
    pub currency: Option<String>,
    /// Marketplace name
    #[arg(long)]
    pub platform: String,
    /// Product image URL
    #[arg(long)]
    pub image_url: String,
    /// Product page URL
    #[arg(long)]
    pub source_link: String,
}
