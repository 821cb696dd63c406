use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use hoard_client::{ClientConfig, StoreError, DEFAULT_BASE_URL};
use hoard_core::{ApiError, ListKind, PrimaryKey};
use thiserror::Error;
use url::Url;

#[derive(Parser)]
#[command(name = "hoard", version, about = "Keep track of game inventories and shopping lists")]
pub struct Cli {
    /// Where the API is served
    #[arg(long, env = "HOARD_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub api_url: String,
    /// The session token of the signed in user
    #[arg(long, env = "HOARD_SESSION_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,
    /// Seconds to wait for a response
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout: u64,
    /// Log requests and state changes
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the signed in user
    Profile,
    Games {
        #[command(subcommand)]
        command: GameCommand,
    },
    Lists {
        #[command(flatten)]
        scope: ListScope,
        #[command(subcommand)]
        command: ListCommand,
    },
    Items {
        #[command(flatten)]
        scope: ListScope,
        #[command(subcommand)]
        command: ItemCommand,
    },
}

#[derive(Subcommand)]
pub enum GameCommand {
    List,
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    Rename {
        game_id: PrimaryKey,
        name: String,
    },
    Delete {
        game_id: PrimaryKey,
    },
}

/// Which lists a command works on
#[derive(Args)]
pub struct ListScope {
    #[arg(long, default_value = "shopping")]
    pub kind: ListKind,
    /// Defaults to the first game
    #[arg(long)]
    pub game: Option<PrimaryKey>,
}

#[derive(Subcommand)]
pub enum ListCommand {
    Show,
    Create { title: String },
    Rename { list_id: PrimaryKey, title: String },
    Delete { list_id: PrimaryKey },
}

#[derive(Subcommand)]
pub enum ItemCommand {
    Add {
        list_id: PrimaryKey,
        description: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[arg(long)]
        notes: Option<String>,
        /// Only kept on inventory items
        #[arg(long)]
        unit_weight: Option<f64>,
    },
    Edit {
        item_id: PrimaryKey,
        #[arg(long)]
        quantity: Option<u32>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        unit_weight: Option<f64>,
    },
    Inc {
        item_id: PrimaryKey,
    },
    Dec {
        item_id: PrimaryKey,
        /// Delete without asking when the quantity reaches zero
        #[arg(short, long)]
        yes: bool,
    },
    Delete {
        item_id: PrimaryKey,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid API url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Could not create the HTTP client: {0}")]
    Client(ApiError),
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("There are no games yet, create one with `hoard games create`")]
    NoGames,
    #[error("Nothing to change, pass --quantity, --notes or --unit-weight")]
    NothingToEdit,
}

impl Cli {
    pub fn client_config(&self) -> Result<ClientConfig, CliError> {
        Ok(ClientConfig {
            base_url: Url::parse(&self.api_url)?,
            timeout: Duration::from_secs(self.timeout),
        })
    }
}
