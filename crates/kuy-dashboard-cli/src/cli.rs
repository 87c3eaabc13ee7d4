use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Admin console for the Kuy Point waste-recycling dashboard.
///
/// Lists, searches, edits and deletes pickups, deliveries, point
/// redemptions, blog posts and admin accounts against the dashboard API.
#[derive(Parser)]
#[command(
    name = "kuy-dashboard",
    version,
    about = "Admin console for the Kuy Point waste-recycling dashboard",
    after_help = "Use 'kuy-dashboard <command> --help' for more information about a command.\n\
                  Entity kinds: pickups, deliveries, points, blogs, users, profile, transactions",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Global options available to all subcommands.
#[derive(Args, Debug)]
pub struct GlobalOpts {
    /// Configuration file path [env: KUY_DASHBOARD_CONFIG]
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        env = "KUY_DASHBOARD_CONFIG"
    )]
    pub config: Option<PathBuf>,

    /// Output format: human (default), json, plain
    #[arg(
        long,
        global = true,
        default_value = "human",
        value_parser = ["human", "json", "plain"]
    )]
    pub format: String,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all non-error output
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output [env: NO_COLOR]
    #[arg(long = "no-color", global = true, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    pub no_color: bool,

    /// Dashboard API origin [env: KUY_DASHBOARD_API_URL]
    #[arg(long = "api-url", global = true, env = "KUY_DASHBOARD_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token from `login` [env: KUY_DASHBOARD_TOKEN]
    #[arg(
        long = "token",
        global = true,
        env = "KUY_DASHBOARD_TOKEN",
        hide_env_values = true
    )]
    pub token: Option<String>,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// List the entities of one kind as a table or cards
    List(ListArgs),

    /// Show one entity as a card
    Show(ShowArgs),

    /// Create an entity
    Add(AddArgs),

    /// Edit an entity
    Edit(EditArgs),

    /// Delete an entity
    Delete(DeleteArgs),

    /// Describe the columns of one or all entity kinds
    Schemas(SchemasArgs),

    /// Show dashboard totals and latest transactions
    Summary,

    /// Show the signed-in admin's profile
    Profile,

    /// Sign in and print a bearer token
    Login(LoginArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

// ---------------------------------------------------------------------------
// Individual command argument structs
// ---------------------------------------------------------------------------

/// Arguments for `kuy-dashboard list`.
#[derive(Args)]
pub struct ListArgs {
    /// Entity kind (pickups, deliveries, points, blogs, users, transactions)
    pub kind: String,

    /// Case-insensitive substring to search for
    #[arg(short = 's', long = "search")]
    pub search: Option<String>,

    /// Column to search in, or "all"
    #[arg(short = 'f', long = "field", default_value = "all")]
    pub field: String,

    /// Layout: table or cards (default from config)
    #[arg(short = 'l', long = "layout", value_parser = ["table", "cards"])]
    pub layout: Option<String>,
}

/// Arguments for `kuy-dashboard show`.
#[derive(Args)]
pub struct ShowArgs {
    /// Entity kind
    pub kind: String,

    /// Entity key
    pub key: String,
}

/// Arguments for `kuy-dashboard add`.
#[derive(Args)]
pub struct AddArgs {
    /// Entity kind
    pub kind: String,

    /// Set a field: --set name=Agus (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub set: Vec<String>,

    /// Attach an image file: --image banner=./banner.png
    #[arg(long = "image", value_name = "FIELD=PATH")]
    pub images: Vec<String>,
}

/// Arguments for `kuy-dashboard edit`.
#[derive(Args)]
pub struct EditArgs {
    /// Entity kind
    pub kind: String,

    /// Entity key
    pub key: String,

    /// Set a field: --set status=Berhasil (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub set: Vec<String>,

    /// Attach an image file: --image banner=./banner.png
    #[arg(long = "image", value_name = "FIELD=PATH")]
    pub images: Vec<String>,
}

/// Arguments for `kuy-dashboard delete`.
#[derive(Args)]
pub struct DeleteArgs {
    /// Entity kind
    pub kind: String,

    /// Entity key
    pub key: String,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,
}

/// Arguments for `kuy-dashboard schemas`.
#[derive(Args)]
pub struct SchemasArgs {
    /// Show a specific kind (omit for all)
    pub kind: Option<String>,
}

/// Arguments for `kuy-dashboard login`.
#[derive(Args)]
pub struct LoginArgs {
    /// Admin email address
    #[arg(short = 'e', long = "email")]
    pub email: String,

    /// Password (prompted when omitted)
    #[arg(short = 'p', long = "password", env = "KUY_DASHBOARD_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Arguments for `kuy-dashboard completions`.
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
