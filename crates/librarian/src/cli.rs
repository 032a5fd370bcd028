//! Clap derive structures for the `librarian` CLI.
//!
//! Defines the command tree, global flags, and shared value types. Kept free
//! of non-clap dependencies so `build.rs` can include it for man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// librarian -- command-line client for a librarian backend
#[derive(Debug, Parser)]
#[command(
    name = "librarian",
    version,
    about = "Talk to a librarian backend from the command line",
    long_about = "Log in with an access token, call envelope-wrapped /api endpoints,\n\
        and manage library invites.\n\n\
        Sessions persist per profile (file, keyring, or memory).",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config profile to use
    #[arg(long, short = 'p', env = "LIBRARIAN_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server URL the client runs against (overrides profile)
    #[arg(long, short = 's', env = "LIBRARIAN_SERVER", global = true)]
    pub server: Option<String>,

    /// Base host for API requests (overrides profile and --server)
    #[arg(long, env = "LIBRARIAN_BASE_HOST", global = true)]
    pub base_host: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "LIBRARIAN_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "LIBRARIAN_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "LIBRARIAN_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable (default)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in, check, or clear the stored session
    Auth(AuthArgs),

    /// GET an /api endpoint and print its data
    Get(GetArgs),

    /// POST JSON to an /api endpoint and print its data
    Post(PostArgs),

    /// Create and inspect library invites
    Invite(InviteArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Exchange an access token for a session
    Login {
        /// Access token (prompted for when omitted)
        #[arg(long, env = "LIBRARIAN_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },

    /// Validate the stored session with the server
    Status,

    /// Clear the stored session
    Logout,
}

// ── Raw requests ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Endpoint path, with or without the leading /api
    pub path: String,

    /// Query parameter (repeatable)
    #[arg(long = "query", short = 'Q', value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub query: Vec<(String, String)>,
}

#[derive(Debug, Args)]
pub struct PostArgs {
    /// Endpoint path, with or without the leading /api
    pub path: String,

    /// Inline JSON body
    #[arg(long, short = 'd', conflicts_with = "from_file")]
    pub data: Option<String>,

    /// Read the JSON body from a file
    #[arg(long, short = 'F')]
    pub from_file: Option<PathBuf>,

    /// Query parameter (repeatable)
    #[arg(long = "query", short = 'Q', value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub query: Vec<(String, String)>,
}

fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))
}

// ── Invites ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InviteArgs {
    #[command(subcommand)]
    pub command: InviteCommand,
}

#[derive(Debug, Subcommand)]
pub enum InviteCommand {
    /// List the libraries and labels an invite can share
    Config,

    /// Create an invite
    Create {
        /// Share every library
        #[arg(long, conflicts_with = "library")]
        all_libraries: bool,

        /// Library id to share (repeatable)
        #[arg(long)]
        library: Vec<String>,

        /// Only show content with this label (repeatable)
        #[arg(long)]
        allow_label: Vec<String>,

        /// Hide content with this label (repeatable)
        #[arg(long)]
        exclude_label: Vec<String>,

        /// Expire the invite after this many days
        #[arg(long, value_name = "DAYS")]
        expires_in: Option<u32>,

        /// Role granted to the created account (repeatable)
        #[arg(long)]
        role: Vec<String>,
    },

    /// Look up an invite by token
    Show {
        /// Invite token
        token: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Show the current configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Key (server, base_host, ca_cert, insecure, timeout, session_storage)
        key: String,
        /// Value
        value: String,
    },

    /// List profiles
    Profiles,

    /// Make a profile the default
    Use {
        /// Profile name
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
