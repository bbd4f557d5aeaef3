//! Clap derive structures for the `outlet` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// outlet -- command-line client for the Outlet backend
#[derive(Debug, Parser)]
#[command(
    name = "outlet",
    version,
    about = "Talk to an Outlet file-tree backend from the command line",
    long_about = "Connects to a running Outlet backend (found on the local network or at a\n\
        fixed address), then lists devices, reads and writes remote config,\n\
        fetches nodes, or follows the live signal stream.",
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
    /// Backend host; skips network discovery
    #[arg(long, short = 'H', env = "OUTLET_HOST", global = true)]
    pub host: Option<String>,

    /// Backend port (used with --host)
    #[arg(long, short = 'P', env = "OUTLET_PORT", global = true)]
    pub port: Option<u16>,

    /// Seconds to wait for the first connection
    #[arg(long, env = "OUTLET_CONNECT_TIMEOUT", default_value = "15", global = true)]
    pub connect_timeout: u64,

    /// Output format
    #[arg(long, short = 'o', env = "OUTLET_OUTPUT", default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List registered devices
    #[command(alias = "dev")]
    Devices,

    /// Read or write backend config values
    Config(ConfigArgs),

    /// Fetch one node by uid
    Node(NodeArgs),

    /// Follow the live signal stream
    Watch(WatchArgs),

    /// Inspect local client settings
    Settings(SettingsArgs),
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Read one or more keys
    Get {
        /// Keys to read
        #[arg(required = true)]
        keys: Vec<String>,

        /// Value to use when a single key is empty
        #[arg(long)]
        default: Option<String>,
    },

    /// Write one key
    Put {
        key: String,
        value: String,
    },
}

// ── Node ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NodeArgs {
    /// Node uid
    pub uid: u32,

    /// Device the node lives on
    #[arg(long, short = 'd')]
    pub device: u32,
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Only show these signals (e.g. NODE_UPSERTED); repeatable
    #[arg(long, short = 's')]
    pub signal: Vec<String>,

    /// Exit after this many signals
    #[arg(long, short = 'n')]
    pub count: Option<usize>,
}

// ── Settings ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Print the resolved settings
    Show,

    /// Print the settings file path
    Path,

    /// Write a settings file with defaults (and --host/--port if given)
    Init,
}
