//! Clap derive structures for the `pihole6` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// pihole6 -- command-line control for Pi-hole v6 appliances
#[derive(Debug, Parser)]
#[command(
    name = "pihole6",
    version,
    about = "Control a Pi-hole v6 DNS-blocking gateway from the command line",
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
    /// Appliance profile to use
    #[arg(long, short = 'p', env = "PIHOLE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API root URL, e.g. https://pi.hole/api (overrides profile)
    #[arg(long, short = 'u', env = "PIHOLE_URL", global = true)]
    pub url: Option<String>,

    /// Web interface / app password
    #[arg(long, env = "PIHOLE_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Output format [default: table, or `defaults.output` from the config]
    #[arg(long = "output", short = 'o', env = "PIHOLE_OUTPUT", global = true)]
    pub output_flag: Option<OutputFormat>,

    /// Effective output format, resolved against the config file.
    #[arg(skip)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "PIHOLE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "PIHOLE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    #[default]
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
    /// Show whether the current session is valid
    Status,

    /// Open a session and end it again (checks the password)
    ///
    /// Every command logs out when it finishes, so this never closes
    /// sessions left behind by other clients.
    Logout,

    /// Show aggregate query statistics
    #[command(alias = "stats")]
    Summary,

    /// Show the dashboard bundle
    Padd(PaddArgs),

    /// Show or toggle DNS blocking
    #[command(alias = "b")]
    Blocking(BlockingArgs),

    /// List and toggle groups
    #[command(alias = "g")]
    Groups(GroupsArgs),

    /// Manage configuration profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── PADD ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PaddArgs {
    /// Request the reduced payload
    #[arg(long)]
    pub partial: bool,
}

// ── Blocking ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BlockingArgs {
    #[command(subcommand)]
    pub command: BlockingCommand,
}

#[derive(Debug, Subcommand)]
pub enum BlockingCommand {
    /// Show the current blocking state
    Status,

    /// Enable blocking
    #[command(alias = "on")]
    Enable,

    /// Disable blocking (for 2 minutes unless told otherwise)
    #[command(alias = "off")]
    Disable {
        /// How long to disable for, e.g. "30s", "5m", "1h 30m"
        #[arg(long = "for", value_parser = parse_disable_duration, conflicts_with = "indefinitely")]
        duration: Option<Duration>,

        /// Disable until blocking is enabled again
        #[arg(long)]
        indefinitely: bool,
    },
}

/// `humantime` duration of at least one second (the appliance timer is whole seconds).
fn parse_disable_duration(raw: &str) -> Result<Duration, String> {
    let duration = humantime::parse_duration(raw).map_err(|e| e.to_string())?;
    if duration < Duration::from_secs(1) {
        return Err(format!("'{raw}' is shorter than one second"));
    }
    Ok(duration)
}

// ── Groups ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GroupsArgs {
    #[command(subcommand)]
    pub command: GroupsCommand,
}

#[derive(Debug, Subcommand)]
pub enum GroupsCommand {
    /// List groups
    #[command(alias = "ls")]
    List,

    /// Enable a group
    Enable {
        /// Group name
        name: String,
    },

    /// Disable a group
    Disable {
        /// Group name
        name: String,
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
    /// Create or update a profile (API root taken from --url)
    Init {
        /// Read the password from this environment variable at runtime
        #[arg(long)]
        password_env: Option<String>,

        /// Prompt for a password and store it in the config file
        #[arg(long, conflicts_with = "password_env")]
        store_password: bool,

        /// Make this the default profile
        #[arg(long)]
        default: bool,
    },

    /// Show the resolved configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
