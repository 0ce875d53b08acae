//! Clap derive structures for the `myuplink` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use myuplink_core::{Platform, SmartHomeMode};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// myuplink -- inspect and control myUplink heat pumps
#[derive(Debug, Parser)]
#[command(
    name = "myuplink",
    version,
    about = "Inspect and control myUplink heat pumps from the command line",
    long_about = "Reads systems, devices, parameters, notifications and zones from the\n\
        myUplink cloud API, and writes parameters and smart-home modes.\n\n\
        Requests are throttled (5s apart by default) as the API requires.",
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
    /// Account profile to use
    #[arg(long, short = 'p', env = "MYUPLINK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API host (overrides profile)
    #[arg(long, env = "MYUPLINK_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// OAuth2 access token (overrides profile and keyring)
    #[arg(long, env = "MYUPLINK_ACCESS_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Accept-Language for localized texts, e.g. en-GB
    #[arg(long, short = 'l', env = "MYUPLINK_LANGUAGE", global = true)]
    pub language: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MYUPLINK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "MYUPLINK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
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
    /// List systems and their entitlement
    #[command(alias = "sys", alias = "s")]
    Systems(SystemsArgs),

    /// List devices and firmware
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// List parameters (data points) of a device
    #[command(alias = "params", alias = "points")]
    Parameters(ParametersArgs),

    /// Write a parameter value
    Set(SetArgs),

    /// Show or change the smart-home mode of a system
    Mode(ModeArgs),

    /// List active notifications (alarms)
    #[command(alias = "alarms")]
    Notifications(NotificationsArgs),

    /// List smart-home zones of a device
    Zones(ZonesArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Systems ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SystemsArgs {
    #[command(subcommand)]
    pub command: Option<SystemsCommand>,
}

#[derive(Debug, Subcommand)]
pub enum SystemsCommand {
    /// List all systems (default)
    List,
    /// Show one system
    Get {
        /// System ID
        system: String,
    },
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: Option<DevicesCommand>,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices of all systems (default)
    List {
        /// Only devices of this system
        #[arg(long)]
        system: Option<String>,
    },
    /// Show one device with firmware details
    Get {
        /// Device ID
        device: String,
    },
}

// ── Parameters ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ParametersArgs {
    /// Device ID
    pub device: String,

    /// Only parameters that can be written
    #[arg(long)]
    pub writable: bool,

    /// Only parameters presented as this platform
    #[arg(long, value_enum)]
    pub platform: Option<PlatformArg>,

    /// Only parameters whose name or category contains this text
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PlatformArg {
    Switch,
    BinarySensor,
    Select,
    Number,
    Sensor,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Switch => Self::Switch,
            PlatformArg::BinarySensor => Self::BinarySensor,
            PlatformArg::Select => Self::Select,
            PlatformArg::Number => Self::Number,
            PlatformArg::Sensor => Self::Sensor,
        }
    }
}

// ── Set ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Device ID
    pub device: String,

    /// Parameter ID
    pub parameter: i64,

    /// New raw value, as the API expects it
    pub value: String,

    /// Skip the writability check and send the write as-is
    #[arg(long)]
    pub force: bool,
}

// ── Mode ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ModeArgs {
    #[command(subcommand)]
    pub command: ModeCommand,
}

#[derive(Debug, Subcommand)]
pub enum ModeCommand {
    /// Show the current mode
    Get {
        /// System ID
        system: String,
    },
    /// Change the mode
    Set {
        /// System ID
        system: String,
        /// One of: default, normal, away, vacation, home
        mode: SmartHomeMode,
    },
}

// ── Notifications / Zones ────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NotificationsArgs {
    /// Only notifications of this system
    #[arg(long)]
    pub system: Option<String>,
}

#[derive(Debug, Args)]
pub struct ZonesArgs {
    /// Device ID
    pub device: String,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a profile interactively
    Init,
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Store an access token in the system keyring
    SetToken {
        /// Token to store (prompted for when omitted)
        token: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}
