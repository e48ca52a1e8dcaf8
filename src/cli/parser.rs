use crate::export::DayFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for fixtrack.
/// Each invocation is one request against the local tracking store.
#[derive(Parser)]
#[command(
    name = "fixtrack",
    version = env!("CARGO_PKG_VERSION"),
    about = "FixKart field tracking: duty state, location pings and shop-visit checkpoints",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Bearer credential of the acting field agent
    #[arg(global = true, long = "token")]
    pub token: Option<String>,

    /// Override "now" with an RFC 3339 timestamp (replays and tests)
    #[arg(global = true, long = "at", hide = true)]
    pub at: Option<String>,

    /// Override the photo storage directory
    #[arg(global = true, long = "media-dir", hide = true)]
    pub media_dir: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view, check or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing keys")]
        check: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Specify the editor to use")]
        editor: Option<String>,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Administer field agents
    Agent {
        #[command(subcommand)]
        action: AgentAction,
    },

    /// Show the acting agent's duty status
    Status,

    /// Start or end duty
    Duty {
        #[command(subcommand)]
        action: DutyAction,
    },

    /// Submit a location ping
    Ping {
        #[arg(long, allow_negative_numbers = true, help = "Latitude (decimal degrees)")]
        lat: String,

        #[arg(long, allow_negative_numbers = true, help = "Longitude (decimal degrees)")]
        lng: String,
    },

    /// Record a shop visit checkpoint
    Visit {
        #[arg(long = "shop", help = "Name of the visited shop")]
        shop: String,

        #[arg(long, allow_negative_numbers = true, help = "Latitude (decimal degrees)")]
        lat: String,

        #[arg(long, allow_negative_numbers = true, help = "Longitude (decimal degrees)")]
        lng: String,

        #[arg(long, help = "Free-text note")]
        note: Option<String>,

        #[arg(long, value_name = "FILE", help = "Photo of the shop front (required)")]
        photo: Option<String>,
    },

    /// Reconstruct an agent's day: trail, checkpoints and duty sessions
    Day {
        #[arg(long, help = "Agent id; must be the --token agent")]
        agent: Option<i64>,

        #[arg(long, help = "Date (YYYY-MM-DD), defaults to today")]
        date: Option<String>,

        #[arg(long, value_enum, default_value = "table")]
        format: DayFormat,

        #[arg(long, value_name = "FILE", help = "Write json/csv output to a file")]
        out: Option<String>,

        #[arg(long, short = 'f', help = "Overwrite --out without asking")]
        force: bool,
    },

    /// Auto-end duty for agents that stopped pinging
    Sweep {
        #[arg(long, help = "Minutes without a ping (overrides session_timeout_minutes)")]
        timeout: Option<u32>,
    },
}

#[derive(Subcommand)]
pub enum AgentAction {
    /// Register an agent and print its credential
    Register { name: String },

    /// List agents with their duty status
    List {
        #[arg(long, help = "Include deactivated agents")]
        all: bool,
    },

    /// Show one agent
    Show { id: i64 },

    /// Deactivate an agent (history is kept)
    Deactivate { id: i64 },

    /// Reactivate a deactivated agent
    Reactivate { id: i64 },

    /// Revoke the agent's credentials and issue a new one
    RotateToken { id: i64 },
}

#[derive(Subcommand)]
pub enum DutyAction {
    /// Go ON_DUTY
    Start {
        #[arg(long, allow_negative_numbers = true)]
        lat: String,

        #[arg(long, allow_negative_numbers = true)]
        lng: String,
    },

    /// Go OFF_DUTY
    End {
        #[arg(long, allow_negative_numbers = true)]
        lat: String,

        #[arg(long, allow_negative_numbers = true)]
        lng: String,
    },
}
