use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Front-desk waiting-list client
#[derive(Parser, Debug, Clone)]
#[command(name = "waitlist-desk", version, about = "Front-desk waiting-list client")]
pub struct Cli {
    /// Base URL of the waiting-list service
    #[arg(long)]
    pub service_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,

    /// Path to TOML config file
    #[arg(long, default_value = "./waitlist.toml")]
    pub config: String,

    /// Enable structured JSON logging
    #[arg(long, env = "WAITLIST_JSON_LOGS")]
    pub json_logs: bool,

    /// Output a commented TOML config template and exit
    #[arg(long)]
    pub generate_config: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show the waiting list for a day (today by default)
    Show {
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Create the list if the day has none yet
        #[arg(long)]
        create: bool,
    },
    /// Create the waiting list for a day
    Create {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Add a walk-in to the list
    Add {
        #[arg(long)]
        puppy: String,
        #[arg(long)]
        owner: String,
        #[arg(long)]
        service: String,
        /// Arrival time as RFC 3339 (now by default)
        #[arg(long)]
        arrival: Option<DateTime<Utc>>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Mark an entry completed
    Complete {
        id: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Move a waiting entry to a new slot (0 = front)
    Move {
        id: String,
        index: usize,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Respace positions of all waiting entries
    Renumber {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Look up past entries by puppy/owner name and/or day
    Search {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

/// Resolved settings after layering defaults, file, environment and flags.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// Base URL of the waiting-list service
    pub service_url: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Enable structured JSON logging
    pub json_logs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_url: "http://127.0.0.1:3000".to_string(),
            request_timeout_secs: 10,
            json_logs: false,
        }
    }
}

/// Only the flags the user actually passed, so unset ones do not mask
/// values from the file or environment.
#[derive(Serialize, Default)]
struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    service_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    json_logs: Option<bool>,
}

impl From<&Cli> for CliOverrides {
    fn from(cli: &Cli) -> Self {
        Self {
            service_url: cli.service_url.clone(),
            request_timeout_secs: cli.request_timeout_secs,
            json_logs: cli.json_logs.then_some(true),
        }
    }
}

impl Config {
    /// Layered precedence:
    /// built-in defaults < TOML file < env vars (WAITLIST_*) < CLI args
    pub fn figment(cli: &Cli) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&cli.config))
            .merge(Env::prefixed("WAITLIST_"))
            .merge(Serialized::defaults(CliOverrides::from(cli)))
    }

    pub fn load(cli: &Cli) -> Result<Self, figment::Error> {
        Self::figment(cli).extract()
    }
}

/// Generate a commented TOML config template
pub fn generate_config_template() -> String {
    r#"# Waiting-list desk configuration
# Place this file at ./waitlist.toml or specify with --config <path>
# All settings can be overridden via environment variables (WAITLIST_SERVICE_URL, etc.)
# or CLI flags (--service-url, etc.)

# Base URL of the waiting-list service (default: http://127.0.0.1:3000)
# service_url = "http://127.0.0.1:3000"

# Per-request timeout in seconds (default: 10)
# request_timeout_secs = 10

# Enable structured JSON logging
# json_logs = false
"#
    .to_string()
}
