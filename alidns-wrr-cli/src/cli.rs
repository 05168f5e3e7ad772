//! Command-line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "alidns-wrr", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Aliyun AccessKey ID
    #[arg(long, env = "ALIYUN_ACCESS_KEY_ID", hide_env_values = true, global = true)]
    pub access_key_id: Option<String>,

    /// Aliyun AccessKey secret
    #[arg(long, env = "ALIYUN_ACCESS_KEY_SECRET", hide_env_values = true, global = true)]
    pub access_key_secret: Option<String>,

    /// Alidns API endpoint
    #[arg(long, env = "ALIDNS_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Retries for throttled or failed requests
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Where the prior state of an existing record set comes from.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct PriorArgs {
    /// Comma-separated record IDs; the prior state is read remotely
    #[arg(long)]
    pub id: Option<String>,

    /// JSON state file as printed by a previous command
    #[arg(long)]
    pub state: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the record set described by a TOML file
    Create {
        #[arg(long)]
        config: PathBuf,
    },
    /// Print the remote state of a record set
    Read {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        id: String,
    },
    /// Reconcile an existing record set with a TOML file
    Update {
        #[arg(long)]
        config: PathBuf,
        #[command(flatten)]
        prior: PriorArgs,
    },
    /// Delete every record of a record set
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Adopt an existing record as `<domain_name>/<record_id>`
    Import { import_id: String },
    /// Show the actions an update would perform
    Plan {
        #[arg(long)]
        config: PathBuf,
        #[command(flatten)]
        prior: PriorArgs,
    },
    /// Check a TOML file without contacting Alidns
    Validate {
        #[arg(long)]
        config: PathBuf,
    },
}

impl Command {
    /// Whether the command talks to Alidns.
    pub fn needs_client(&self) -> bool {
        !matches!(self, Self::Validate { .. })
    }
}
