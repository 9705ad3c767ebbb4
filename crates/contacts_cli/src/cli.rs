//! Command-line surface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "contacts", version, about = "SQLite-backed contact list")]
pub struct Cli {
    /// Database file (overrides the config file)
    #[arg(long, env = "CONTACTS_DB", value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// JSON config file
    #[arg(long, env = "CONTACTS_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Absolute directory for rolling log files
    #[arg(long, env = "CONTACTS_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "CONTACTS_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new contact
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
    },
    /// List every contact
    List,
    /// Show one contact
    #[command(allow_negative_numbers = true)]
    Show { id: i64 },
    /// Find contacts whose name contains QUERY
    Search { query: String },
    /// Replace name and phone of a contact
    #[command(allow_negative_numbers = true)]
    Edit {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
    },
    /// Delete a contact
    #[command(allow_negative_numbers = true)]
    Delete { id: i64 },
}
