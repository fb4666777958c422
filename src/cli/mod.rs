//! Command line interface

mod prompt;

pub use prompt::{PREVIEW_LIMIT, SYNOPSIS_LIMIT, TerminalPrompter};

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "synctv-collector")]
#[command(version)]
#[command(about = "Search VOD collector sites and import episodes into a SyncTV room")]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level, ignored when RUST_LOG is set
    #[arg(short = 'v', long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search a collector and import the chosen episodes
    Search(SearchArgs),

    /// Import episodes listed in a text file
    Import(ImportArgs),

    /// List the available collectors
    Collectors,
}

/// Connection settings shared by the import commands
#[derive(Debug, Default, Args)]
pub struct SyncArgs {
    /// SyncTV server base URL
    #[arg(long, value_name = "URL")]
    pub synctv_url: Option<String>,

    /// Target room id
    #[arg(short, long, value_name = "ID")]
    pub room_id: Option<String>,

    #[arg(short, long)]
    pub username: Option<String>,

    #[arg(short, long)]
    pub password: Option<String>,

    /// Reuse a token instead of logging in
    #[arg(long, env = "SYNCTV_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Clear the room playlist before importing
    #[arg(long)]
    pub clear: bool,

    /// Write the effective settings back to the configuration file
    #[arg(long)]
    pub save_config: bool,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Search keyword, asked for when omitted
    pub keyword: Option<String>,

    /// Collector id, see `collectors`
    #[arg(short = 'C', long, value_name = "ID")]
    pub collector: Option<String>,

    /// Retries per collector host
    #[arg(long)]
    pub retries: Option<u32>,

    /// Skip TLS certificate verification for collector hosts
    #[arg(long)]
    pub insecure: bool,

    /// Import without the final confirmation
    #[arg(short, long)]
    pub yes: bool,

    #[command(flatten)]
    pub sync: SyncArgs,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Text file with one `name$url`, `url|name` or bare url per line
    pub file: PathBuf,

    /// Offer to rename each entry before importing
    #[arg(long)]
    pub rename: bool,

    /// Import without the final confirmation
    #[arg(short, long)]
    pub yes: bool,

    #[command(flatten)]
    pub sync: SyncArgs,
}
