//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// sluice - run event-source record batches through a record processor
#[derive(Parser, Debug)]
#[command(name = "sluice", version, about = "Event-source record batch processor")]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value = "compact", global = true, env = "SLUICE_LOG_FORMAT")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process a batch (`{"Records": [...]}`) and print the response map
    Process(ProcessArgs),

    /// List the event sources a processor would accept
    Origins(OriginsArgs),

    /// Normalize an API Gateway request and print the result
    Normalize(NormalizeArgs),

    /// Publish an event under a concern (in-memory, prints the message)
    Broadcast(BroadcastArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ProcessArgs {
    /// Batch file, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    pub batch: PathBuf,

    /// Origin rules (TOML)
    #[arg(short, long, env = "SLUICE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Event sources that must be configured (repeatable)
    #[arg(long = "expect", value_name = "EVENT_SOURCE")]
    pub expect: Vec<String>,

    /// Parse string payloads holding JSON text
    #[arg(long)]
    pub decode_json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct OriginsArgs {
    /// Origin rules (TOML)
    #[arg(short, long, env = "SLUICE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct NormalizeArgs {
    /// Request file, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    pub request: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct BroadcastArgs {
    /// Destination per concern, `concern=address` (repeatable)
    #[arg(short, long = "destination", value_name = "CONCERN=ADDRESS", value_parser = parse_destination)]
    pub destinations: Vec<(String, String)>,

    /// Concern to publish under
    #[arg(long)]
    pub concern: String,

    /// Event (JSON; bare words are sent as strings)
    #[arg(long)]
    pub event: String,

    /// Optional metadata (JSON)
    #[arg(long)]
    pub meta: Option<String>,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

fn parse_destination(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((concern, address)) if !concern.is_empty() && !address.is_empty() => {
            Ok((concern.to_string(), address.to_string()))
        }
        _ => Err(format!("expected CONCERN=ADDRESS, got `{s}`")),
    }
}
