//! sluice CLI
//!
//! - process: batch ファイルを RecordProcessor に流してレスポンスを表示
//! - origins: 受け付ける event source の一覧
//! - normalize: API Gateway リクエストの正規化
//! - broadcast: concern を指定して publish（InMemoryPublisher）

mod cli;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format, cli.verbose)?;

    debug!(version = env!("CARGO_PKG_VERSION"), "sluice starting");

    let result = match &cli.command {
        Commands::Process(args) => commands::run_process(args).await,
        Commands::Origins(args) => commands::run_origins(args).await,
        Commands::Normalize(args) => commands::run_normalize(args).await,
        Commands::Broadcast(args) => commands::run_broadcast(args).await,
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "command failed");
    }

    result
}
