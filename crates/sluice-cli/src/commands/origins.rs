//! `origins` command implementation.

use anyhow::{Context, Result};
use serde_json::Value;
use sluice_core::impls::sync_handler_fn;
use sluice_core::{DispatchError, OriginTag, ProcessorConfig, RecordProcessor};

use super::load_config;
use crate::cli::OriginsArgs;

pub async fn run_origins(args: &OriginsArgs) -> Result<()> {
    let config = load_config(args.config.as_deref()).await?;
    let origins = configured_origins(&config)?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&origins).context("Failed to serialize origins")?
        );
    } else {
        for origin in &origins {
            println!("{origin}");
        }
    }
    Ok(())
}

/// Event sources resolvable by a processor built from the defaults plus `config`.
pub(crate) fn configured_origins(config: &ProcessorConfig) -> Result<Vec<OriginTag>> {
    let handler = sync_handler_fn(|payload: Value| Ok::<_, DispatchError>(payload));
    let processor = RecordProcessor::builder(handler).with_rules(config).build()?;
    Ok(processor.origins())
}
