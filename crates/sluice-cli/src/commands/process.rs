//! `process` command implementation.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde_json::Value;
use sluice_core::extract::parse_json_text;
use sluice_core::impls::sync_handler_fn;
use sluice_core::{Batch, DispatchError, ProcessorConfig, RecordProcessor};
use tracing::info;

use super::{load_config, read_input};
use crate::cli::ProcessArgs;

/// Execute the `process` command with an echo handler: the response maps
/// every record id to its extracted payload.
pub async fn run_process(args: &ProcessArgs) -> Result<()> {
    let config = load_config(args.config.as_deref()).await?;
    let text = read_input(&args.batch).await?;
    let batch: Batch = serde_json::from_str(&text)
        .context("Batch is not a valid {\"Records\": [...]} document")?;

    let response = process_batch(&batch, &config, &args.expect, args.decode_json).await?;
    info!(records = batch.len(), entries = response.len(), "batch processed");

    println!(
        "{}",
        serde_json::to_string_pretty(&response).context("Failed to serialize response")?
    );
    Ok(())
}

pub(crate) async fn process_batch(
    batch: &Batch,
    config: &ProcessorConfig,
    expect: &[String],
    decode_json: bool,
) -> Result<BTreeMap<String, Value>> {
    let handler =
        sync_handler_fn(move |payload: Value| Ok::<_, DispatchError>(decode(payload, decode_json)));
    let expect: Vec<&str> = expect.iter().map(String::as_str).collect();

    let processor = RecordProcessor::builder(handler)
        .with_rules(config)
        .expect_origins(&expect)
        .build()?;

    let response = processor.process(batch).await?;
    Ok(response.into_iter().collect())
}

fn decode(payload: Value, decode_json: bool) -> Value {
    if decode_json { parse_json_text(payload) } else { payload }
}
