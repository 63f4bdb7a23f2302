//! `broadcast` command implementation.
//!
//! Publishes through an `InMemoryPublisher`, then prints what would have been
//! sent. Useful for checking concern tables and message shape.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use sluice_core::impls::InMemoryPublisher;
use sluice_core::{BroadcastConfig, Broadcaster};
use tracing::info;

use crate::cli::BroadcastArgs;

#[derive(Debug, Serialize)]
struct BroadcastOutput {
    message_id: String,
    destination: String,
    message: Value,
}

pub async fn run_broadcast(args: &BroadcastArgs) -> Result<()> {
    let output = broadcast(args).await?;
    info!(message_id = %output.message_id, "broadcast published");

    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to serialize broadcast result")?
    );
    Ok(())
}

async fn broadcast(args: &BroadcastArgs) -> Result<BroadcastOutput> {
    let config = BroadcastConfig::new(args.destinations.iter().cloned());
    let broadcaster = Broadcaster::new(config, InMemoryPublisher::new())?;

    let event = parse_loose(&args.event);
    let meta = args.meta.as_deref().map(parse_loose);

    let message_id = broadcaster
        .broadcast(&args.concern, &event, meta.as_ref())
        .await?;

    let published = broadcaster
        .publisher()
        .published()
        .await
        .pop()
        .context("Publisher recorded no message")?;

    Ok(BroadcastOutput {
        message_id,
        destination: published.destination,
        message: serde_json::from_str(&published.message).context("Published message is not JSON")?,
    })
}

/// JSON when it parses, otherwise the raw text as a string.
fn parse_loose(s: &str) -> Value {
    serde_json::from_str(s).unwrap_or_else(|_| Value::String(s.to_string()))
}
