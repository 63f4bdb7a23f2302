//! `normalize` command implementation.

use anyhow::{Context, Result};
use sluice_core::http::{NormalizedRequest, RawRequest, normalize_request_parameters};

use super::read_input;
use crate::cli::NormalizeArgs;

pub async fn run_normalize(args: &NormalizeArgs) -> Result<()> {
    let text = read_input(&args.request).await?;
    let normalized = normalize_text(&text)?;

    println!(
        "{}",
        serde_json::to_string_pretty(&normalized).context("Failed to serialize request")?
    );
    Ok(())
}

pub(crate) fn normalize_text(text: &str) -> Result<NormalizedRequest> {
    let raw: RawRequest = serde_json::from_str(text).context("Request is not valid JSON")?;
    Ok(normalize_request_parameters(raw)?)
}
