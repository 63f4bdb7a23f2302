//! Command implementations.

mod broadcast;
mod normalize;
mod origins;
mod process;

pub use broadcast::run_broadcast;
pub use normalize::run_normalize;
pub use origins::run_origins;
pub use process::run_process;

use std::path::Path;

use anyhow::{Context, Result};
use sluice_core::ProcessorConfig;
use tokio::io::AsyncReadExt;

/// Read a whole file, or stdin when the path is `-`.
pub(crate) async fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Load origin rules; no path means no extra rules.
pub(crate) async fn load_config(path: Option<&Path>) -> Result<ProcessorConfig> {
    let Some(path) = path else {
        return Ok(ProcessorConfig::default());
    };
    let text = read_input(path).await?;
    ProcessorConfig::from_toml_str(&text)
        .with_context(|| format!("Invalid processor config {}", path.display()))
}
