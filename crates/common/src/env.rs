//! Environment/runtime helpers
//!
//! Sanity checks to ensure the data directory exists and is writable at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the data directory exists, creating it if missing, and that files can
/// be created inside it.
pub async fn ensure_data_dir(data_dir: &Path) -> anyhow::Result<()> {
    if tokio::fs::metadata(data_dir).await.is_err() {
        warn!(data_dir = %data_dir.display(), "data directory not found; creating it");
    }
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", data_dir.display()))?;

    let probe = data_dir.join(".write-probe");
    tokio::fs::write(&probe, b"ok")
        .await
        .map_err(|e| anyhow::anyhow!("data directory {} is not writable: {e}", data_dir.display()))?;
    tokio::fs::remove_file(&probe).await.ok();

    info!(data_dir = %data_dir.display(), "data directory ready");
    Ok(())
}
