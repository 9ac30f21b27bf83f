//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::{info, warn};

/// Ensure the media root exists and is writable before the server accepts uploads.
pub async fn ensure_env(media_root: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(media_root).await.is_err() {
        warn!(%media_root, "media directory not found; creating it");
    }
    tokio::fs::create_dir_all(media_root)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {media_root}: {e}"))?;

    let probe = std::path::Path::new(media_root).join(".write-probe");
    tokio::fs::write(&probe, b"ok")
        .await
        .map_err(|e| anyhow::anyhow!("media directory {media_root} is not writable: {e}"))?;
    let _ = tokio::fs::remove_file(&probe).await;
    info!(%media_root, "media directory ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ensure_env;

    #[tokio::test]
    async fn creates_missing_media_root() {
        let dir = std::env::temp_dir().join(format!("guidebook-env-{}", std::process::id()));
        let dir_str = dir.to_string_lossy().to_string();
        let _ = tokio::fs::remove_dir_all(&dir).await;

        ensure_env(&dir_str).await.unwrap();
        assert!(tokio::fs::metadata(&dir).await.unwrap().is_dir());
        assert!(tokio::fs::metadata(dir.join(".write-probe")).await.is_err());

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
