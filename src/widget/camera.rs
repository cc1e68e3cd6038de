//! Camera availability probe
//!
//! On Linux a camera shows up as a `/dev/video*` node. Other platforms give no
//! cheap way to ask, so the camera entry stays visible there.

use std::path::Path;

use crate::error::Result;

/// Whether this device exposes a camera input
pub async fn probe() -> Result<bool> {
    if cfg!(target_os = "linux") {
        has_video_device(Path::new("/dev")).await
    } else {
        Ok(true)
    }
}

async fn has_video_device(dev: &Path) -> Result<bool> {
    let mut entries = tokio::fs::read_dir(dev).await?;

    while let Some(entry) = entries.next_entry().await? {
        if entry.file_name().to_string_lossy().starts_with("video") {
            return Ok(true);
        }
    }

    Ok(false)
}
