//! Native selection surfaces for the upload widgets
//!
//! The file source opens a multi-select picker; the camera source opens a
//! single-file picker in the pictures directory, where the system camera app
//! stores its captures. Dropped paths are expanded here as well.

use rfd::AsyncFileDialog;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{SelectedFile, Source, WidgetConfig};
use crate::error::Result;

/// Show the widget's dialog and wait for the user.
/// An empty result means the dialog was cancelled.
pub async fn open_dialog(config: WidgetConfig) -> Vec<PathBuf> {
    let mut dialog = AsyncFileDialog::new()
        .add_filter("Images", config.preferred_types.as_slice());

    let camera = config.sources.contains(&Source::Camera) && !config.sources.contains(&Source::File);

    if camera {
        dialog = dialog.set_title("Take or Choose a Photo");
        if let Some(pictures) = dirs::picture_dir() {
            dialog = dialog.set_directory(pictures);
        }
    } else {
        dialog = dialog.set_title("Select Photos to Upload");
    }

    let picked = if config.multiple && !camera {
        dialog.pick_files().await.unwrap_or_default()
    } else {
        dialog.pick_file().await.into_iter().collect()
    };

    picked.iter().map(|handle| handle.path().to_path_buf()).collect()
}

/// Turn dropped paths into candidate files. Folders are walked recursively
/// and only files the widget accepts are kept from them; files dropped
/// directly are passed through so validation can report them.
pub fn expand_dropped(paths: &[PathBuf], config: &WidgetConfig) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            log::info!("🔍 Scanning dropped folder: {}", path.display());

            let found = WalkDir::new(path)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
                .map(|entry| entry.into_path())
                .filter(|p| p.is_file() && config.accepts_extension(p));

            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }

    files
}

/// Read name and size of each path
pub async fn describe(paths: Vec<PathBuf>) -> Result<Vec<SelectedFile>> {
    let mut files = Vec::with_capacity(paths.len());

    for path in paths {
        let metadata = tokio::fs::metadata(&path).await?;
        files.push(SelectedFile {
            name: file_name(&path),
            size: metadata.len(),
            path,
        });
    }

    Ok(files)
}

/// Describe the chosen paths and check them against the widget's rules
pub async fn prepare(paths: Vec<PathBuf>, config: WidgetConfig) -> Result<Vec<SelectedFile>> {
    let files = describe(paths).await?;
    config.validate(&files)?;
    Ok(files)
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
