//! Upload widgets
//!
//! A widget is a preconfigured upload entry point: it opens a native dialog,
//! checks the selection against its [`WidgetConfig`], and hands valid files to
//! the uploader. The coordinator only ever sees the lifecycle events.
//!
//! - `picker.rs` - native dialogs and dropped-path expansion
//! - `camera.rs` - camera device probe

pub mod camera;
pub mod picker;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 25 MB, the per-file ceiling of both widgets
pub const MAX_FILE_SIZE: u64 = 25 * 1024 * 1024;

/// Input surfaces a widget offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    File,
    Camera,
}

/// Everything that tunes one widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Reject anything that is not an image
    pub images_only: bool,
    /// Per-file size limit in bytes
    pub max_file_size: u64,
    /// Allow selecting several files at once
    pub multiple: bool,
    pub multiple_min: usize,
    pub multiple_max: usize,
    /// Accepted extensions, lowercase, without the dot
    pub preferred_types: Vec<String>,
    pub sources: Vec<Source>,
    /// Accept files dropped onto the window
    pub drag_and_drop: bool,
    /// Images larger than this box are downscaled before upload
    pub image_shrink: Option<(u32, u32)>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self::uploader()
    }
}

impl WidgetConfig {
    /// Generic multi-file uploader
    pub fn uploader() -> Self {
        Self {
            images_only: true,
            max_file_size: MAX_FILE_SIZE,
            multiple: true,
            multiple_min: 1,
            multiple_max: 10,
            preferred_types: ["png", "jpg", "jpeg", "heic", "heif"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            sources: vec![Source::File],
            drag_and_drop: true,
            image_shrink: Some((1024, 1024)),
        }
    }

    /// Single-shot camera entry
    pub fn camera() -> Self {
        Self {
            images_only: true,
            max_file_size: MAX_FILE_SIZE,
            multiple: false,
            multiple_min: 1,
            multiple_max: 1,
            preferred_types: ["png", "jpg", "jpeg"].iter().map(|ext| ext.to_string()).collect(),
            sources: vec![Source::Camera],
            drag_and_drop: false,
            image_shrink: Some((1024, 1024)),
        }
    }

    /// Smallest and largest accepted selection size
    pub fn count_bounds(&self) -> (usize, usize) {
        if self.multiple {
            (self.multiple_min.max(1), self.multiple_max.max(1))
        } else {
            (1, 1)
        }
    }

    pub fn accepts_extension(&self, path: &Path) -> bool {
        let ext = match path.extension() {
            Some(ext) => ext.to_string_lossy().to_lowercase(),
            None => return false,
        };

        if self.images_only && !is_image_extension(&ext) {
            return false;
        }

        self.preferred_types.is_empty() || self.preferred_types.iter().any(|t| *t == ext)
    }

    /// Check a selection against this widget's rules
    pub fn validate(&self, files: &[SelectedFile]) -> Result<(), SelectionError> {
        let (min, max) = self.count_bounds();

        if files.len() < min {
            return Err(SelectionError::TooFew { min });
        }
        if files.len() > max {
            return Err(SelectionError::TooMany { max });
        }

        for file in files {
            if !self.accepts_extension(&file.path) {
                return Err(SelectionError::Unsupported {
                    name: file.name.clone(),
                });
            }
            if file.size > self.max_file_size {
                return Err(SelectionError::TooLarge {
                    name: file.name.clone(),
                    limit: self.max_file_size,
                });
            }
        }

        Ok(())
    }
}

/// A local file picked or dropped by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("select at least {min} file(s)")]
    TooFew { min: usize },

    #[error("select at most {max} file(s)")]
    TooMany { max: usize },

    #[error("{name} is not a supported image type")]
    Unsupported { name: String },

    #[error("{name} exceeds the {limit} byte limit")]
    TooLarge { name: String, limit: u64 },
}

/// Extensions recognised as images
const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff", "heic", "heif", "avif",
];

pub fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext)
}

/// Best-effort content type from the extension
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected(name: &str, size: u64) -> SelectedFile {
        SelectedFile {
            path: PathBuf::from("/photos").join(name),
            name: name.to_string(),
            size,
        }
    }

    #[test]
    fn test_uploader_accepts_preferred_types_case_insensitively() {
        let config = WidgetConfig::uploader();
        assert!(config.accepts_extension(Path::new("a/IMG_0001.JPG")));
        assert!(config.accepts_extension(Path::new("a/live.heic")));
        assert!(!config.accepts_extension(Path::new("a/notes.txt")));
        assert!(!config.accepts_extension(Path::new("a/anim.gif")));
        assert!(!config.accepts_extension(Path::new("a/no_extension")));
    }

    #[test]
    fn test_camera_rejects_heic() {
        let config = WidgetConfig::camera();
        assert!(!config.accepts_extension(Path::new("shot.heic")));
        assert!(config.accepts_extension(Path::new("shot.jpeg")));
    }

    #[test]
    fn test_uploader_count_limits() {
        let config = WidgetConfig::uploader();

        assert_eq!(config.validate(&[]), Err(SelectionError::TooFew { min: 1 }));

        let eleven: Vec<SelectedFile> = (0..11).map(|i| selected(&format!("{}.jpg", i), 10)).collect();
        assert_eq!(config.validate(&eleven), Err(SelectionError::TooMany { max: 10 }));
        assert!(config.validate(&eleven[..10]).is_ok());
    }

    #[test]
    fn test_camera_takes_exactly_one() {
        let config = WidgetConfig::camera();
        let two = vec![selected("a.jpg", 10), selected("b.jpg", 10)];

        assert_eq!(config.validate(&two), Err(SelectionError::TooMany { max: 1 }));
        assert!(config.validate(&two[..1]).is_ok());
    }

    #[test]
    fn test_size_limit() {
        let config = WidgetConfig::uploader();
        let files = vec![selected("ok.png", MAX_FILE_SIZE), selected("huge.png", MAX_FILE_SIZE + 1)];

        assert_eq!(
            config.validate(&files),
            Err(SelectionError::TooLarge {
                name: "huge.png".into(),
                limit: MAX_FILE_SIZE
            })
        );
    }

    #[test]
    fn test_unsupported_type_named_in_error() {
        let config = WidgetConfig::uploader();
        let err = config.validate(&[selected("menu.pdf", 10)]).unwrap_err();
        assert_eq!(err.to_string(), "menu.pdf is not a supported image type");
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let json = r#"{ "multiple_max": 3, "sources": ["file", "camera"], "image_shrink": null }"#;
        let config: WidgetConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.multiple_max, 3);
        assert_eq!(config.sources, vec![Source::File, Source::Camera]);
        assert_eq!(config.image_shrink, None);
        assert!(config.images_only);
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for(Path::new("x.JPG")), "image/jpeg");
        assert_eq!(mime_for(Path::new("x.heif")), "image/heif");
        assert_eq!(mime_for(Path::new("x")), "application/octet-stream");
    }
}
