//! Shared data structures for the application state
//!
//! These structs represent the data model that flows between
//! the remote listing endpoint and the UI layer.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Alt text used when a file was uploaded without a name
pub const DEFAULT_ALT: &str = "Wedding photo";

/// One uploaded asset as returned by the listing endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteFile {
    /// Service-assigned unique identifier
    pub uuid: String,
    /// Content type, e.g. "image/jpeg" (empty when the service omits it)
    #[serde(default)]
    pub mime_type: String,
    /// Name of the file on the uploader's device
    #[serde(default)]
    pub original_filename: Option<String>,
    /// When the upload finished
    pub datetime_uploaded: DateTime<Utc>,
}

impl RemoteFile {
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// One page of the listing response. Fields other than `results` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingPage {
    pub results: Vec<RemoteFile>,
}

/// UI projection of a [`RemoteFile`]: what a tile and the lightbox need
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayedImage {
    pub uuid: String,
    /// Lightweight preview used by the grid tile
    pub display_url: String,
    /// Larger preview used by the lightbox
    pub full_url: String,
    pub alt: String,
}

impl DisplayedImage {
    /// Build the CDN transformation URLs for a file. No request is needed to resolve them.
    pub fn from_remote(file: &RemoteFile, cdn_host: &str) -> Self {
        Self {
            uuid: file.uuid.clone(),
            display_url: format!("https://{}/{}/-/preview/-/quality/lightest/", cdn_host, file.uuid),
            full_url: format!("https://{}/{}/-/preview/", cdn_host, file.uuid),
            alt: file
                .original_filename
                .as_deref()
                .filter(|name| !name.is_empty())
                .unwrap_or(DEFAULT_ALT)
                .to_string(),
        }
    }
}

/// Keep only image files, newest upload first
pub fn select_images(files: Vec<RemoteFile>) -> Vec<RemoteFile> {
    let mut images: Vec<RemoteFile> = files.into_iter().filter(RemoteFile::is_image).collect();
    images.sort_by(|a, b| b.datetime_uploaded.cmp(&a.datetime_uploaded));
    images
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(uuid: &str, mime: &str, uploaded: &str) -> RemoteFile {
        RemoteFile {
            uuid: uuid.to_string(),
            mime_type: mime.to_string(),
            original_filename: None,
            datetime_uploaded: uploaded.parse().unwrap(),
        }
    }

    #[test]
    fn test_parse_listing_page() {
        let json = r#"{
            "next": null,
            "total": 2,
            "results": [
                {"uuid": "a1", "mime_type": "image/png", "original_filename": "cake.png",
                 "datetime_uploaded": "2024-01-02T10:00:00.123456Z", "size": 2048},
                {"uuid": "a2", "mime_type": "text/plain",
                 "datetime_uploaded": "2024-01-03T10:00:00Z"}
            ]
        }"#;

        let page: ListingPage = serde_json::from_str(json).unwrap();

        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].original_filename.as_deref(), Some("cake.png"));
        assert_eq!(page.results[1].original_filename, None);
        assert!(page.results[0].datetime_uploaded < page.results[1].datetime_uploaded);
    }

    #[test]
    fn test_missing_mime_type_is_not_an_image() {
        let json = r#"{"uuid": "x", "datetime_uploaded": "2024-01-03T10:00:00Z"}"#;
        let file: RemoteFile = serde_json::from_str(json).unwrap();
        assert!(!file.is_image());
    }

    #[test]
    fn test_select_images_filters_and_sorts_newest_first() {
        let files = vec![
            file("old", "image/jpeg", "2024-01-01T08:00:00Z"),
            file("doc", "application/pdf", "2024-01-05T08:00:00Z"),
            file("new", "image/heic", "2024-01-04T08:00:00Z"),
            file("mid", "image/png", "2024-01-02T08:00:00Z"),
            file("vid", "video/mp4", "2024-01-03T08:00:00Z"),
        ];

        let uuids: Vec<String> = select_images(files).into_iter().map(|f| f.uuid).collect();
        assert_eq!(uuids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_display_urls() {
        let mut remote = file("a1", "image/png", "2024-01-02T10:00:00Z");
        let shown = DisplayedImage::from_remote(&remote, "cdn.example.com");

        assert_eq!(shown.display_url, "https://cdn.example.com/a1/-/preview/-/quality/lightest/");
        assert_eq!(shown.full_url, "https://cdn.example.com/a1/-/preview/");
        assert_eq!(shown.alt, DEFAULT_ALT);

        remote.original_filename = Some("first-dance.jpg".into());
        let shown = DisplayedImage::from_remote(&remote, "cdn.example.com");
        assert_eq!(shown.alt, "first-dance.jpg");
    }
}
