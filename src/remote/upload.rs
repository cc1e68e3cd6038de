//! Direct uploads to the hosted service

use futures::stream::{self, StreamExt};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::sync::Arc;

use super::shrink;
use crate::config::ServiceConfig;
use crate::error::{GalleryError, Result};
use crate::state::upload::UploadedFile;
use crate::widget::{mime_for, SelectedFile};

/// Files of one batch transferred at the same time
const CONCURRENT_TRANSFERS: usize = 3;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: String,
}

#[derive(Debug, Clone)]
pub struct UploadClient {
    http: reqwest::Client,
    service: Arc<ServiceConfig>,
}

impl UploadClient {
    pub fn new(http: reqwest::Client, service: Arc<ServiceConfig>) -> Self {
        Self { http, service }
    }

    /// `POST {upload_base}/base/`
    pub fn endpoint(&self) -> String {
        format!("{}/base/", self.service.upload_base.trim_end_matches('/'))
    }

    /// Upload a batch. Fails as a whole if any file fails; files that did make
    /// it are logged.
    pub async fn upload_all(
        &self,
        files: Vec<SelectedFile>,
        shrink_to: Option<(u32, u32)>,
    ) -> Result<Vec<UploadedFile>> {
        let results: Vec<Result<UploadedFile>> = stream::iter(files)
            .map(|file| self.upload_one(file, shrink_to))
            .buffered(CONCURRENT_TRANSFERS)
            .collect()
            .await;

        let total = results.len();
        let mut uploaded = Vec::with_capacity(total);
        let mut first_error = None;

        for result in results {
            match result {
                Ok(file) => uploaded.push(file),
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            None => Ok(uploaded),
            Some(e) => {
                log::warn!("⚠️  {} of {} files uploaded before failure", uploaded.len(), total);
                Err(e)
            }
        }
    }

    async fn upload_one(&self, file: SelectedFile, shrink_to: Option<(u32, u32)>) -> Result<UploadedFile> {
        let mut bytes = tokio::fs::read(&file.path).await?;

        if let Some((width, height)) = shrink_to {
            bytes = shrink::shrink_async(bytes, width, height).await?;
        }

        log::info!("⏫ Uploading {} ({} KB)", file.name, bytes.len() / 1024);

        let part = Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(mime_for(&file.path))?;

        let form = Form::new()
            .text("UPLOADCARE_PUB_KEY", self.service.public_key.clone())
            .text("UPLOADCARE_STORE", "auto")
            .part("file", part);

        let response = self.http.post(self.endpoint()).multipart(form).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GalleryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let uuid = parse_upload_response(&body)?;
        Ok(UploadedFile { uuid, name: file.name })
    }
}

/// Extract the new file's uuid from the upload response
pub fn parse_upload_response(body: &str) -> Result<String> {
    let response: UploadResponse = serde_json::from_str(body)?;
    Ok(response.file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_endpoint() {
        let client = UploadClient::new(reqwest::Client::new(), Arc::new(ServiceConfig::default()));
        assert_eq!(client.endpoint(), "https://upload.uploadcare.com/base/");
    }

    #[test]
    fn test_parse_upload_response() {
        let uuid = parse_upload_response(r#"{"file": "17be4678-dab7-4bc7-8753-28914a22960a"}"#).unwrap();
        assert_eq!(uuid, "17be4678-dab7-4bc7-8753-28914a22960a");

        assert!(parse_upload_response(r#"{"error": "pub_key is required."}"#).is_err());
    }

    #[tokio::test]
    async fn test_missing_local_file_fails_batch() {
        let client = UploadClient::new(reqwest::Client::new(), Arc::new(ServiceConfig::default()));
        let files = vec![SelectedFile {
            path: PathBuf::from("/nonexistent/cake.jpg"),
            name: "cake.jpg".into(),
            size: 10,
        }];

        let err = client.upload_all(files, None).await.unwrap_err();
        assert!(matches!(err, GalleryError::Io(_)));
    }

    #[tokio::test]
    async fn test_empty_batch_is_ok() {
        let client = UploadClient::new(reqwest::Client::new(), Arc::new(ServiceConfig::default()));
        let uploaded = client.upload_all(Vec::new(), Some((1024, 1024))).await.unwrap();
        assert!(uploaded.is_empty());
    }
}
