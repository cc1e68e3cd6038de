//! File listing and CDN downloads

use reqwest::header::AUTHORIZATION;
use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::error::{GalleryError, Result};
use crate::state::data::{ListingPage, RemoteFile};

/// Reads pages of file metadata and fetches image bytes from the CDN
#[derive(Debug, Clone)]
pub struct ListingClient {
    http: reqwest::Client,
    service: Arc<ServiceConfig>,
}

impl ListingClient {
    pub fn new(http: reqwest::Client, service: Arc<ServiceConfig>) -> Self {
        Self { http, service }
    }

    pub fn cdn_host(&self) -> &str {
        &self.service.cdn_host
    }

    /// `GET {api_base}/files/?page={page}`
    pub fn page_url(&self, page: u32) -> String {
        format!(
            "{}/files/?page={}",
            self.service.api_base.trim_end_matches('/'),
            page
        )
    }

    /// `{scheme} {public_key}:`
    pub fn authorization(&self) -> String {
        format!("{} {}:", self.service.auth_scheme, self.service.public_key)
    }

    /// Fetch one page of uploaded files. A non-success status becomes
    /// [`GalleryError::Status`] carrying the response body verbatim.
    pub async fn fetch_page(&self, page: u32) -> Result<Vec<RemoteFile>> {
        let url = self.page_url(page);
        log::info!("📡 Fetching page {}: {}", page, url);

        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, self.authorization())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            log::error!("API Error: {} {}", status.as_u16(), body);
            return Err(rejected_listing(status.as_u16(), body));
        }

        let files = parse_page(&body)?;
        log::debug!("Page {} returned {} files", page, files.len());
        Ok(files)
    }

    /// Download image bytes, e.g. a thumbnail preview
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GalleryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Error for a listing request the service answered with a non-success status
fn rejected_listing(status: u16, body: String) -> GalleryError {
    GalleryError::Listing(Box::new(GalleryError::Status { status, body }))
}

/// Decode a listing response body
pub fn parse_page(body: &str) -> Result<Vec<RemoteFile>> {
    let page: ListingPage = serde_json::from_str(body)?;
    Ok(page.results)
}
