//! Error types shared by the remote clients, widgets and configuration.

use thiserror::Error;

use crate::widget::SelectionError;

/// Errors produced while talking to the hosted file service or preparing uploads
#[derive(Debug, Error)]
pub enum GalleryError {
    /// Transport-level failure (DNS, TLS, connection reset, ...)
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    /// The body is kept verbatim so it can be surfaced to the user.
    #[error("{status} {body}")]
    Status { status: u16, body: String },

    /// The file listing failed
    #[error("Failed to fetch images: {0}")]
    Listing(#[source] Box<GalleryError>),

    #[error("invalid response: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("image processing failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GalleryError>;
