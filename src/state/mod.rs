/// State management module
///
/// This module holds the UI-independent application state:
/// - Remote file records and their display projection (data.rs)
/// - The incremental gallery loader (gallery.rs)
/// - The upload coordinator: banners, busy flag, redirect timer (upload.rs)

pub mod data;
pub mod gallery;
pub mod upload;
