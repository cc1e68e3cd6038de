/// User interface module
///
/// This module contains the two screens and the widgets they are built from:
/// - Upload screen: widget lifecycle, drag-drop, banners (upload.rs)
/// - Gallery screen: infinite scroll and lazy thumbnails (gallery.rs)
/// - Grid geometry and layout (grid.rs)
/// - Scroll proximity observer (observer.rs)
/// - Thumbnail tile with fade-in (tile.rs)
/// - Full-window viewer (lightbox.rs)

pub mod gallery;
pub mod grid;
pub mod lightbox;
pub mod observer;
pub mod tile;
pub mod upload;

/// Height of the navigation header above each screen
pub const HEADER_HEIGHT: f32 = 56.0;

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Upload,
    Gallery,
}
