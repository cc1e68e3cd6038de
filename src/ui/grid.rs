//! Responsive photo grid
//!
//! Tiles are fixed-size squares laid out by `iced_aw::Wrap`. The helpers in
//! this file mirror that layout so the gallery can tell, from a scroll
//! viewport alone, which tiles are on screen.

use iced::widget::scrollable;
use iced::Element;
use iced_aw::Wrap;
use std::ops::Range;

/// Edge length of a thumbnail tile
pub const TILE_SIZE: f32 = 220.0;
/// Gap between neighbouring tiles
pub const TILE_SPACING: f32 = 12.0;
/// Footprint of one tile including its share of the gaps
pub const CELL_SIZE: f32 = TILE_SIZE + TILE_SPACING;
/// Padding around the scrollable content
pub const GRID_PADDING: f32 = 20.0;

/// Visible part of the grid, in content coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridViewport {
    pub width: f32,
    pub height: f32,
    /// Distance scrolled from the top
    pub offset_y: f32,
}

impl GridViewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            offset_y: 0.0,
        }
    }

    pub fn from_scroll(viewport: &scrollable::Viewport) -> Self {
        let bounds = viewport.bounds();
        Self {
            width: bounds.width,
            height: bounds.height,
            offset_y: viewport.absolute_offset().y,
        }
    }
}

/// Tiles per row for a given viewport width (at least one).
/// The scrollbar floats over the content, so the full width is available.
pub fn columns(width: f32) -> usize {
    let available = width - 2.0 * GRID_PADDING;
    ((available / CELL_SIZE).floor() as usize).max(1)
}

/// Top and bottom edge of a tile
pub fn tile_span(index: usize, columns: usize) -> (f32, f32) {
    let row = index / columns.max(1);
    let top = GRID_PADDING + row as f32 * CELL_SIZE + TILE_SPACING / 2.0;
    (top, top + TILE_SIZE)
}

/// Whether a tile lies within `margin` pixels of the viewport
pub fn intersects(index: usize, viewport: &GridViewport, margin: f32) -> bool {
    let (top, bottom) = tile_span(index, columns(viewport.width));
    top < viewport.offset_y + viewport.height + margin && bottom > viewport.offset_y - margin
}

/// Indices of all tiles whose row lies within `margin` pixels of the viewport
pub fn near_range(len: usize, viewport: &GridViewport, margin: f32) -> Range<usize> {
    if len == 0 {
        return 0..0;
    }

    let cols = columns(viewport.width);
    let top = viewport.offset_y - margin - GRID_PADDING;
    let bottom = viewport.offset_y + viewport.height + margin - GRID_PADDING;

    if bottom < 0.0 {
        return 0..0;
    }

    let first_row = (top.max(0.0) / CELL_SIZE).floor() as usize;
    let last_row = (bottom / CELL_SIZE).floor() as usize;

    let start = (first_row * cols).min(len);
    let end = ((last_row + 1) * cols).min(len);
    start..end
}

/// Lay out the tiles. Each tile is expected to carry `TILE_SPACING / 2`
/// padding so neighbours end up one spacing apart.
pub fn view<'a, Message: 'a>(tiles: Vec<Element<'a, Message>>) -> Element<'a, Message> {
    Wrap::with_elements(tiles).into()
}
