//! Gallery tile: a clickable thumbnail that fades in once loaded

use iced::widget::image::Handle;
use iced::widget::{button, container, text, tooltip, Image, Space};
use iced::{ContentFit, Element, Length};
use std::time::{Duration, Instant};

use super::grid::{TILE_SIZE, TILE_SPACING};
use crate::state::data::DisplayedImage;

/// Fade-in time once the thumbnail has arrived
pub const FADE_DURATION: Duration = Duration::from_millis(300);

/// Load state of one tile's thumbnail
#[derive(Debug, Clone)]
pub enum Thumbnail {
    /// Download in flight
    Requested,
    Loaded { handle: Handle, revealed_at: Instant },
    Failed,
}

impl Thumbnail {
    /// True while the fade-in animation is still running
    pub fn is_fading(&self, now: Instant) -> bool {
        match self {
            Thumbnail::Loaded { revealed_at, .. } => fade_opacity(*revealed_at, now) < 1.0,
            _ => false,
        }
    }
}

/// Opacity of a thumbnail revealed at `revealed_at`, from 0.0 to 1.0
pub fn fade_opacity(revealed_at: Instant, now: Instant) -> f32 {
    let elapsed = now.saturating_duration_since(revealed_at).as_secs_f32();
    (elapsed / FADE_DURATION.as_secs_f32()).clamp(0.0, 1.0)
}

pub fn view<'a, Message: Clone + 'a>(
    image: &'a DisplayedImage,
    thumbnail: Option<&'a Thumbnail>,
    now: Instant,
    on_press: Message,
) -> Element<'a, Message> {
    let size = Length::Fixed(TILE_SIZE);

    // Invisible until the image has loaded
    let picture: Element<'a, Message> = match thumbnail {
        Some(Thumbnail::Loaded { handle, revealed_at }) => Image::new(handle.clone())
            .width(size)
            .height(size)
            .content_fit(ContentFit::Cover)
            .opacity(fade_opacity(*revealed_at, now))
            .into(),
        Some(Thumbnail::Failed) => container(text("Image unavailable").size(13))
            .center(size)
            .into(),
        _ => Space::new(size, size).into(),
    };

    let tile = button(container(picture).width(size).height(size).style(container::dark))
        .padding(0)
        .style(button::text)
        .on_press(on_press);

    let tile = tooltip(
        tile,
        container(text(&image.alt).size(13))
            .padding(6)
            .style(container::rounded_box),
        tooltip::Position::Bottom,
    );

    container(tile).padding(TILE_SPACING / 2.0).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_opacity_ramps_over_duration() {
        let start = Instant::now();

        assert_eq!(fade_opacity(start, start), 0.0);
        let half = fade_opacity(start, start + Duration::from_millis(150));
        assert!((half - 0.5).abs() < 1e-3);
        assert_eq!(fade_opacity(start, start + FADE_DURATION), 1.0);
        assert_eq!(fade_opacity(start, start + Duration::from_secs(5)), 1.0);
    }

    #[test]
    fn test_clock_behind_reveal_is_transparent() {
        let now = Instant::now();
        let revealed_at = now + Duration::from_millis(50);
        assert_eq!(fade_opacity(revealed_at, now), 0.0);
    }

    #[test]
    fn test_only_loaded_thumbnails_fade() {
        let now = Instant::now();
        let loaded = Thumbnail::Loaded {
            handle: Handle::from_bytes(Vec::<u8>::new()),
            revealed_at: now,
        };

        assert!(loaded.is_fading(now));
        assert!(!loaded.is_fading(now + FADE_DURATION));
        assert!(!Thumbnail::Requested.is_fading(now));
        assert!(!Thumbnail::Failed.is_fading(now));
    }
}
