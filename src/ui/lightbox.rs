//! Full-window image viewer
//!
//! Only one lightbox exists at a time. It closes on a click on the backdrop,
//! on the close button, or on Escape (the gallery subscribes to the key only
//! while a lightbox is open).

use iced::widget::image::Handle;
use iced::widget::{button, column, container, mouse_area, opaque, text, Image};
use iced::{Alignment, Background, Color, ContentFit, Element, Length, Theme};

use crate::state::data::DisplayedImage;

#[derive(Debug, Clone)]
pub enum Picture {
    Loading,
    Loaded(Handle),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct Lightbox {
    pub uuid: String,
    pub url: String,
    pub alt: String,
    pub picture: Picture,
}

impl Lightbox {
    pub fn open(image: &DisplayedImage) -> Self {
        Self {
            uuid: image.uuid.clone(),
            url: image.full_url.clone(),
            alt: image.alt.clone(),
            picture: Picture::Loading,
        }
    }

    /// Store the download result, unless it belongs to another image
    pub fn set_picture(&mut self, uuid: &str, result: Result<Handle, String>) {
        if uuid != self.uuid {
            return;
        }

        self.picture = match result {
            Ok(handle) => Picture::Loaded(handle),
            Err(e) => Picture::Failed(e),
        };
    }

    pub fn view<'a, Message: Clone + 'a>(&'a self, on_close: Message) -> Element<'a, Message> {
        let picture: Element<'a, Message> = match &self.picture {
            Picture::Loading => text("Loading...").size(18).into(),
            // Shrink keeps the aspect ratio inside the available space
            Picture::Loaded(handle) => Image::new(handle.clone())
                .content_fit(ContentFit::Contain)
                .into(),
            Picture::Failed(e) => text(format!("Could not load image: {}", e))
                .style(text::danger)
                .into(),
        };

        let close = button(text("×").size(28))
            .style(button::text)
            .on_press(on_close.clone());

        let panel = column![close, picture, text(&self.alt).size(14)]
            .spacing(8)
            .align_x(Alignment::Center);

        // The panel swallows clicks so only the backdrop closes the viewer
        let backdrop = container(opaque(panel))
            .padding(40)
            .center(Length::Fill)
            .style(backdrop_style);

        mouse_area(backdrop).on_press(on_close).into()
    }
}

fn backdrop_style(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(Color::from_rgba(0.0, 0.0, 0.0, 0.9))),
        ..container::Style::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shown() -> DisplayedImage {
        DisplayedImage {
            uuid: "a1".into(),
            display_url: "https://ucarecdn.com/a1/-/preview/-/quality/lightest/".into(),
            full_url: "https://ucarecdn.com/a1/-/preview/".into(),
            alt: "vows.jpg".into(),
        }
    }

    #[test]
    fn test_open_uses_full_url() {
        let lightbox = Lightbox::open(&shown());
        assert_eq!(lightbox.url, "https://ucarecdn.com/a1/-/preview/");
        assert_eq!(lightbox.alt, "vows.jpg");
        assert!(matches!(lightbox.picture, Picture::Loading));
    }

    #[test]
    fn test_result_for_other_image_is_ignored() {
        let mut lightbox = Lightbox::open(&shown());

        lightbox.set_picture("zz", Err("404".into()));
        assert!(matches!(lightbox.picture, Picture::Loading));

        lightbox.set_picture("a1", Err("404".into()));
        assert!(matches!(lightbox.picture, Picture::Failed(ref e) if e == "404"));
    }
}
