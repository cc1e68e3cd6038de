//! Gallery screen
//!
//! Owns the loader state and carries out its effects: listing requests become
//! tasks, `ObserveLastTile` re-targets the proximity observer. Scroll and
//! resize events feed the observer and the lazy thumbnail loader.

use iced::widget::image::Handle;
use iced::widget::{button, column, container, scrollable, stack, text};
use iced::{keyboard, window, Alignment, Element, Length, Size, Subscription, Task};
use std::collections::HashMap;
use std::time::Instant;

use super::grid::{self, GridViewport, GRID_PADDING};
use super::lightbox::Lightbox;
use super::observer::ProximityObserver;
use super::tile::{self, Thumbnail};
use crate::remote::ListingClient;
use crate::state::data::RemoteFile;
use crate::state::gallery::{Effect, GalleryState, LoaderEvent};

/// Thumbnails are requested for tiles this close to the viewport
const THUMBNAIL_MARGIN: f32 = 400.0;

/// The unscrolled grid viewport for a window of this size
pub fn viewport_for(window: Size) -> GridViewport {
    GridViewport::new(window.width, (window.height - super::HEADER_HEIGHT).max(0.0))
}

#[derive(Debug, Clone)]
pub enum Message {
    PageFetched(u32, Result<Vec<RemoteFile>, String>),
    Scrolled(scrollable::Viewport),
    Resized(Size),
    ThumbnailLoaded(String, Result<Handle, String>),
    TileClicked(usize),
    FullImageLoaded(String, Result<Handle, String>),
    CloseLightbox,
    Frame(Instant),
    Retry,
    /// Handled by the application: switch to the upload screen
    GoToUpload,
}

pub struct Gallery {
    listing: ListingClient,
    loader: GalleryState,
    observer: ProximityObserver,
    viewport: GridViewport,
    thumbnails: HashMap<String, Thumbnail>,
    lightbox: Option<Lightbox>,
    now: Instant,
}

impl Gallery {
    /// Create the screen and start the initial load
    pub fn new(listing: ListingClient, viewport: GridViewport) -> (Self, Task<Message>) {
        let loader = GalleryState::new(listing.cdn_host());

        let mut gallery = Self {
            listing,
            loader,
            observer: ProximityObserver::default(),
            viewport,
            thumbnails: HashMap::new(),
            lightbox: None,
            now: Instant::now(),
        };

        let task = gallery.apply(LoaderEvent::Start);
        (gallery, task)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PageFetched(page, result) => self.apply(LoaderEvent::PageFetched { page, result }),
            Message::Scrolled(viewport) => {
                self.viewport = GridViewport::from_scroll(&viewport);
                self.on_viewport_changed()
            }
            Message::Resized(size) => {
                let resized = viewport_for(size);
                self.viewport.width = resized.width;
                self.viewport.height = resized.height;
                self.on_viewport_changed()
            }
            Message::ThumbnailLoaded(uuid, result) => {
                self.now = Instant::now();
                let thumbnail = match result {
                    Ok(handle) => Thumbnail::Loaded {
                        handle,
                        revealed_at: self.now,
                    },
                    Err(e) => {
                        log::warn!("⚠️  Thumbnail {} failed: {}", uuid, e);
                        Thumbnail::Failed
                    }
                };
                self.thumbnails.insert(uuid, thumbnail);
                Task::none()
            }
            Message::TileClicked(index) => {
                let Some(image) = self.loader.tiles.get(index) else {
                    return Task::none();
                };

                let lightbox = Lightbox::open(image);
                let task = self.fetch_image(lightbox.uuid.clone(), lightbox.url.clone(), Message::FullImageLoaded);
                self.lightbox = Some(lightbox);
                task
            }
            Message::FullImageLoaded(uuid, result) => {
                if let Some(lightbox) = &mut self.lightbox {
                    lightbox.set_picture(&uuid, result);
                }
                Task::none()
            }
            Message::CloseLightbox => {
                self.lightbox = None;
                Task::none()
            }
            Message::Frame(now) => {
                self.now = now;
                Task::none()
            }
            Message::Retry => self.apply(LoaderEvent::Retry),
            Message::GoToUpload => Task::none(),
        }
    }

    /// Run one loader step and carry out its effects
    fn apply(&mut self, event: LoaderEvent) -> Task<Message> {
        let (loader, effects) = std::mem::take(&mut self.loader).step(event);
        self.loader = loader;

        let mut tasks = Vec::with_capacity(effects.len());
        for effect in effects {
            tasks.push(self.perform(effect));
        }
        Task::batch(tasks)
    }

    fn perform(&mut self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::FetchPage(page) => {
                let listing = self.listing.clone();
                Task::perform(
                    async move { listing.fetch_page(page).await.map_err(|e| e.to_string()) },
                    move |result| Message::PageFetched(page, result),
                )
            }
            Effect::ObserveLastTile(index) => {
                let thumbnails = self.request_thumbnails();
                if self.observer.observe(index, &self.viewport) {
                    Task::batch([thumbnails, self.apply(LoaderEvent::NearEnd)])
                } else {
                    thumbnails
                }
            }
        }
    }

    fn on_viewport_changed(&mut self) -> Task<Message> {
        let thumbnails = self.request_thumbnails();
        if self.observer.update(&self.viewport) {
            Task::batch([thumbnails, self.apply(LoaderEvent::NearEnd)])
        } else {
            thumbnails
        }
    }

    /// Start downloads for thumbnails near the viewport that were never requested
    fn request_thumbnails(&mut self) -> Task<Message> {
        let range = grid::near_range(self.loader.tiles.len(), &self.viewport, THUMBNAIL_MARGIN);
        let mut tasks = Vec::new();

        for image in &self.loader.tiles[range] {
            if self.thumbnails.contains_key(&image.uuid) {
                continue;
            }
            self.thumbnails.insert(image.uuid.clone(), Thumbnail::Requested);
            tasks.push(self.fetch_image(image.uuid.clone(), image.display_url.clone(), Message::ThumbnailLoaded));
        }

        Task::batch(tasks)
    }

    fn fetch_image(
        &self,
        uuid: String,
        url: String,
        done: fn(String, Result<Handle, String>) -> Message,
    ) -> Task<Message> {
        let listing = self.listing.clone();
        Task::perform(
            async move {
                listing
                    .fetch_image(&url)
                    .await
                    .map(|bytes| Handle::from_bytes(bytes))
                    .map_err(|e| e.to_string())
            },
            move |result| done(uuid.clone(), result),
        )
    }

    #[cfg(test)]
    pub fn viewport(&self) -> GridViewport {
        self.viewport
    }

    fn is_animating(&self) -> bool {
        self.thumbnails.values().any(|thumbnail| thumbnail.is_fading(self.now))
    }

    /// Window resizes arrive as [`Message::Resized`] from the application
    pub fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = Vec::new();

        if self.lightbox.is_some() {
            subscriptions.push(keyboard::on_key_press(|key, _modifiers| match key {
                keyboard::Key::Named(keyboard::key::Named::Escape) => Some(Message::CloseLightbox),
                _ => None,
            }));
        }

        if self.is_animating() {
            subscriptions.push(window::frames().map(Message::Frame));
        }

        Subscription::batch(subscriptions)
    }

    pub fn view(&self) -> Element<'_, Message> {
        let tiles = self
            .loader
            .tiles
            .iter()
            .enumerate()
            .map(|(index, image)| {
                tile::view(image, self.thumbnails.get(&image.uuid), self.now, Message::TileClicked(index))
            })
            .collect();

        let mut body = column![grid::view(tiles)].spacing(20);

        if self.loader.show_empty {
            body = body.push(empty_state());
        }

        if let Some(error) = &self.loader.error {
            body = body.push(error_message(error, self.loader.can_retry()));
        }

        let scroller = scrollable(container(body).padding(GRID_PADDING).width(Length::Fill))
            .on_scroll(Message::Scrolled)
            .width(Length::Fill)
            .height(Length::Fill);

        let mut page = column![];
        if self.loader.loading_indicator {
            page = page.push(
                container(text("Loading photos...").size(18))
                    .center_x(Length::Fill)
                    .padding(20),
            );
        }
        let page: Element<'_, Message> = page.push(scroller).into();

        match &self.lightbox {
            Some(lightbox) => stack![page, lightbox.view(Message::CloseLightbox)].into(),
            None => page,
        }
    }
}

fn empty_state<'a>() -> Element<'a, Message> {
    let content = column![
        text("No Photos Yet").size(28),
        text("Be the first to share your wedding memories!").size(16),
        button("Upload Photos").on_press(Message::GoToUpload).padding(10),
    ]
    .spacing(12)
    .align_x(Alignment::Center);

    container(content).center_x(Length::Fill).padding(40).into()
}

fn error_message<'a>(error: &'a str, can_retry: bool) -> Element<'a, Message> {
    let retry = button("Try Again")
        .style(button::secondary)
        .on_press_maybe(can_retry.then_some(Message::Retry));

    let content = column![text(error).style(text::danger), retry]
        .spacing(10)
        .align_x(Alignment::Center);

    container(content).center_x(Length::Fill).padding(20).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use chrono::DateTime;
    use std::sync::Arc;

    fn photos(count: usize) -> Vec<RemoteFile> {
        (0..count)
            .map(|i| RemoteFile {
                uuid: format!("p{}", i),
                mime_type: "image/jpeg".into(),
                original_filename: None,
                datetime_uploaded: DateTime::from_timestamp(1_700_000_000 - i as i64, 0).unwrap(),
            })
            .collect()
    }

    /// Gallery in the default 1200x800 window, initial fetch in flight
    fn gallery() -> Gallery {
        let listing = ListingClient::new(reqwest::Client::new(), Arc::new(ServiceConfig::default()));
        let (gallery, _) = Gallery::new(listing, viewport_for(Size::new(1200.0, 800.0)));
        gallery
    }

    #[test]
    fn test_start_fetches_first_page() {
        let gallery = gallery();
        assert!(gallery.loader.pages.is_loading);
        assert_eq!(gallery.loader.pages.current_page, 1);
        assert!(gallery.loader.loading_indicator);
    }

    #[test]
    fn test_visible_last_tile_requests_next_page() {
        let mut gallery = gallery();
        let _ = gallery.update(Message::PageFetched(1, Ok(photos(10))));

        assert_eq!(gallery.loader.tiles.len(), 10);
        // Two rows fit on screen, so the next page is requested right away
        assert_eq!(gallery.loader.pages.current_page, 2);
        assert!(gallery.loader.pages.is_loading);
        assert_eq!(gallery.observer.target(), Some(9));
    }

    #[test]
    fn test_full_page_waits_until_last_tile_is_near() {
        let mut gallery = gallery();
        let _ = gallery.update(Message::PageFetched(1, Ok(photos(100))));

        assert_eq!(gallery.loader.pages.current_page, 1);
        assert!(!gallery.loader.pages.is_loading);

        // A window tall enough to show every row brings the last tile in range
        let _ = gallery.update(Message::Resized(Size::new(1200.0, 6000.0)));
        assert_eq!(gallery.loader.pages.current_page, 2);
        assert!(gallery.loader.pages.is_loading);
    }

    #[test]
    fn test_thumbnails_requested_near_viewport_only_once() {
        let mut gallery = gallery();
        let _ = gallery.update(Message::PageFetched(1, Ok(photos(100))));

        // Rows 0..=4 of 5 columns lie within the thumbnail margin
        assert_eq!(gallery.thumbnails.len(), 25);
        assert!(gallery
            .thumbnails
            .values()
            .all(|thumbnail| matches!(thumbnail, Thumbnail::Requested)));

        let _ = gallery.update(Message::Resized(Size::new(1200.0, 800.0)));
        assert_eq!(gallery.thumbnails.len(), 25);

        let _ = gallery.update(Message::Resized(Size::new(1200.0, 6000.0)));
        assert_eq!(gallery.thumbnails.len(), 100);
    }

    #[test]
    fn test_failed_thumbnail_is_not_requested_again() {
        let mut gallery = gallery();
        let _ = gallery.update(Message::PageFetched(1, Ok(photos(3))));
        let _ = gallery.update(Message::ThumbnailLoaded("p0".into(), Err("404".into())));

        let _ = gallery.update(Message::Resized(Size::new(1300.0, 800.0)));
        assert!(matches!(gallery.thumbnails.get("p0"), Some(Thumbnail::Failed)));
    }

    #[test]
    fn test_only_one_lightbox_at_a_time() {
        let mut gallery = gallery();
        let _ = gallery.update(Message::PageFetched(1, Ok(photos(3))));

        let _ = gallery.update(Message::TileClicked(0));
        let _ = gallery.update(Message::TileClicked(2));
        assert_eq!(gallery.lightbox.as_ref().map(|l| l.uuid.as_str()), Some("p2"));

        let _ = gallery.update(Message::CloseLightbox);
        assert!(gallery.lightbox.is_none());

        let _ = gallery.update(Message::TileClicked(99));
        assert!(gallery.lightbox.is_none());
    }
}
