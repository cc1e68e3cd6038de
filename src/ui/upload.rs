//! Upload screen
//!
//! Drives both widgets through their lifecycle (dialog, validation, transfer)
//! and reports every step to the [`Coordinator`], which owns the banners, the
//! busy flag and the redirect timer.

use iced::widget::{button, column, container, row, text};
use iced::{event, time, window, Alignment, Element, Event, Length, Subscription, Task};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::remote::UploadClient;
use crate::state::upload::{BannerKind, Coordinator, UploadedFile, WidgetEvent, WidgetKind};
use crate::widget::{camera, picker, SelectedFile, WidgetConfig};

/// Drops arriving closer together than this are uploaded as one batch
const DROP_BATCH_WINDOW: Duration = Duration::from_millis(150);

/// Timer resolution for banners, redirect and drop batching
const TICK_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub enum Message {
    Open(WidgetKind),
    Picked(WidgetKind, Vec<PathBuf>),
    Described(WidgetKind, Result<Vec<SelectedFile>, String>),
    Transferred(WidgetKind, Result<Vec<UploadedFile>, String>),
    CameraProbed(Result<bool, String>),
    FileHovered,
    HoverLeft,
    FileDropped(PathBuf),
    /// Dropped paths after folders were walked
    Expanded(Result<Vec<PathBuf>, String>),
    Tick(Instant),
    /// Handled by the application: switch to the gallery
    Redirect,
}

pub struct Upload {
    coordinator: Coordinator,
    client: UploadClient,
    uploader: WidgetConfig,
    camera: WidgetConfig,
    camera_available: bool,
    dropped: Vec<PathBuf>,
    drop_deadline: Option<Instant>,
    hovering: bool,
}

impl Upload {
    /// Create the screen and probe for a camera
    pub fn new(client: UploadClient, uploader: WidgetConfig, camera: WidgetConfig) -> (Self, Task<Message>) {
        let screen = Self {
            coordinator: Coordinator::new(),
            client,
            uploader,
            camera,
            camera_available: true,
            dropped: Vec::new(),
            drop_deadline: None,
            hovering: false,
        };

        let probe = Task::perform(
            async { camera::probe().await.map_err(|e| e.to_string()) },
            Message::CameraProbed,
        );

        (screen, probe)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Open(kind) => {
                if self.coordinator.is_open(kind) {
                    return Task::none();
                }

                self.widget_event(kind, WidgetEvent::DialogOpen);
                let config = self.config(kind).clone();
                Task::perform(picker::open_dialog(config), move |paths| Message::Picked(kind, paths))
            }
            Message::Picked(kind, paths) => {
                if paths.is_empty() {
                    log::info!("Selection cancelled ({:?})", kind);
                    self.widget_event(kind, WidgetEvent::DialogClose);
                    return Task::none();
                }

                log::info!("📁 {} file(s) selected ({:?})", paths.len(), kind);
                let config = self.config(kind).clone();
                Task::perform(
                    async move { picker::prepare(paths, config).await.map_err(|e| e.to_string()) },
                    move |result| Message::Described(kind, result),
                )
            }
            Message::Described(kind, Ok(files)) => {
                let client = self.client.clone();
                let shrink_to = self.config(kind).image_shrink;
                Task::perform(
                    async move { client.upload_all(files, shrink_to).await.map_err(|e| e.to_string()) },
                    move |result| Message::Transferred(kind, result),
                )
            }
            Message::Described(kind, Err(e)) => {
                self.fail(kind, e);
                Task::none()
            }
            Message::Transferred(kind, Ok(files)) => {
                self.widget_event(kind, WidgetEvent::DialogClose);
                self.widget_event(kind, WidgetEvent::UploadComplete(files));
                Task::none()
            }
            Message::Transferred(kind, Err(e)) => {
                self.fail(kind, e);
                Task::none()
            }
            Message::CameraProbed(Ok(available)) => {
                if !available {
                    log::info!("📷 No camera found, hiding the camera entry");
                }
                self.camera_available = available;
                Task::none()
            }
            Message::CameraProbed(Err(e)) => {
                log::warn!("⚠️  Camera probe failed: {}", e);
                Task::none()
            }
            Message::FileHovered => {
                self.hovering = self.uploader.drag_and_drop;
                Task::none()
            }
            Message::HoverLeft => {
                self.hovering = false;
                Task::none()
            }
            Message::FileDropped(path) => {
                self.hovering = false;
                if !self.uploader.drag_and_drop {
                    return Task::none();
                }

                self.dropped.push(path);
                if self.drop_deadline.is_none() {
                    self.drop_deadline = Some(Instant::now() + DROP_BATCH_WINDOW);
                }
                Task::none()
            }
            Message::Expanded(Ok(paths)) if paths.is_empty() => {
                self.fail(WidgetKind::Uploader, "no supported images in the dropped items".to_string());
                Task::none()
            }
            Message::Expanded(Ok(paths)) => self.update(Message::Picked(WidgetKind::Uploader, paths)),
            Message::Expanded(Err(e)) => {
                self.fail(WidgetKind::Uploader, e);
                Task::none()
            }
            Message::Tick(now) => {
                let flush = self.flush_drops(now);
                if self.coordinator.tick(now) {
                    Task::batch([flush, Task::done(Message::Redirect)])
                } else {
                    flush
                }
            }
            Message::Redirect => Task::none(),
        }
    }

    /// Hand the batched drops to the uploader once the batch window has passed
    fn flush_drops(&mut self, now: Instant) -> Task<Message> {
        match self.drop_deadline {
            Some(deadline) if now >= deadline => {}
            _ => return Task::none(),
        }
        self.drop_deadline = None;

        let paths = std::mem::take(&mut self.dropped);
        if self.coordinator.is_open(WidgetKind::Uploader) {
            log::warn!("⚠️  Ignoring {} dropped path(s) while an upload is running", paths.len());
            return Task::none();
        }

        self.widget_event(WidgetKind::Uploader, WidgetEvent::DialogOpen);
        let config = self.uploader.clone();
        Task::perform(
            async move {
                tokio::task::spawn_blocking(move || picker::expand_dropped(&paths, &config))
                    .await
                    .map_err(|e| {
                        log::error!("❌ Folder scan failed: {}", e);
                        format!("folder scan failed: {}", e)
                    })
            },
            Message::Expanded,
        )
    }

    fn fail(&mut self, kind: WidgetKind, reason: String) {
        self.widget_event(kind, WidgetEvent::DialogClose);
        self.widget_event(kind, WidgetEvent::Error(reason));
    }

    fn widget_event(&mut self, kind: WidgetKind, event: WidgetEvent) {
        self.coordinator.on_widget_event(kind, event, Instant::now());
    }

    fn config(&self, kind: WidgetKind) -> &WidgetConfig {
        match kind {
            WidgetKind::Uploader => &self.uploader,
            WidgetKind::Camera => &self.camera,
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let drops = event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileHovered(_)) => Some(Message::FileHovered),
            Event::Window(window::Event::FilesHoveredLeft) => Some(Message::HoverLeft),
            Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            _ => None,
        });

        if self.coordinator.needs_ticks() || self.drop_deadline.is_some() {
            Subscription::batch([drops, time::every(TICK_INTERVAL).map(Message::Tick)])
        } else {
            drops
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let busy = self.coordinator.is_busy();

        let mut banners = column![].spacing(8);
        for banner in self.coordinator.banners() {
            let style = match banner.kind {
                BannerKind::Success => text::success,
                BannerKind::Error => text::danger,
            };
            banners = banners.push(
                container(text(banner.text).size(16).style(style))
                    .padding(12)
                    .center_x(Length::Fill)
                    .style(container::rounded_box),
            );
        }

        let hint = if self.hovering {
            "Release to upload"
        } else {
            "Drop photos or folders here"
        };
        let drop_zone = container(text(hint).size(18))
            .center_x(Length::Fill)
            .height(Length::Fixed(180.0))
            .align_y(Alignment::Center)
            .style(if self.hovering {
                container::rounded_box
            } else {
                container::bordered_box
            });

        let choose = button("Choose Photos")
            .padding(12)
            .on_press_maybe((!busy).then_some(Message::Open(WidgetKind::Uploader)));

        let mut actions = row![choose].spacing(16);
        if self.camera_available {
            actions = actions.push(
                button("Take a Photo")
                    .padding(12)
                    .style(button::secondary)
                    .on_press_maybe((!busy).then_some(Message::Open(WidgetKind::Camera))),
            );
        }

        let mut content = column![
            banners,
            text("Share Your Photos").size(32),
            text("Upload up to 10 photos at a time, 25 MB each.").size(14),
            drop_zone,
            actions,
        ]
        .spacing(20)
        .align_x(Alignment::Center)
        .max_width(720);

        if busy {
            content = content.push(text("Uploading...").size(16));
        }

        container(content)
            .padding(40)
            .center_x(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}
