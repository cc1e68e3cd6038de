//! Upload coordinator
//!
//! Reacts to the lifecycle events of the two upload widgets: banners on
//! success and failure, the busy flag while a widget dialog is open, and the
//! delayed navigation to the gallery after a successful upload. Time is passed
//! in explicitly so the banner and redirect timers are testable.

use std::time::{Duration, Instant};

/// How long a banner stays on screen
pub const BANNER_LIFETIME: Duration = Duration::from_secs(3);

/// Delay between a successful upload and the switch to the gallery
pub const REDIRECT_DELAY: Duration = Duration::from_secs(2);

pub const SUCCESS_TEXT: &str = "Photo uploaded successfully!";
pub const ERROR_TEXT: &str = "Error uploading photo. Please try again.";

/// The two independently configured widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// File picker + drag-drop
    Uploader,
    /// Camera capture entry
    Camera,
}

/// A file the hosted service accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub uuid: String,
    pub name: String,
}

/// Lifecycle callbacks a widget reports
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    DialogOpen,
    DialogClose,
    UploadComplete(Vec<UploadedFile>),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: &'static str,
    expires_at: Instant,
}

#[derive(Debug, Default)]
pub struct Coordinator {
    banners: Vec<Banner>,
    uploader_open: bool,
    camera_open: bool,
    redirect_at: Option<Instant>,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle one widget callback
    pub fn on_widget_event(&mut self, kind: WidgetKind, event: WidgetEvent, now: Instant) {
        match event {
            WidgetEvent::DialogOpen => self.set_open(kind, true),
            WidgetEvent::DialogClose => self.set_open(kind, false),
            WidgetEvent::UploadComplete(files) => {
                for file in &files {
                    log::info!("✅ Uploaded {} as {}", file.name, file.uuid);
                }
                self.push_banner(BannerKind::Success, SUCCESS_TEXT, now);
                if self.redirect_at.is_none() {
                    self.redirect_at = Some(now + REDIRECT_DELAY);
                }
            }
            WidgetEvent::Error(detail) => {
                log::error!("Upload error ({:?}): {}", kind, detail);
                self.push_banner(BannerKind::Error, ERROR_TEXT, now);
            }
        }
    }

    /// Drop expired banners. Returns true once the post-upload redirect is due.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.banners.retain(|banner| banner.expires_at > now);

        match self.redirect_at {
            Some(at) if now >= at => {
                self.redirect_at = None;
                true
            }
            _ => false,
        }
    }

    /// True while either widget's dialog is open
    pub fn is_busy(&self) -> bool {
        self.uploader_open || self.camera_open
    }

    /// Whether this widget's dialog is currently open
    pub fn is_open(&self, kind: WidgetKind) -> bool {
        match kind {
            WidgetKind::Uploader => self.uploader_open,
            WidgetKind::Camera => self.camera_open,
        }
    }

    pub fn banners(&self) -> &[Banner] {
        &self.banners
    }

    /// Whether a timer is pending, i.e. whether ticks are needed at all
    pub fn needs_ticks(&self) -> bool {
        !self.banners.is_empty() || self.redirect_at.is_some()
    }

    fn set_open(&mut self, kind: WidgetKind, open: bool) {
        match kind {
            WidgetKind::Uploader => self.uploader_open = open,
            WidgetKind::Camera => self.camera_open = open,
        }
    }

    fn push_banner(&mut self, kind: BannerKind, text: &'static str, now: Instant) {
        self.banners.push(Banner {
            kind,
            text,
            expires_at: now + BANNER_LIFETIME,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uploaded() -> WidgetEvent {
        WidgetEvent::UploadComplete(vec![UploadedFile {
            uuid: "b7c1".into(),
            name: "toast.jpg".into(),
        }])
    }

    #[test]
    fn test_busy_while_any_dialog_open() {
        let now = Instant::now();
        let mut coordinator = Coordinator::new();
        assert!(!coordinator.is_busy());

        coordinator.on_widget_event(WidgetKind::Uploader, WidgetEvent::DialogOpen, now);
        assert!(coordinator.is_busy());

        coordinator.on_widget_event(WidgetKind::Camera, WidgetEvent::DialogOpen, now);
        coordinator.on_widget_event(WidgetKind::Uploader, WidgetEvent::DialogClose, now);
        assert!(coordinator.is_busy());
        assert!(coordinator.is_open(WidgetKind::Camera));
        assert!(!coordinator.is_open(WidgetKind::Uploader));

        coordinator.on_widget_event(WidgetKind::Camera, WidgetEvent::DialogClose, now);
        assert!(!coordinator.is_busy());
    }

    #[test]
    fn test_success_shows_banner_then_redirects() {
        let now = Instant::now();
        let mut coordinator = Coordinator::new();

        coordinator.on_widget_event(WidgetKind::Uploader, uploaded(), now);
        assert_eq!(coordinator.banners().len(), 1);
        assert_eq!(coordinator.banners()[0].kind, BannerKind::Success);
        assert_eq!(coordinator.banners()[0].text, SUCCESS_TEXT);

        assert!(!coordinator.tick(now + Duration::from_millis(1900)));
        assert!(coordinator.tick(now + REDIRECT_DELAY));
        // Fires once
        assert!(!coordinator.tick(now + Duration::from_millis(2500)));
    }

    #[test]
    fn test_error_banner_expires_without_redirect() {
        let now = Instant::now();
        let mut coordinator = Coordinator::new();

        coordinator.on_widget_event(WidgetKind::Camera, WidgetEvent::Error("413".into()), now);
        assert_eq!(coordinator.banners()[0].kind, BannerKind::Error);
        assert!(coordinator.needs_ticks());

        assert!(!coordinator.tick(now + Duration::from_secs(1)));
        assert_eq!(coordinator.banners().len(), 1);

        assert!(!coordinator.tick(now + BANNER_LIFETIME));
        assert!(coordinator.banners().is_empty());
        assert!(!coordinator.needs_ticks());
    }

    #[test]
    fn test_second_success_keeps_first_redirect_deadline() {
        let now = Instant::now();
        let mut coordinator = Coordinator::new();

        coordinator.on_widget_event(WidgetKind::Uploader, uploaded(), now);
        coordinator.on_widget_event(WidgetKind::Camera, uploaded(), now + Duration::from_secs(1));

        assert_eq!(coordinator.banners().len(), 2);
        assert!(coordinator.tick(now + REDIRECT_DELAY));
    }
}
