//! Incremental gallery loader
//!
//! The loader is a plain value. Every event goes through [`GalleryState::step`],
//! which consumes the current state and returns the next one together with the
//! side effects the caller has to perform (issue a fetch, re-target the
//! proximity observer). Nothing here touches the network or the viewport, so
//! every pagination scenario can be driven from a test.

use super::data::{select_images, DisplayedImage, RemoteFile};

/// Pagination bookkeeping for one gallery screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryPageState {
    /// Last page requested (>= 1)
    pub current_page: u32,
    /// True exactly while one page fetch is in flight
    pub is_loading: bool,
    /// Becomes false for good once a page yields no images
    pub has_more_pages: bool,
}

impl Default for GalleryPageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            is_loading: false,
            has_more_pages: true,
        }
    }
}

/// Which kind of load a fetch belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Page 1, replaces the grid
    Initial,
    /// Page 2.., appends to the grid
    More,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingFetch {
    page: u32,
    kind: FetchKind,
}

/// Inputs to the loader
#[derive(Debug, Clone)]
pub enum LoaderEvent {
    /// The gallery screen was opened
    Start,
    /// The observed last tile came within the proximity margin
    NearEnd,
    /// A listing request finished
    PageFetched {
        page: u32,
        result: Result<Vec<RemoteFile>, String>,
    },
    /// Re-run the most recent failed fetch
    Retry,
}

/// Work the caller must carry out after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Request this page from the listing endpoint
    FetchPage(u32),
    /// Attach the proximity observer to the tile at this index
    ObserveLastTile(usize),
}

/// Everything the gallery grid renders
#[derive(Debug, Clone, Default)]
pub struct GalleryState {
    pub pages: GalleryPageState,
    /// Tiles in display order
    pub tiles: Vec<DisplayedImage>,
    /// Show the "No Photos Yet" placeholder instead of a grid
    pub show_empty: bool,
    /// Spinner above the grid, only for the initial load
    pub loading_indicator: bool,
    /// Inline error shown under the grid
    pub error: Option<String>,
    cdn_host: String,
    pending: Option<PendingFetch>,
    failed: Option<FetchKind>,
}

impl GalleryState {
    pub fn new(cdn_host: impl Into<String>) -> Self {
        Self {
            cdn_host: cdn_host.into(),
            ..Self::default()
        }
    }

    /// Whether a failed fetch can be retried right now
    pub fn can_retry(&self) -> bool {
        self.failed.is_some() && !self.pages.is_loading
    }

    /// Advance the loader by one event
    pub fn step(mut self, event: LoaderEvent) -> (Self, Vec<Effect>) {
        let effects = match event {
            LoaderEvent::Start => self.begin_initial(),
            LoaderEvent::NearEnd => self.begin_more(),
            LoaderEvent::PageFetched { page, result } => self.finish(page, result),
            LoaderEvent::Retry => self.retry(),
        };
        (self, effects)
    }

    fn begin_initial(&mut self) -> Vec<Effect> {
        if self.pages.is_loading {
            return Vec::new();
        }

        self.loading_indicator = true;
        self.pages.current_page = 1;
        self.pages.is_loading = true;
        self.failed = None;
        self.pending = Some(PendingFetch {
            page: 1,
            kind: FetchKind::Initial,
        });

        vec![Effect::FetchPage(1)]
    }

    fn begin_more(&mut self) -> Vec<Effect> {
        if self.pages.is_loading || !self.pages.has_more_pages {
            return Vec::new();
        }

        self.pages.current_page += 1;
        self.pages.is_loading = true;
        self.failed = None;
        self.pending = Some(PendingFetch {
            page: self.pages.current_page,
            kind: FetchKind::More,
        });

        vec![Effect::FetchPage(self.pages.current_page)]
    }

    fn retry(&mut self) -> Vec<Effect> {
        if self.pages.is_loading {
            return Vec::new();
        }

        match self.failed {
            Some(FetchKind::Initial) => self.begin_initial(),
            Some(FetchKind::More) => self.begin_more(),
            None => Vec::new(),
        }
    }

    fn finish(&mut self, page: u32, result: Result<Vec<RemoteFile>, String>) -> Vec<Effect> {
        let pending = match self.pending {
            Some(pending) if pending.page == page => pending,
            _ => {
                log::debug!("Ignoring stale response for page {}", page);
                return Vec::new();
            }
        };

        let effects = match pending.kind {
            FetchKind::Initial => self.finish_initial(result),
            FetchKind::More => self.finish_more(result),
        };

        // Released on every exit path
        self.pending = None;
        self.pages.is_loading = false;
        self.loading_indicator = false;

        effects
    }

    fn finish_initial(&mut self, result: Result<Vec<RemoteFile>, String>) -> Vec<Effect> {
        self.tiles.clear();
        self.show_empty = false;

        match result {
            Ok(files) => {
                self.error = None;
                let images = select_images(files);

                if images.is_empty() {
                    self.show_empty = true;
                    self.pages.has_more_pages = false;
                    return Vec::new();
                }

                self.tiles = self.project(&images);
                vec![Effect::ObserveLastTile(self.tiles.len() - 1)]
            }
            Err(detail) => {
                log::error!("Error fetching images: {}", detail);
                self.error = Some(format!("Failed to load images: {}", detail));
                self.failed = Some(FetchKind::Initial);
                Vec::new()
            }
        }
    }

    fn finish_more(&mut self, result: Result<Vec<RemoteFile>, String>) -> Vec<Effect> {
        match result {
            Ok(files) => {
                self.error = None;
                let images = select_images(files);

                if images.is_empty() {
                    log::info!("📭 No more pages after page {}", self.pages.current_page);
                    self.pages.has_more_pages = false;
                    return Vec::new();
                }

                let batch = self.project(&images);
                self.tiles.extend(batch);
                vec![Effect::ObserveLastTile(self.tiles.len() - 1)]
            }
            Err(detail) => {
                log::error!("Error loading more images: {}", detail);
                self.error = Some("Failed to load more images".to_string());
                self.failed = Some(FetchKind::More);
                // Next trigger asks for the same page again
                self.pages.current_page -= 1;
                Vec::new()
            }
        }
    }

    fn project(&self, images: &[RemoteFile]) -> Vec<DisplayedImage> {
        images
            .iter()
            .map(|file| DisplayedImage::from_remote(file, &self.cdn_host))
            .collect()
    }
}
