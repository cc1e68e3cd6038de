use iced::widget::{button, column, container, horizontal_space, row, text};
use iced::{event, window, Alignment, Element, Event, Length, Size, Subscription, Task, Theme};
use std::sync::Arc;

mod config;
mod error;
mod remote;
mod state;
mod ui;
mod widget;

use config::Config;
use remote::{ListingClient, UploadClient};
use ui::{gallery, upload, Route, HEADER_HEIGHT};

const WINDOW_WIDTH: f32 = 1200.0;
const WINDOW_HEIGHT: f32 = 800.0;

/// The screen currently shown. Navigating always builds a fresh screen.
enum Screen {
    Upload(upload::Upload),
    Gallery(gallery::Gallery),
}

/// Main application state
struct GuestGallery {
    config: Arc<Config>,
    /// Shared HTTP connection pool
    http: reqwest::Client,
    /// Last known inner window size, handed to each new gallery
    window_size: Size,
    screen: Screen,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    Navigate(Route),
    WindowResized(Size),
    Upload(upload::Message),
    Gallery(gallery::Message),
}

impl GuestGallery {
    fn new(config: Config) -> (Self, Task<Message>) {
        let config = Arc::new(config);
        let http = reqwest::Client::new();

        log::info!("🎨 Guest Gallery started (service key {})", config.service.public_key);

        let window_size = Size::new(WINDOW_WIDTH, WINDOW_HEIGHT);
        let (screen, task) = open_screen(&config, &http, window_size, Route::Upload);

        // The real size can differ from the requested one (tiling WMs, scaling)
        let measure = window::get_latest()
            .and_then(window::get_size)
            .map(Message::WindowResized);

        let app = GuestGallery {
            config,
            http,
            window_size,
            screen,
        };
        (app, Task::batch([task, measure]))
    }

    /// Replace the current screen with a freshly constructed one
    fn navigate(&mut self, route: Route) -> Task<Message> {
        log::info!("➡️  Navigating to {:?}", route);

        let (screen, task) = open_screen(&self.config, &self.http, self.window_size, route);
        self.screen = screen;
        task
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Navigate(route) => self.navigate(route),
            Message::WindowResized(size) => {
                self.window_size = size;
                match &mut self.screen {
                    Screen::Gallery(screen) => screen
                        .update(gallery::Message::Resized(size))
                        .map(Message::Gallery),
                    Screen::Upload(_) => Task::none(),
                }
            }
            Message::Upload(upload::Message::Redirect) => self.navigate(Route::Gallery),
            Message::Gallery(gallery::Message::GoToUpload) => self.navigate(Route::Upload),
            Message::Upload(message) => match &mut self.screen {
                Screen::Upload(screen) => screen.update(message).map(Message::Upload),
                // Late result from a screen that is gone
                Screen::Gallery(_) => Task::none(),
            },
            Message::Gallery(message) => match &mut self.screen {
                Screen::Gallery(screen) => screen.update(message).map(Message::Gallery),
                Screen::Upload(_) => Task::none(),
            },
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let current = match self.screen {
            Screen::Upload(_) => Route::Upload,
            Screen::Gallery(_) => Route::Gallery,
        };

        let nav = |label: &'static str, route: Route| {
            button(text(label).size(16))
                .style(if current == route {
                    button::primary
                } else {
                    button::text
                })
                .on_press(Message::Navigate(route))
        };

        let header = container(
            row![
                text("Our Wedding").size(24),
                horizontal_space(),
                nav("Upload", Route::Upload),
                nav("Gallery", Route::Gallery),
            ]
            .spacing(12)
            .align_y(Alignment::Center),
        )
        .padding([0, 20])
        .center_y(Length::Fixed(HEADER_HEIGHT))
        .style(container::dark);

        let body = match &self.screen {
            Screen::Upload(screen) => screen.view().map(Message::Upload),
            Screen::Gallery(screen) => screen.view().map(Message::Gallery),
        };

        column![header, body].into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let resized = event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::Resized(size)) => Some(Message::WindowResized(size)),
            _ => None,
        });

        let screen = match &self.screen {
            Screen::Upload(screen) => screen.subscription().map(Message::Upload),
            Screen::Gallery(screen) => screen.subscription().map(Message::Gallery),
        };

        Subscription::batch([resized, screen])
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Build a screen together with its startup task
fn open_screen(
    config: &Config,
    http: &reqwest::Client,
    window_size: Size,
    route: Route,
) -> (Screen, Task<Message>) {
    let service = Arc::new(config.service.clone());

    match route {
        Route::Upload => {
            let client = UploadClient::new(http.clone(), service);
            let (screen, task) =
                upload::Upload::new(client, config.uploader.clone(), config.camera.clone());
            (Screen::Upload(screen), task.map(Message::Upload))
        }
        Route::Gallery => {
            let listing = ListingClient::new(http.clone(), service);
            let (screen, task) = gallery::Gallery::new(listing, gallery::viewport_for(window_size));
            (Screen::Gallery(screen), task.map(Message::Gallery))
        }
    }
}

fn main() -> iced::Result {
    let loaded = Config::load();
    let config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => Config::default().with_env_overrides(),
    };

    // RUST_LOG is parsed last so it wins over the configured level
    env_logger::Builder::new()
        .filter_level(config.log_filter())
        .filter_module("wgpu", log::LevelFilter::Warn)
        .filter_module("naga", log::LevelFilter::Warn)
        .filter_module("cosmic_text", log::LevelFilter::Warn)
        .filter_module("iced_wgpu", log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    if let Err(e) = loaded {
        log::error!("⚠️  Could not load config, using defaults: {}", e);
    }

    iced::application("Guest Gallery", GuestGallery::update, GuestGallery::view)
        .subscription(GuestGallery::subscription)
        .theme(GuestGallery::theme)
        .window_size((WINDOW_WIDTH, WINDOW_HEIGHT))
        .centered()
        .run_with(move || GuestGallery::new(config))
}
