mod helpers;
mod messages;
mod state;
mod styles;
mod update;
mod views;

use iced::theme::Palette;
use iced::widget::{column, container, scrollable, Space};
use iced::{Color, Element, Fill, Task, Theme};
use std::sync::Arc;

use krypt_core::config::{default_config_path, DappConfig};
use krypt_core::{B256, LocalStore, Session, TransferService, WalletGateway};

use messages::Message;
use state::{InFlight, LaunchOptions};

// Dark palette
const BG: Color = Color::from_rgb(0.051, 0.067, 0.090); // #0d1117
const SURFACE: Color = Color::from_rgb(0.114, 0.157, 0.227); // #1d283a
const BORDER: Color = Color::from_rgb(0.204, 0.259, 0.337); // #344256
const ACTIVE: Color = Color::from_rgb(0.086, 0.137, 0.251); // #162340
const MUTED: Color = Color::from_rgb(0.396, 0.459, 0.545); // #65758b
const PRIMARY: Color = Color::from_rgb(0.145, 0.349, 0.961); // #2559f5

fn main() -> iced::Result {
    init_tracing();
    iced::application(App::new, App::update, App::view)
        .title("Krypt")
        .theme(App::theme)
        .run()
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

// -- App state --

struct App {
    /// `None` when the gateway could not be built (bad URL, unreadable store).
    service: Option<Arc<TransferService>>,
    config: DappConfig,
    session: Session,
    in_flight: Option<InFlight>,
    last_native_tx: Option<B256>,
    refreshing: bool,
    clipboard: Option<arboard::Clipboard>,

    // UI state
    error_message: Option<String>,
    success_message: Option<String>,
    status_message: Option<String>,

    // Cached theme (avoids re-allocating every frame)
    theme: Theme,
}

impl App {
    fn new() -> (Self, Task<Message>) {
        let options = LaunchOptions::from_args(std::env::args().skip(1));
        let (config, service, error_message) = match Self::build_service(&options) {
            Ok((config, service)) => (config, Some(Arc::new(service)), None),
            Err(e) => {
                tracing::error!(error = %e, "startup failed");
                (DappConfig::default(), None, Some(format!("{e:#}")))
            }
        };
        let stored_count = service.as_ref().and_then(|s| s.stored_transaction_count());

        let mut app = Self {
            service,
            config,
            session: Session::new(stored_count),
            in_flight: None,
            last_native_tx: None,
            refreshing: false,
            clipboard: arboard::Clipboard::new().ok(),
            error_message,
            success_message: None,
            status_message: None,
            theme: Theme::custom(
                "Krypt".to_string(),
                Palette {
                    background: BG,
                    text: Color::from_rgb(0.988, 0.988, 0.988),
                    primary: PRIMARY,
                    success: Color::from_rgb(0.059, 0.757, 0.718),
                    warning: Color::from_rgb(1.0, 0.757, 0.027),
                    danger: Color::from_rgb(0.906, 0.192, 0.192),
                },
            ),
        };
        let task = app.check_wallet();
        (app, task)
    }

    fn build_service(options: &LaunchOptions) -> anyhow::Result<(DappConfig, TransferService)> {
        let stored = DappConfig::load(&default_config_path()?)?;
        let config = options.apply(stored)?;
        let gateway = WalletGateway::new(&config, options.insecure)?;
        let store = LocalStore::open()?;
        let service = TransferService::new(gateway, store, &config);
        Ok((config, service))
    }

    fn theme(&self) -> Theme {
        self.theme.clone()
    }

    // -- Views --

    fn view(&self) -> Element<'_, Message> {
        let header = self.view_header();
        let body = column![self.view_send(), self.view_transfers()].spacing(20);

        let content = column![
            header,
            styles::separator(),
            Space::new().height(10),
            container(scrollable(body)).padding([0, 20]),
        ]
        .width(Fill);

        container(content).width(Fill).height(Fill).into()
    }
}
