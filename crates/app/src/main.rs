use anyhow::{anyhow, Context};
use eframe::egui;
use providers::{ApiClient, ApiConfig, ChatClient};
use services::storage::{default_storage_path, FileStore, KeyValueStore, MemoryStore};
use services::{ModeStore, UiContext};
use shared::UiMode;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod health;
mod router;
mod session;
mod utils;
mod views;

use health::HealthProbe;
use router::{route, ActiveView};
use session::ChatSession;

fn init_tracing() {
    // Debug builds log our own crates verbosely; RUST_LOG overrides either way.
    let default_filter = if cfg!(debug_assertions) {
        "info,mind_chat=debug,providers=debug,services=debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn open_store() -> Arc<dyn KeyValueStore> {
    match default_storage_path() {
        Some(path) => {
            tracing::debug!("preferences stored in {}", path.display());
            Arc::new(FileStore::new(path))
        }
        None => {
            tracing::warn!("no config directory, ui mode will not persist");
            Arc::new(MemoryStore::new())
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let (settings, fresh) = utils::load_settings_or_default();
    tracing::info!(
        "chat backend {} (defaults: {})",
        settings.api_base_url,
        fresh
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("mind-chat-runtime")
        .build()
        .context("failed to start async runtime")?;

    let api = ApiClient::new(
        ApiConfig::new(settings.api_base_url.clone()).with_timeout(settings.request_timeout()),
    )
    .context("failed to build HTTP client")?;
    let client = Arc::new(ChatClient::new(api, settings.conversation_id.clone()));

    let mut ui_ctx = UiContext::initialize(ModeStore::new(open_store()));
    let mode_changes = ui_ctx.subscribe();

    let mut session = ChatSession::new(client.clone(), runtime.handle().clone());
    session.load_history();

    let app = MindChatApp {
        session,
        health: HealthProbe::start(client, runtime.handle()),
        ui_ctx,
        mode_changes,
        dark: settings.dark_mode,
        _runtime: runtime,
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([480.0, 400.0]),
        vsync: true,
        ..Default::default()
    };

    let dark = settings.dark_mode;
    eframe::run_native(
        "Mind Chat",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(if dark {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
            Box::new(app)
        }),
    )
    .map_err(|e| anyhow!("failed to open window: {e}"))
}

struct MindChatApp {
    ui_ctx: UiContext,
    mode_changes: Receiver<UiMode>,
    session: ChatSession,
    health: HealthProbe,
    dark: bool,
    // Owns the worker threads the session and probe spawn onto.
    _runtime: tokio::runtime::Runtime,
}

impl eframe::App for MindChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.health.poll();
        if self.session.poll() {
            ctx.request_repaint();
        }

        for mode in self.mode_changes.try_iter() {
            tracing::debug!("re-routing for {} mode", mode);
            ctx.request_repaint();
        }

        // Keep polling (and animating the typing dots) while a result is due.
        if self.session.is_sending()
            || self.session.is_loading_history()
            || self.health.is_checking()
        {
            ctx.request_repaint();
        }

        match route(self.ui_ctx.current_mode()) {
            ActiveView::Chat(_layout) => views::chat::show(
                ctx,
                &mut self.ui_ctx,
                &mut self.session,
                self.health.status(),
                self.dark,
            ),
            ActiveView::Placeholder(mode) => views::placeholder::show(ctx, &mut self.ui_ctx, mode),
        }
    }
}
