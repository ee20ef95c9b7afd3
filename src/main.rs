use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, time::Duration};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Terminal client for RT/RW neighborhood management
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Write debug logs to the temp directory (wargatui-debug.log)
    #[arg(short, long)]
    debug: bool,

    /// Enable vim keybindings (hjkl, gg/G)
    #[arg(long)]
    vim: bool,

    /// Path to config file (default: platform-specific, see docs)
    #[arg(short, long)]
    config: Option<String>,

    /// Override the API base URL from the config file
    #[arg(long)]
    base_url: Option<String>,
}

mod app;
mod cache;
mod config;
mod handlers;
mod services;
mod ui;
mod utils;

use wargatui::{api, error, logic, model, Screen};

use api::WargaClient;
use cache::SessionStore;
use config::Config;
use services::{ApiRequest, ApiResponse};

/// Route `tracing` output to the debug log file
///
/// Without `--debug` only warnings and errors are kept. `RUST_LOG` overrides
/// both. The returned guard flushes the writer when dropped.
fn init_logging(debug: bool) -> Result<WorkerGuard> {
    let path = utils::get_debug_log_path();
    let dir = path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(std::env::temp_dir);
    let file_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "wargatui-debug.log".into());

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));

    let default_level = if debug { "wargatui=debug" } else { "wargatui=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {}", e))?;

    Ok(guard)
}

pub struct App {
    pub model: model::Model,

    client: WargaClient,
    session_store: Option<SessionStore>,
    api_tx: mpsc::UnboundedSender<ApiRequest>,
    api_rx: mpsc::UnboundedReceiver<ApiResponse>,

    /// Role to sign in as on Ctrl+D without asking
    demo_role: Option<String>,
    /// Background refresh period of the visible tab (None disables it)
    refresh_interval: Option<Duration>,
}

impl App {
    /// Assemble an app from already-built parts
    pub(crate) fn from_parts(
        model: model::Model,
        client: WargaClient,
        session_store: Option<SessionStore>,
        api_tx: mpsc::UnboundedSender<ApiRequest>,
        api_rx: mpsc::UnboundedReceiver<ApiResponse>,
        demo_role: Option<String>,
        refresh_interval: Option<Duration>,
    ) -> Self {
        Self {
            model,
            client,
            session_store,
            api_tx,
            api_rx,
            demo_role,
            refresh_interval,
        }
    }

    fn new(config: Config) -> Result<Self> {
        let client = WargaClient::with_timeout(config.base_url.clone(), config.request_timeout())
            .context("failed to build HTTP client")?;

        let session_store = match SessionStore::new() {
            Ok(store) => Some(store),
            Err(e) => {
                tracing::warn!(error = %e, "session store unavailable, logins will not persist");
                None
            }
        };

        let (api_tx, api_rx) =
            services::spawn_api_service(client.clone(), config.max_concurrent_requests);

        let mut app = Self::from_parts(
            model::Model::new(config.vim_mode),
            client,
            session_store,
            api_tx,
            api_rx,
            config.demo_role.clone(),
            config.refresh_interval(),
        );
        app.restore_session();
        Ok(app)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = init_logging(args.debug)?;

    let config_path = config::get_config_path(args.config)?;
    tracing::debug!(path = %config_path.display(), "loading config");

    let mut config = Config::load(&config_path)?;

    // Override config with CLI flags
    if args.vim {
        config.vim_mode = true;
    }
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }

    tracing::info!(base_url = %config.base_url, "starting wargatui");

    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app with error handler
    let result = run_app(&mut terminal, &mut app).await;

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "exited with error");
    }
    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Always render (Elm Architecture approach)
        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if app.model.should_dismiss_toast() {
            app.model.dismiss_toast();
        }

        if app.model.ui.should_quit {
            break;
        }

        // Process API responses (non-blocking)
        while let Ok(response) = app.api_rx.try_recv() {
            handlers::handle_api_response(app, response);
        }

        app.maybe_background_refresh();

        // 250ms poll keeps idle CPU usage low
        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                // Windows reports releases too
                if key.kind == KeyEventKind::Press {
                    handlers::handle_key(app, key);
                }
            }
        }
    }

    tracing::info!("shutting down");
    Ok(())
}
