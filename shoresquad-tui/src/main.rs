//! Terminal UI for ShoreSquad: browse beach cleanups, join the crew and find events nearby.

mod app;
mod config;
mod input;
mod ui;

use std::{
    fs::OpenOptions,
    io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::{Duration as StdDuration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use shoresquad_core::{ShoreSquadService, notification::NotificationLevel};
use shoresquad_provider_simulated as simulated;
use shoresquad_store_file::FileStore;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{App, Screen};
use crate::config::Config;
use crate::input::Action;

const LOCATION_DENIED: &str = "Unable to access location. Please enable geolocation and try again.";

#[derive(Debug, Parser)]
#[command(name = "shoresquad", version, about = "Rally your crew for the next beach cleanup")]
struct Cli {
    /// Path to a TOML config file (defaults to ./shoresquad.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for crew data and logs
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log at debug level regardless of the configured filter
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        cfg.storage.data_dir = dir;
        cfg.validate()?;
    }

    // Storage + logging
    let store = FileStore::open(&cfg.storage.data_dir).with_context(|| {
        format!(
            "Failed to open data directory: {}",
            cfg.storage.data_dir.display()
        )
    })?;
    let level = if cli.debug {
        "shoresquad=debug"
    } else {
        cfg.logging.level.as_str()
    };
    init_logging(&cfg.log_path(), level)?;
    info!(data_dir = %store.dir().display(), "starting shoresquad");

    // Capabilities + service setup
    let capabilities =
        simulated::capabilities(cfg.simulated_settings()).with_store(Arc::new(store));
    let service = ShoreSquadService::new(capabilities, cfg.service_settings());

    // App state
    let app = App::new(service, cfg.notification_ttl());

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        warn!(error = %err, "shoresquad exited with an error");
    }
    res
}

/// Log to a file in the data directory; the terminal belongs to the UI.
fn init_logging(path: &Path, default_filter: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()?;

    Ok(())
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    // Weather and map load in the background while input is handled
    let mut startup = app.spawn_startup();

    loop {
        while let Ok(update) = startup.try_recv() {
            app.apply_startup(update);
        }

        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if !event::poll(StdDuration::from_millis(100))? {
            app.notifications.prune(Instant::now());
            continue;
        }

        let key = match event::read()? {
            CEvent::Key(key) => key,
            CEvent::Resize(_, _) => {
                app.service.resize_map();
                continue;
            }
            _ => continue,
        };

        match input::handle_key_event(key, &mut app) {
            Action::Quit => break,
            Action::None => {}
            Action::JoinSelectedEvent => app.join_selected_event(),
            Action::SubmitForm => app.submit_form(),
            Action::FindNearby => {
                app.is_loading = true;
                terminal.draw(|frame| ui::draw(frame, &app))?;

                let res = app.service.find_nearby().await;

                app.is_loading = false;
                match res {
                    Ok(report) => {
                        app.nearby = Some(report);
                        app.screen = Screen::Nearby;
                    }
                    Err(err) => {
                        warn!(error = %err, "nearby search failed");
                        app.notify(NotificationLevel::Warning, LOCATION_DENIED);
                    }
                }
            }
        }
    }

    info!("shoresquad stopped");
    Ok(())
}
