//! warstats: terminal viewer for Foxhole war statistics.
//!
//! # Startup sequence
//!
//! 1. Parse flags and load the config (read-only, safe before terminal init).
//! 2. Install file logging; the terminal belongs to the TUI.
//! 3. Open the state database and read the saved location.
//! 4. Build the loader thread and the UI state, then restore the location.
//! 5. `install_panic_hook()`, `register_sigterm()`, `init_tui()`.
//!
//! Everything fallible that does not need the terminal happens before
//! `init_tui()`, so a setup error never leaves the terminal in raw mode. The
//! event loop exits only via `break`, so `restore_tui()` is always reached.

mod app;
mod cli;
mod config;
mod controller;
mod event;
mod loader;
mod logging;
mod search_box;
mod selector;
mod theme;
mod tui;
mod ui;

use std::sync::atomic::Ordering;

use clap::Parser;
use tracing::{error, info, warn};
use warstats_core::db;
use warstats_core::source::WarSource;

use crate::event::AppEvent;
use crate::ui::keybindings::{handle_key, handle_mouse, KeyAction};

/// File name of the state database inside the state directory.
const STATE_DB: &str = "state.db";

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = cli::Args::parse();
    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let (mut config, config_warning) = config::load_config(&config_path);
    if let Some(dir) = args.data_dir.clone() {
        config.data_dir = dir;
    }

    let _log_guard = logging::init_logging(&config.state_dir, &config.log_filter)?;
    if let Some(warning) = config_warning {
        warn!("{warning}");
    }
    info!(
        data_dir = %config.data_dir.display(),
        state_dir = %config.state_dir.display(),
        item_height = config.item_height,
        "starting warstats"
    );

    let theme = theme::Theme::from_name(&config.theme);

    let db_path = config.state_dir.join(STATE_DB);
    let db = db::open_db(&db_path.to_string_lossy())
        .await
        .map_err(std::io::Error::other)?;
    let saved = match db::load_location(&db).await {
        Ok(saved) => saved,
        Err(e) => {
            warn!(error = %e, "could not read saved location");
            None
        }
    };

    let handler = event::EventHandler::new();
    let loader_tx = loader::spawn_loader(WarSource::new(&config.data_dir), handler.tx.clone())?;
    let mut state =
        app::AppState::new(loader_tx, config.item_height).map_err(std::io::Error::other)?;
    state.restore_location(&cli::initial_location(&args, saved));

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm()?;
    let mut terminal = tui::init_tui()?;

    event::spawn_event_task(handler.tx.clone());
    let mut rx = handler.rx;

    'event_loop: loop {
        tokio::select! {
            // Heartbeat so SIGTERM is noticed even when no events arrive.
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(AppEvent::Render) => {
                        if let Err(e) = terminal.draw(|frame| ui::render(frame, &mut state, &theme)) {
                            error!(error = %e, "draw failed");
                            break 'event_loop;
                        }
                    }
                    Some(AppEvent::Key(key)) => {
                        if handle_key(key, &mut state) == KeyAction::Quit {
                            break 'event_loop;
                        }
                    }
                    Some(AppEvent::Mouse(mouse)) => {
                        handle_mouse(mouse, &mut state);
                    }
                    Some(AppEvent::WarLoaded(outcome)) => state.apply_load(*outcome),
                    // The next Render recomputes the layout and remounts the rosters.
                    Some(AppEvent::Resize(..)) | Some(AppEvent::Tick) => {}
                    Some(AppEvent::Quit) | None => break 'event_loop,
                }
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }

        // Awaited in place so saves land in selection order.
        if let Some(location) = state.take_pending_location() {
            if let Err(e) = db::save_location(&db, &location).await {
                warn!(error = %e, "could not save location");
                state.status.borrow_mut().set(format!("could not save location: {e}"));
            }
        }
    }

    state.disconnect();
    tui::restore_tui()?;
    info!("warstats exiting");
    Ok(())
}
