//! Unified event channel.
//!
//! Terminal input, timer ticks and finished war loads are normalised into a
//! single [`AppEvent`] and sent over a tokio unbounded MPSC channel. The main
//! loop receives from this channel and dispatches accordingly.
//!
//! Two independent intervals drive the loop:
//! - **Render interval** (33 ms) triggers a `terminal.draw()` call.
//! - **Tick interval** (250 ms) keeps the loop polling the SIGTERM flag when
//!   the terminal is idle.

use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::interval;

use crate::loader::LoadOutcome;

/// All events the application can receive from any source.
#[derive(Debug)]
#[non_exhaustive]
pub enum AppEvent {
    /// A key press (`KeyEventKind::Press` only; release and repeat are
    /// filtered in [`spawn_event_task`]).
    Key(KeyEvent),
    /// A mouse event from the terminal (click, scroll, move).
    Mouse(MouseEvent),
    /// Terminal was resized to (columns, rows).
    Resize(u16, u16),
    /// Logic tick (250 ms).
    Tick,
    /// Render tick (33 ms).
    Render,
    /// A war record finished loading (or failed to) on the loader thread.
    WarLoaded(Box<LoadOutcome>),
    /// Quit signal.
    Quit,
}

/// Holds the sender and receiver ends of the unified event channel.
///
/// The sender is cloned into background producers; the receiver is owned by
/// the main loop.
pub struct EventHandler {
    pub tx: mpsc::UnboundedSender<AppEvent>,
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the tokio task that feeds terminal input and timer ticks into `tx`.
///
/// The task exits once the receiver is gone. `reader.next().fuse()` keeps
/// `select!` from polling a finished crossterm stream.
pub fn spawn_event_task(tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut tick_interval = interval(Duration::from_millis(250));
        let mut render_interval = interval(Duration::from_millis(33));
        let mut reader = EventStream::new();

        loop {
            let tick_tick = tick_interval.tick();
            let render_tick = render_interval.tick();
            let crossterm_event = reader.next().fuse();

            let event = tokio::select! {
                _ = tick_tick => Some(AppEvent::Tick),
                _ = render_tick => Some(AppEvent::Render),
                maybe_event = crossterm_event => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
                    Some(Ok(Event::Resize(w, h))) => Some(AppEvent::Resize(w, h)),
                    Some(Ok(Event::Mouse(mouse))) => Some(AppEvent::Mouse(mouse)),
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "terminal input error");
                        None
                    }
                    _ => None,
                },
            };

            if let Some(event) = event {
                if tx.send(event).is_err() {
                    break;
                }
            }
        }
    });
}
