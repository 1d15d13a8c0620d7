//! Background thread that reads war records off disk.
//!
//! Requests arrive over a crossbeam channel; each finished read (success or
//! failure) goes back to the main loop as [`AppEvent::WarLoaded`]. Requests
//! are served in order and never cancelled: a result the user no longer
//! wants is still cached by the display.

use crossbeam_channel::{Receiver, Sender};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};
use warstats_core::selection::WarId;
use warstats_core::source::WarSource;
use warstats_core::types::WarEntry;
use warstats_core::CoreError;

use crate::event::AppEvent;

/// Ask the loader for one war record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest {
    pub war: WarId,
}

/// What the loader produced for a [`LoadRequest`].
#[derive(Debug)]
pub struct LoadOutcome {
    pub war: WarId,
    pub result: Result<WarEntry, CoreError>,
}

/// Starts the loader thread and returns the request sender. The thread exits
/// once every sender is dropped or the event receiver is gone.
///
/// # Errors
///
/// Returns `Err` if the OS cannot spawn the thread.
pub fn spawn_loader(
    source: WarSource,
    event_tx: UnboundedSender<AppEvent>,
) -> std::io::Result<Sender<LoadRequest>> {
    let (tx, rx) = crossbeam_channel::unbounded();
    std::thread::Builder::new()
        .name("war-loader".to_owned())
        .spawn(move || loader_loop(&source, rx, event_tx))?;
    Ok(tx)
}

/// Serves requests from `rx` until it closes.
pub fn loader_loop(source: &WarSource, rx: Receiver<LoadRequest>, event_tx: UnboundedSender<AppEvent>) {
    for request in rx {
        let result = source.load(request.war);
        match &result {
            Ok(entry) => debug!(
                war = %request.war,
                wardens = entry.warden.len(),
                colonials = entry.colonial.len(),
                "war loaded"
            ),
            Err(e) => warn!(war = %request.war, error = %e, "war load failed"),
        }
        let outcome = LoadOutcome { war: request.war, result };
        if event_tx.send(AppEvent::WarLoaded(Box::new(outcome))).is_err() {
            break;
        }
    }
    debug!("loader thread exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAR: &str = r#"{
        "warId": "3",
        "warden": {"0": {"username": "a", "commends": "5", "steamId": "1"}},
        "colonial": {},
        "winner": "warden",
        "start": 0, "end": 1, "conquestStart": 0, "conquestEnd": 1
    }"#;

    #[test]
    fn requests_are_answered_in_order() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("wars")).unwrap();
        std::fs::write(dir.path().join("wars/3.json"), WAR).unwrap();
        let source = WarSource::new(dir.path());

        let (req_tx, req_rx) = crossbeam_channel::unbounded();
        let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel();
        req_tx.send(LoadRequest { war: WarId::new(3).unwrap() }).unwrap();
        req_tx.send(LoadRequest { war: WarId::new(4).unwrap() }).unwrap();
        drop(req_tx);

        loader_loop(&source, req_rx, event_tx);

        let Ok(AppEvent::WarLoaded(first)) = event_rx.try_recv() else { panic!("no first outcome") };
        assert_eq!(first.war.get(), 3);
        assert_eq!(first.result.unwrap().warden.len(), 1);

        let Ok(AppEvent::WarLoaded(second)) = event_rx.try_recv() else { panic!("no second outcome") };
        assert_eq!(second.war.get(), 4);
        assert!(matches!(second.result, Err(CoreError::Io { .. })));
        assert!(event_rx.try_recv().is_err());
    }
}
