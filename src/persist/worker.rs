//! Background saving.
//!
//! [`SaveWorker`] owns a [`SaveStore`] on its own thread. The mutating
//! thread hands it cloned snapshots over a channel and drains the results
//! later; the worker never sees live state.

use std::io;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, warn};

use super::store::{SaveStore, SavedGame};
use crate::error::{Error, Result};

enum Request {
    Save(SavedGame),
    Stop,
}

/// Outcome of one queued save.
#[derive(Debug)]
pub struct SaveReport {
    /// Log length of the saved game, to tell reports apart.
    pub moves: usize,
    pub result: Result<()>,
}

/// Saves on a background thread.
pub struct SaveWorker {
    requests: Sender<Request>,
    reports: Receiver<SaveReport>,
    handle: Option<JoinHandle<()>>,
}

impl SaveWorker {
    /// Spawn the worker thread around `store`.
    pub fn spawn(store: impl SaveStore + 'static) -> Result<Self> {
        let (requests, inbox) = unbounded();
        let (outbox, reports) = unbounded();
        let handle = thread::Builder::new()
            .name("save-worker".to_string())
            .spawn(move || run(store, &inbox, &outbox))?;
        Ok(Self {
            requests,
            reports,
            handle: Some(handle),
        })
    }

    /// Queue a save. Returns immediately.
    pub fn save(&self, game: SavedGame) -> Result<()> {
        self.requests
            .send(Request::Save(game))
            .map_err(|_| Error::Io(io::Error::new(io::ErrorKind::BrokenPipe, "save worker has stopped")))
    }

    /// Reports of saves finished so far.
    pub fn drain(&self) -> Vec<SaveReport> {
        self.reports.try_iter().collect()
    }

    /// Finish queued saves, stop the thread and return the last reports.
    pub fn shutdown(mut self) -> Vec<SaveReport> {
        self.stop();
        self.reports.try_iter().collect()
    }

    fn stop(&mut self) {
        let _ = self.requests.send(Request::Stop);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("save worker panicked");
            }
        }
    }
}

impl Drop for SaveWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(mut store: impl SaveStore, inbox: &Receiver<Request>, outbox: &Sender<SaveReport>) {
    for request in inbox.iter() {
        let game = match request {
            Request::Save(game) => game,
            Request::Stop => break,
        };
        let moves = game.log.len();
        let result = store.save(&game);
        if let Err(err) = &result {
            warn!(%err, moves, "background save failed");
        } else {
            debug!(moves, "background save done");
        }
        if outbox.send(SaveReport { moves, result }).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Catalog;
    use crate::core::{GameConfig, GameState, Move};
    use crate::history::MoveLog;
    use crate::persist::MemoryStore;

    /// Store that always fails.
    struct Broken;

    impl SaveStore for Broken {
        fn save(&mut self, _game: &SavedGame) -> Result<()> {
            Err(Error::Io(std::io::Error::other("disk full")))
        }

        fn load(&self) -> Result<Option<SavedGame>> {
            Ok(None)
        }
    }

    fn game(moves: usize) -> SavedGame {
        let catalog = Catalog::builtin().unwrap();
        let state = GameState::new(&GameConfig::default(), &catalog, &["Ada", "Brook"]).unwrap();
        let log: MoveLog = (0..moves).map(|_| Move::pass("Ada")).collect();
        SavedGame::new(state, log)
    }

    #[test]
    fn test_saves_in_order() {
        let worker = SaveWorker::spawn(MemoryStore::new()).unwrap();
        worker.save(game(1)).unwrap();
        worker.save(game(2)).unwrap();

        let reports = worker.shutdown();
        assert_eq!(reports.iter().map(|r| r.moves).collect::<Vec<_>>(), vec![1, 2]);
        assert!(reports.iter().all(|r| r.result.is_ok()));
    }

    #[test]
    fn test_failure_is_reported_not_fatal() {
        let worker = SaveWorker::spawn(Broken).unwrap();
        worker.save(game(0)).unwrap();
        worker.save(game(3)).unwrap();

        let reports = worker.shutdown();
        assert_eq!(reports.len(), 2);
        assert!(matches!(reports[0].result, Err(Error::Io(_))));
    }
}
