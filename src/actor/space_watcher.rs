//! Watches the window server's space-configuration marker file. The server
//! recreates this file on every space change, so a deletion event is the
//! change signal; the file's content is never read.

use std::path::PathBuf;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, trace};

use crate::actor::Sender;
use crate::actor::indicator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// Holding an open watch on the marker, waiting for a deletion event.
    Armed,
    /// Between events, while a recomputation runs. Deletions observed here are
    /// coalesced into the recomputation that follows re-arming.
    Idle,
}

pub struct SpaceWatcher {
    watcher: RecommendedWatcher,
    path: PathBuf,
    state: WatchState,
}

impl SpaceWatcher {
    /// Opens a watch on the marker file. Fails when the file cannot be
    /// watched at all; the caller decides whether that is fatal.
    pub fn new(path: PathBuf, events_tx: Sender<indicator::Event>) -> anyhow::Result<Self> {
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) if matches!(event.kind, EventKind::Remove(_)) => {
                    events_tx.send(indicator::Event::MarkerDeleted);
                }
                Ok(event) => trace!(?event.kind, "ignoring marker event"),
                Err(err) => debug!(%err, "marker watch error"),
            }
        })?;
        watcher.watch(&path, RecursiveMode::NonRecursive)?;
        debug!(?path, "armed space marker watch");
        Ok(Self {
            watcher,
            path,
            state: WatchState::Armed,
        })
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    /// Cancels the current watch before a recomputation runs. The watched
    /// inode is gone at this point, so the unwatch result is advisory only.
    pub fn disarm(&mut self) {
        if let Err(err) = self.watcher.unwatch(&self.path) {
            trace!(%err, "unwatch after marker deletion");
        }
        self.state = WatchState::Idle;
    }

    /// Re-opens the watch on the recreated marker after a recomputation
    /// completes. Failure here is fatal to automatic change detection.
    pub fn rearm(&mut self) -> notify::Result<()> {
        self.watcher.watch(&self.path, RecursiveMode::NonRecursive)?;
        self.state = WatchState::Armed;
        Ok(())
    }
}
