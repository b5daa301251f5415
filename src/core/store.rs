//! Action dispatch core.
//!
//! [`Store`] holds the current [`Snapshot`] behind an `Arc`. Dispatching an
//! action runs every entity reducer against the previous snapshot and swaps
//! in a new one; collections a reducer left alone are shared with the
//! previous snapshot, which stays valid for whoever still holds it.
//!
//! Reducers run in a fixed order: document, assets, masters, screens,
//! chapters, timelines.

use std::sync::Arc;

use log::{debug, trace};
use serde::Serialize;

use super::action::Action;
use super::bus::{Commit, CommitBus};
use crate::entities::access_path::{self, AccessPath};
use crate::entities::{asset, chapter, document, master, screen, timeline};
use crate::entities::{Asset, Chapter, Document, MasterLayout, Screen, ScreenState, Timeline};

/// Complete immutable document state after one action.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Number of state-changing actions applied so far.
    pub revision: u64,
    pub document: Arc<Document>,
    pub assets: Arc<Vec<Asset>>,
    pub masters: Arc<Vec<MasterLayout>>,
    pub screens: Arc<ScreenState>,
    pub chapters: Arc<Vec<Chapter>>,
    pub timelines: Arc<Vec<Timeline>>,
}

impl Snapshot {
    pub fn timeline(&self, id: &str) -> Option<&Timeline> {
        self.timelines.iter().find(|t| t.id == id)
    }

    pub fn timeline_for_chapter(&self, chapter_id: &str) -> Option<&Timeline> {
        self.timelines.iter().find(|t| t.chapter_id == chapter_id)
    }

    pub fn screen(&self, id: &str) -> Option<&Screen> {
        self.screens.screen(id)
    }

    pub fn chapter_at(&self, path: &[usize]) -> Option<&Chapter> {
        access_path::resolve(&self.chapters, path)
    }

    /// Current path of a chapter. Recomputed on every call; never cache it
    /// across dispatches.
    pub fn path_of_chapter(&self, id: &str) -> Option<AccessPath> {
        chapter::path_of(&self.chapters, id)
    }

    pub fn asset(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.iter().map(Chapter::subtree_len).sum()
    }
}

// New collection if the reducer produced one, otherwise share the old.
fn keep<T>(next: Option<T>, prev: &Arc<T>) -> Arc<T> {
    next.map(Arc::new).unwrap_or_else(|| Arc::clone(prev))
}

/// Root reducer: `None` if no entity reducer changed anything.
pub fn reduce(prev: &Snapshot, action: &Action) -> Option<Snapshot> {
    let document = document::reduce(&prev.document, action);
    let assets = asset::reduce(&prev.assets, action);
    let masters = master::reduce(&prev.masters, action);
    let screens = screen::reduce(&prev.screens, action);
    let chapters = chapter::reduce(&prev.chapters, action);
    let timelines = timeline::reduce(&prev.timelines, &prev.chapters, action);

    let changed = document.is_some()
        || assets.is_some()
        || masters.is_some()
        || screens.is_some()
        || chapters.is_some()
        || timelines.is_some();
    if !changed {
        return None;
    }

    Some(Snapshot {
        revision: prev.revision + 1,
        document: keep(document, &prev.document),
        assets: keep(assets, &prev.assets),
        masters: keep(masters, &prev.masters),
        screens: keep(screens, &prev.screens),
        chapters: keep(chapters, &prev.chapters),
        timelines: keep(timelines, &prev.timelines),
    })
}

/// Single-writer state container.
#[derive(Debug, Default)]
pub struct Store {
    state: Arc<Snapshot>,
    bus: CommitBus,
    batch_depth: usize,
    // Tags applied since the last publish while batching
    pending: Vec<&'static str>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot.
    pub fn state(&self) -> Arc<Snapshot> {
        Arc::clone(&self.state)
    }

    /// Apply one action. Returns `true` if the state changed; stale references
    /// and invariant violations leave it as is.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let Some(next) = reduce(&self.state, &action) else {
            trace!("{} left state at revision {}", action.kind(), self.state.revision);
            return false;
        };
        debug!("{} -> revision {}", action.kind(), next.revision);
        self.state = Arc::new(next);
        self.pending.push(action.kind());
        if self.batch_depth == 0 {
            self.publish();
        }
        true
    }

    /// Run `f` with publication deferred: observers get one commit for
    /// everything `f` dispatched, after the outermost batch ends.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Store) -> R) -> R {
        self.batch_depth += 1;
        let result = f(self);
        self.batch_depth -= 1;
        if self.batch_depth == 0 {
            self.publish();
        }
        result
    }

    pub fn is_batching(&self) -> bool {
        self.batch_depth > 0
    }

    /// Register an observer, called synchronously on every commit.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&Commit) + Send + Sync + 'static,
    {
        self.bus.subscribe(callback);
    }

    /// Drain commits published since the last poll.
    pub fn poll(&self) -> Vec<Commit> {
        self.bus.poll()
    }

    fn publish(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let actions = std::mem::take(&mut self.pending);
        self.bus.emit(Commit {
            revision: self.state.revision,
            actions,
            snapshot: Arc::clone(&self.state),
        });
    }
}
