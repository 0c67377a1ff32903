use log::warn;

use crate::persistence::{SnapshotStore, STORAGE_KEY};
use crate::renderer::{Snapshot, Surface};

pub struct HistoryStack<S: SnapshotStore> {
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
    store: Option<S>,
}

impl<S: SnapshotStore> HistoryStack<S> {
    pub fn new(store: S) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            store: Some(store),
        }
    }

    pub fn detached() -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            store: None,
        }
    }

    pub fn store(&self) -> Option<&S> {
        self.store.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn snapshot<T: Surface + ?Sized>(&mut self, surface: &T) -> bool {
        let snapshot = match surface.capture() {
            Ok(snapshot) => snapshot,
            Err(error) => {
                warn!("History snapshot skipped: {error}");
                return false;
            }
        };
        self.persist(snapshot.as_encoded());
        self.undo.push(snapshot);
        self.redo.clear();
        true
    }

    pub fn undo<T: Surface + ?Sized>(&mut self, surface: &mut T) -> bool {
        let Some(previous) = self.undo.last() else {
            return false;
        };
        let current = match surface.capture() {
            Ok(current) => current,
            Err(error) => {
                warn!("Undo skipped: {error}");
                return false;
            }
        };
        if let Err(error) = surface.restore(previous) {
            warn!("Undo skipped: {error}");
            return false;
        }
        self.undo.pop();
        self.redo.push(current);
        let top = self
            .undo
            .last()
            .map(|snapshot| snapshot.as_encoded().to_string())
            .unwrap_or_default();
        self.persist(&top);
        true
    }

    pub fn redo<T: Surface + ?Sized>(&mut self, surface: &mut T) -> bool {
        let Some(next) = self.redo.last() else {
            return false;
        };
        let current = match surface.capture() {
            Ok(current) => current,
            Err(error) => {
                warn!("Redo skipped: {error}");
                return false;
            }
        };
        if let Err(error) = surface.restore(next) {
            warn!("Redo skipped: {error}");
            return false;
        }
        let Some(next) = self.redo.pop() else {
            return false;
        };
        self.undo.push(current);
        self.persist(next.as_encoded());
        true
    }

    /// Writes the current surface to the persisted slot without touching
    /// either sequence.
    pub fn persist_current<T: Surface + ?Sized>(&mut self, surface: &T) {
        if self.store.is_none() {
            return;
        }
        match surface.capture() {
            Ok(snapshot) => self.persist(snapshot.as_encoded()),
            Err(error) => warn!("Persist skipped: {error}"),
        }
    }

    pub fn restore_persisted<T: Surface + ?Sized>(&mut self, surface: &mut T) -> bool {
        let Some(store) = self.store.as_ref() else {
            return false;
        };
        let saved = match store.load(STORAGE_KEY) {
            Ok(Some(saved)) if !saved.is_empty() => saved,
            Ok(_) => return false,
            Err(error) => {
                warn!("Saved canvas unavailable, continuing in memory: {error}");
                self.store = None;
                return false;
            }
        };
        match surface.restore(&Snapshot::from_encoded(saved)) {
            Ok(()) => true,
            Err(error) => {
                warn!("Saved canvas could not be restored: {error}");
                false
            }
        }
    }

    fn persist(&mut self, encoded: &str) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        if let Err(error) = store.save(STORAGE_KEY, encoded) {
            warn!("Canvas persistence disabled, continuing in memory: {error}");
            self.store = None;
        }
    }
}
