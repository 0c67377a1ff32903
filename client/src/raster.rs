use std::collections::VecDeque;

use crate::renderer::{Snapshot, SurfaceError};

/// Decoded images keyed by the snapshot they were captured as. Oldest entries
/// are evicted once the total size passes the budget; the newest entry is
/// always kept.
pub struct ImageCache<I> {
    entries: VecDeque<(Snapshot, I, usize)>,
    bytes: usize,
    budget: usize,
}

impl<I> ImageCache<I> {
    pub fn new(budget: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            bytes: 0,
            budget,
        }
    }

    pub fn insert(&mut self, snapshot: Snapshot, image: I, size: usize) {
        if let Some(index) = self.entries.iter().position(|(key, _, _)| *key == snapshot) {
            if let Some((_, _, old)) = self.entries.remove(index) {
                self.bytes -= old;
            }
        }
        self.entries.push_back((snapshot, image, size));
        self.bytes += size;
        while self.bytes > self.budget && self.entries.len() > 1 {
            if let Some((_, _, evicted)) = self.entries.pop_front() {
                self.bytes -= evicted;
            }
        }
    }

    pub fn get(&self, snapshot: &Snapshot) -> Option<&I> {
        self.entries
            .iter()
            .find(|(key, _, _)| key == snapshot)
            .map(|(_, image, _)| image)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

type PaintOp<C> = Box<dyn FnOnce(&C)>;

struct PendingRestore<C> {
    generation: u64,
    snapshot: Snapshot,
    queued: Vec<PaintOp<C>>,
}

/// Holds paint calls back while a restore is still decoding, so they land on
/// top of the restored image in call order.
pub struct DeferredPaint<C> {
    pending: Option<PendingRestore<C>>,
    generation: u64,
}

impl<C> Default for DeferredPaint<C> {
    fn default() -> Self {
        Self {
            pending: None,
            generation: 0,
        }
    }
}

impl<C> DeferredPaint<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn paint(&mut self, target: &C, op: impl FnOnce(&C) + 'static) {
        match self.pending.as_mut() {
            Some(pending) => pending.queued.push(Box::new(op)),
            None => op(target),
        }
    }

    pub fn begin(&mut self, snapshot: Snapshot) -> u64 {
        self.generation += 1;
        self.pending = Some(PendingRestore {
            generation: self.generation,
            snapshot,
            queued: Vec::new(),
        });
        self.generation
    }

    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
    }

    pub fn is_current(&self, generation: u64) -> bool {
        matches!(&self.pending, Some(pending) if pending.generation == generation)
    }

    pub fn finish(&mut self, generation: u64, target: &C) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        if let Some(pending) = self.pending.take() {
            for op in pending.queued {
                op(target);
            }
        }
        true
    }

    pub fn capture(&self) -> Option<Result<Snapshot, SurfaceError>> {
        let pending = self.pending.as_ref()?;
        if pending.queued.is_empty() {
            Some(Ok(pending.snapshot.clone()))
        } else {
            Some(Err(SurfaceError::Capture("restore still decoding".into())))
        }
    }
}
