//! Concurrent registry of notes left at exact locations.
//!
//! # Thread Safety
//!
//! Notes are held in a `DashMap` keyed by point. An append locks only the
//! shard owning its key, so callers at unrelated locations proceed in
//! parallel while appends at the same location are linearized. The snapshot
//! handed back to the caller is cloned before the shard guard is released;
//! sending it never happens under a lock.

use dashmap::DashMap;

use crate::models::{Point, RouteNote};

/// Append-only notes per location.
#[derive(Debug, Default)]
pub struct NoteRegistry {
    notes: DashMap<Point, Vec<RouteNote>>,
}

impl NoteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `note` at `location` and return every note stored there,
    /// oldest first, including the one just added.
    pub fn append(&self, location: Point, note: RouteNote) -> Vec<RouteNote> {
        let mut entry = self.notes.entry(location).or_default();
        entry.push(note);
        entry.value().clone()
    }

    /// Snapshot of the notes stored at `location`.
    pub fn notes_at(&self, location: &Point) -> Vec<RouteNote> {
        self.notes
            .get(location)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Number of distinct locations holding at least one note.
    pub fn location_count(&self) -> usize {
        self.notes.len()
    }
}
