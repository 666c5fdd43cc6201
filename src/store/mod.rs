//! In-memory state behind the route guide service.
//!
//! - [`FeatureStore`]: features loaded once at startup, read-only afterwards
//! - [`NoteRegistry`]: notes left by callers, appended concurrently

mod features;
mod notes;

pub use features::{FeatureStore, LoadError};
pub use notes::NoteRegistry;
