//! Durable storage for the timer collection.
//!
//! The store holds the full set of visit timers as one unit: callers load
//! everything, mutate in memory, and write everything back. Persistence is
//! advisory session state, so nothing here fails: an unavailable or
//! corrupt medium loads as empty and saves become no-ops.

mod json_file;
mod memory;

pub use json_file::{JsonFileStore, TIMERS_FILE_NAME};
pub use memory::MemoryStore;

use crate::models::VisitTimer;

pub trait TimerStore: Send + Sync {
    /// All persisted records, in the order they were saved. Empty when
    /// nothing is persisted or the medium cannot be read.
    fn load(&self) -> Vec<VisitTimer>;

    /// Replaces the entire persisted collection. Failures are logged and
    /// swallowed; the next `load` then reflects whatever survived.
    fn save(&self, timers: &[VisitTimer]);
}
