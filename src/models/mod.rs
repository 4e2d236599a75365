pub mod visit;

pub use visit::{format_mmss, TimerSnapshot, VisitTimer, MAX_CONSULTATION_MS};
