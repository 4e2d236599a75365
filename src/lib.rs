//! # consult-timer
//!
//! Consultation timer core for clinical visit dashboards.
//!
//! Each visit gets one [`VisitTimer`] with a fixed 15-minute budget. The
//! [`TimerEngine`] drives the record through its lifecycle (start, pause,
//! resume, reset, stop) against a shared [`TimerStore`], and a
//! [`TimerPresenter`] re-samples the derived values once per second to feed
//! whatever is rendering the countdown. Timers survive restarts via the
//! store; a paused timer stays frozen, and an expired one keeps counting
//! overtime while `remaining` floors at zero.
//!
//! ```no_run
//! use std::sync::Arc;
//! use consult_timer::{JsonFileStore, SystemClock, TimerEngine};
//!
//! let store = Arc::new(JsonFileStore::in_dir(std::path::Path::new("/var/lib/clinic")));
//! let engine = TimerEngine::new(store, Arc::new(SystemClock));
//!
//! engine.start("visit-42", "p-7", "Ana Morales", "d-3", "Dr. Okafor");
//! if let Some(snapshot) = engine.snapshot("visit-42") {
//!     println!("{} remaining", consult_timer::format_mmss(snapshot.remaining_ms));
//! }
//! ```

mod clock;
mod models;
mod store;
mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use models::{format_mmss, TimerSnapshot, VisitTimer, MAX_CONSULTATION_MS};
pub use store::{JsonFileStore, MemoryStore, TimerStore, TIMERS_FILE_NAME};
pub use timer::{TimerEngine, TimerPresenter, TimerSink};
