pub mod engine;
pub mod presenter;

pub use engine::TimerEngine;
pub use presenter::{TimerPresenter, TimerSink};
