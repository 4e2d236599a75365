//! Walks one visit through a full consultation: start, live countdown,
//! pause/resume, stop.
//!
//! Run with `cargo run --example consultation`.

use std::{sync::Arc, time::Duration};

use consult_timer::{
    format_mmss, MemoryStore, SystemClock, TimerEngine, TimerPresenter, TimerSink, TimerSnapshot,
};

struct ConsoleSink;

impl TimerSink for ConsoleSink {
    fn publish(&self, snapshot: &TimerSnapshot) {
        let status = if snapshot.is_expired {
            format!("OVERTIME +{}", format_mmss(snapshot.overtime_ms))
        } else if snapshot.timer.is_active {
            format!("remaining {}", format_mmss(snapshot.remaining_ms))
        } else {
            "paused".to_string()
        };
        println!(
            "{} | {} elapsed {} ({status})",
            snapshot.timer.patient_name,
            snapshot.timer.doctor_name,
            format_mmss(snapshot.elapsed_ms),
        );
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let engine = TimerEngine::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock));
    engine.start("visit-42", "p-7", "Ana Morales", "d-3", "Dr. Okafor");

    let presenter = TimerPresenter::new(engine.clone(), "visit-42", Arc::new(ConsoleSink));
    presenter.refresh().await;

    tokio::time::sleep(Duration::from_secs(3)).await;

    println!("-- pausing --");
    engine.pause("visit-42");
    presenter.refresh().await;
    tokio::time::sleep(Duration::from_secs(2)).await;

    println!("-- resuming --");
    engine.resume("visit-42");
    presenter.refresh().await;
    tokio::time::sleep(Duration::from_secs(3)).await;

    println!("-- consultation over --");
    engine.stop("visit-42");
    presenter.dismiss().await;
}
