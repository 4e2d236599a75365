//! Periodic display sampling for one visit's timer.
//!
//! While the timer is running, the presenter re-samples the engine once per
//! second and publishes the snapshot to its sink; a paused timer gets a
//! single frozen sample and no further polling. Callers invoke [`refresh`]
//! after every control operation so displays update immediately instead of
//! waiting for the next tick, and [`dismiss`] when the hosting view goes
//! away.
//!
//! [`refresh`]: TimerPresenter::refresh
//! [`dismiss`]: TimerPresenter::dismiss

use std::{sync::Arc, time::Duration};

use log::debug;
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::models::TimerSnapshot;

use super::TimerEngine;

/// Display collaborator. Publishing must not block; the presenter calls it
/// from its polling task.
pub trait TimerSink: Send + Sync {
    fn publish(&self, snapshot: &TimerSnapshot);
}

struct Ticker {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

#[derive(Clone)]
pub struct TimerPresenter {
    engine: TimerEngine,
    visit_id: String,
    sink: Arc<dyn TimerSink>,
    ticker: Arc<Mutex<Option<Ticker>>>,
    tick_interval: Duration,
}

impl TimerPresenter {
    pub fn new(engine: TimerEngine, visit_id: impl Into<String>, sink: Arc<dyn TimerSink>) -> Self {
        Self::with_interval(engine, visit_id, sink, Duration::from_secs(1))
    }

    /// Like [`new`](Self::new) with an explicit tick cadence.
    pub fn with_interval(
        engine: TimerEngine,
        visit_id: impl Into<String>,
        sink: Arc<dyn TimerSink>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            engine,
            visit_id: visit_id.into(),
            sink,
            ticker: Arc::new(Mutex::new(None)),
            tick_interval,
        }
    }

    /// Re-samples the timer right now and restarts polling to match its
    /// state: a running timer gets a ticker, a paused one just the single
    /// sample, a stopped (removed) one nothing.
    pub async fn refresh(&self) {
        self.cancel_ticker().await;

        let Some(snapshot) = self.engine.snapshot(&self.visit_id) else {
            debug!("No timer for visit {}; nothing to present", self.visit_id);
            return;
        };
        self.sink.publish(&snapshot);

        if snapshot.timer.is_active {
            self.spawn_ticker().await;
        }
    }

    /// Stops polling. The underlying record is untouched.
    pub async fn dismiss(&self) {
        self.cancel_ticker().await;
    }

    async fn spawn_ticker(&self) {
        let engine = self.engine.clone();
        let visit_id = self.visit_id.clone();
        let sink = self.sink.clone();
        let tick_interval = self.tick_interval;
        let token = CancellationToken::new();
        let task_token = token.clone();

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately and `refresh` has already
            // published; swallow it so samples stay one interval apart.
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = interval.tick() => {}
                }

                let Some(snapshot) = engine.snapshot(&visit_id) else {
                    break;
                };
                sink.publish(&snapshot);
                if !snapshot.timer.is_active {
                    // Paused behind our back: that sample is the frozen one.
                    break;
                }
            }
        });

        let mut guard = self.ticker.lock().await;
        if let Some(previous) = guard.replace(Ticker { token, handle }) {
            previous.token.cancel();
            previous.handle.abort();
        }
    }

    async fn cancel_ticker(&self) {
        if let Some(ticker) = self.ticker.lock().await.take() {
            ticker.token.cancel();
            ticker.handle.abort();
        }
    }
}
