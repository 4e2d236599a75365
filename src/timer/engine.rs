//! State transitions for visit timers.
//!
//! Every mutating operation is a full pass over the store: load the
//! collection, locate and change the one record, save the collection back.
//! A single internal lock serializes those passes so two in-process callers
//! cannot clobber each other's save.

use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info};

use crate::{
    clock::Clock,
    models::{TimerSnapshot, VisitTimer, MAX_CONSULTATION_MS},
    store::TimerStore,
};

struct EngineInner {
    store: Arc<dyn TimerStore>,
    clock: Arc<dyn Clock>,
    // Guards the load-mutate-save window, not individual store calls.
    write: Mutex<()>,
}

/// Cheaply clonable handle over the shared timer state.
#[derive(Clone)]
pub struct TimerEngine {
    inner: Arc<EngineInner>,
}

impl TimerEngine {
    pub fn new(store: Arc<dyn TimerStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                store,
                clock,
                write: Mutex::new(()),
            }),
        }
    }

    fn write_guard(&self) -> MutexGuard<'_, ()> {
        match self.inner.write.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Starts the consultation timer for a visit.
    ///
    /// Any existing record for the visit is replaced wholesale, discarding
    /// accumulated progress and pause debt. Returns the fresh record.
    pub fn start(
        &self,
        visit_id: &str,
        patient_id: &str,
        patient_name: &str,
        doctor_id: &str,
        doctor_name: &str,
    ) -> VisitTimer {
        let timer = VisitTimer {
            visit_id: visit_id.to_string(),
            patient_id: patient_id.to_string(),
            patient_name: patient_name.to_string(),
            doctor_id: doctor_id.to_string(),
            doctor_name: doctor_name.to_string(),
            start_time: self.inner.clock.now(),
            paused_at: None,
            total_paused_time: 0,
            is_active: true,
            max_duration: MAX_CONSULTATION_MS,
        };

        let _guard = self.write_guard();
        let mut timers = self.inner.store.load();
        match timers.iter().position(|t| t.visit_id == visit_id) {
            Some(index) => timers[index] = timer.clone(),
            None => timers.push(timer.clone()),
        }
        self.inner.store.save(&timers);

        info!("Started consultation timer for visit {visit_id}");
        timer
    }

    /// Pauses a running timer. Missing or already-paused timers are left
    /// untouched.
    pub fn pause(&self, visit_id: &str) {
        let now = self.inner.clock.now();

        let _guard = self.write_guard();
        let mut timers = self.inner.store.load();
        if let Some(timer) = timers.iter_mut().find(|t| t.visit_id == visit_id) {
            if timer.is_active {
                timer.is_active = false;
                timer.paused_at = Some(now);
                self.inner.store.save(&timers);
                debug!("Paused consultation timer for visit {visit_id}");
            }
        }
    }

    /// Resumes a paused timer, adding the pause interval to its pause debt.
    /// Missing or already-running timers are left untouched.
    pub fn resume(&self, visit_id: &str) {
        let now = self.inner.clock.now();

        let _guard = self.write_guard();
        let mut timers = self.inner.store.load();
        if let Some(timer) = timers.iter_mut().find(|t| t.visit_id == visit_id) {
            if !timer.is_active {
                if let Some(paused_at) = timer.paused_at.take() {
                    timer.total_paused_time += (now - paused_at).num_milliseconds();
                    timer.is_active = true;
                    self.inner.store.save(&timers);
                    debug!("Resumed consultation timer for visit {visit_id}");
                }
            }
        }
    }

    /// Restarts an existing timer's time origin, keeping its identity
    /// fields and budget. No-op for missing visits.
    pub fn reset(&self, visit_id: &str) {
        let now = self.inner.clock.now();

        let _guard = self.write_guard();
        let mut timers = self.inner.store.load();
        if let Some(timer) = timers.iter_mut().find(|t| t.visit_id == visit_id) {
            timer.start_time = now;
            timer.total_paused_time = 0;
            timer.is_active = true;
            timer.paused_at = None;
            self.inner.store.save(&timers);
            debug!("Reset consultation timer for visit {visit_id}");
        }
    }

    /// Removes the timer for a visit. No-op for missing visits.
    pub fn stop(&self, visit_id: &str) {
        let _guard = self.write_guard();
        let mut timers = self.inner.store.load();
        let before = timers.len();
        timers.retain(|t| t.visit_id != visit_id);
        if timers.len() != before {
            self.inner.store.save(&timers);
            info!("Stopped consultation timer for visit {visit_id}");
        }
    }

    pub fn get(&self, visit_id: &str) -> Option<VisitTimer> {
        self.inner
            .store
            .load()
            .into_iter()
            .find(|t| t.visit_id == visit_id)
    }

    /// All timers belonging to one doctor, in store order.
    pub fn get_for_doctor(&self, doctor_id: &str) -> Vec<VisitTimer> {
        self.inner
            .store
            .load()
            .into_iter()
            .filter(|t| t.doctor_id == doctor_id)
            .collect()
    }

    /// The record plus its derived values at the current instant.
    pub fn snapshot(&self, visit_id: &str) -> Option<TimerSnapshot> {
        self.get(visit_id)
            .map(|timer| TimerSnapshot::capture(timer, self.inner.clock.now()))
    }
}
