use std::sync::Mutex;

use crate::models::VisitTimer;

use super::TimerStore;

/// In-process store with no durable medium. Used when nothing persistent
/// is available and as a test double.
#[derive(Default)]
pub struct MemoryStore {
    timers: Mutex<Vec<VisitTimer>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, Vec<VisitTimer>> {
        match self.timers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl TimerStore for MemoryStore {
    fn load(&self) -> Vec<VisitTimer> {
        self.guard().clone()
    }

    fn save(&self, timers: &[VisitTimer]) {
        *self.guard() = timers.to_vec();
    }
}
