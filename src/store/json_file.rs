use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::warn;

use crate::models::VisitTimer;

use super::TimerStore;

/// Default file name for the persisted collection.
pub const TIMERS_FILE_NAME: &str = "patient_timers.json";

/// Whole-collection JSON persistence: one file holding one array of
/// timer records.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store under [`TIMERS_FILE_NAME`] inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(TIMERS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, timers: &[VisitTimer]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create timer directory {}", parent.display())
            })?;
        }
        let serialized = serde_json::to_string(timers)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("failed to write timers to {}", self.path.display()))
    }
}

impl TimerStore for JsonFileStore {
    fn load(&self) -> Vec<VisitTimer> {
        if !self.path.exists() {
            return Vec::new();
        }

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!(
                    "Could not read timers from {}: {err}; treating as empty",
                    self.path.display()
                );
                return Vec::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(timers) => timers,
            Err(err) => {
                // Timer state is safe to lose; a corrupt file must not take
                // the dashboards down with it.
                warn!(
                    "Malformed timer collection in {}: {err}; treating as empty",
                    self.path.display()
                );
                Vec::new()
            }
        }
    }

    fn save(&self, timers: &[VisitTimer]) {
        if let Err(err) = self.persist(timers) {
            warn!("Failed to persist consultation timers: {err:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MAX_CONSULTATION_MS;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};

    fn scratch_path(tag: &str) -> PathBuf {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!(
            "consult-timer-{tag}-{}-{n}",
            std::process::id()
        ))
    }

    fn sample_timer(visit_id: &str) -> VisitTimer {
        VisitTimer {
            visit_id: visit_id.into(),
            patient_id: "p1".into(),
            patient_name: "Ana Morales".into(),
            doctor_id: "d1".into(),
            doctor_name: "Dr. Okafor".into(),
            start_time: Utc.timestamp_millis_opt(1_700_000_000_000).single().unwrap(),
            paused_at: None,
            total_paused_time: 0,
            is_active: true,
            max_duration: MAX_CONSULTATION_MS,
        }
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let store = JsonFileStore::new(scratch_path("missing").join(TIMERS_FILE_NAME));
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_then_load_round_trips_in_order() {
        let dir = scratch_path("roundtrip");
        let store = JsonFileStore::in_dir(&dir);

        let timers = vec![sample_timer("v1"), sample_timer("v2")];
        store.save(&timers);

        assert_eq!(store.load(), timers);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn save_replaces_the_whole_collection() {
        let dir = scratch_path("replace");
        let store = JsonFileStore::in_dir(&dir);

        store.save(&[sample_timer("v1"), sample_timer("v2")]);
        store.save(&[sample_timer("v3")]);

        let loaded = store.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].visit_id, "v3");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_file_loads_as_empty() {
        let dir = scratch_path("malformed");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(TIMERS_FILE_NAME);
        fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::new(path);
        assert!(store.load().is_empty());
        let _ = fs::remove_dir_all(&dir);
    }
}
