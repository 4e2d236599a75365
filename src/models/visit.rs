//! Per-visit timer record and its derived time queries.

use std::cmp;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed consultation budget: 15 minutes.
pub const MAX_CONSULTATION_MS: i64 = 15 * 60 * 1000;

/// Timer state for a single clinical visit.
///
/// The persisted form uses integer epoch milliseconds for both timestamps,
/// and `pausedAt` is omitted entirely while the timer is running.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VisitTimer {
    pub visit_id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: String,
    pub doctor_name: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_time: DateTime<Utc>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub paused_at: Option<DateTime<Utc>>,
    /// Cumulative paused time in milliseconds since the last start/reset.
    pub total_paused_time: i64,
    pub is_active: bool,
    /// Consultation budget in milliseconds.
    pub max_duration: i64,
}

impl VisitTimer {
    /// Milliseconds of consultation time consumed at `now`.
    ///
    /// Paused timers are frozen at their pause instant; active timers keep
    /// counting. Pause debt is excluded in both cases. May exceed
    /// `max_duration` (overtime).
    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> i64 {
        if self.is_active {
            (now - self.start_time).num_milliseconds() - self.total_paused_time
        } else if let Some(paused_at) = self.paused_at {
            (paused_at - self.start_time).num_milliseconds() - self.total_paused_time
        } else {
            // Inactive with no pause mark only occurs transiently; treat as
            // not started.
            0
        }
    }

    /// Milliseconds left in the budget at `now`, floored at zero.
    pub fn remaining_ms(&self, now: DateTime<Utc>) -> i64 {
        cmp::max(self.max_duration - self.elapsed_ms(now), 0)
    }

    /// Whether the consultation has used up its budget at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.elapsed_ms(now) >= self.max_duration
    }

    /// Milliseconds spent past the budget at `now`, zero before expiry.
    pub fn overtime_ms(&self, now: DateTime<Utc>) -> i64 {
        cmp::max(self.elapsed_ms(now) - self.max_duration, 0)
    }
}

/// A record together with its derived values at one instant, ready for a
/// display collaborator.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub timer: VisitTimer,
    pub elapsed_ms: i64,
    pub remaining_ms: i64,
    pub overtime_ms: i64,
    pub is_expired: bool,
    /// Fraction of the budget consumed, clamped to 1.0.
    pub progress: f64,
}

impl TimerSnapshot {
    pub fn capture(timer: VisitTimer, now: DateTime<Utc>) -> Self {
        let elapsed_ms = timer.elapsed_ms(now);
        let remaining_ms = timer.remaining_ms(now);
        let overtime_ms = timer.overtime_ms(now);
        let is_expired = timer.is_expired(now);
        let progress = if timer.max_duration > 0 {
            (elapsed_ms as f64 / timer.max_duration as f64).min(1.0)
        } else {
            1.0
        };

        Self {
            timer,
            elapsed_ms,
            remaining_ms,
            overtime_ms,
            is_expired,
            progress,
        }
    }
}

/// Renders a millisecond duration as `MM:SS`.
///
/// Minutes are not clamped to an hour, so overtime reads naturally
/// ("17:30"); seconds are floor-truncated and zero-padded.
pub fn format_mmss(ms: i64) -> String {
    let total_seconds = ms / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(epoch_ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(epoch_ms).single().unwrap()
    }

    fn timer_started_at(epoch_ms: i64) -> VisitTimer {
        VisitTimer {
            visit_id: "v1".into(),
            patient_id: "p1".into(),
            patient_name: "Ana Morales".into(),
            doctor_id: "d1".into(),
            doctor_name: "Dr. Okafor".into(),
            start_time: at(epoch_ms),
            paused_at: None,
            total_paused_time: 0,
            is_active: true,
            max_duration: MAX_CONSULTATION_MS,
        }
    }

    #[test]
    fn active_timer_counts_from_start() {
        let timer = timer_started_at(0);
        let now = at(300_000);

        assert_eq!(timer.elapsed_ms(now), 300_000);
        assert_eq!(timer.remaining_ms(now), 600_000);
        assert!(!timer.is_expired(now));
        assert_eq!(format_mmss(timer.elapsed_ms(now)), "05:00");
    }

    #[test]
    fn paused_timer_is_frozen_at_pause_instant() {
        let mut timer = timer_started_at(0);
        timer.is_active = false;
        timer.paused_at = Some(at(300_000));

        // Wall clock keeps moving; elapsed does not.
        assert_eq!(timer.elapsed_ms(at(360_000)), 300_000);
        assert_eq!(timer.elapsed_ms(at(900_000)), 300_000);
    }

    #[test]
    fn pause_debt_is_excluded_from_elapsed() {
        let mut timer = timer_started_at(0);
        timer.total_paused_time = 60_000;

        assert_eq!(timer.elapsed_ms(at(360_000)), 300_000);
    }

    #[test]
    fn overtime_keeps_counting_while_remaining_floors_at_zero() {
        let timer = timer_started_at(0);
        let now = at(901_000);

        assert!(timer.is_expired(now));
        assert_eq!(timer.remaining_ms(now), 0);
        assert_eq!(timer.overtime_ms(now), 1_000);
        assert_eq!(format_mmss(timer.elapsed_ms(now)), "15:01");
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let timer = timer_started_at(0);

        assert!(!timer.is_expired(at(899_999)));
        assert!(timer.is_expired(at(900_000)));
        assert_eq!(timer.remaining_ms(at(900_000)), 0);
    }

    #[test]
    fn inactive_without_pause_mark_reads_as_zero() {
        let mut timer = timer_started_at(0);
        timer.is_active = false;
        timer.paused_at = None;

        assert_eq!(timer.elapsed_ms(at(500_000)), 0);
    }

    #[test]
    fn format_mmss_pads_and_truncates() {
        assert_eq!(format_mmss(0), "00:00");
        assert_eq!(format_mmss(999), "00:00");
        assert_eq!(format_mmss(61_000), "01:01");
        assert_eq!(format_mmss(540_000), "09:00");
        assert_eq!(format_mmss(3_725_000), "62:05");
    }

    #[test]
    fn snapshot_derives_all_values_at_once() {
        let timer = timer_started_at(0);
        let snapshot = TimerSnapshot::capture(timer, at(450_000));

        assert_eq!(snapshot.elapsed_ms, 450_000);
        assert_eq!(snapshot.remaining_ms, 450_000);
        assert_eq!(snapshot.overtime_ms, 0);
        assert!(!snapshot.is_expired);
        assert!((snapshot.progress - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn snapshot_progress_clamps_past_expiry() {
        let timer = timer_started_at(0);
        let snapshot = TimerSnapshot::capture(timer, at(1_000_000));

        assert!(snapshot.is_expired);
        assert_eq!(snapshot.progress, 1.0);
    }

    #[test]
    fn persisted_form_uses_epoch_ms_and_omits_paused_at_while_active() {
        let timer = timer_started_at(1_700_000_000_000);
        let json = serde_json::to_value(&timer).unwrap();

        assert_eq!(json["startTime"], 1_700_000_000_000_i64);
        assert_eq!(json["maxDuration"], 900_000);
        assert_eq!(json["isActive"], true);
        assert!(json.get("pausedAt").is_none());
    }

    #[test]
    fn persisted_form_includes_paused_at_while_paused() {
        let mut timer = timer_started_at(1_700_000_000_000);
        timer.is_active = false;
        timer.paused_at = Some(at(1_700_000_300_000));

        let json = serde_json::to_value(&timer).unwrap();
        assert_eq!(json["pausedAt"], 1_700_000_300_000_i64);

        let back: VisitTimer = serde_json::from_value(json).unwrap();
        assert_eq!(back, timer);
    }
}
