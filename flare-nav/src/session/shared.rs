//! Thread-safe session handle for sensor callbacks.
//!
//! Platform sensor and radio callbacks fire on their own threads. Each
//! callback is armed with the session epoch current at registration time
//! and passes it back on every push; pushes from an older epoch are dropped
//! under the same lock that bumps the epoch, so a reset can never be
//! followed by data from the session it ended.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::trace;
use parking_lot::Mutex;
use thiserror::Error;

use crate::config::NavConfig;
use crate::core::{AccelSample, MagSample, SignalSample};
use crate::direction::CalibrationProgress;
use crate::guidance::NavigationGuidance;
use crate::heatmap::GridSnapshot;
use crate::tracking::MovementEvent;

use super::engine::NavigationSession;
use super::epoch::SessionEpoch;
use super::planner::{BackgroundPlanner, PlannerSchedule};

/// A push carried an epoch from a session that has since ended.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("stale sample from session {sample}, current is {current}")]
pub struct StaleEpoch {
    pub sample: SessionEpoch,
    pub current: SessionEpoch,
}

/// Cloneable, lockable handle to a [`NavigationSession`].
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<NavigationSession>>,
    stale_drops: Arc<AtomicU64>,
}

impl SharedSession {
    pub fn new(session: NavigationSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
            stale_drops: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn from_config(config: NavConfig) -> Self {
        Self::new(NavigationSession::new(config))
    }

    /// Epoch to arm new callbacks with
    pub fn epoch(&self) -> SessionEpoch {
        self.inner.lock().epoch()
    }

    /// Run `f` under the lock if `epoch` is current
    fn push<R>(
        &self,
        epoch: SessionEpoch,
        f: impl FnOnce(&mut NavigationSession) -> R,
    ) -> Result<R, StaleEpoch> {
        let mut session = self.inner.lock();
        let current = session.epoch();
        if epoch != current {
            self.stale_drops.fetch_add(1, Ordering::Relaxed);
            trace!("Dropping sample from {} (current {})", epoch, current);
            return Err(StaleEpoch {
                sample: epoch,
                current,
            });
        }
        Ok(f(&mut session))
    }

    pub fn push_rssi(&self, epoch: SessionEpoch, sample: SignalSample) -> Result<Option<f64>, StaleEpoch> {
        self.push(epoch, |s| s.on_rssi(sample))
    }

    pub fn push_heading(&self, epoch: SessionEpoch, heading_deg: f64, timestamp_ms: u64) -> Result<(), StaleEpoch> {
        self.push(epoch, |s| s.on_heading(heading_deg, timestamp_ms))
    }

    pub fn push_accel(
        &self,
        epoch: SessionEpoch,
        sample: AccelSample,
    ) -> Result<Option<MovementEvent>, StaleEpoch> {
        self.push(epoch, |s| s.on_accel(&sample))
    }

    pub fn push_magnetometer(&self, epoch: SessionEpoch, sample: MagSample) -> Result<Option<f64>, StaleEpoch> {
        self.push(epoch, |s| s.on_magnetometer(&sample))
    }

    pub fn manual_move(
        &self,
        epoch: SessionEpoch,
        dx: f64,
        dy: f64,
        timestamp_ms: u64,
    ) -> Result<Option<MovementEvent>, StaleEpoch> {
        self.push(epoch, |s| s.manual_move(dx, dy, timestamp_ms))
    }

    /// Switch target; returns the new epoch
    pub fn set_target(&self, id: impl Into<String>) -> SessionEpoch {
        self.inner.lock().set_target(id)
    }

    pub fn clear_target(&self) -> SessionEpoch {
        self.inner.lock().clear_target()
    }

    pub fn reset(&self) -> SessionEpoch {
        self.inner.lock().reset()
    }

    pub fn guidance(&self) -> NavigationGuidance {
        self.inner.lock().guidance()
    }

    pub fn calibration_progress(&self) -> CalibrationProgress {
        self.inner.lock().calibration_progress()
    }

    pub fn snapshot(&self) -> GridSnapshot {
        self.inner.lock().snapshot()
    }

    /// Read access under the lock
    pub fn with<R>(&self, f: impl FnOnce(&NavigationSession) -> R) -> R {
        f(&self.inner.lock())
    }

    /// Write access under the lock, bypassing the epoch check
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut NavigationSession) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Pushes dropped for carrying an old epoch
    pub fn stale_drops(&self) -> u64 {
        self.stale_drops.load(Ordering::Relaxed)
    }

    /// Timer tick: collect a finished plan, then schedule the next if due.
    ///
    /// The heat map is cloned under the lock; the search itself runs without
    /// it. Returns true if a new search was started.
    pub fn tick_planner(&self, planner: &BackgroundPlanner, schedule: &mut PlannerSchedule, now_ms: u64) -> bool {
        while let Some(outcome) = planner.try_result() {
            self.inner.lock().apply_plan(outcome);
        }

        if !schedule.is_due(now_ms) {
            return false;
        }
        let Some(request) = self.inner.lock().plan_request(now_ms) else {
            return false;
        };
        schedule.mark(now_ms);
        planner.try_schedule(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WorldPoint;
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn test_stale_pushes_dropped_after_reset() {
        let shared = SharedSession::from_config(NavConfig::default());
        let epoch = shared.set_target("beacon");
        assert_eq!(shared.push_rssi(epoch, SignalSample::new(-60.0, 0)), Ok(Some(-60.0)));

        let new_epoch = shared.reset();
        assert_ne!(epoch, new_epoch);
        let err = shared.push_rssi(epoch, SignalSample::new(-40.0, 1)).unwrap_err();
        assert_eq!(err.current, new_epoch);
        assert_eq!(shared.stale_drops(), 1);
        assert_eq!(shared.with(|s| s.smoothed_rssi()), None);
    }

    #[test]
    fn test_retarget_invalidates_old_callbacks() {
        let shared = SharedSession::from_config(NavConfig::default());
        let first = shared.set_target("a");
        let second = shared.set_target("b");
        assert!(shared.push_heading(first, 90.0, 0).is_err());
        assert!(shared.push_heading(second, 90.0, 0).is_ok());
        assert_eq!(shared.with(|s| s.heading()), Some(90.0));
    }

    #[test]
    fn test_concurrent_pushes_serialize() {
        let shared = SharedSession::from_config(NavConfig::default());
        let epoch = shared.set_target("beacon");

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        let _ = shared.push_rssi(epoch, SignalSample::new(-70.0, t * 1000 + i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let smoothed = shared.with(|s| s.smoothed_rssi()).unwrap();
        assert!((smoothed - -70.0).abs() < 1e-9);
        assert_eq!(shared.stale_drops(), 0);
    }

    #[test]
    fn test_tick_planner_round_trip() {
        let shared = SharedSession::from_config(NavConfig::default());
        let epoch = shared.set_target("beacon");
        shared.push_rssi(epoch, SignalSample::new(-60.0, 0)).unwrap();

        let planner = BackgroundPlanner::start();
        let mut schedule = PlannerSchedule::new(2000);
        // no victim yet: nothing to plan, schedule untouched
        assert!(!shared.tick_planner(&planner, &mut schedule, 0));
        assert!(schedule.is_due(0));

        shared.with_mut(|s| s.set_victim_position(WorldPoint::new(450.0, 50.0)));
        assert!(shared.tick_planner(&planner, &mut schedule, 0));
        // not due again before the interval
        assert!(!shared.tick_planner(&planner, &mut schedule, 1));

        let deadline = Instant::now() + Duration::from_secs(5);
        while shared.with(|s| s.last_path().is_none()) && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
            shared.tick_planner(&planner, &mut schedule, 1);
        }
        let cells = shared.with(|s| s.last_path().map(|p| p.cells.len()));
        assert_eq!(cells, Some(5));
    }
}
