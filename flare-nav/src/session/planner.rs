//! Background A* with at-most-one-in-flight semantics.
//!
//! ```text
//!  sensor thread                       planner thread
//!  ─────────────                       ──────────────
//!  schedule.is_due(now)?
//!  session.plan_request(now) ──try_schedule──▶ bounded(1) ──▶ find_path
//!        ▲                     (skip if busy)                    │
//!        └──────── apply_plan ◀── try_result ◀── unbounded ◀─────┘
//! ```
//!
//! The request carries a clone of the heat map, so the search never holds
//! the session lock. Results carry the epoch they were computed for and are
//! dropped by the session if it moved on in the meantime.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError, bounded, unbounded};
use log::{debug, trace, warn};

use crate::core::GridCoord;
use crate::heatmap::{HeatMapGrid, PathResult};

use super::epoch::SessionEpoch;

/// Work item for the planner thread.
#[derive(Clone, Debug)]
pub struct PlanRequest {
    pub epoch: SessionEpoch,
    /// Heat map copy taken when the request was built
    pub grid: HeatMapGrid,
    pub start: GridCoord,
    pub goal: GridCoord,
    pub requested_at_ms: u64,
}

/// Planner thread output.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanOutcome {
    pub epoch: SessionEpoch,
    /// `None` when the goal is unreachable
    pub path: Option<PathResult>,
    pub requested_at_ms: u64,
}

/// Decides when the next timed planner run is due.
#[derive(Clone, Copy, Debug)]
pub struct PlannerSchedule {
    interval_ms: u64,
    last_run_ms: Option<u64>,
}

impl PlannerSchedule {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_run_ms: None,
        }
    }

    /// True on the first call and once `interval_ms` has elapsed since `mark`
    pub fn is_due(&self, now_ms: u64) -> bool {
        match self.last_run_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms,
        }
    }

    /// Record that a run was started at `now_ms`
    pub fn mark(&mut self, now_ms: u64) {
        self.last_run_ms = Some(now_ms);
    }

    pub fn reset(&mut self) {
        self.last_run_ms = None;
    }
}

/// Runs path searches on a dedicated thread, one at a time.
pub struct BackgroundPlanner {
    request_tx: Option<Sender<PlanRequest>>,
    result_rx: Receiver<PlanOutcome>,
    in_flight: Arc<AtomicBool>,
    should_stop: Arc<AtomicBool>,
    skipped: AtomicU64,
    thread_handle: Option<JoinHandle<()>>,
}

impl BackgroundPlanner {
    /// Spawn the planner thread
    pub fn start() -> Self {
        let (request_tx, request_rx) = bounded::<PlanRequest>(1);
        let (result_tx, result_rx) = unbounded::<PlanOutcome>();
        let in_flight = Arc::new(AtomicBool::new(false));
        let should_stop = Arc::new(AtomicBool::new(false));

        let worker_in_flight = Arc::clone(&in_flight);
        let worker_stop = Arc::clone(&should_stop);
        let handle = thread::spawn(move || {
            while !worker_stop.load(Ordering::SeqCst) {
                match request_rx.recv_timeout(Duration::from_millis(100)) {
                    Ok(request) => {
                        let path = request.grid.find_path(request.start, request.goal);
                        trace!(
                            "Planner finished for {}: {}",
                            request.epoch,
                            if path.is_some() { "path" } else { "no path" }
                        );
                        let outcome = PlanOutcome {
                            epoch: request.epoch,
                            path,
                            requested_at_ms: request.requested_at_ms,
                        };
                        worker_in_flight.store(false, Ordering::SeqCst);
                        if result_tx.send(outcome).is_err() {
                            break;
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        Self {
            request_tx: Some(request_tx),
            result_rx,
            in_flight,
            should_stop,
            skipped: AtomicU64::new(0),
            thread_handle: Some(handle),
        }
    }

    /// Hand a request to the planner.
    ///
    /// Returns `false` and drops the request if a search is still running.
    pub fn try_schedule(&self, request: PlanRequest) -> bool {
        let Some(tx) = &self.request_tx else {
            return false;
        };
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            self.skipped.fetch_add(1, Ordering::Relaxed);
            debug!("Planner busy, skipping run for {}", request.epoch);
            return false;
        }

        match tx.try_send(request) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                warn!("Planner queue unavailable");
                self.in_flight.store(false, Ordering::SeqCst);
                false
            }
        }
    }

    /// Next finished result, if any
    pub fn try_result(&self) -> Option<PlanOutcome> {
        self.result_rx.try_recv().ok()
    }

    /// Wait up to `timeout` for a result
    pub fn wait_result(&self, timeout: Duration) -> Option<PlanOutcome> {
        self.result_rx.recv_timeout(timeout).ok()
    }

    /// A search is running
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Requests dropped because a search was running
    pub fn skipped_count(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.thread_handle.is_some()
    }

    /// Stop and join the planner thread
    pub fn stop(&mut self) {
        self.should_stop.store(true, Ordering::SeqCst);
        self.request_tx = None;
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for BackgroundPlanner {
    fn drop(&mut self) {
        self.stop();
    }
}
