//! Navigation sessions: the engine state machine and its thread adapters.
//!
//! ```text
//!                 set_target                 min sectors visited
//!   NoTarget ───────────────▶ Calibrating ─────────────────────▶ Calibrated
//!      ▲                          │  ▲                               │
//!      │      clear_target/reset  │  └──── start_calibration ────────┤
//!      └──────────────────────────┴──────────────────────────────────┘
//! ```
//!
//! Orthogonally the hot/cold guide moves from `Calibrating` (fewer than
//! three movements) to `Warmer`, `Colder` or `Stable`.
//!
//! - [`NavigationSession`]: owned engine, all transitions via `&mut self`
//! - [`SharedSession`]: `Arc<Mutex<_>>` handle with epoch-checked pushes
//! - [`BackgroundPlanner`] + [`PlannerSchedule`]: timed, non-blocking A*

mod engine;
mod epoch;
mod planner;
mod shared;

pub use engine::{EngineState, NavigationSession};
pub use epoch::SessionEpoch;
pub use planner::{BackgroundPlanner, PlanOutcome, PlanRequest, PlannerSchedule};
pub use shared::{SharedSession, StaleEpoch};
