//! # FlareNav
//!
//! Single-receiver beacon finding from signal strength and the rescuer's own
//! motion. No GPS, no fixed anchors: one moving phone, one beacon, noisy RSSI.
//!
//! ## Overview
//!
//! Components, leaf first:
//!
//! - **Signal model** - RSSI to distance, EMA / half-life smoothing, quality bands
//! - **Direction estimator** - turn in place, pick the strongest compass sector
//! - **Dead reckoning** - steps from the accelerometer, heading from the compass
//! - **Hot/cold guide** - per-direction signal trends, obstacle inference
//! - **Heat map** - sparse grid of readings, cell classification, A* routing
//! - **Trilateration** - victim position from distances at several rescuer positions
//!
//! ## Data Flow
//!
//! ```text
//! radio ──► SignalModel ──┬──► DirectionEstimator   (while calibrating)
//!                         ├──► HeatMapGrid          (while recording)
//!                         └──► anchors ──► trilaterate (on demand)
//! accel/mag ──► DeadReckoningTracker ──► MovementEvent ──► HotColdGuide
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flare_nav::{NavConfig, NavigationSession, SignalSample};
//!
//! let mut session = NavigationSession::new(NavConfig::load_default()?);
//! session.set_target("beacon-7");
//!
//! session.on_heading(compass_deg, now_ms);
//! session.on_rssi(SignalSample::from_dbm(-67, now_ms));
//!
//! let guidance = session.guidance();
//! println!("{} ({:.0}%)", guidance.message, guidance.confidence * 100.0);
//! ```
//!
//! ## Coordinate System
//!
//! Session-relative, centimeters, screen convention:
//! - X: east positive
//! - Y: south positive (north is -Y)
//! - Headings: compass degrees, 0 = north, clockwise positive

// Core types
pub mod core;

// Unified configuration
pub mod config;

// RSSI model and smoothing
pub mod signal;

// Rotation-based calibration
pub mod direction;

// Step detection and dead reckoning
pub mod tracking;

// Hot/cold movement guidance
pub mod guidance;

// Heat map grid and A*
pub mod heatmap;

// Geometric solver
pub mod trilateration;

// Engine state machine and thread adapters
pub mod session;

// Re-export commonly used types
pub use core::{
    AccelSample, GridCoord, HeadingSample, MagSample, Octant, Position, SignalSample, WorldPoint,
};

pub use config::{ConfigError, NavConfig};

pub use signal::{
    SignalModel, SignalQuality, distance_from_rssi, format_distance, signal_quality, smooth,
    weighted_smooth,
};

pub use direction::{CalibrationProgress, DirectionEstimator, SectorLayout};

pub use tracking::{DeadReckoningTracker, MovementEvent};

pub use guidance::{
    HotColdGuide, HotColdState, IconHint, NavigationGuidance, NavigationState, quick_guidance,
};

pub use heatmap::{
    CellStatus, GridCell, GridSnapshot, HeatMapExport, HeatMapGrid, HeatMapStatistics,
    PathHeuristic, PathResult, SnapshotError, classify,
};

pub use trilateration::{Anchor, trilaterate, trilaterate_least_squares};

pub use session::{
    BackgroundPlanner, EngineState, NavigationSession, PlannerSchedule, SessionEpoch,
    SharedSession,
};
