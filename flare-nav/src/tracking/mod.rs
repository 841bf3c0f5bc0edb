//! Pedestrian dead reckoning from accelerometer and compass streams.
//!
//! # Pipeline
//!
//! ```text
//! accel ──► StepDetector ──┐
//!                          ├──► DeadReckoningTracker ──► MovementEvent
//! mag ────► HeadingFilter ─┘        (position += step_length · dir)
//! ```
//!
//! A step fires when the accelerometer magnitude jumps by more than the
//! threshold between two consecutive samples and the cooldown since the
//! previous step has elapsed. Each step advances the rescuer by a fixed
//! stride along the current heading.
//!
//! # Example
//!
//! ```rust,ignore
//! use flare_nav::tracking::DeadReckoningTracker;
//!
//! let mut tracker = DeadReckoningTracker::default();
//! tracker.set_heading(90.0);
//! if let Some(event) = tracker.on_accel(&sample) {
//!     guide.record_movement(event.octant, event.new_position, rssi);
//! }
//! ```

mod dead_reckoning;
mod heading;
mod step_detector;

pub use dead_reckoning::{DeadReckoningTracker, MovementEvent};
pub use heading::{HeadingFilter, heading_from_magnetometer};
pub use step_detector::StepDetector;
