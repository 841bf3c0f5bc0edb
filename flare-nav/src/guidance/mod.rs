//! Hot/cold movement guidance.
//!
//! Every movement event is paired with the smoothed RSSI at its end. The
//! change since the previous movement tells whether that step went toward
//! the beacon ("warmer") or away ("colder"). Changes are also filed per
//! compass octant, so directions that keep losing signal can be flagged as
//! likely obstacles and the most promising direction can be suggested.
//!
//! - [`OctantTrack`]: bounded per-direction window with obstacle hysteresis
//! - [`HotColdGuide`]: global trend state and best-direction choice
//! - [`NavigationGuidance`]: message, icon and confidence for the UI
//! - [`quick_guidance`]: stateless two-reading variant

mod hot_cold;
mod message;
mod octant_track;
mod quick;

pub use hot_cold::{HotColdGuide, HotColdState, MovementRecord, NavigationState};
pub use message::{IconHint, NavigationGuidance};
pub use octant_track::{OctantReading, OctantTrack};
pub use quick::{QuickGuidance, Trend, quick_guidance};
