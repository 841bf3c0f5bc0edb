//! Guidance output record and message text.

use serde::{Deserialize, Serialize};

use crate::core::Octant;
use crate::signal::{SignalQuality, format_distance};

use super::HotColdState;

/// Icon the UI should show next to the message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconHint {
    /// Arrived: search the immediate area
    Search,
    /// Keep going
    ArrowUp,
    /// Reverse direction
    TurnAround,
    /// Try a different direction
    Rotate,
    /// Still calibrating
    Compass,
}

/// Everything a UI needs to render one guidance update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavigationGuidance {
    pub state: HotColdState,
    pub message: String,
    pub icon_hint: IconHint,
    /// In [0, 1]
    pub confidence: f64,
    pub distance_meters: Option<f64>,
    pub formatted_distance: Option<String>,
    pub signal_quality: Option<SignalQuality>,
    pub suggested_direction: Option<Octant>,
    pub obstacle_directions: Vec<Octant>,
}

/// Inputs to message composition, gathered by the guide.
pub(super) struct MessageInputs<'a> {
    pub state: HotColdState,
    pub trend_db: f64,
    pub heading_toward: Option<Octant>,
    pub best: Option<Octant>,
    pub obstacles: &'a [Octant],
}

/// Message, icon and confidence for a hot/cold state
pub(super) fn compose(inputs: &MessageInputs<'_>) -> (String, IconHint, f64) {
    let trend_confidence = (inputs.trend_db.abs() / 10.0).min(1.0);

    let (mut message, icon, confidence) = match inputs.state {
        HotColdState::Calibrating => (
            "Walk a few steps in any direction to calibrate".to_string(),
            IconHint::Compass,
            0.0,
        ),
        HotColdState::Warmer => {
            let message = match inputs.heading_toward.or(inputs.best) {
                Some(dir) => format!("Getting warmer! Keep heading {}", dir.name()),
                None => "Getting warmer! Keep going".to_string(),
            };
            (message, IconHint::ArrowUp, trend_confidence)
        }
        HotColdState::Colder => {
            let message = match inputs.best {
                Some(dir) => format!("Getting colder - turn around and try {}", dir.name()),
                None => "Getting colder - turn around".to_string(),
            };
            (message, IconHint::TurnAround, trend_confidence)
        }
        HotColdState::Stable => {
            let message = match inputs.best {
                Some(dir) => format!("Signal steady - try heading {}", dir.name()),
                None => "Signal steady - try a different direction".to_string(),
            };
            (message, IconHint::Rotate, 0.3)
        }
    };

    if !inputs.obstacles.is_empty() {
        let blocked: Vec<&str> = inputs.obstacles.iter().map(|o| o.label()).collect();
        message.push_str(&format!(" (blocked: {})", blocked.join(", ")));
    }

    (message, icon, confidence)
}

impl NavigationGuidance {
    /// Apply distance-based overrides.
    ///
    /// Within `arrival_m` the rescuer has arrived (confidence forced to 1).
    /// Within `near_m` the distance is prepended to the message.
    pub(super) fn with_distance(
        mut self,
        distance_meters: Option<f64>,
        arrival_m: f64,
        near_m: f64,
    ) -> Self {
        let Some(distance) = distance_meters.filter(|d| d.is_finite()) else {
            return self;
        };
        self.distance_meters = Some(distance);
        self.formatted_distance = Some(format_distance(distance));

        if distance < arrival_m {
            self.message = "You have arrived - search this area".to_string();
            self.icon_hint = IconHint::Search;
            self.confidence = 1.0;
        } else if distance < near_m {
            self.message = format!("{} away. {}", format_distance(distance), self.message);
        }
        self
    }
}
