//! Simulated search: one rescuer, one beacon, synthetic sensors.
//!
//! The world model owns the truth (rescuer and victim positions, walls)
//! and feeds the engine only what a phone would see: noisy RSSI, noisy
//! compass headings and accelerometer peaks. The rescuer steers by the
//! engine's guidance, or by the planned route once one exists.

use crate::config::{ScenarioConfig, SimConfig, WallConfig};
use crate::error::{Result, SimError};

use flare_nav::core::{heading_to_vector, normalize_degrees};
use flare_nav::{
    AccelSample, BackgroundPlanner, EngineState, HotColdState, IconHint, MovementEvent,
    NavigationGuidance, Octant, PlannerSchedule, Position, SessionEpoch, SharedSession,
    SignalSample, WorldPoint,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use tracing::{debug, info, warn};

/// Accelerometer magnitude at rest (g)
const REST_G: f64 = 1.0;

/// Delay between a heel strike and the return to rest (ms)
const STEP_SETTLE_MS: u64 = 100;

/// Outcome of one simulated search
#[derive(Clone, Debug)]
pub struct SimReport {
    /// The engine reported arrival
    pub arrived: bool,
    pub steps: usize,
    /// True rescuer-to-victim distance at the end (m)
    pub true_distance_m: f64,
    /// Engine's distance estimate at the end (m)
    pub estimated_distance_m: Option<f64>,
    /// Dead-reckoning drift from the true position (cm)
    pub drift_cm: f64,
    pub final_state: HotColdState,
    pub victim_estimate: Option<WorldPoint>,
    pub mapped_cells: usize,
    pub last_path_len: Option<usize>,
    pub stale_drops: u64,
}

/// One search run.
pub struct Scenario {
    config: ScenarioConfig,
    arrival_m: f64,
    victim: Position,
    truth: Position,
    heading: f64,
    clock_ms: u64,
    rng: StdRng,
    rssi_noise: Normal<f64>,
    heading_noise: Normal<f64>,
    stride_noise: Normal<f64>,
    shared: SharedSession,
    epoch: SessionEpoch,
    planner: BackgroundPlanner,
    schedule: PlannerSchedule,
    victim_estimate: Option<WorldPoint>,
}

impl Scenario {
    pub fn new(config: SimConfig) -> Result<Self> {
        let scenario = config.scenario;
        let rssi_noise = normal(scenario.rssi_noise_db)?;
        let heading_noise = normal(scenario.heading_noise_deg)?;
        let stride_noise = normal(scenario.stride_noise_cm)?;

        let shared = SharedSession::from_config(config.navigation.clone());
        let epoch = shared.set_target(scenario.target_id.clone());
        let victim = Position::new(scenario.victim_x_cm, scenario.victim_y_cm);
        if scenario.victim_known {
            shared.with_mut(|s| s.set_victim_position(victim));
        }

        Ok(Self {
            arrival_m: config.navigation.guidance.arrival_distance_m,
            rng: StdRng::seed_from_u64(scenario.seed),
            victim,
            truth: Position::ZERO,
            heading: 0.0,
            clock_ms: 0,
            rssi_noise,
            heading_noise,
            stride_noise,
            shared,
            epoch,
            planner: BackgroundPlanner::start(),
            schedule: PlannerSchedule::new(config.navigation.session.planner_interval_ms),
            victim_estimate: None,
            config: scenario,
        })
    }

    /// Calibrate, then walk until arrival or the step budget runs out.
    pub fn run(mut self) -> Result<SimReport> {
        info!(
            "Victim at ({:.0}, {:.0}) cm, {:.1} m from the start",
            self.victim.x,
            self.victim.y,
            self.true_distance_m()
        );

        self.calibrate()?;

        // Prime the step detector so the first heel strike registers
        self.push_accel(REST_G)?;

        let mut steps = 0;
        let mut arrived = false;
        let mut last_state = HotColdState::Calibrating;

        while steps < self.config.max_steps {
            self.choose_heading();
            if !self.step()? {
                warn!("Step {} not detected", steps + 1);
            }
            steps += 1;
            self.listen(self.config.readings_per_step)?;

            if !self.config.victim_known && steps % self.config.estimate_every_steps == 0 {
                self.estimate_victim();
            }
            self.shared
                .tick_planner(&self.planner, &mut self.schedule, self.clock_ms);

            let guidance = self.shared.guidance();
            if guidance.state != last_state {
                info!(
                    "Step {}: {:?} -> {:?} ({})",
                    steps, last_state, guidance.state, guidance.message
                );
                last_state = guidance.state;
            } else {
                debug!("Step {}: {}", steps, guidance.message);
            }

            if guidance.icon_hint == IconHint::Search {
                info!(
                    "Arrived after {} steps: {} (true distance {:.2} m)",
                    steps,
                    guidance.message,
                    self.true_distance_m()
                );
                if self.true_distance_m() > 2.0 * self.arrival_m {
                    warn!(
                        "Arrival called {:.1} m from the victim",
                        self.true_distance_m()
                    );
                }
                arrived = true;
                break;
            }
        }

        Ok(self.finish(arrived, steps))
    }

    /// Turn in place through the sectors until the engine resolves a bearing
    fn calibrate(&mut self) -> Result<()> {
        let layout = self.shared.with(|s| s.direction().layout());
        let width = layout.sector_width();

        for sector in 0..layout.sector_count() {
            self.heading = sector as f64 * width + width / 2.0;
            self.push_heading()?;
            self.listen(self.config.readings_per_sector)?;
            if self.shared.with(|s| s.engine_state()) == EngineState::Calibrated {
                break;
            }
        }

        let progress = self.shared.calibration_progress();
        match progress.resolved_bearing_deg {
            Some(bearing) => {
                info!(
                    "Calibrated after {}/{} sectors: strongest bearing {:.1}°",
                    progress.visited_count, progress.required_count, bearing
                );
                self.heading = bearing;
                Ok(())
            }
            None => Err(SimError::Scenario(format!(
                "calibration did not resolve ({}/{} sectors)",
                progress.visited_count, progress.required_count
            ))),
        }
    }

    /// Pick the next walking direction.
    ///
    /// A planned route wins; otherwise follow the hot/cold guidance.
    fn choose_heading(&mut self) {
        let route = self.shared.with(|s| {
            let path = s.last_path()?;
            let here = s.heatmap().world_to_grid(s.position());
            // Next waypoint after the current cell; off the route, rejoin it
            let next = match path.cells.iter().position(|c| Some(*c) == here) {
                Some(i) => path.world_points.get(i + 1),
                None => path.world_points.get(1),
            };
            Some((s.position(), *next?))
        });
        if let Some((from, to)) = route {
            self.heading = bearing_between(from, to);
            return;
        }

        let guidance = self.shared.guidance();
        self.heading = steer(self.heading, &guidance);
    }

    /// Report the compass, then take one step
    fn step(&mut self) -> Result<bool> {
        self.push_heading()?;
        let event = self.push_accel(REST_G + self.config.step_peak_g)?;
        self.clock_ms += STEP_SETTLE_MS;
        self.push_accel(REST_G)?;

        let Some(event) = event else {
            return Ok(false);
        };
        let stride = self.shared.with(|s| s.config().tracking.step_length_cm)
            + self.stride_noise.sample(&mut self.rng);
        let direction = heading_to_vector(self.heading);
        self.truth = Position::new(
            self.truth.x + direction.x * stride,
            self.truth.y + direction.y * stride,
        );
        debug!(
            "Step {} toward {} -> estimated ({:.0}, {:.0}), true ({:.0}, {:.0})",
            event.step_index,
            event.octant,
            event.new_position.x,
            event.new_position.y,
            self.truth.x,
            self.truth.y
        );
        Ok(true)
    }

    fn estimate_victim(&mut self) {
        if let Some(estimate) = self.shared.with_mut(|s| s.estimate_victim_position()) {
            info!(
                "Victim estimate ({:.0}, {:.0}), {:.1} m from the truth",
                estimate.x,
                estimate.y,
                estimate.distance(&self.victim) / 100.0
            );
            self.victim_estimate = Some(estimate);
        }
    }

    /// `count` radio readings at the true position
    fn listen(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            self.clock_ms += self.config.reading_interval_ms;
            let rssi = self.true_rssi() + self.rssi_noise.sample(&mut self.rng);
            self.shared
                .push_rssi(self.epoch, SignalSample::new(rssi, self.clock_ms))
                .map_err(|e| SimError::Scenario(e.to_string()))?;
        }
        Ok(())
    }

    fn push_heading(&mut self) -> Result<()> {
        let reported = normalize_degrees(self.heading + self.heading_noise.sample(&mut self.rng));
        self.shared
            .push_heading(self.epoch, reported, self.clock_ms)
            .map_err(|e| SimError::Scenario(e.to_string()))
    }

    fn push_accel(&mut self, magnitude: f64) -> Result<Option<MovementEvent>> {
        self.clock_ms += 1;
        self.shared
            .push_accel(self.epoch, AccelSample::new(0.0, 0.0, magnitude, self.clock_ms))
            .map_err(|e| SimError::Scenario(e.to_string()))
    }

    /// Noise-free RSSI at the rescuer's true position and heading
    fn true_rssi(&self) -> f64 {
        let signal = self.shared.with(|s| s.config().signal.clone());
        let distance_m = (self.true_distance_m()).max(0.01);
        let path_loss = 10.0 * signal.path_loss_exponent * distance_m.log10();

        let toward = bearing_between(self.truth, self.victim);
        let off_axis = (self.heading - toward).to_radians().cos();
        let shadow = self.config.body_shadow_db * (1.0 - off_axis) / 2.0;

        let walls: f64 = self
            .config
            .walls
            .iter()
            .filter(|w| blocks(w, self.truth, self.victim))
            .map(|w| w.loss_db)
            .sum();

        signal.tx_power - path_loss - shadow - walls
    }

    fn true_distance_m(&self) -> f64 {
        self.truth.distance(&self.victim) / 100.0
    }

    fn finish(mut self, arrived: bool, steps: usize) -> SimReport {
        self.planner.stop();
        let (estimated_distance_m, final_state, mapped_cells, last_path_len, estimated) =
            self.shared.with(|s| {
                (
                    s.distance_meters(),
                    s.hot_cold_state(),
                    s.heatmap().len(),
                    s.last_path().map(|p| p.len()),
                    s.position(),
                )
            });
        SimReport {
            arrived,
            steps,
            true_distance_m: self.true_distance_m(),
            estimated_distance_m,
            drift_cm: estimated.distance(&self.truth),
            final_state,
            victim_estimate: self.victim_estimate,
            mapped_cells,
            last_path_len,
            stale_drops: self.shared.stale_drops(),
        }
    }
}

fn normal(std_dev: f64) -> Result<Normal<f64>> {
    Normal::new(0.0, std_dev).map_err(|e| SimError::Scenario(format!("noise model: {}", e)))
}

/// Compass bearing from one point to another (screen convention)
fn bearing_between(from: WorldPoint, to: WorldPoint) -> f64 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    normalize_degrees(dx.atan2(-dy).to_degrees())
}

/// Next heading from hot/cold guidance
fn steer(current: f64, guidance: &NavigationGuidance) -> f64 {
    match guidance.state {
        HotColdState::Warmer | HotColdState::Calibrating => current,
        HotColdState::Colder => guidance
            .suggested_direction
            .map(Octant::bearing)
            .unwrap_or_else(|| normalize_degrees(current + 180.0)),
        HotColdState::Stable => {
            let here = Octant::from_heading(current);
            match guidance.suggested_direction {
                Some(best) if Some(best) != here => best.bearing(),
                // Nothing better known: sweep clockwise
                _ => normalize_degrees(current + 45.0),
            }
        }
    }
}

/// True if the segment between two points crosses the wall rectangle
fn blocks(wall: &WallConfig, a: WorldPoint, b: WorldPoint) -> bool {
    const SAMPLES: usize = 32;
    (0..=SAMPLES).any(|i| {
        let t = i as f64 / SAMPLES as f64;
        let x = a.x + (b.x - a.x) * t;
        let y = a.y + (b.y - a.y) * t;
        x >= wall.min_x && x <= wall.max_x && y >= wall.min_y && y <= wall.max_y
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flare_nav::NavConfig;

    fn guidance(state: HotColdState, suggested: Option<Octant>) -> NavigationGuidance {
        NavigationGuidance {
            state,
            message: String::new(),
            icon_hint: IconHint::Rotate,
            confidence: 0.0,
            distance_meters: None,
            formatted_distance: None,
            signal_quality: None,
            suggested_direction: suggested,
            obstacle_directions: Vec::new(),
        }
    }

    #[test]
    fn test_bearing_between() {
        let origin = WorldPoint::ZERO;
        assert!(bearing_between(origin, WorldPoint::new(0.0, -100.0)).abs() < 1e-9);
        assert!((bearing_between(origin, WorldPoint::new(100.0, 0.0)) - 90.0).abs() < 1e-9);
        assert!((bearing_between(origin, WorldPoint::new(0.0, 100.0)) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_steer() {
        assert_eq!(steer(90.0, &guidance(HotColdState::Warmer, Some(Octant::N))), 90.0);
        assert_eq!(steer(90.0, &guidance(HotColdState::Colder, None)), 270.0);
        assert_eq!(steer(90.0, &guidance(HotColdState::Colder, Some(Octant::S))), 180.0);
        assert_eq!(steer(90.0, &guidance(HotColdState::Stable, Some(Octant::E))), 135.0);
        assert_eq!(steer(90.0, &guidance(HotColdState::Stable, Some(Octant::W))), 270.0);
    }

    #[test]
    fn test_wall_blocks_line_of_sight() {
        let wall = WallConfig {
            min_x: -100.0,
            min_y: -300.0,
            max_x: 100.0,
            max_y: -250.0,
            loss_db: 10.0,
        };
        let victim = WorldPoint::new(0.0, -600.0);
        assert!(blocks(&wall, WorldPoint::ZERO, victim));
        assert!(!blocks(&wall, WorldPoint::new(500.0, 0.0), WorldPoint::new(500.0, -600.0)));
    }

    #[test]
    fn test_quiet_search_arrives() {
        let mut config = SimConfig {
            navigation: NavConfig::default(),
            ..Default::default()
        };
        config.navigation.signal.path_loss_exponent = 3.0;
        config.scenario.victim_x_cm = 0.0;
        config.scenario.victim_y_cm = -800.0;
        config.scenario.victim_known = true;
        config.scenario.rssi_noise_db = 0.0;
        config.scenario.heading_noise_deg = 0.0;
        config.scenario.stride_noise_cm = 0.0;
        config.scenario.max_steps = 60;

        let report = Scenario::new(config).unwrap().run().unwrap();
        assert!(report.arrived, "{:?}", report);
        assert!(report.true_distance_m < 3.0, "{:?}", report);
        assert_eq!(report.stale_drops, 0);
        assert!(report.mapped_cells > 1);
    }
}
