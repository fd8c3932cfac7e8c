//! Sensor components and the throttled refresh system.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::EnemyState;
use crate::combat::Dead;
use crate::components::{Body, DetectionTarget, Enemy, Facing, Health, WallStick};
use crate::config::EnemyConfig;
use crate::sensors::detection::{detect_target, Candidate, DetectionPolicy, DetectionResult, Observer};
use crate::sensors::probes::{probe_ground, probe_path, PathThresholds};
use crate::world::{Terrain, TerrainQuery};
use crate::DeterministicRng;

/// Throttle for sensor refreshes.
///
/// Первый тик после спавна всегда обновляет сенсоры.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct SensorSuite {
    /// Time until the next refresh (seconds)
    pub refresh_in: f32,
    /// Number of refreshes performed so far
    pub refreshes: u32,
}

impl SensorSuite {
    /// Advance the throttle; returns true when a refresh is due.
    pub fn tick(&mut self, delta: f32, interval: f32) -> bool {
        self.refresh_in -= delta;
        if self.refresh_in > 0.0 {
            return false;
        }
        self.refresh_in = interval;
        self.refreshes += 1;
        true
    }
}

/// Last sensor reading. Between refreshes the stale values are reused.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SensorSnapshot {
    pub grounded: bool,
    /// Edge in the facing direction (patrol thresholds)
    pub edge_ahead: bool,
    /// Wall in the facing direction (patrol thresholds)
    pub wall_ahead: bool,
    pub ground_height: Option<f32>,
    pub target: Option<DetectionResult>,
}

impl SensorSnapshot {
    pub fn blocked(&self) -> bool {
        self.edge_ahead || self.wall_ahead
    }

    /// Forget edge/wall flags (after a reversal they describe the old direction).
    pub fn clear_blocking(&mut self) {
        self.edge_ahead = false;
        self.wall_ahead = false;
    }
}

/// Per-leg state of the edge predictor.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct EdgeProbeState {
    /// Random addition to `edge_offset_base` for the current patrol leg
    pub leg_offset: f32,
    /// How many legs have been drawn (one per spawn/reversal)
    pub leg: u32,
    pub last_ground_height: Option<f32>,
}

impl EdgeProbeState {
    /// Draw a fresh stopping offset for a new leg.
    pub fn redraw(&mut self, rng: &mut impl Rng, config: &EnemyConfig) {
        self.leg_offset = if config.edge_offset_max > config.edge_offset_min {
            rng.gen_range(config.edge_offset_min..=config.edge_offset_max)
        } else {
            config.edge_offset_min
        };
        self.leg += 1;
    }
}

/// Система: первый отрезок патруля для только что заспавненных агентов
pub fn draw_initial_legs(
    mut rng: ResMut<DeterministicRng>,
    mut spawned: Query<(&EnemyConfig, &mut EdgeProbeState), Added<Enemy>>,
) {
    for (config, mut edge) in spawned.iter_mut() {
        if edge.leg == 0 {
            edge.redraw(&mut rng.rng, config);
        }
    }
}

/// Sense(agent, world) → SensorSnapshot.
///
/// Edge/wall are probed in the facing direction with patrol thresholds.
pub fn sense(
    terrain: &impl TerrainQuery,
    observer: &Observer,
    body: &Body,
    edge: &EdgeProbeState,
    candidates: impl IntoIterator<Item = Candidate>,
    mode: DetectionPolicy,
    config: &EnemyConfig,
) -> SensorSnapshot {
    let grounded = probe_ground(terrain, observer.feet, config.ground_probe_distance).is_some();
    let path = probe_path(
        terrain,
        observer.feet,
        body,
        observer.facing.sign(),
        PathThresholds::patrol(config, edge.leg_offset),
        config,
    );

    SensorSnapshot {
        grounded,
        edge_ahead: path.edge_ahead,
        wall_ahead: path.wall_ahead,
        ground_height: path.ground_height,
        target: detect_target(terrain, observer, candidates, mode, config),
    }
}

/// Система: throttled sensor refresh
///
/// Каждый агент обновляет SensorSnapshot раз в `sense_interval`.
/// Режим детекции: Patrol → политика архетипа, Chase/Attack → всегда 360°.
pub fn refresh_sensors(
    terrain: Res<Terrain>,
    time: Res<Time>,
    mut agents: Query<
        (
            &Transform,
            &Facing,
            &Body,
            &EnemyConfig,
            &EnemyState,
            &mut SensorSuite,
            &mut SensorSnapshot,
            &mut EdgeProbeState,
        ),
        (With<Enemy>, Without<Dead>),
    >,
    targets: Query<
        (Entity, &Transform, Option<&WallStick>, Option<&Health>),
        (With<DetectionTarget>, Without<Enemy>),
    >,
) {
    let delta = time.delta_secs();

    let candidates: Vec<Candidate> = targets
        .iter()
        .filter(|(_, _, _, health)| health.map_or(true, |h| h.is_alive()))
        .map(|(entity, transform, wall_stick, _)| Candidate {
            entity,
            feet: transform.translation.truncate(),
            wall_stick: wall_stick.is_some_and(|w| w.active),
        })
        .collect();

    for (transform, facing, body, config, state, mut suite, mut snapshot, mut edge) in
        agents.iter_mut()
    {
        if matches!(state, EnemyState::Dead) {
            continue;
        }
        if !suite.tick(delta, config.sense_interval) {
            continue;
        }

        let observer = Observer {
            feet: transform.translation.truncate(),
            facing: *facing,
            preferred: state.target(),
        };
        let mode = config.detection_policy.mode_for(state);

        let reading = sense(
            &*terrain,
            &observer,
            body,
            &edge,
            candidates.iter().copied(),
            mode,
            config,
        );

        edge.last_ground_height = reading.ground_height;
        *snapshot = reading;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_sensor_throttle() {
        let mut suite = SensorSuite::default();
        let dt = 0.25;

        // Первый тик: refresh
        assert!(suite.tick(dt, 1.0));

        // Следующую секунду: stale
        let mut refreshed_again_after = 0;
        for tick in 1..=10 {
            if suite.tick(dt, 1.0) {
                refreshed_again_after = tick;
                break;
            }
        }
        assert_eq!(refreshed_again_after, 4);
        assert_eq!(suite.refreshes, 2);
    }

    #[test]
    fn test_zero_interval_refreshes_every_tick() {
        let mut suite = SensorSuite::default();
        for _ in 0..5 {
            assert!(suite.tick(1.0 / 60.0, 0.0));
        }
    }

    #[test]
    fn test_redraw_stays_in_range_and_counts_legs() {
        let config = EnemyConfig::grunt();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut edge = EdgeProbeState::default();

        for leg in 1..=50 {
            edge.redraw(&mut rng, &config);
            assert_eq!(edge.leg, leg);
            assert!(edge.leg_offset >= config.edge_offset_min);
            assert!(edge.leg_offset <= config.edge_offset_max);
        }
    }

    #[test]
    fn test_redraw_with_degenerate_range() {
        let config = EnemyConfig {
            edge_offset_min: 0.25,
            edge_offset_max: 0.25,
            ..EnemyConfig::grunt()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut edge = EdgeProbeState::default();
        edge.redraw(&mut rng, &config);
        assert_eq!(edge.leg_offset, 0.25);
    }

    #[test]
    fn test_clear_blocking() {
        let mut snapshot = SensorSnapshot {
            grounded: true,
            edge_ahead: true,
            wall_ahead: true,
            ..Default::default()
        };
        assert!(snapshot.blocked());
        snapshot.clear_blocking();
        assert!(!snapshot.blocked());
        assert!(snapshot.grounded);
    }
}
