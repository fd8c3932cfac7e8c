//! Ground / edge / wall probes.
//!
//! Все пробы: чистые функции над `TerrainQuery`, без ECS.

use bevy::prelude::*;

use crate::components::Body;
use crate::config::EnemyConfig;
use crate::world::TerrainQuery;

/// Насколько выше ног стартует ground-луч (чтобы не начинать внутри пола)
pub const PROBE_LIFT: f32 = 0.05;

/// Ground probe: cast down a short distance from the feet.
///
/// Returns the ground height under the feet, `None` when airborne.
pub fn probe_ground(terrain: &impl TerrainQuery, feet: Vec2, distance: f32) -> Option<f32> {
    terrain.cast_down(feet + Vec2::new(0.0, PROBE_LIFT), PROBE_LIFT + distance)
}

/// Paired ground-height samples: under the agent and `offset` ahead of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSample {
    pub current_height: Option<f32>,
    pub ahead_height: Option<f32>,
    pub edge: bool,
}

/// Edge predictor.
///
/// Ahead sample missing, or differing from the current height by more than
/// `level_tolerance` in either direction ⇒ edge. A step *up* counts too, so the
/// agent never walks onto a different tier.
pub fn probe_edge(
    terrain: &impl TerrainQuery,
    feet: Vec2,
    direction: f32,
    offset: f32,
    config: &EnemyConfig,
) -> EdgeSample {
    let origin_y = feet.y + config.edge_probe_height;
    let depth = config.edge_probe_height + config.edge_scan_depth;

    let current_height = terrain.cast_down(Vec2::new(feet.x, origin_y), depth);
    let ahead_height = terrain.cast_down(Vec2::new(feet.x + direction * offset, origin_y), depth);

    // В воздухе сравниваем с высотой ног
    let reference = current_height.unwrap_or(feet.y);
    let edge = match ahead_height {
        None => true,
        Some(ahead) => (ahead - reference).abs() > config.level_tolerance,
    };

    EdgeSample {
        current_height,
        ahead_height,
        edge,
    }
}

/// Wall probe: horizontal cast at mid-body height in `direction`.
pub fn probe_wall(
    terrain: &impl TerrainQuery,
    feet: Vec2,
    body: &Body,
    direction: f32,
    distance: f32,
) -> bool {
    terrain
        .cast_horizontal(body.center(feet), direction, body.half_width + distance)
        .is_some()
}

/// Edge + wall result for one movement direction.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PathProbe {
    pub edge_ahead: bool,
    pub wall_ahead: bool,
    pub ground_height: Option<f32>,
}

impl PathProbe {
    pub fn blocked(&self) -> bool {
        self.edge_ahead || self.wall_ahead
    }
}

/// Thresholds for one probing flavour (patrol vs. chase).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathThresholds {
    pub edge_offset: f32,
    pub wall_distance: f32,
}

impl PathThresholds {
    /// Patrol: base offset plus the current leg's random offset.
    pub fn patrol(config: &EnemyConfig, leg_offset: f32) -> Self {
        Self {
            edge_offset: config.edge_offset_base + leg_offset,
            wall_distance: config.wall_probe_distance,
        }
    }

    /// Chase: tighter thresholds so pursuit gets closer to the edge.
    pub fn chase(config: &EnemyConfig) -> Self {
        Self {
            edge_offset: config.chase_edge_offset,
            wall_distance: config.chase_wall_probe_distance,
        }
    }
}

pub fn probe_path(
    terrain: &impl TerrainQuery,
    feet: Vec2,
    body: &Body,
    direction: f32,
    thresholds: PathThresholds,
    config: &EnemyConfig,
) -> PathProbe {
    let edge = probe_edge(terrain, feet, direction, thresholds.edge_offset, config);
    PathProbe {
        edge_ahead: edge.edge,
        wall_ahead: probe_wall(terrain, feet, body, direction, thresholds.wall_distance),
        ground_height: edge.current_height,
    }
}
