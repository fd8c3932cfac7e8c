//! Target detection: radius, facing cone, vertical half-plane, platform colocation.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::EnemyState;
use crate::components::Facing;
use crate::config::EnemyConfig;
use crate::sensors::probes::probe_ground;
use crate::world::TerrainQuery;

/// How an archetype perceives targets while patrolling.
///
/// In pursuit (Chase/Attack) every archetype senses omnidirectionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect)]
pub enum DetectionPolicy {
    /// Facing-centered cone
    #[default]
    Directional,
    /// 360° (still only on or above own level)
    Omnidirectional,
}

impl DetectionPolicy {
    /// Mode actually used for a given controller state.
    pub fn mode_for(self, state: &EnemyState) -> DetectionPolicy {
        if state.is_pursuing() {
            DetectionPolicy::Omnidirectional
        } else {
            self
        }
    }
}

/// The observing agent, as detection sees it.
#[derive(Debug, Clone, Copy)]
pub struct Observer {
    pub feet: Vec2,
    pub facing: Facing,
    /// Current pursuit target: wins over nearer candidates while still valid
    pub preferred: Option<Entity>,
}

/// One entry of the target registry.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub entity: Entity,
    pub feet: Vec2,
    pub wall_stick: bool,
}

/// Transient per-refresh detection result.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct DetectionResult {
    pub target: Entity,
    /// Позиция цели на момент сенсинга
    pub position: Vec2,
    pub distance: f32,
    /// Unsigned angle between facing and the target offset (degrees)
    pub angle: f32,
    /// target.y − agent.y
    pub vertical_offset: f32,
    /// Both stand on ground (or the target clings to a wall) within scan depth
    pub colocated: bool,
}

/// Unsigned angle (degrees) between `facing` and `offset`; 0 for a zero offset.
pub fn angle_to_facing(facing: Facing, offset: Vec2) -> f32 {
    let Some(direction) = offset.try_normalize() else {
        return 0.0;
    };
    direction.dot(facing.as_vec2()).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Northern-hemisphere filter: on or above the agent's level, within tolerance.
pub fn passes_vertical_filter(vertical_offset: f32, tolerance: f32) -> bool {
    vertical_offset >= -tolerance
}

/// Geometric evaluation of one candidate.
///
/// `None` when outside the radius, below the half-plane, or (directional mode)
/// outside the cone. Colocation is reported, not enforced, here.
pub fn evaluate_candidate(
    terrain: &impl TerrainQuery,
    observer: &Observer,
    candidate: &Candidate,
    mode: DetectionPolicy,
    config: &EnemyConfig,
) -> Option<DetectionResult> {
    let offset = candidate.feet - observer.feet;
    let distance = offset.length();
    if distance > config.detection_radius {
        return None;
    }

    if !passes_vertical_filter(offset.y, config.vertical_tolerance) {
        return None;
    }

    let angle = angle_to_facing(observer.facing, offset);
    if mode == DetectionPolicy::Directional && angle > config.cone_half_angle {
        return None;
    }

    let observer_grounded =
        probe_ground(terrain, observer.feet, config.colocation_scan_depth).is_some();
    let candidate_grounded = candidate.wall_stick
        || probe_ground(terrain, candidate.feet, config.colocation_scan_depth).is_some();

    Some(DetectionResult {
        target: candidate.entity,
        position: candidate.feet,
        distance,
        angle,
        vertical_offset: offset.y,
        colocated: observer_grounded && candidate_grounded,
    })
}

/// Pick the detected target among `candidates`.
///
/// Only colocated results count. The preferred target wins when valid,
/// otherwise the nearest one.
pub fn detect_target(
    terrain: &impl TerrainQuery,
    observer: &Observer,
    candidates: impl IntoIterator<Item = Candidate>,
    mode: DetectionPolicy,
    config: &EnemyConfig,
) -> Option<DetectionResult> {
    let mut nearest: Option<DetectionResult> = None;

    for candidate in candidates {
        let Some(result) = evaluate_candidate(terrain, observer, &candidate, mode, config) else {
            continue;
        };
        if !result.colocated {
            continue;
        }

        if observer.preferred == Some(result.target) {
            return Some(result);
        }

        if nearest.map_or(true, |best| result.distance < best.distance) {
            nearest = Some(result);
        }
    }

    nearest
}
