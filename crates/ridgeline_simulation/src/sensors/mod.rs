//! Sensor Suite: ground/edge/wall probes и детекция цели.
//!
//! - probes: лучи в террейн (чистые функции)
//! - detection: радиус + конус + "северное полушарие" + colocation
//! - systems: SensorSuite throttle, SensorSnapshot, EdgeProbeState
//!
//! Сенсоры обновляются не каждый тик (sense_interval); между обновлениями
//! FSM читает устаревший snapshot.

use bevy::prelude::*;

pub mod detection;
pub mod probes;
pub mod systems;

#[cfg(test)]
mod detection_tests;

pub use detection::{
    angle_to_facing, detect_target, evaluate_candidate, passes_vertical_filter, Candidate,
    DetectionPolicy, DetectionResult, Observer,
};
pub use probes::{probe_edge, probe_ground, probe_path, probe_wall, PathProbe, PathThresholds};
pub use systems::{draw_initial_legs, refresh_sensors, sense, EdgeProbeState, SensorSnapshot, SensorSuite};

use crate::world::Terrain;
use crate::EnemySet;

/// Sensor Plugin
///
/// Регистрирует draw_initial_legs + refresh_sensors в `EnemySet::Sense` (FixedUpdate).
pub struct SensorPlugin;

impl Plugin for SensorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Terrain>()
            .add_systems(
                FixedUpdate,
                (draw_initial_legs, refresh_sensors)
                    .chain()
                    .in_set(EnemySet::Sense),
            );
    }
}
