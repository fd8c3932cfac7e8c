//! Physics simulation module
//!
//! Kinematic контроллер: MoveIntent → скорость → позиция, коллизии с
//! `Terrain` через лучи (`TerrainQuery`).

use bevy::prelude::*;

pub mod movement;

// Re-export основных типов
pub use movement::{apply_move_intents, drive, integrate_kinematics, step_body, KinematicStep};

use crate::EnemySet;

/// Plugin для kinematic контроллера
///
/// Регистрирует системы в `EnemySet::Move` (после решений AI).
pub struct KinematicControllerPlugin;

impl Plugin for KinematicControllerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (apply_move_intents, integrate_kinematics)
                .chain() // Последовательное выполнение
                .in_set(EnemySet::Move),
        );
    }
}
