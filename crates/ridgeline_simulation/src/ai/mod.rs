//! AI decision-making module
//!
//! FSM контроллер врага: Patrol → Chase → Attack → (Chase | Patrol), → Dead.
//! Решения принимаются по SensorSnapshot (может быть устаревшим между
//! обновлениями сенсоров), результат: MoveIntent и TryAttack.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use components::{EnemyState, EnemyStateKind, LossTimer};
pub use events::{transition, EnemyStateChanged};
pub use systems::{resolve_facing, ChaseStep, DetectionStep, PatrolStep};

use crate::EnemySet;

/// AI Plugin
///
/// Регистрирует AI системы в `EnemySet::Decide` (FixedUpdate).
/// Порядок выполнения:
/// 1. enemy_fsm_transitions: детекция → смена состояния, loss hysteresis
/// 2. patrol_behavior: Patrol → MoveIntent, ожидание/разворот
/// 3. chase_behavior: Chase → MoveIntent, TryAttack
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EnemyStateChanged>().add_systems(
            FixedUpdate,
            (
                systems::enemy_fsm_transitions,
                systems::patrol_behavior,
                systems::chase_behavior,
            )
                .chain() // Последовательное выполнение для детерминизма
                .in_set(EnemySet::Decide),
        );
    }
}
