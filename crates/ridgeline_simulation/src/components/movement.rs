//! Movement компоненты: скорость, контакт с землёй, намерение движения

use bevy::prelude::*;

/// Линейная скорость (м/с). Y: гравитация, X: ходьба.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Velocity {
    pub linear: Vec2,
}

/// Стоит ли тело на поверхности (обновляется kinematic интегратором)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Grounded(pub bool);

/// Намерение движения на этот тик (пишет AI, читает Movement Actuator)
///
/// Архитектура:
/// - AI системы пишут MoveIntent (high-level intent)
/// - Actuator конвертирует в горизонтальную скорость
/// - Интегратор двигает тело
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub enum MoveIntent {
    /// Стоять: горизонтальная скорость 0, вертикальная не трогается
    #[default]
    Halt,
    /// Идти: direction ∈ {-1, +1}, speed ≥ 0
    Move { direction: f32, speed: f32 },
}

impl MoveIntent {
    pub fn is_moving(&self) -> bool {
        matches!(self, MoveIntent::Move { direction, speed } if *direction != 0.0 && *speed > 0.0)
    }
}
