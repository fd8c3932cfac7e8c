//! Базовые компоненты агентов: Enemy, Health, Facing, Body, Collider, цели

use bevy::prelude::*;

use crate::components::{Grounded, MoveIntent, Velocity};

/// Враг под управлением behavior engine
///
/// Required Components добавляют физическое состояние (Velocity, Grounded,
/// MoveIntent, Collider): остальное ставит `spawn_enemy`.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(Velocity, Grounded, MoveIntent, Collider)]
pub struct Enemy;

/// Здоровье агента
///
/// Инвариант: 0 ≤ current ≤ max, ноль терминален.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

/// Результат применения урона к `Health`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthChange {
    /// Уже мёртв: ничего не изменилось
    Ignored,
    /// Урон прошёл, агент жив
    Damaged { current: u32, max: u32 },
    /// Этот удар убил агента (ровно один раз)
    Died { max: u32 },
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        let max = max.max(1);
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Apply damage. Health never goes below zero and never comes back from it.
    pub fn take_damage(&mut self, amount: u32) -> HealthChange {
        if !self.is_alive() {
            return HealthChange::Ignored;
        }

        self.current = self.current.saturating_sub(amount);

        if self.is_alive() {
            HealthChange::Damaged {
                current: self.current,
                max: self.max,
            }
        } else {
            HealthChange::Died { max: self.max }
        }
    }
}

/// Направление взгляда (2D: только влево/вправо)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Facing from the initial sprite orientation (`flip_x` = sprite drawn facing left).
    pub fn from_sprite_flip(flip_x: bool) -> Self {
        if flip_x {
            Facing::Left
        } else {
            Facing::Right
        }
    }

    /// Facing for a horizontal sign; `None` for zero.
    pub fn from_sign(sign: f32) -> Option<Self> {
        if sign > 0.0 {
            Some(Facing::Right)
        } else if sign < 0.0 {
            Some(Facing::Left)
        } else {
            None
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.sign(), 0.0)
    }
}

/// Габариты тела (pivot: в ногах, по центру по X)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Body {
    pub half_width: f32,
    pub height: f32,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            half_width: 0.4,
            height: 1.0,
        }
    }
}

impl Body {
    /// Mid-height point above the feet (wall probes are cast from here).
    pub fn center(&self, feet: Vec2) -> Vec2 {
        feet + Vec2::new(0.0, self.height * 0.5)
    }
}

/// Коллизия агента с террейном (выключается при смерти)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Collider {
    pub enabled: bool,
}

impl Default for Collider {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Цель, которую видят сенсоры врагов (игрок)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct DetectionTarget;

/// Цель висит на стене: для colocation check считается "стоящей"
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct WallStick {
    pub active: bool,
}
