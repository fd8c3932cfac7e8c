//! FSM components: controller state, loss-hysteresis timer.

use bevy::prelude::*;

/// Состояние контроллера врага (ровно одно за раз)
///
/// Patrol → Chase → Attack → (Chase | Patrol), любое → Dead.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub enum EnemyState {
    /// Патруль вдоль платформы
    Patrol {
        /// Some: стоим у края/стены и ждём разворота (секунды до разворота)
        wait_timer: Option<f32>,
    },

    /// Погоня за целью
    Chase {
        target: Entity,
        /// Последняя позиция цели, которую видели сенсоры
        last_seen: Vec2,
    },

    /// Атака в процессе (windup → active)
    Attack { target: Entity, last_seen: Vec2 },

    /// Терминальное состояние
    Dead,
}

impl Default for EnemyState {
    fn default() -> Self {
        Self::patrol()
    }
}

/// Discriminant of `EnemyState`, for events and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum EnemyStateKind {
    Patrol,
    Chase,
    Attack,
    Dead,
}

impl EnemyState {
    pub fn patrol() -> Self {
        Self::Patrol { wait_timer: None }
    }

    pub fn kind(&self) -> EnemyStateKind {
        match self {
            EnemyState::Patrol { .. } => EnemyStateKind::Patrol,
            EnemyState::Chase { .. } => EnemyStateKind::Chase,
            EnemyState::Attack { .. } => EnemyStateKind::Attack,
            EnemyState::Dead => EnemyStateKind::Dead,
        }
    }

    /// Chase or Attack.
    pub fn is_pursuing(&self) -> bool {
        matches!(self, EnemyState::Chase { .. } | EnemyState::Attack { .. })
    }

    pub fn is_dead(&self) -> bool {
        matches!(self, EnemyState::Dead)
    }

    pub fn target(&self) -> Option<Entity> {
        match self {
            EnemyState::Chase { target, .. } | EnemyState::Attack { target, .. } => Some(*target),
            _ => None,
        }
    }

    pub fn last_seen(&self) -> Option<Vec2> {
        match self {
            EnemyState::Chase { last_seen, .. } | EnemyState::Attack { last_seen, .. } => {
                Some(*last_seen)
            }
            _ => None,
        }
    }

    /// Update pursuit target in place (no state change). No-op outside pursuit.
    pub fn track(&mut self, new_target: Entity, position: Vec2) {
        if let EnemyState::Chase { target, last_seen } | EnemyState::Attack { target, last_seen } =
            self
        {
            *target = new_target;
            *last_seen = position;
        }
    }
}

/// Loss-hysteresis timer
///
/// Взводится когда цель пропала из сенсоров в Chase/Attack.
/// Истёк → Patrol. Цель снова видна до истечения → разведён без эффекта.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct LossTimer {
    pub armed: bool,
    /// Оставшийся grace (секунды)
    pub remaining: f32,
}

impl LossTimer {
    /// Arm with a full grace period. Returns false if it was already armed.
    pub fn arm(&mut self, grace: f32) -> bool {
        if self.armed {
            return false;
        }
        self.armed = true;
        self.remaining = grace;
        true
    }

    /// Disarm. Returns true if it was armed.
    pub fn disarm(&mut self) -> bool {
        let was_armed = self.armed;
        self.armed = false;
        self.remaining = 0.0;
        was_armed
    }

    /// Count down; returns true once the grace has run out.
    pub fn tick(&mut self, delta: f32) -> bool {
        if !self.armed {
            return false;
        }
        self.remaining = (self.remaining - delta).max(0.0);
        self.is_expired()
    }

    pub fn is_expired(&self) -> bool {
        self.armed && self.remaining <= 0.0
    }
}
