//! Combat system module
//!
//! ECS ответственность:
//! - Attack sequencing: cooldown, windup → active → end (TimerQueue)
//! - Hitbox toggling (пересечения считает внешний слой)
//! - Damage, death, деспавн трупа
//!
//! Внешний слой присылает `TakeDamage`, получает HealthChanged / DamageTaken /
//! EntityDied / HitboxToggled / AttackStarted / AttackFinished.

use bevy::prelude::*;

pub mod attack;
pub mod damage;
pub mod hitbox;
pub mod scheduler;

// Re-export основных типов
pub use attack::{
    abort_attack, resolve_attack_end, run_attack_callbacks, AttackCallback, AttackFinished, AttackPolicy,
    AttackStarted, AttackWindow,
};
pub use damage::{
    apply_damage, despawn_after_timeout, DamageTaken, Dead, DespawnAfter, EntityDied,
    HealthChanged, TakeDamage,
};
pub use hitbox::{set_hitbox, HitboxControl, HitboxToggled, MeleeHitbox};
pub use scheduler::{TimerHandle, TimerQueue};

use crate::EnemySet;

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. apply_damage, despawn_after_timeout: `EnemySet::Damage` (до сенсоров,
///    чтобы убитый в этом тике агент уже ничего не решал)
/// 2. run_attack_callbacks: `EnemySet::AttackTimers` (до FSM)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<TakeDamage>()
            .add_event::<HealthChanged>()
            .add_event::<DamageTaken>()
            .add_event::<EntityDied>()
            .add_event::<HitboxToggled>()
            .add_event::<AttackStarted>()
            .add_event::<AttackFinished>();

        // Регистрация систем в FixedUpdate
        app.add_systems(
            FixedUpdate,
            (
                (apply_damage, despawn_after_timeout)
                    .chain()
                    .in_set(EnemySet::Damage),
                run_attack_callbacks.in_set(EnemySet::AttackTimers),
            ),
        );
    }
}
