//! Animation intents: что презентационный слой должен проиграть.
//!
//! Симуляция ничего не рисует. Она выставляет флаги (IsMoving, IsGrounded,
//! IsChasing, IsAttacking, VerticalVelocity) и одноразовые триггеры
//! (Alert, Attack, Hit, Death). Триггеры живут один fixed тик: очередь
//! очищается в начале следующего. Потребитель читает их после тика или
//! забирает раньше через `AnimationIntents::take_triggers`.

use bevy::prelude::*;

use crate::ai::EnemyState;
use crate::collaborators::{Collaborator, MissingCollaborators};
use crate::combat::{apply_damage, AttackWindow};
use crate::components::{Enemy, Grounded, Velocity};
use crate::EnemySet;

/// Ниже этой скорости агент считается стоящим
const MOVING_EPSILON: f32 = 1e-3;

/// One-shot animation triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AnimationTrigger {
    /// Patrol → Chase
    Alert,
    Attack,
    Hit,
    Death,
}

/// Animation sink component
///
/// Optional: агент без него работает, warning пишется один раз.
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AnimationIntents {
    pub is_moving: bool,
    pub is_grounded: bool,
    pub is_chasing: bool,
    pub is_attacking: bool,
    pub vertical_velocity: f32,
    /// One-shot triggers fired this tick, oldest first
    pub triggers: Vec<AnimationTrigger>,
}

impl AnimationIntents {
    pub fn trigger(&mut self, trigger: AnimationTrigger) {
        self.triggers.push(trigger);
    }

    /// Drain pending triggers (consumer side).
    pub fn take_triggers(&mut self) -> Vec<AnimationTrigger> {
        std::mem::take(&mut self.triggers)
    }

    pub fn has_pending(&self, trigger: AnimationTrigger) -> bool {
        self.triggers.contains(&trigger)
    }
}

/// Fire a one-shot trigger; a missing sink is reported once and skipped.
pub fn fire_trigger(
    entity: Entity,
    sink: Option<&mut AnimationIntents>,
    trigger: AnimationTrigger,
    missing: &mut MissingCollaborators,
) {
    match sink {
        Some(intents) => intents.trigger(trigger),
        None => {
            missing.warn_once(entity, Collaborator::AnimationSink);
        }
    }
}

/// Система: сбросить триггеры прошлого тика
pub fn clear_animation_triggers(mut sinks: Query<&mut AnimationIntents, With<Enemy>>) {
    for mut intents in sinks.iter_mut() {
        if !intents.triggers.is_empty() {
            intents.triggers.clear();
        }
    }
}

/// Система: выставить animation-флаги по итогам тика
///
/// Выполняется после движения (`EnemySet::Emit`), поэтому IsMoving отражает
/// фактическую скорость, а не намерение.
pub fn emit_animation_intents(
    mut agents: Query<
        (
            Entity,
            &EnemyState,
            &Velocity,
            &Grounded,
            &AttackWindow,
            Option<&mut AnimationIntents>,
        ),
        With<Enemy>,
    >,
    mut missing: ResMut<MissingCollaborators>,
) {
    for (entity, state, velocity, grounded, window, sink) in agents.iter_mut() {
        let Some(mut intents) = sink else {
            missing.warn_once(entity, Collaborator::AnimationSink);
            continue;
        };

        if state.is_dead() {
            // Труп: только Death-триггер (уже в очереди), флаги гасим
            intents.is_moving = false;
            intents.is_chasing = false;
            intents.is_attacking = false;
            intents.vertical_velocity = 0.0;
            continue;
        }

        intents.is_moving = velocity.linear.x.abs() > MOVING_EPSILON;
        intents.is_grounded = grounded.0;
        intents.is_chasing = matches!(state, EnemyState::Chase { .. });
        intents.is_attacking = window.is_attacking;
        intents.vertical_velocity = velocity.linear.y;
    }
}

/// Animation Plugin
pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MissingCollaborators>().add_systems(
            FixedUpdate,
            (
                clear_animation_triggers
                    .in_set(EnemySet::Damage)
                    .before(apply_damage),
                emit_animation_intents.in_set(EnemySet::Emit),
            ),
        );
    }
}
