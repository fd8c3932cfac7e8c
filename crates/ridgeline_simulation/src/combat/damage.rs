//! Damage & death
//!
//! TakeDamage → Health → HealthChanged/DamageTaken (+ Hit trigger).
//! Health дошёл до 0 → Dead: отмена атаки и loss-таймера, стоп, коллайдер
//! выключен, Death trigger, деспавн через `death_removal_delay`.

use bevy::prelude::*;

use crate::ai::{transition, EnemyState, EnemyStateChanged, LossTimer};
use crate::animation::{fire_trigger, AnimationIntents, AnimationTrigger};
use crate::collaborators::MissingCollaborators;
use crate::combat::attack::{abort_attack, AttackWindow};
use crate::combat::hitbox::{HitboxToggled, MeleeHitbox};
use crate::components::{Collider, Enemy, Health, HealthChange, MoveIntent, Velocity};
use crate::config::EnemyConfig;

/// Входящий урон (от внешнего слоя: hitbox игрока, ловушки)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TakeDamage {
    pub target: Entity,
    pub amount: u32,
    pub source: Option<Entity>,
}

/// Health изменился (после урона)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthChanged {
    pub entity: Entity,
    pub current: u32,
    pub max: u32,
}

/// Урон принят (агент был жив)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageTaken {
    pub entity: Entity,
    pub amount: u32,
    pub source: Option<Entity>,
}

/// Событие: entity умер (health == 0)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: entity мертв (Health == 0)
///
/// Мёртвые агенты выпадают из сенсоров, FSM и движения.
#[derive(Component, Debug)]
pub struct Dead;

/// Компонент: деспавн entity после определённого времени
#[derive(Component, Debug)]
pub struct DespawnAfter {
    /// Время деспавна (в секундах от старта симуляции)
    pub despawn_time: f32,
}

/// Система: apply damage от TakeDamage событий
///
/// Урон по мёртвому агенту: no-op (без событий).
pub fn apply_damage(
    time: Res<Time>,
    mut commands: Commands,
    mut damage_events: EventReader<TakeDamage>,
    mut agents: Query<
        (
            &EnemyConfig,
            &mut Health,
            &mut EnemyState,
            &mut AttackWindow,
            &mut LossTimer,
            &mut Velocity,
            &mut MoveIntent,
            &mut Collider,
            Option<&mut MeleeHitbox>,
            Option<&mut AnimationIntents>,
        ),
        With<Enemy>,
    >,
    mut health_events: EventWriter<HealthChanged>,
    mut taken_events: EventWriter<DamageTaken>,
    mut died_events: EventWriter<EntityDied>,
    mut hitbox_events: EventWriter<HitboxToggled>,
    mut state_events: EventWriter<EnemyStateChanged>,
    mut missing: ResMut<MissingCollaborators>,
) {
    let now = time.elapsed_secs();

    for event in damage_events.read() {
        let Ok((
            config,
            mut health,
            mut state,
            mut window,
            mut loss,
            mut velocity,
            mut intent,
            mut collider,
            mut hitbox,
            mut sink,
        )) = agents.get_mut(event.target)
        else {
            crate::log_warning(&format!(
                "TakeDamage: target {:?} is not a live enemy agent",
                event.target
            ));
            continue;
        };

        if state.is_dead() {
            continue;
        }

        let change = health.take_damage(event.amount);
        let (current, max) = match change {
            HealthChange::Ignored => continue,
            HealthChange::Damaged { current, max } => (current, max),
            HealthChange::Died { max } => (0, max),
        };

        health_events.write(HealthChanged {
            entity: event.target,
            current,
            max,
        });
        taken_events.write(DamageTaken {
            entity: event.target,
            amount: event.amount,
            source: event.source,
        });

        if !matches!(change, HealthChange::Died { .. }) {
            fire_trigger(event.target, sink.as_deref_mut(), AnimationTrigger::Hit, &mut missing);
            continue;
        }

        // Смерть: всё, что тикает, отменяем
        let cancelled = abort_attack(
            event.target,
            &mut window,
            hitbox.as_deref_mut(),
            &mut hitbox_events,
            &mut missing,
        );
        loss.disarm();
        velocity.linear = Vec2::ZERO;
        *intent = MoveIntent::Halt;
        collider.enabled = false;

        transition(event.target, &mut state, EnemyState::Dead, &mut state_events);
        fire_trigger(event.target, sink.as_deref_mut(), AnimationTrigger::Death, &mut missing);

        commands.entity(event.target).insert((
            Dead,
            DespawnAfter {
                despawn_time: now + config.death_removal_delay,
            },
        ));
        died_events.write(EntityDied {
            entity: event.target,
            killer: event.source,
        });

        crate::log_info(&format!(
            "💀 {:?} killed by {:?} ({} pending callbacks cancelled)",
            event.target, event.source, cancelled
        ));
    }
}

/// Система: деспавн entities с истёкшим DespawnAfter timeout
pub fn despawn_after_timeout(
    mut commands: Commands,
    query: Query<(Entity, &DespawnAfter)>,
    time: Res<Time>,
    mut missing: ResMut<MissingCollaborators>,
) {
    let current_time = time.elapsed_secs();

    for (entity, despawn_after) in query.iter() {
        if current_time >= despawn_after.despawn_time {
            crate::log(&format!("⚰️ Despawning entity {:?} (timeout)", entity));
            missing.forget(entity);
            commands.entity(entity).despawn();
        }
    }
}
