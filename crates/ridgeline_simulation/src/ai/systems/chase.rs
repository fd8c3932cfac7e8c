//! Chase behavior: сближение, блок на краю/стене, вход в атаку.

use bevy::prelude::*;

use crate::ai::components::EnemyState;
use crate::ai::events::{transition, EnemyStateChanged};
use crate::animation::{fire_trigger, AnimationIntents, AnimationTrigger};
use crate::collaborators::MissingCollaborators;
use crate::combat::{AttackStarted, AttackWindow, Dead};
use crate::components::{Body, Enemy, Facing, MoveIntent};
use crate::config::EnemyConfig;
use crate::sensors::{angle_to_facing, probe_path, DetectionResult, PathThresholds, SensorSnapshot};
use crate::world::{Terrain, TerrainQuery};
use crate::DeterministicRng;

/// Facing with a dead zone: flips only when |dx| exceeds `dead_zone`.
pub fn resolve_facing(current: Facing, dx: f32, dead_zone: f32) -> Facing {
    if dx.abs() <= dead_zone {
        return current;
    }
    Facing::from_sign(dx).unwrap_or(current)
}

/// One chase tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChaseStep {
    /// Цель в attack_range: стоим, пробуем атаковать
    Engage(DetectionResult),
    /// Стоим (dead zone по X, или край/стена впереди)
    Halt,
    Pursue { direction: f32 },
}

/// Чистая логика погони.
///
/// `sensed`: свежая детекция (None пока тикает loss-таймер, тогда идём к
/// last_seen). Путь проверяется по требованию с chase-порогами, потому что
/// snapshot меряет только в сторону facing и может быть устаревшим.
pub fn chase_step(
    terrain: &impl TerrainQuery,
    feet: Vec2,
    body: &Body,
    sensed: Option<DetectionResult>,
    last_seen: Vec2,
    config: &EnemyConfig,
) -> ChaseStep {
    if let Some(found) = sensed {
        if found.distance <= config.attack_range {
            return ChaseStep::Engage(found);
        }
    }

    let goal = sensed.map_or(last_seen, |found| found.position);
    let dx = goal.x - feet.x;
    if dx.abs() <= config.facing_dead_zone {
        return ChaseStep::Halt;
    }

    let direction = dx.signum();
    let path = probe_path(
        terrain,
        feet,
        body,
        direction,
        PathThresholds::chase(config),
        config,
    );
    if path.blocked() {
        return ChaseStep::Halt;
    }

    ChaseStep::Pursue { direction }
}

/// Система: chase behavior
///
/// Chase → MoveIntent / TryAttack. Facing поворачивается только за пределами
/// dead zone, у края/стены агент стоит и держит facing.
pub fn chase_behavior(
    time: Res<Time>,
    terrain: Res<Terrain>,
    mut rng: ResMut<DeterministicRng>,
    mut agents: Query<
        (
            Entity,
            &Transform,
            &Body,
            &EnemyConfig,
            &SensorSnapshot,
            &mut EnemyState,
            &mut Facing,
            &mut AttackWindow,
            &mut MoveIntent,
            Option<&mut AnimationIntents>,
        ),
        (With<Enemy>, Without<Dead>),
    >,
    mut state_events: EventWriter<EnemyStateChanged>,
    mut attack_events: EventWriter<AttackStarted>,
    mut missing: ResMut<MissingCollaborators>,
) {
    let now = time.elapsed_secs();

    for (
        entity,
        transform,
        body,
        config,
        snapshot,
        mut state,
        mut facing,
        mut window,
        mut intent,
        mut sink,
    ) in agents.iter_mut()
    {
        let EnemyState::Chase { last_seen, .. } = *state else {
            continue;
        };
        let feet = transform.translation.truncate();

        match chase_step(&*terrain, feet, body, snapshot.target, last_seen, config) {
            ChaseStep::Halt => {
                *intent = MoveIntent::Halt;
            }
            ChaseStep::Pursue { direction } => {
                *intent = MoveIntent::Move {
                    direction,
                    speed: config.chase_speed,
                };
                *facing = resolve_facing(*facing, direction, 0.0);
            }
            ChaseStep::Engage(found) => {
                *intent = MoveIntent::Halt;
                *facing = resolve_facing(*facing, found.position.x - feet.x, config.facing_dead_zone);

                // Угол пересчитываем после поворота
                let angle = angle_to_facing(*facing, found.position - feet);
                if !config.attack_policy.allows(angle, config) {
                    continue;
                }
                if !window.try_attack(now, &mut rng.rng, config) {
                    continue;
                }

                crate::log(&format!(
                    "⚔️ {:?} attacks {:?} (windup {:.2}s, next cooldown {:.2}s)",
                    entity, found.target, window.windup, window.cooldown
                ));
                transition(
                    entity,
                    &mut state,
                    EnemyState::Attack {
                        target: found.target,
                        last_seen: found.position,
                    },
                    &mut state_events,
                );
                attack_events.write(AttackStarted {
                    attacker: entity,
                    target: found.target,
                });
                fire_trigger(entity, sink.as_deref_mut(), AnimationTrigger::Attack, &mut missing);
            }
        }
    }
}
