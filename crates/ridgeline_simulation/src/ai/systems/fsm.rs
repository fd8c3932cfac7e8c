//! FSM AI systems (detection-driven transitions, loss hysteresis).

use bevy::prelude::*;

use crate::ai::components::{EnemyState, LossTimer};
use crate::ai::events::{transition, EnemyStateChanged};
use crate::animation::{fire_trigger, AnimationIntents, AnimationTrigger};
use crate::collaborators::MissingCollaborators;
use crate::combat::Dead;
use crate::components::Enemy;
use crate::config::EnemyConfig;
use crate::sensors::{DetectionResult, SensorSnapshot};

/// What one tick of detection means for the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetectionStep {
    /// Ничего не меняется
    Hold,
    /// Patrol увидел цель → Chase
    Engage(DetectionResult),
    /// Цель в Chase/Attack видна: обновить target/last_seen, развести loss-таймер
    Track(DetectionResult),
    /// Цель пропала: loss-таймер только что взведён
    LossArmed,
    /// Loss-таймер истёк в Chase → Patrol
    GiveUp,
}

/// Чистая логика переходов по детекции.
///
/// Истечение loss-таймера во время Attack не прерывает атаку: исход решает
/// EndAttack (см. combat).
pub fn detection_step(
    state: &EnemyState,
    loss: &mut LossTimer,
    detected: Option<DetectionResult>,
    config: &EnemyConfig,
    delta: f32,
) -> DetectionStep {
    match (state, detected) {
        (EnemyState::Dead, _) => DetectionStep::Hold,
        (EnemyState::Patrol { .. }, Some(found)) => {
            loss.disarm();
            DetectionStep::Engage(found)
        }
        (EnemyState::Patrol { .. }, None) => DetectionStep::Hold,
        (_, Some(found)) => {
            loss.disarm();
            DetectionStep::Track(found)
        }
        (_, None) => {
            if loss.arm(config.loss_grace) {
                return DetectionStep::LossArmed;
            }
            if loss.tick(delta) && matches!(state, EnemyState::Chase { .. }) {
                DetectionStep::GiveUp
            } else {
                DetectionStep::Hold
            }
        }
    }
}

/// Система: AI FSM transitions
///
/// Читает (возможно устаревший) SensorSnapshot:
/// - Patrol + цель → Chase (+ Alert trigger)
/// - Chase/Attack + цель → refresh target/last_seen, разводим loss-таймер
/// - Chase/Attack без цели → взводим loss-таймер; Chase + истёк → Patrol
pub fn enemy_fsm_transitions(
    time: Res<Time>,
    mut agents: Query<
        (
            Entity,
            &EnemyConfig,
            &SensorSnapshot,
            &mut EnemyState,
            &mut LossTimer,
            Option<&mut AnimationIntents>,
        ),
        (With<Enemy>, Without<Dead>),
    >,
    mut state_events: EventWriter<EnemyStateChanged>,
    mut missing: ResMut<MissingCollaborators>,
) {
    let delta = time.delta_secs();

    for (entity, config, snapshot, mut state, mut loss, mut sink) in agents.iter_mut() {
        match detection_step(&state, &mut loss, snapshot.target, config, delta) {
            DetectionStep::Hold => {}
            DetectionStep::Engage(found) => {
                crate::log(&format!(
                    "👁️ {:?} spotted {:?} at {:.2}m",
                    entity, found.target, found.distance
                ));
                transition(
                    entity,
                    &mut state,
                    EnemyState::Chase {
                        target: found.target,
                        last_seen: found.position,
                    },
                    &mut state_events,
                );
                fire_trigger(entity, sink.as_deref_mut(), AnimationTrigger::Alert, &mut missing);
            }
            DetectionStep::Track(found) => {
                state.track(found.target, found.position);
            }
            DetectionStep::LossArmed => {
                crate::log(&format!(
                    "👻 {:?} lost target, grace {:.1}s",
                    entity, config.loss_grace
                ));
            }
            DetectionStep::GiveUp => {
                loss.disarm();
                transition(entity, &mut state, EnemyState::patrol(), &mut state_events);
            }
        }
    }
}
