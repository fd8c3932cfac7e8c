//! Attack Sequencer: cooldown + windup → active → end.
//!
//! TryAttack стартует атаку только если предыдущая закончилась и cooldown
//! (отсчитывается от начала прошлой атаки) прошёл. Cooldown перерандомизируется
//! в [cooldown_min, cooldown_max] при каждом старте.
//!
//! Таймлайн одной атаки (t0 = старт):
//! ```text
//! t0 ── windup ──► ActivateHitbox ── active ──► EndAttack
//! ```

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ai::{transition, EnemyState, EnemyStateChanged, EnemyStateKind, LossTimer};
use crate::collaborators::MissingCollaborators;
use crate::combat::hitbox::{set_hitbox, HitboxControl, HitboxToggled, MeleeHitbox};
use crate::combat::scheduler::{TimerHandle, TimerQueue};
use crate::components::Enemy;
use crate::config::EnemyConfig;
use crate::sensors::SensorSnapshot;

/// When a target in range may be attacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect)]
pub enum AttackPolicy {
    /// Target must be inside the attack arc (cone_half_angle × attack_arc_fraction)
    #[default]
    Directional,
    /// Any target in range
    Omnidirectional,
}

impl AttackPolicy {
    /// Is a target at `angle` (degrees off facing) attackable?
    pub fn allows(self, angle: f32, config: &EnemyConfig) -> bool {
        match self {
            AttackPolicy::Directional => angle <= config.attack_half_angle(),
            AttackPolicy::Omnidirectional => true,
        }
    }
}

/// Scheduled attack-phase callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackCallback {
    ActivateHitbox,
    EndAttack,
}

/// Attack window state (per agent)
#[derive(Component, Debug, Clone)]
pub struct AttackWindow {
    /// Время старта последней атаки (None: ещё не атаковал)
    pub last_attack_time: Option<f32>,
    /// Текущий cooldown (перерандомизируется при старте атаки)
    pub cooldown: f32,
    pub windup: f32,
    pub active: f32,
    pub is_attacking: bool,
    pub attack_count: u32,
    pub timers: TimerQueue<AttackCallback>,
    /// Handles текущей атаки (None: callback уже сработал или отменён)
    pub hitbox_timer: Option<TimerHandle>,
    pub end_timer: Option<TimerHandle>,
}

impl Default for AttackWindow {
    fn default() -> Self {
        Self::new(&EnemyConfig::default())
    }
}

impl AttackWindow {
    pub fn new(config: &EnemyConfig) -> Self {
        Self {
            last_attack_time: None,
            cooldown: config.cooldown_min,
            windup: config.windup_duration,
            active: config.active_duration,
            is_attacking: false,
            attack_count: 0,
            timers: TimerQueue::new(),
            hitbox_timer: None,
            end_timer: None,
        }
    }

    pub fn cooldown_ready(&self, now: f32) -> bool {
        self.last_attack_time
            .map_or(true, |started| now - started >= self.cooldown)
    }

    pub fn can_attack(&self, now: f32) -> bool {
        !self.is_attacking && self.cooldown_ready(now)
    }

    /// TryAttack: start an attack if allowed. Returns true if it started.
    pub fn try_attack(&mut self, now: f32, rng: &mut impl Rng, config: &EnemyConfig) -> bool {
        if !self.can_attack(now) {
            return false;
        }

        self.cooldown = if config.cooldown_max > config.cooldown_min {
            rng.gen_range(config.cooldown_min..=config.cooldown_max)
        } else {
            config.cooldown_min
        };
        self.windup = config.windup_duration;
        self.active = config.active_duration;
        self.last_attack_time = Some(now);
        self.is_attacking = true;
        self.attack_count += 1;

        self.hitbox_timer = Some(
            self.timers
                .schedule(now + self.windup, AttackCallback::ActivateHitbox),
        );
        self.end_timer = Some(
            self.timers
                .schedule(now + self.windup + self.active, AttackCallback::EndAttack),
        );
        true
    }

    /// Is any callback due at `now`?
    pub fn has_due(&self, now: f32) -> bool {
        self.timers.next_due().is_some_and(|at| at <= now)
    }

    /// Callbacks due at `now`, in firing order.
    pub fn due_callbacks(&mut self, now: f32) -> Vec<AttackCallback> {
        let due = self.timers.drain_due(now);
        for callback in &due {
            match callback {
                AttackCallback::ActivateHitbox => self.hitbox_timer = None,
                AttackCallback::EndAttack => self.end_timer = None,
            }
        }
        due
    }

    /// EndAttack bookkeeping: attack is over, cooldown keeps running.
    pub fn finish(&mut self) {
        self.is_attacking = false;
    }

    /// Abort the current attack (death): drop pending callbacks.
    ///
    /// Returns the number of cancelled callbacks.
    pub fn cancel(&mut self) -> usize {
        self.is_attacking = false;
        [self.hitbox_timer.take(), self.end_timer.take()]
            .into_iter()
            .flatten()
            .filter(|handle| self.timers.cancel(*handle))
            .count()
    }
}

/// Abort the attack in flight (death): drop pending callbacks and switch a
/// live hitbox off. Returns the number of cancelled callbacks.
pub fn abort_attack(
    attacker: Entity,
    window: &mut AttackWindow,
    hitbox: Option<&mut impl HitboxControl>,
    events: &mut EventWriter<HitboxToggled>,
    missing: &mut MissingCollaborators,
) -> usize {
    let cancelled = window.cancel();
    set_hitbox(attacker, hitbox, false, events, missing);
    cancelled
}

/// Атака началась (TryAttack успешен)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackStarted {
    pub attacker: Entity,
    pub target: Entity,
}

/// Атака закончилась (EndAttack), `next`: куда ушёл контроллер
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackFinished {
    pub attacker: Entity,
    pub next: EnemyStateKind,
}

/// State after EndAttack: back to Chase if the target is still sensed within
/// detection radius, otherwise Patrol.
pub fn resolve_attack_end(snapshot: &SensorSnapshot, config: &EnemyConfig) -> EnemyState {
    match snapshot.target {
        Some(found) if found.distance <= config.detection_radius => EnemyState::Chase {
            target: found.target,
            last_seen: found.position,
        },
        _ => EnemyState::patrol(),
    }
}

/// Система: attack phase callbacks
///
/// Выполняет созревшие ActivateHitbox / EndAttack. У мёртвых агентов
/// callbacks выбрасываются без эффекта.
pub fn run_attack_callbacks(
    time: Res<Time>,
    mut agents: Query<
        (
            Entity,
            &EnemyConfig,
            &SensorSnapshot,
            &mut EnemyState,
            &mut AttackWindow,
            &mut LossTimer,
            Option<&mut MeleeHitbox>,
        ),
        With<Enemy>,
    >,
    mut hitbox_events: EventWriter<HitboxToggled>,
    mut finished_events: EventWriter<AttackFinished>,
    mut state_events: EventWriter<EnemyStateChanged>,
    mut missing: ResMut<MissingCollaborators>,
) {
    let now = time.elapsed_secs();

    for (entity, config, snapshot, mut state, mut window, mut loss, mut hitbox) in
        agents.iter_mut()
    {
        if !window.has_due(now) {
            continue;
        }

        for callback in window.due_callbacks(now) {
            if state.is_dead() {
                crate::log(&format!("{:?}: {:?} skipped (dead)", entity, callback));
                continue;
            }

            match callback {
                AttackCallback::ActivateHitbox => {
                    set_hitbox(entity, hitbox.as_deref_mut(), true, &mut hitbox_events, &mut missing);
                }
                AttackCallback::EndAttack => {
                    set_hitbox(entity, hitbox.as_deref_mut(), false, &mut hitbox_events, &mut missing);
                    window.finish();

                    if !matches!(*state, EnemyState::Attack { .. }) {
                        continue;
                    }

                    let next = resolve_attack_end(snapshot, config);
                    if !next.is_pursuing() {
                        loss.disarm();
                    }
                    let next_kind = next.kind();
                    transition(entity, &mut state, next, &mut state_events);
                    finished_events.write(AttackFinished {
                        attacker: entity,
                        next: next_kind,
                    });
                }
            }
        }
    }
}
