//! Patrol behavior: ходим до края/стены, ждём, разворачиваемся.

use bevy::prelude::*;

use crate::ai::components::EnemyState;
use crate::combat::Dead;
use crate::components::{Enemy, Facing, MoveIntent};
use crate::config::EnemyConfig;
use crate::sensors::{EdgeProbeState, SensorSnapshot};
use crate::DeterministicRng;

/// One patrol tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatrolStep {
    /// Идём в сторону facing
    Walk,
    /// Стоим (в воздухе или ждём)
    Halt,
    /// Упёрлись: стоп, начинаем ожидание
    StartWait,
    /// Ожидание закончилось: развернуться и идти дальше
    Reverse,
}

/// Чистая логика патруля.
///
/// В воздухе ожидание не начинается (край под ногами ещё не известен).
/// Один edge/wall-сигнал даёт ровно одно ожидание и один разворот: пока
/// `wait_timer` взведён, новые сигналы игнорируются.
pub fn patrol_step(
    wait_timer: &mut Option<f32>,
    snapshot: &SensorSnapshot,
    config: &EnemyConfig,
    delta: f32,
) -> PatrolStep {
    if let Some(remaining) = wait_timer {
        *remaining -= delta;
        if *remaining > 0.0 {
            return PatrolStep::Halt;
        }
        *wait_timer = None;
        return PatrolStep::Reverse;
    }

    if !snapshot.grounded {
        return PatrolStep::Halt;
    }

    if snapshot.blocked() {
        *wait_timer = Some(config.patrol_wait_time);
        return PatrolStep::StartWait;
    }

    PatrolStep::Walk
}

/// Система: patrol behavior
///
/// Patrol → MoveIntent. Разворот: flip facing, новый edge offset для следующего
/// отрезка, stale edge/wall-флаги сбрасываются.
pub fn patrol_behavior(
    time: Res<Time>,
    mut rng: ResMut<DeterministicRng>,
    mut agents: Query<
        (
            Entity,
            &EnemyConfig,
            &mut EnemyState,
            &mut Facing,
            &mut SensorSnapshot,
            &mut EdgeProbeState,
            &mut MoveIntent,
        ),
        (With<Enemy>, Without<Dead>),
    >,
) {
    let delta = time.delta_secs();

    for (entity, config, mut state, mut facing, mut snapshot, mut edge, mut intent) in
        agents.iter_mut()
    {
        let EnemyState::Patrol { wait_timer } = &mut *state else {
            continue;
        };

        let walk = match patrol_step(wait_timer, &snapshot, config, delta) {
            PatrolStep::Walk => true,
            PatrolStep::Halt => false,
            PatrolStep::StartWait => {
                crate::log(&format!(
                    "{:?} patrol: {} ahead, waiting {:.1}s",
                    entity,
                    if snapshot.edge_ahead { "edge" } else { "wall" },
                    config.patrol_wait_time
                ));
                false
            }
            PatrolStep::Reverse => {
                *facing = facing.flipped();
                edge.redraw(&mut rng.rng, config);
                snapshot.clear_blocking();
                crate::log(&format!(
                    "{:?} patrol: turn {:?} (leg {}, offset {:.2})",
                    entity, *facing, edge.leg, edge.leg_offset
                ));
                true
            }
        };

        *intent = if walk {
            MoveIntent::Move {
                direction: facing.sign(),
                speed: config.patrol_speed,
            }
        } else {
            MoveIntent::Halt
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded() -> SensorSnapshot {
        SensorSnapshot {
            grounded: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_walks_on_clear_ground() {
        let config = EnemyConfig::grunt();
        let mut wait = None;
        assert_eq!(patrol_step(&mut wait, &grounded(), &config, 0.1), PatrolStep::Walk);
        assert_eq!(wait, None);
    }

    #[test]
    fn test_airborne_never_starts_wait() {
        let config = EnemyConfig::grunt();
        let mut wait = None;
        let falling = SensorSnapshot {
            grounded: false,
            edge_ahead: true,
            ..Default::default()
        };
        assert_eq!(patrol_step(&mut wait, &falling, &config, 0.1), PatrolStep::Halt);
        assert_eq!(wait, None);
    }

    #[test]
    fn test_one_edge_signal_one_reversal() {
        let config = EnemyConfig {
            patrol_wait_time: 1.0,
            ..EnemyConfig::grunt()
        };
        let at_edge = SensorSnapshot {
            edge_ahead: true,
            ..grounded()
        };
        let mut wait = None;

        assert_eq!(patrol_step(&mut wait, &at_edge, &config, 0.25), PatrolStep::StartWait);

        // Stale snapshot всё ещё говорит "край": ждём, без новых ожиданий
        let mut reversals = 0;
        for _ in 0..4 {
            if patrol_step(&mut wait, &at_edge, &config, 0.25) == PatrolStep::Reverse {
                reversals += 1;
            }
        }
        assert_eq!(reversals, 1);
        assert_eq!(wait, None);
    }

    #[test]
    fn test_wait_lasts_configured_time() {
        let config = EnemyConfig {
            patrol_wait_time: 0.5,
            ..EnemyConfig::grunt()
        };
        let at_wall = SensorSnapshot {
            wall_ahead: true,
            ..grounded()
        };
        let mut wait = None;
        patrol_step(&mut wait, &at_wall, &config, 0.25);

        assert_eq!(patrol_step(&mut wait, &at_wall, &config, 0.25), PatrolStep::Halt);
        assert_eq!(patrol_step(&mut wait, &at_wall, &config, 0.25), PatrolStep::Reverse);
    }

    #[test]
    fn test_zero_wait_reverses_next_tick() {
        let config = EnemyConfig {
            patrol_wait_time: 0.0,
            ..EnemyConfig::grunt()
        };
        let at_edge = SensorSnapshot {
            edge_ahead: true,
            ..grounded()
        };
        let mut wait = None;
        assert_eq!(patrol_step(&mut wait, &at_edge, &config, 0.1), PatrolStep::StartWait);
        assert_eq!(patrol_step(&mut wait, &at_edge, &config, 0.1), PatrolStep::Reverse);
    }
}
