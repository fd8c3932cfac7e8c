//! Movement Actuator + kinematic integrator.
//!
//! Архитектура:
//! - AI пишет MoveIntent
//! - Actuator: MoveIntent → горизонтальная скорость (вертикальную не трогает)
//! - Интегратор: гравитация, стены, приземление, Grounded
//!
//! Детерминизм: fixed timestep (60Hz), без случайности.

use bevy::prelude::*;

use crate::ai::EnemyState;
use crate::combat::{AttackWindow, Dead};
use crate::components::{Body, Collider, Enemy, Grounded, MoveIntent, Velocity};
use crate::config::EnemyConfig;
use crate::world::{Terrain, TerrainQuery};

/// Насколько выше ног ищем опору (ступенька в пределах этой высоты: подъём)
pub const STEP_HEIGHT: f32 = 0.2;

/// Допуск прилипания к земле при ходьбе
pub const GROUND_SNAP: f32 = 0.02;

/// Horizontal velocity for an intent. Во время атаки агент всегда стоит.
pub fn drive(velocity: &mut Velocity, intent: MoveIntent, attacking: bool) {
    velocity.linear.x = match intent {
        MoveIntent::Move { direction, speed } if !attacking => direction * speed,
        _ => 0.0,
    };
}

/// Result of one integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicStep {
    pub feet: Vec2,
    pub velocity: Vec2,
    pub grounded: bool,
}

/// Один шаг kinematic интеграции.
///
/// Без коллайдера тело проходит сквозь террейн (только гравитация).
pub fn step_body(
    terrain: &impl TerrainQuery,
    feet: Vec2,
    velocity: Vec2,
    grounded: bool,
    body: &Body,
    collide: bool,
    gravity: f32,
    delta: f32,
) -> KinematicStep {
    let mut feet = feet;
    let mut velocity = velocity;

    if grounded {
        velocity.y = velocity.y.max(0.0);
    } else {
        velocity.y += gravity * delta;
    }

    if !collide {
        feet += velocity * delta;
        return KinematicStep {
            feet,
            velocity,
            grounded: false,
        };
    }

    // Горизонталь: упираемся в стену
    let dx = velocity.x * delta;
    if dx != 0.0 {
        let direction = dx.signum();
        match terrain.cast_horizontal(body.center(feet), direction, body.half_width + dx.abs()) {
            Some(hit) => {
                feet.x += direction * (hit - body.half_width).max(0.0);
                velocity.x = 0.0;
            }
            None => feet.x += dx,
        }
    }

    // Вертикаль: падение с приземлением или прилипание к земле
    let dy = velocity.y * delta;
    let mut landed = false;
    if dy < 0.0 {
        let lift = Vec2::new(0.0, STEP_HEIGHT);
        match terrain.cast_down(feet + lift, STEP_HEIGHT - dy) {
            Some(top) => {
                feet.y = top;
                velocity.y = 0.0;
                landed = true;
            }
            None => feet.y += dy,
        }
    } else {
        feet.y += dy;
        if velocity.y <= 0.0 {
            let lift = Vec2::new(0.0, STEP_HEIGHT);
            if let Some(top) = terrain.cast_down(feet + lift, STEP_HEIGHT + GROUND_SNAP) {
                feet.y = top;
                landed = true;
            }
        }
    }

    KinematicStep {
        feet,
        velocity,
        grounded: landed,
    }
}

/// Система: MoveIntent → Velocity.x
pub fn apply_move_intents(
    mut agents: Query<(&MoveIntent, &AttackWindow, &mut Velocity), (With<Enemy>, Without<Dead>)>,
) {
    for (intent, window, mut velocity) in agents.iter_mut() {
        drive(&mut velocity, *intent, window.is_attacking);
    }
}

/// Система интеграции velocity → Transform
///
/// Мёртвые тела заморожены.
pub fn integrate_kinematics(
    time: Res<Time>,
    terrain: Res<Terrain>,
    mut bodies: Query<
        (
            &EnemyState,
            &Body,
            &Collider,
            &EnemyConfig,
            &mut Transform,
            &mut Velocity,
            &mut Grounded,
        ),
        (With<Enemy>, Without<Dead>),
    >,
) {
    let delta = time.delta_secs();

    for (state, body, collider, config, mut transform, mut velocity, mut grounded) in
        bodies.iter_mut()
    {
        if state.is_dead() {
            continue;
        }

        let step = step_body(
            &*terrain,
            transform.translation.truncate(),
            velocity.linear,
            grounded.0,
            body,
            collider.enabled,
            config.gravity,
            delta,
        );

        transform.translation.x = step.feet.x;
        transform.translation.y = step.feet.y;
        velocity.linear = step.velocity;
        grounded.0 = step.grounded;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Solid;

    const DT: f32 = 1.0 / 60.0;

    fn floor() -> Terrain {
        Terrain::new(vec![Solid::platform(-10.0, 3.0, 0.0, 1.0)])
    }

    #[test]
    fn test_drive_preserves_vertical_velocity() {
        let mut velocity = Velocity {
            linear: Vec2::new(0.0, -3.0),
        };
        drive(&mut velocity, MoveIntent::Move { direction: -1.0, speed: 2.0 }, false);
        assert_eq!(velocity.linear, Vec2::new(-2.0, -3.0));

        drive(&mut velocity, MoveIntent::Halt, false);
        assert_eq!(velocity.linear, Vec2::new(0.0, -3.0));
    }

    #[test]
    fn test_attacking_agent_cannot_move() {
        let mut velocity = Velocity::default();
        drive(&mut velocity, MoveIntent::Move { direction: 1.0, speed: 2.0 }, true);
        assert_eq!(velocity.linear.x, 0.0);
    }

    #[test]
    fn test_lands_on_floor() {
        let terrain = floor();
        let mut feet = Vec2::new(0.0, 1.0);
        let mut velocity = Vec2::ZERO;
        let mut grounded = false;

        for _ in 0..120 {
            let step = step_body(&terrain, feet, velocity, grounded, &Body::default(), true, -20.0, DT);
            feet = step.feet;
            velocity = step.velocity;
            grounded = step.grounded;
        }

        assert!(grounded);
        assert_eq!(feet.y, 0.0);
        assert_eq!(velocity.y, 0.0);
    }

    #[test]
    fn test_walks_off_ledge_and_falls() {
        let terrain = floor();
        let mut feet = Vec2::new(2.99, 0.0);
        let mut grounded = true;
        let mut velocity = Vec2::new(1.0, 0.0);

        for _ in 0..30 {
            let step = step_body(&terrain, feet, velocity, grounded, &Body::default(), true, -20.0, DT);
            feet = step.feet;
            velocity = step.velocity;
            grounded = step.grounded;
        }

        assert!(!grounded);
        assert!(feet.y < 0.0);
    }

    #[test]
    fn test_wall_stops_horizontal_motion() {
        let terrain = floor().with(Solid::new(Vec2::new(1.0, -1.0), Vec2::new(2.0, 3.0)));
        let body = Body::default();
        let mut feet = Vec2::new(0.0, 0.0);
        let mut velocity = Vec2::new(3.0, 0.0);

        for _ in 0..60 {
            let step = step_body(&terrain, feet, Vec2::new(3.0, velocity.y), true, &body, true, -20.0, DT);
            feet = step.feet;
            velocity = step.velocity;
        }

        assert!(feet.x <= 1.0 - body.half_width + 1e-4);
        assert!(feet.x > 0.5);
        assert_eq!(velocity.x, 0.0);
    }

    #[test]
    fn test_disabled_collider_passes_through() {
        let terrain = floor();
        let step = step_body(&terrain, Vec2::ZERO, Vec2::ZERO, false, &Body::default(), false, -20.0, DT);
        assert!(step.feet.y < 0.0);
        assert!(!step.grounded);
    }

    #[test]
    fn test_small_step_up_is_climbed() {
        let terrain = Terrain::new(vec![
            Solid::platform(-5.0, 0.0, 0.0, 1.0),
            Solid::platform(0.0, 5.0, 0.1, 1.0),
        ]);
        let step = step_body(&terrain, Vec2::new(-0.01, 0.0), Vec2::new(1.0, 0.0), true, &Body::default(), true, -20.0, DT);
        assert!(step.grounded);
        assert!((step.feet.y - 0.1).abs() < 1e-6);
    }
}
