//! Patrol integration test
//!
//! Агент на платформе [-10, 3] идёт к краю, стоит patrol_wait_time,
//! разворачивается и идёт обратно. Стена работает так же, как край.

mod common;

use bevy::prelude::*;
use common::*;
use ridgeline_simulation::*;

fn ledge_config() -> EnemyConfig {
    EnemyConfig {
        patrol_speed: 1.0,
        patrol_wait_time: 2.0,
        edge_offset_min: 0.0,
        edge_offset_max: 0.0,
        ..EnemyConfig::grunt()
    }
}

fn is_waiting(app: &App, agent: Entity) -> bool {
    matches!(
        state(app, agent),
        EnemyState::Patrol {
            wait_timer: Some(_)
        }
    )
}

/// Test: стоп у края, ожидание 2s, разворот
#[test]
fn test_patrol_stops_at_ledge_waits_and_turns() {
    let mut app = enemy_app(42, Terrain::new(vec![Solid::platform(-10.0, 3.0, 0.0, 1.0)]));
    let agent = spawn(&mut app, Vec2::new(0.0, 0.0), Facing::Right, ledge_config());

    let stopped_at = run_until(&mut app, 6.0, |app| is_waiting(app, agent))
        .expect("agent should stop before the ledge");
    let stop_x = feet(&app, agent).x;
    assert!(stop_x > 2.6 && stop_x < 3.0, "stopped at x = {}", stop_x);
    assert_eq!(feet(&app, agent).y, 0.0);

    // Почти всё ожидание: стоим, смотрим вправо
    run_for(&mut app, 1.9);
    assert!(is_waiting(&app, agent));
    assert_eq!(facing(&app, agent), Facing::Right);
    assert!((feet(&app, agent).x - stop_x).abs() < 1e-4);

    let turned_at = run_until(&mut app, 1.0, |app| facing(app, agent) == Facing::Left)
        .expect("agent should turn around after waiting");
    assert!(
        (turned_at - stopped_at - 2.0).abs() < 0.05,
        "waited {}s",
        turned_at - stopped_at
    );

    // Идёт обратно
    run_for(&mut app, 1.0);
    assert_eq!(state(&app, agent), EnemyState::patrol());
    assert!(feet(&app, agent).x < stop_x - 0.5);

    let edge = component::<EdgeProbeState>(&app, agent);
    assert_eq!(edge.leg, 2); // Спавн + один разворот
}

/// Test: стена останавливает патруль так же, как край
#[test]
fn test_patrol_stops_at_wall() {
    let terrain = long_floor().with(Solid::new(Vec2::new(5.0, -1.0), Vec2::new(6.0, 3.0)));
    let mut app = enemy_app(7, terrain);
    let agent = spawn(&mut app, Vec2::new(2.0, 0.0), Facing::Right, ledge_config());

    run_until(&mut app, 6.0, |app| is_waiting(app, agent)).expect("agent should stop at the wall");
    let x = feet(&app, agent).x;
    let body = component::<Body>(&app, agent);
    assert!(x < 5.0 - body.half_width, "walked into the wall: x = {}", x);
    assert!(x > 3.5, "stopped too early: x = {}", x);
}

/// Test: один край → ровно один разворот
#[test]
fn test_single_edge_signal_gives_single_reversal() {
    let mut app = enemy_app(42, Terrain::new(vec![Solid::platform(-10.0, 3.0, 0.0, 1.0)]));
    let agent = spawn(&mut app, Vec2::new(1.5, 0.0), Facing::Right, ledge_config());

    run_until(&mut app, 5.0, |app| is_waiting(app, agent)).expect("agent should reach the ledge");
    run_for(&mut app, 3.0);

    assert_eq!(facing(&app, agent), Facing::Left);
    assert_eq!(component::<EdgeProbeState>(&app, agent).leg, 2);
}

/// Test: патруль туда-обратно по короткой платформе не падает с неё
#[test]
fn test_patrol_never_leaves_platform() {
    let config = EnemyConfig {
        patrol_wait_time: 0.5,
        ..EnemyConfig::grunt()
    };
    let mut app = enemy_app(99, Terrain::new(vec![Solid::platform(-3.0, 3.0, 0.0, 1.0)]));
    let agent = spawn(&mut app, Vec2::new(0.0, 0.0), Facing::Left, config);

    for _ in 0..20 {
        run_for(&mut app, 1.0);
        let position = feet(&app, agent);
        assert!(position.x > -3.0 && position.x < 3.0, "left the platform: {:?}", position);
        assert_eq!(position.y, 0.0);
    }

    // За 20 секунд несколько отрезков
    assert!(component::<EdgeProbeState>(&app, agent).leg >= 3);
}

/// Test: направленный патрульный не видит цель за спиной
#[test]
fn test_directional_patrol_ignores_target_behind() {
    let mut app = enemy_app(1, long_floor());
    let agent = spawn(&mut app, Vec2::new(0.0, 0.0), Facing::Right, ledge_config());
    spawn_target(&mut app, Vec2::new(-2.0, 0.0));

    run_for(&mut app, 0.5);
    assert!(matches!(state(&app, agent), EnemyState::Patrol { .. }));
    assert!(recorded(&app).states.is_empty());
}
