//! Headless симуляция RIDGELINE
//!
//! Два яруса, grunt + brute и "игрок", который ходит туда-сюда.
//! Первый аргумент: путь к TOML конфигу grunt'а (опционально).

use std::path::Path;

use bevy::prelude::*;
use ridgeline_simulation::{
    create_headless_app, spawn_enemy, DetectionTarget, EnemyConfig, EnemyStateChanged,
    EntityDied, Facing, HitboxToggled, SimulationPlugin, Solid, TakeDamage, Terrain,
};

/// Скриптовый "игрок": ходит между двумя точками по верхнему ярусу
#[derive(Component)]
struct Wanderer {
    left: f32,
    right: f32,
    speed: f32,
}

fn wander(time: Res<Time>, mut wanderers: Query<(&mut Wanderer, &mut Transform)>) {
    let delta = time.delta_secs();
    for (mut wanderer, mut transform) in wanderers.iter_mut() {
        transform.translation.x += wanderer.speed * delta;
        if transform.translation.x > wanderer.right || transform.translation.x < wanderer.left {
            wanderer.speed = -wanderer.speed;
        }
    }
}

fn report(
    mut state_events: EventReader<EnemyStateChanged>,
    mut hitbox_events: EventReader<HitboxToggled>,
    mut died_events: EventReader<EntityDied>,
) {
    for event in state_events.read() {
        println!("state: {:?} {:?} → {:?}", event.entity, event.from, event.to);
    }
    for event in hitbox_events.read() {
        println!("hitbox: {:?} active={}", event.attacker, event.active);
    }
    for event in died_events.read() {
        println!("died: {:?}", event.entity);
    }
}

fn load_grunt_config() -> EnemyConfig {
    let Some(path) = std::env::args().nth(1) else {
        return EnemyConfig::grunt();
    };

    match EnemyConfig::load(Path::new(&path)) {
        Ok(config) => config,
        Err(error) => {
            ridgeline_simulation::log_error(&format!("{error}; falling back to grunt preset"));
            EnemyConfig::grunt()
        }
    }
}

fn main() {
    let seed = 42;
    println!("Starting RIDGELINE headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin)
        .insert_resource(Terrain::new(vec![
            Solid::platform(-10.0, 3.0, 0.0, 1.0),
            Solid::platform(3.0, 12.0, -2.0, 1.0),
            // Стена на правом краю нижнего яруса
            Solid::new(Vec2::new(12.0, -3.0), Vec2::new(13.0, 4.0)),
        ]))
        .add_systems(FixedUpdate, wander)
        .add_systems(Update, report);

    let grunt_config = load_grunt_config();
    let (grunt, brute, player) = {
        let mut commands = app.world_mut().commands();
        let grunt = spawn_enemy(&mut commands, Vec2::new(0.0, 0.0), Facing::Right, grunt_config);
        let brute = spawn_enemy(&mut commands, Vec2::new(8.0, -2.0), Facing::Left, EnemyConfig::brute());
        let player = commands
            .spawn((
                DetectionTarget,
                Transform::from_xyz(-8.0, 0.0, 0.0),
                Wanderer {
                    left: -9.0,
                    right: 2.5,
                    speed: 1.5,
                },
            ))
            .id();
        (grunt, brute, player)
    };
    app.world_mut().flush();

    // 20 секунд симуляции
    for tick in 0..1200 {
        app.update();

        // Игрок отвечает grunt'у на 10-й секунде
        if tick == 600 {
            app.world_mut().send_event(TakeDamage {
                target: grunt,
                amount: 1000,
                source: Some(player),
            });
        }

        if tick % 120 == 0 {
            let entity_count = app.world().entities().len();
            println!("Tick {}: {} entities", tick, entity_count);
        }
    }

    let brute_alive = app.world().get_entity(brute).is_ok();
    println!("Simulation complete! brute alive: {}", brute_alive);
}
