//! Общие helpers для integration тестов.

#![allow(dead_code)]

use bevy::prelude::*;
use ridgeline_simulation::*;

/// Лимит апдейтов на одно ожидание (защита от вечного цикла)
const MAX_UPDATES: usize = 100_000;

/// Events, собранные за весь прогон
#[derive(Resource, Default, Debug)]
pub struct Recorded {
    pub states: Vec<EnemyStateChanged>,
    pub started: Vec<AttackStarted>,
    pub finished: Vec<AttackFinished>,
    pub hitbox: Vec<HitboxToggled>,
    pub health: Vec<HealthChanged>,
    pub taken: Vec<DamageTaken>,
    pub died: Vec<EntityDied>,
}

fn record_events(
    mut recorded: ResMut<Recorded>,
    mut states: EventReader<EnemyStateChanged>,
    mut started: EventReader<AttackStarted>,
    mut finished: EventReader<AttackFinished>,
    mut hitbox: EventReader<HitboxToggled>,
    mut health: EventReader<HealthChanged>,
    mut taken: EventReader<DamageTaken>,
    mut died: EventReader<EntityDied>,
) {
    recorded.states.extend(states.read().copied());
    recorded.started.extend(started.read().copied());
    recorded.finished.extend(finished.read().copied());
    recorded.hitbox.extend(hitbox.read().copied());
    recorded.health.extend(health.read().copied());
    recorded.taken.extend(taken.read().copied());
    recorded.died.extend(died.read().copied());
}

/// Headless App с врагами, террейном и записью событий
pub fn enemy_app(seed: u64, terrain: Terrain) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin)
        .insert_resource(terrain)
        .init_resource::<Recorded>()
        .add_systems(FixedUpdate, record_events.after(EnemySet::Emit));
    app
}

/// Одна длинная платформа [-20, 20] с верхом на y = 0
pub fn long_floor() -> Terrain {
    Terrain::new(vec![Solid::platform(-20.0, 20.0, 0.0, 1.0)])
}

pub fn spawn(app: &mut App, position: Vec2, facing: Facing, config: EnemyConfig) -> Entity {
    let entity = spawn_enemy(&mut app.world_mut().commands(), position, facing, config);
    app.world_mut().flush();
    entity
}

pub fn spawn_target(app: &mut App, position: Vec2) -> Entity {
    app.world_mut()
        .spawn((DetectionTarget, Transform::from_translation(position.extend(0.0))))
        .id()
}

pub fn move_target(app: &mut App, target: Entity, position: Vec2) {
    let mut transform = app
        .world_mut()
        .get_mut::<Transform>(target)
        .expect("target has Transform");
    transform.translation = position.extend(0.0);
}

pub fn elapsed(app: &App) -> f32 {
    app.world().resource::<Time<Fixed>>().elapsed_secs()
}

/// Крутим апдейты, пока fixed-время не продвинется на `seconds`.
pub fn run_for(app: &mut App, seconds: f32) {
    let end = elapsed(app) + seconds;
    for _ in 0..MAX_UPDATES {
        if elapsed(app) >= end - 1e-4 {
            return;
        }
        app.update();
    }
    panic!("run_for({seconds}) did not finish");
}

/// Крутим апдейты до выполнения условия; возвращает fixed-время срабатывания.
pub fn run_until(
    app: &mut App,
    max_seconds: f32,
    mut condition: impl FnMut(&App) -> bool,
) -> Option<f32> {
    let end = elapsed(app) + max_seconds;
    for _ in 0..MAX_UPDATES {
        app.update();
        if condition(app) {
            return Some(elapsed(app));
        }
        if elapsed(app) >= end {
            return None;
        }
    }
    None
}

pub fn state(app: &App, entity: Entity) -> EnemyState {
    *app.world().get::<EnemyState>(entity).expect("enemy has EnemyState")
}

pub fn facing(app: &App, entity: Entity) -> Facing {
    *app.world().get::<Facing>(entity).expect("enemy has Facing")
}

pub fn feet(app: &App, entity: Entity) -> Vec2 {
    app.world()
        .get::<Transform>(entity)
        .expect("enemy has Transform")
        .translation
        .truncate()
}

pub fn component<T: Component + Clone>(app: &App, entity: Entity) -> T {
    app.world()
        .get::<T>(entity)
        .cloned()
        .expect("component present")
}

pub fn recorded(app: &App) -> &Recorded {
    app.world().resource::<Recorded>()
}
