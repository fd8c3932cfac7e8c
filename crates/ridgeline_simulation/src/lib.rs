//! RIDGELINE Simulation Core
//!
//! ECS-симуляция врагов платформера на Bevy 0.16 (headless).
//!
//! Каждый враг - агент: сенсоры (земля, край, стена, цель) → FSM контроллер
//! (Patrol / Chase / Attack / Dead) → MoveIntent → kinematic интегратор.
//! Презентация (анимации, hitbox-пересечения): снаружи, через компоненты
//! `AnimationIntents`, `MeleeHitbox` и события.
//!
//! Порядок тика (FixedUpdate, 60Hz):
//! Damage → Sense → AttackTimers → Decide → Move → Emit

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod animation;
pub mod collaborators;
pub mod combat;
pub mod components;
pub mod config;
pub mod logger;
pub mod physics;
pub mod sensors;
pub mod world;

// Re-export базовых компонентов для удобства
pub use ai::{AIPlugin, EnemyState, EnemyStateChanged, EnemyStateKind, LossTimer};
pub use animation::{AnimationIntents, AnimationPlugin, AnimationTrigger};
pub use collaborators::MissingCollaborators;
pub use combat::{
    AttackFinished, AttackPolicy, AttackStarted, AttackWindow, CombatPlugin, DamageTaken, Dead,
    DespawnAfter, EntityDied, HealthChanged, HitboxToggled, MeleeHitbox, TakeDamage,
};
pub use components::*;
pub use config::{ConfigError, EnemyConfig};
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel, LogPrinter};
pub use physics::KinematicControllerPlugin;
pub use sensors::{
    DetectionPolicy, DetectionResult, EdgeProbeState, SensorPlugin, SensorSnapshot, SensorSuite,
};
pub use world::{Solid, Terrain, TerrainQuery};

/// Частота симуляции (FixedUpdate)
pub const FIXED_HZ: f64 = 60.0;

/// Фазы тика врага (FixedUpdate), выполняются строго по порядку
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemySet {
    /// Входящий урон, смерть, деспавн трупов
    Damage,
    /// Throttled сенсоры
    Sense,
    /// Созревшие callbacks атаки (hitbox on/off, конец атаки)
    AttackTimers,
    /// FSM + patrol/chase
    Decide,
    /// MoveIntent → скорость → позиция
    Move,
    /// Animation intents
    Emit,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Детерминистичный RNG (seed по умолчанию, если хост не задал свой)
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(FIXED_HZ))
            .configure_sets(
                FixedUpdate,
                (
                    EnemySet::Damage,
                    EnemySet::Sense,
                    EnemySet::AttackTimers,
                    EnemySet::Decide,
                    EnemySet::Move,
                    EnemySet::Emit,
                )
                    .chain(),
            )
            // Подсистемы
            .add_plugins((
                SensorPlugin,
                CombatPlugin,
                AIPlugin,
                KinematicControllerPlugin,
                AnimationPlugin,
            ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время двигается вручную: один `app.update()` = ровно один fixed тик
/// (кроме самого первого update, он только запускает часы).
/// Враги подключаются отдельно: `app.add_plugins(SimulationPlugin)`.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(FIXED_HZ)) // 60Hz FixedUpdate
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / FIXED_HZ,
        )));

    app
}

/// Spawn helper: враг со всеми компонентами
///
/// `position`: точка ног. Health берётся из `config.max_health`,
/// первый отрезок патруля разыгрывается на первом тике.
pub fn spawn_enemy(
    commands: &mut Commands,
    position: Vec2,
    facing: Facing,
    config: EnemyConfig,
) -> Entity {
    let config = config.validated();

    commands
        .spawn((
            Enemy,
            Transform::from_translation(position.extend(0.0)),
            facing,
            Health::new(config.max_health),
            Body::default(),
            EnemyState::default(),
            LossTimer::default(),
            SensorSuite::default(),
            SensorSnapshot::default(),
            EdgeProbeState::default(),
            AttackWindow::new(&config),
            MeleeHitbox::default(),
            AnimationIntents::default(),
            config,
        ))
        .id()
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
