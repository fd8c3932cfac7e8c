//! Enemy configuration: tuning values, presets, TOML loading.
//!
//! Все значения приходят снаружи (TOML или пресеты) и проходят через
//! `EnemyConfig::validated()`: некорректные значения клампятся, не отвергаются.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::AttackPolicy;
use crate::sensors::DetectionPolicy;

mod error;

pub use error::ConfigError;

/// Параметры одного архетипа врага.
///
/// Хранится как компонент на каждом агенте (как `AIConfig` у NPC).
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
#[serde(default)]
pub struct EnemyConfig {
    /// Максимальное здоровье (≥ 1)
    pub max_health: u32,
    /// Через сколько секунд после смерти entity удаляется
    pub death_removal_delay: f32,

    /// Радиус обнаружения цели (метры)
    pub detection_radius: f32,
    /// Полуугол конуса обзора при патруле (градусы, 0..=180)
    pub cone_half_angle: f32,
    /// Доля конуса обзора, внутри которой разрешена направленная атака (0..=1)
    pub attack_arc_fraction: f32,
    /// Дистанция атаки (метры)
    pub attack_range: f32,

    /// Cooldown между атаками: случайно в [min, max] при каждом старте атаки
    pub cooldown_min: f32,
    pub cooldown_max: f32,
    /// Windup до включения hitbox (секунды)
    pub windup_duration: f32,
    /// Сколько hitbox активен (секунды)
    pub active_duration: f32,

    pub patrol_speed: f32,
    pub chase_speed: f32,
    /// Пауза у края/стены перед разворотом (секунды)
    pub patrol_wait_time: f32,

    /// Базовый вынос edge-пробы вперёд (метры)
    pub edge_offset_base: f32,
    /// Случайная добавка к выносу, перетягивается на каждом развороте
    pub edge_offset_min: f32,
    pub edge_offset_max: f32,
    /// Вынос edge-пробы при погоне (жёстче патрульного)
    pub chase_edge_offset: f32,
    /// Допустимая разница высот земли "здесь" и "впереди"
    pub level_tolerance: f32,
    /// Высота над ногами, с которой пускаются edge-лучи
    pub edge_probe_height: f32,
    /// Насколько глубоко под ногами ищется земля для edge-проб
    pub edge_scan_depth: f32,
    /// Длина ground-пробы из-под ног
    pub ground_probe_distance: f32,
    /// Длина wall-пробы при патруле
    pub wall_probe_distance: f32,
    /// Длина wall-пробы при погоне
    pub chase_wall_probe_distance: f32,

    /// Цель ниже агента больше чем на этот допуск: невидима
    pub vertical_tolerance: f32,
    /// Глубина поиска земли под агентом и целью (colocation check)
    pub colocation_scan_depth: f32,
    /// Grace period перед возвратом Chase → Patrol (секунды)
    pub loss_grace: f32,
    /// Минимальный горизонтальный offset до цели для смены facing
    pub facing_dead_zone: f32,
    /// Интервал обновления сенсоров (секунды)
    pub sense_interval: f32,

    /// Гравитация (м/с², ≤ 0)
    pub gravity: f32,

    pub detection_policy: DetectionPolicy,
    pub attack_policy: AttackPolicy,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self::grunt()
    }
}

impl EnemyConfig {
    /// Патрульный боец: смотрит конусом, бьёт только вперёд.
    pub fn grunt() -> Self {
        Self {
            max_health: 100,
            death_removal_delay: 2.0,
            detection_radius: 6.0,
            cone_half_angle: 60.0,
            attack_arc_fraction: 0.5,
            attack_range: 1.2,
            cooldown_min: 1.0,
            cooldown_max: 2.0,
            windup_duration: 0.35,
            active_duration: 0.2,
            patrol_speed: 1.0,
            chase_speed: 2.5,
            patrol_wait_time: 2.0,
            edge_offset_base: 0.3,
            edge_offset_min: 0.0,
            edge_offset_max: 0.4,
            chase_edge_offset: 0.1,
            level_tolerance: 0.15,
            edge_probe_height: 1.0,
            edge_scan_depth: 1.0,
            ground_probe_distance: 0.1,
            wall_probe_distance: 0.4,
            chase_wall_probe_distance: 0.15,
            vertical_tolerance: 0.2,
            colocation_scan_depth: 2.0,
            loss_grace: 5.0,
            facing_dead_zone: 0.3,
            sense_interval: 0.1,
            gravity: -20.0,
            detection_policy: DetectionPolicy::Directional,
            attack_policy: AttackPolicy::Directional,
        }
    }

    /// Тяжёлый боец: чувствует цель вокруг себя, бьёт вокруг себя.
    pub fn brute() -> Self {
        Self {
            max_health: 250,
            detection_radius: 4.5,
            attack_range: 1.6,
            cooldown_min: 1.8,
            cooldown_max: 3.0,
            windup_duration: 0.6,
            active_duration: 0.3,
            patrol_speed: 0.7,
            chase_speed: 1.6,
            detection_policy: DetectionPolicy::Omnidirectional,
            attack_policy: AttackPolicy::Omnidirectional,
            ..Self::grunt()
        }
    }

    /// Parse a config from TOML text and clamp it.
    ///
    /// Missing keys fall back to `grunt()` values.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EnemyConfig = toml::from_str(content)?;
        Ok(config.validated())
    }

    /// Load a config from a TOML file and clamp it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Clamp every out-of-range value and log one warning per clamped field.
    pub fn validated(mut self) -> Self {
        for field in self.clamp_in_place() {
            crate::logger::log_warning(&format!(
                "EnemyConfig: '{}' out of range, clamped to a safe value",
                field
            ));
        }
        self
    }

    /// Clamp in place; returns names of the fields that were changed.
    pub fn clamp_in_place(&mut self) -> Vec<&'static str> {
        let mut clamped = Vec::new();

        if self.max_health == 0 {
            self.max_health = 1;
            clamped.push("max_health");
        }

        // inf/NaN → значение пресета grunt
        let preset = Self::grunt();
        let all_floats: [(&'static str, &mut f32, f32); 28] = [
            ("death_removal_delay", &mut self.death_removal_delay, preset.death_removal_delay),
            ("detection_radius", &mut self.detection_radius, preset.detection_radius),
            ("cone_half_angle", &mut self.cone_half_angle, preset.cone_half_angle),
            ("attack_arc_fraction", &mut self.attack_arc_fraction, preset.attack_arc_fraction),
            ("attack_range", &mut self.attack_range, preset.attack_range),
            ("cooldown_min", &mut self.cooldown_min, preset.cooldown_min),
            ("cooldown_max", &mut self.cooldown_max, preset.cooldown_max),
            ("windup_duration", &mut self.windup_duration, preset.windup_duration),
            ("active_duration", &mut self.active_duration, preset.active_duration),
            ("patrol_speed", &mut self.patrol_speed, preset.patrol_speed),
            ("chase_speed", &mut self.chase_speed, preset.chase_speed),
            ("patrol_wait_time", &mut self.patrol_wait_time, preset.patrol_wait_time),
            ("edge_offset_base", &mut self.edge_offset_base, preset.edge_offset_base),
            ("edge_offset_min", &mut self.edge_offset_min, preset.edge_offset_min),
            ("edge_offset_max", &mut self.edge_offset_max, preset.edge_offset_max),
            ("chase_edge_offset", &mut self.chase_edge_offset, preset.chase_edge_offset),
            ("level_tolerance", &mut self.level_tolerance, preset.level_tolerance),
            ("edge_probe_height", &mut self.edge_probe_height, preset.edge_probe_height),
            ("edge_scan_depth", &mut self.edge_scan_depth, preset.edge_scan_depth),
            ("ground_probe_distance", &mut self.ground_probe_distance, preset.ground_probe_distance),
            ("wall_probe_distance", &mut self.wall_probe_distance, preset.wall_probe_distance),
            ("chase_wall_probe_distance", &mut self.chase_wall_probe_distance, preset.chase_wall_probe_distance),
            ("vertical_tolerance", &mut self.vertical_tolerance, preset.vertical_tolerance),
            ("colocation_scan_depth", &mut self.colocation_scan_depth, preset.colocation_scan_depth),
            ("loss_grace", &mut self.loss_grace, preset.loss_grace),
            ("facing_dead_zone", &mut self.facing_dead_zone, preset.facing_dead_zone),
            ("sense_interval", &mut self.sense_interval, preset.sense_interval),
            ("gravity", &mut self.gravity, preset.gravity),
        ];
        for (name, value, fallback) in all_floats {
            if !value.is_finite() {
                *value = fallback;
                clamped.push(name);
            }
        }

        let non_negative: [(&'static str, &mut f32); 24] = [
            ("death_removal_delay", &mut self.death_removal_delay),
            ("detection_radius", &mut self.detection_radius),
            ("attack_range", &mut self.attack_range),
            ("cooldown_min", &mut self.cooldown_min),
            ("windup_duration", &mut self.windup_duration),
            ("active_duration", &mut self.active_duration),
            ("patrol_speed", &mut self.patrol_speed),
            ("chase_speed", &mut self.chase_speed),
            ("patrol_wait_time", &mut self.patrol_wait_time),
            ("edge_offset_base", &mut self.edge_offset_base),
            ("edge_offset_min", &mut self.edge_offset_min),
            ("chase_edge_offset", &mut self.chase_edge_offset),
            ("level_tolerance", &mut self.level_tolerance),
            ("edge_probe_height", &mut self.edge_probe_height),
            ("edge_scan_depth", &mut self.edge_scan_depth),
            ("ground_probe_distance", &mut self.ground_probe_distance),
            ("wall_probe_distance", &mut self.wall_probe_distance),
            ("chase_wall_probe_distance", &mut self.chase_wall_probe_distance),
            ("vertical_tolerance", &mut self.vertical_tolerance),
            ("colocation_scan_depth", &mut self.colocation_scan_depth),
            ("loss_grace", &mut self.loss_grace),
            ("facing_dead_zone", &mut self.facing_dead_zone),
            ("sense_interval", &mut self.sense_interval),
            ("cone_half_angle", &mut self.cone_half_angle),
        ];
        for (name, value) in non_negative {
            if *value < 0.0 {
                *value = 0.0;
                clamped.push(name);
            }
        }

        if self.cone_half_angle > 180.0 {
            self.cone_half_angle = 180.0;
            clamped.push("cone_half_angle");
        }

        if !(0.0..=1.0).contains(&self.attack_arc_fraction) {
            self.attack_arc_fraction = if self.attack_arc_fraction > 1.0 { 1.0 } else { 0.0 };
            clamped.push("attack_arc_fraction");
        }

        // max никогда не меньше min (иначе gen_range паникует)
        if self.cooldown_max < self.cooldown_min {
            self.cooldown_max = self.cooldown_min;
            clamped.push("cooldown_max");
        }
        if self.edge_offset_max < self.edge_offset_min {
            self.edge_offset_max = self.edge_offset_min;
            clamped.push("edge_offset_max");
        }

        if self.gravity > 0.0 {
            self.gravity = 0.0;
            clamped.push("gravity");
        }

        clamped
    }

    /// Attack arc half-angle (degrees) for the directional attack policy.
    pub fn attack_half_angle(&self) -> f32 {
        self.cone_half_angle * self.attack_arc_fraction
    }
}
