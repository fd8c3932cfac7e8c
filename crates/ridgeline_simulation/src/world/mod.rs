//! Terrain: статическая геометрия уровня для сенсоров и интегратора.
//!
//! Агенты только читают террейн (raycast'ы), никогда его не меняют.
//! `TerrainQuery` - шов для другой физики (всё, что умеет два луча,
//! подходит сенсорам).

use bevy::prelude::*;

/// Read-only geometric queries the sensors and the integrator need.
pub trait TerrainQuery {
    /// Cast straight down from `origin` up to `max_distance`.
    ///
    /// Returns the height of the first surface hit. An origin that is already
    /// inside a solid hits immediately and reports `origin.y`.
    fn cast_down(&self, origin: Vec2, max_distance: f32) -> Option<f32>;

    /// Cast horizontally from `origin` towards `direction` (sign) up to `max_distance`.
    ///
    /// Returns the distance to the first solid face hit.
    fn cast_horizontal(&self, origin: Vec2, direction: f32, max_distance: f32) -> Option<f32>;
}

/// Axis-aligned solid block (платформа, стена, пол)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Solid {
    pub min: Vec2,
    pub max: Vec2,
}

impl Solid {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Platform whose walkable top spans `[left, right]` at height `top`.
    pub fn platform(left: f32, right: f32, top: f32, thickness: f32) -> Self {
        Self::new(Vec2::new(left, top - thickness), Vec2::new(right, top))
    }

    fn spans_x(&self, x: f32) -> bool {
        x >= self.min.x && x <= self.max.x
    }

    fn contains(&self, point: Vec2) -> bool {
        point.x > self.min.x && point.x < self.max.x && point.y > self.min.y && point.y < self.max.y
    }
}

/// Весь статический террейн уровня
#[derive(Resource, Debug, Clone, Default)]
pub struct Terrain {
    pub solids: Vec<Solid>,
}

impl Terrain {
    pub fn new(solids: Vec<Solid>) -> Self {
        Self { solids }
    }

    pub fn with(mut self, solid: Solid) -> Self {
        self.solids.push(solid);
        self
    }
}

impl TerrainQuery for Terrain {
    fn cast_down(&self, origin: Vec2, max_distance: f32) -> Option<f32> {
        let mut best: Option<f32> = None;

        for solid in &self.solids {
            if !solid.spans_x(origin.x) {
                continue;
            }

            let hit = if solid.contains(origin) {
                origin.y
            } else if solid.max.y <= origin.y && origin.y - solid.max.y <= max_distance {
                solid.max.y
            } else {
                continue;
            };

            // Ближайшая поверхность = самая высокая
            if best.map_or(true, |b| hit > b) {
                best = Some(hit);
            }
        }

        best
    }

    fn cast_horizontal(&self, origin: Vec2, direction: f32, max_distance: f32) -> Option<f32> {
        if direction == 0.0 {
            return None;
        }

        let mut best: Option<f32> = None;

        for solid in &self.solids {
            if origin.y <= solid.min.y || origin.y >= solid.max.y {
                continue;
            }

            let distance = if solid.contains(origin) {
                0.0
            } else if direction > 0.0 && solid.min.x >= origin.x {
                solid.min.x - origin.x
            } else if direction < 0.0 && solid.max.x <= origin.x {
                origin.x - solid.max.x
            } else {
                continue;
            };

            if distance <= max_distance && best.map_or(true, |b| distance < b) {
                best = Some(distance);
            }
        }

        best
    }
}
