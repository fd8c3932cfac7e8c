//! ECS Components для агентов
//!
//! Организация по доменам:
//! - actor: Enemy, Health, Facing, Body, Collider, DetectionTarget, WallStick
//! - movement: Velocity, Grounded, MoveIntent
//!
//! Компоненты подсистем (сенсоры, FSM, атака, анимация) живут в своих модулях.

pub mod actor;
pub mod movement;

pub use actor::*;
pub use movement::*;
