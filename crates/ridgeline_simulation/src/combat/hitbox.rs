//! Melee hitbox collaborator.
//!
//! Симуляция только включает/выключает hitbox; пересечения с целями и урон
//! считает внешний слой (он шлёт `TakeDamage`).

use bevy::prelude::*;

use crate::collaborators::{Collaborator, MissingCollaborators};

/// Anything that can be switched live/idle by the attack sequencer.
pub trait HitboxControl {
    fn activate(&mut self);
    fn deactivate(&mut self);
    fn is_active(&self) -> bool;
}

/// Default hitbox collaborator: just a flag plus an activation counter.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct MeleeHitbox {
    pub active: bool,
    /// Сколько раз hitbox включался (для потребителей/тестов)
    pub activations: u32,
}

impl HitboxControl for MeleeHitbox {
    fn activate(&mut self) {
        if !self.active {
            self.active = true;
            self.activations += 1;
        }
    }

    fn deactivate(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Hitbox switched on/off.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitboxToggled {
    pub attacker: Entity,
    pub active: bool,
}

/// Switch the hitbox and report the change; a missing hitbox is reported once.
///
/// Returns true if the hitbox state actually changed.
pub fn set_hitbox(
    attacker: Entity,
    hitbox: Option<&mut impl HitboxControl>,
    active: bool,
    events: &mut EventWriter<HitboxToggled>,
    missing: &mut MissingCollaborators,
) -> bool {
    let Some(hitbox) = hitbox else {
        missing.warn_once(attacker, Collaborator::Hitbox);
        return false;
    };

    if hitbox.is_active() == active {
        return false;
    }

    if active {
        hitbox.activate();
    } else {
        hitbox.deactivate();
    }
    events.write(HitboxToggled { attacker, active });
    true
}
