//! AI Events: смена состояния контроллера

use bevy::prelude::*;

use crate::ai::components::{EnemyState, EnemyStateKind};

/// Контроллер сменил состояние (только смена варианта; refresh цели не считается)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyStateChanged {
    pub entity: Entity,
    pub from: EnemyStateKind,
    pub to: EnemyStateKind,
}

/// Перевести контроллер в `next`.
///
/// Событие + лог пишутся только если вариант реально поменялся.
/// Возвращает true при смене варианта.
pub fn transition(
    entity: Entity,
    state: &mut EnemyState,
    next: EnemyState,
    events: &mut EventWriter<EnemyStateChanged>,
) -> bool {
    let from = state.kind();
    let to = next.kind();
    *state = next;

    if from == to {
        return false;
    }

    crate::log(&format!("AI: {:?} {:?} → {:?}", entity, from, to));
    events.write(EnemyStateChanged { entity, from, to });
    true
}
