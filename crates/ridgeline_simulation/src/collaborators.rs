//! Optional collaborators (animation sink, hitbox).
//!
//! Агент без коллаборатора работает дальше; warning пишется один раз на пару
//! (entity, коллаборатор), дальше вызовы молча пропускаются.

use std::collections::HashSet;

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collaborator {
    AnimationSink,
    Hitbox,
}

/// Which missing collaborators have already been reported.
#[derive(Resource, Debug, Default)]
pub struct MissingCollaborators {
    reported: HashSet<(Entity, Collaborator)>,
}

impl MissingCollaborators {
    /// Log a warning the first time `entity` is found without `collaborator`.
    ///
    /// Returns true when the warning was emitted.
    pub fn warn_once(&mut self, entity: Entity, collaborator: Collaborator) -> bool {
        if !self.reported.insert((entity, collaborator)) {
            return false;
        }
        crate::log_warning(&format!(
            "{:?} has no {:?}; calls to it are skipped",
            entity, collaborator
        ));
        true
    }

    pub fn was_reported(&self, entity: Entity, collaborator: Collaborator) -> bool {
        self.reported.contains(&(entity, collaborator))
    }

    /// Forget a despawned entity.
    pub fn forget(&mut self, entity: Entity) {
        self.reported.retain(|(e, _)| *e != entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warns_once_per_pair() {
        let mut missing = MissingCollaborators::default();
        let entity = Entity::from_raw(5);

        assert!(missing.warn_once(entity, Collaborator::AnimationSink));
        assert!(!missing.warn_once(entity, Collaborator::AnimationSink));
        assert!(missing.warn_once(entity, Collaborator::Hitbox));
        assert!(missing.was_reported(entity, Collaborator::Hitbox));

        missing.forget(entity);
        assert!(!missing.was_reported(entity, Collaborator::AnimationSink));
    }
}
