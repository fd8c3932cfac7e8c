//! Tests for target detection geometry.

#[cfg(test)]
mod tests {
    use super::super::detection::*;
    use super::super::detection::Observer;
    use crate::ai::EnemyState;
    use crate::components::Facing;
    use crate::config::EnemyConfig;
    use crate::world::{Solid, Terrain};
    use bevy::prelude::*;
    use proptest::prelude::*;

    fn floor() -> Terrain {
        Terrain::new(vec![Solid::platform(-20.0, 20.0, 0.0, 1.0)])
    }

    fn observer() -> Observer {
        Observer {
            feet: Vec2::ZERO,
            facing: Facing::Right,
            preferred: None,
        }
    }

    fn candidate(index: u32, x: f32, y: f32) -> Candidate {
        Candidate {
            entity: Entity::from_raw(index),
            feet: Vec2::new(x, y),
            wall_stick: false,
        }
    }

    #[test]
    fn test_angle_to_facing() {
        assert!((angle_to_facing(Facing::Right, Vec2::new(1.0, 0.0))).abs() < 1e-4);
        assert!((angle_to_facing(Facing::Right, Vec2::new(-1.0, 0.0)) - 180.0).abs() < 1e-3);
        assert!((angle_to_facing(Facing::Left, Vec2::new(-1.0, 1.0)) - 45.0).abs() < 1e-3);
        assert_eq!(angle_to_facing(Facing::Left, Vec2::ZERO), 0.0);
    }

    #[test]
    fn test_outside_radius_is_ignored() {
        let config = EnemyConfig::grunt();
        let far = candidate(1, config.detection_radius + 0.5, 0.0);
        let result = evaluate_candidate(&floor(), &observer(), &far, DetectionPolicy::Omnidirectional, &config);
        assert!(result.is_none());
    }

    #[test]
    fn test_directional_cone_rejects_target_behind() {
        let config = EnemyConfig::grunt();
        let behind = candidate(1, -2.0, 0.0);

        let directional = detect_target(&floor(), &observer(), [behind], DetectionPolicy::Directional, &config);
        let omni = detect_target(&floor(), &observer(), [behind], DetectionPolicy::Omnidirectional, &config);

        assert!(directional.is_none());
        let omni = omni.unwrap();
        assert_eq!(omni.target, behind.entity);
        assert!((omni.distance - 2.0).abs() < 1e-5);
        assert!((omni.angle - 180.0).abs() < 1e-3);
    }

    #[test]
    fn test_directional_cone_accepts_target_in_front() {
        let config = EnemyConfig::grunt();
        let ahead = candidate(1, 3.0, 0.5);
        let result = detect_target(&floor(), &observer(), [ahead], DetectionPolicy::Directional, &config).unwrap();
        assert!(result.angle < config.cone_half_angle);
        assert!((result.vertical_offset - 0.5).abs() < 1e-6);
        assert!(result.colocated);
    }

    #[test]
    fn test_target_straight_above_only_seen_omnidirectionally() {
        let config = EnemyConfig::grunt();
        let above = candidate(1, 0.1, 1.5);

        assert!(detect_target(&floor(), &observer(), [above], DetectionPolicy::Directional, &config).is_none());
        assert!(detect_target(&floor(), &observer(), [above], DetectionPolicy::Omnidirectional, &config).is_some());
    }

    #[test]
    fn test_slightly_below_within_tolerance_is_visible() {
        let config = EnemyConfig::grunt();
        let low = candidate(1, 2.0, -config.vertical_tolerance * 0.5);
        assert!(evaluate_candidate(&floor(), &observer(), &low, DetectionPolicy::Directional, &config).is_some());
    }

    #[test]
    fn test_floating_target_is_not_colocated() {
        let config = EnemyConfig::grunt();
        let floating = candidate(1, 2.0, 3.0);

        let evaluated =
            evaluate_candidate(&floor(), &observer(), &floating, DetectionPolicy::Omnidirectional, &config)
                .unwrap();
        assert!(!evaluated.colocated);
        assert!(detect_target(&floor(), &observer(), [floating], DetectionPolicy::Omnidirectional, &config).is_none());
    }

    #[test]
    fn test_wall_stick_counts_as_grounded() {
        let config = EnemyConfig::grunt();
        let clinging = Candidate {
            wall_stick: true,
            ..candidate(1, 2.0, 3.0)
        };
        assert!(detect_target(&floor(), &observer(), [clinging], DetectionPolicy::Omnidirectional, &config).is_some());
    }

    #[test]
    fn test_airborne_observer_sees_nothing() {
        let config = EnemyConfig::grunt();
        let airborne = Observer {
            feet: Vec2::new(0.0, 5.0),
            ..observer()
        };
        let target = candidate(1, 2.0, 5.0);
        let clinging = Candidate { wall_stick: true, ..target };
        assert!(detect_target(&floor(), &airborne, [clinging], DetectionPolicy::Omnidirectional, &config).is_none());
    }

    #[test]
    fn test_nearest_candidate_wins() {
        let config = EnemyConfig::grunt();
        let far = candidate(1, 4.0, 0.0);
        let near = candidate(2, 2.0, 0.0);
        let result = detect_target(&floor(), &observer(), [far, near], DetectionPolicy::Directional, &config).unwrap();
        assert_eq!(result.target, near.entity);
    }

    #[test]
    fn test_preferred_candidate_wins_while_valid() {
        let config = EnemyConfig::grunt();
        let far = candidate(1, 4.0, 0.0);
        let near = candidate(2, 2.0, 0.0);
        let pursuing = Observer {
            preferred: Some(far.entity),
            ..observer()
        };
        let result = detect_target(&floor(), &pursuing, [near, far], DetectionPolicy::Directional, &config).unwrap();
        assert_eq!(result.target, far.entity);
    }

    #[test]
    fn test_pursuit_states_force_omnidirectional() {
        let target = Entity::from_raw(3);
        let chase = EnemyState::Chase {
            target,
            last_seen: Vec2::ZERO,
        };
        let attack = EnemyState::Attack {
            target,
            last_seen: Vec2::ZERO,
        };

        assert_eq!(DetectionPolicy::Directional.mode_for(&EnemyState::default()), DetectionPolicy::Directional);
        assert_eq!(DetectionPolicy::Directional.mode_for(&chase), DetectionPolicy::Omnidirectional);
        assert_eq!(DetectionPolicy::Directional.mode_for(&attack), DetectionPolicy::Omnidirectional);
        assert_eq!(
            DetectionPolicy::Omnidirectional.mode_for(&EnemyState::default()),
            DetectionPolicy::Omnidirectional
        );
    }

    proptest! {
        /// Цель ниже допуска невидима в любом режиме и при любом выравнивании.
        #[test]
        fn prop_target_below_tolerance_is_never_detected(
            dx in -5.5f32..5.5,
            depth in 0.001f32..3.0,
            omnidirectional in any::<bool>(),
            facing_left in any::<bool>(),
            wall_stick in any::<bool>(),
        ) {
            let config = EnemyConfig::grunt();
            let mode = if omnidirectional {
                DetectionPolicy::Omnidirectional
            } else {
                DetectionPolicy::Directional
            };
            let observer = Observer {
                facing: Facing::from_sprite_flip(facing_left),
                ..observer()
            };
            let below = Candidate {
                wall_stick,
                ..candidate(1, dx, -(config.vertical_tolerance + depth))
            };

            prop_assert!(evaluate_candidate(&floor(), &observer, &below, mode, &config).is_none());
            prop_assert!(detect_target(&floor(), &observer, [below], mode, &config).is_none());
        }
    }
}
