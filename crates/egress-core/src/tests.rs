//! Unit tests for egress-core.

mod ids {
    use crate::{ExitId, NodeId};

    #[test]
    fn invalid_sentinel_is_default() {
        assert_eq!(NodeId::default(), NodeId::INVALID);
        assert_eq!(ExitId::default(), ExitId::INVALID);
    }

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }
}

mod point {
    use crate::Point;

    #[test]
    fn planar_distance_ignores_floor() {
        let a = Point::new(0.0, 0.0, 0);
        let b = Point::new(3.0, 4.0, 5);
        assert_eq!(a.planar_distance(b), 5.0);
    }

    #[test]
    fn weighted_distance_inflates_floor_term() {
        let a = Point::new(0.0, 0.0, 0);
        let b = Point::new(0.0, 0.0, 1);
        // sqrt(10 * 1²) ≈ 3.162
        assert!((a.weighted_distance(b) - 10.0f32.sqrt()).abs() < 1e-5);
        // Same floor degenerates to planar distance.
        let c = Point::new(3.0, 4.0, 0);
        assert_eq!(a.weighted_distance(c), 5.0);
    }

    #[test]
    fn matches_uses_planar_tolerance_and_exact_floor() {
        let a = Point::new(1.0, 1.0, 0);
        assert!(a.matches(Point::new(1.5, 0.6, 0), 1.0));
        assert!(!a.matches(Point::new(2.5, 1.0, 0), 1.0));
        // Floor difference is never absorbed by the tolerance.
        assert!(!a.matches(Point::new(1.0, 1.0, 1), 1.0));
    }
}

mod policy {
    use crate::{SearchPolicy, UserProfile};

    #[test]
    fn default_policy_avoids_hazards_only() {
        let p = SearchPolicy::default();
        assert!(p.avoid_fire);
        assert!(p.avoid_congestion);
        assert!(!p.prefer_accessible);
        assert!(!p.avoid_steep_slopes);
        assert!(!p.avoid_narrow_paths);
        assert!(!p.strict_accessible);
    }

    #[test]
    fn profile_table() {
        assert_eq!(
            UserProfile::Standard.search_policy(),
            SearchPolicy::default()
        );
        for profile in [UserProfile::Elderly, UserProfile::Child, UserProfile::Disabled] {
            let p = profile.search_policy();
            assert!(p.prefer_accessible);
            assert!(p.avoid_steep_slopes);
            assert!(p.avoid_narrow_paths);
            assert!(!p.strict_accessible, "strict mode is opt-in, not default");
            assert!(profile.is_vulnerable());
        }
        assert!(!UserProfile::Standard.is_vulnerable());
    }

    #[test]
    fn strict_builder_flips_only_strict_flag() {
        let p = SearchPolicy::accessibility_biased().strict();
        assert!(p.strict_accessible);
        assert!(p.prefer_accessible);
        assert!(p.avoid_fire);
    }
}

mod config {
    use crate::PlannerConfig;

    #[test]
    fn defaults_are_valid() {
        let cfg = PlannerConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.replan_interval.as_millis(), 500);
        assert_eq!(cfg.limits.min_width_m, 1.2);
    }

    #[test]
    fn shrinking_fire_rejected() {
        let cfg = PlannerConfig {
            fire_growth_factor: 0.9,
            ..PlannerConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
