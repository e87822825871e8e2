//! Unit tests for egress-plan.
//!
//! Fixtures rasterize real floor plans through `egress-grid` so the whole
//! geometry → grid → graph → plan chain is exercised.

mod helpers {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use egress_core::{PlanarPoint, PlannerConfig, Point, UserProfile};
    use egress_grid::{FloorPlan, GeometryElement, GridConfig, Rasterizer};
    use egress_hazard::FireEvent;
    use egress_spatial::{AStarSearch, GraphConfig, RouteGraph, RouteGraphBuilder};

    use crate::notify::AssistanceNotifier;
    use crate::planner::EscapeRoutePlanner;

    pub fn p(x: f32, y: f32) -> PlanarPoint {
        PlanarPoint::new(x, y)
    }

    pub fn anchor(x: f32, y: f32) -> GeometryElement {
        GeometryElement::Door {
            center: p(x, y),
            radius: 0.0,
        }
    }

    pub fn exit_at(x: f32, y: f32) -> GeometryElement {
        GeometryElement::Exit {
            position: p(x, y),
            label: None,
        }
    }

    pub fn fire(x: f32, y: f32, floor: i32, radius: f32) -> FireEvent {
        FireEvent {
            x,
            y,
            floor,
            spread_radius: radius,
            intensity: 1.0,
            id: Some("drill".into()),
        }
    }

    pub fn build_graph(
        plans: &[FloorPlan],
        grid_size: f32,
        padding: f32,
        graph_config: &GraphConfig,
    ) -> Arc<RouteGraph> {
        let grids = Rasterizer::new(GridConfig { grid_size, padding })
            .unwrap()
            .rasterize_building(plans);
        Arc::new(RouteGraphBuilder::from_floor_grids(&grids, graph_config))
    }

    /// Padded 12×12 floor with exits at (1,1) (id 0) and (9,9) (id 1).
    /// Exit node centres land at (1.5, 1.5) and (9.5, 9.5).
    pub fn two_exit_floor() -> Arc<RouteGraph> {
        let plan = FloorPlan {
            floor: 0,
            elements: vec![anchor(0.0, 0.0), exit_at(1.0, 1.0), exit_at(9.0, 9.0)],
        };
        build_graph(&[plan], 1.0, 1.0, &GraphConfig::default())
    }

    pub fn planner_with<N: AssistanceNotifier>(
        graph: Arc<RouteGraph>,
        notifier: N,
        config: PlannerConfig,
    ) -> EscapeRoutePlanner<AStarSearch, N> {
        EscapeRoutePlanner::new(graph, AStarSearch::default(), notifier, config).unwrap()
    }

    pub fn planner(
        graph: Arc<RouteGraph>,
    ) -> EscapeRoutePlanner<AStarSearch, crate::notify::NoopNotifier> {
        planner_with(graph, crate::notify::NoopNotifier, PlannerConfig::default())
    }

    /// Notifier that records every assistance signal for inspection.
    #[derive(Clone, Default)]
    pub struct RecordingNotifier(pub Arc<Mutex<Vec<(Point, UserProfile)>>>);

    impl AssistanceNotifier for RecordingNotifier {
        fn assistance_needed(&mut self, location: Point, profile: UserProfile) {
            self.0.lock().push((location, profile));
        }
    }
}

// ── Escape planning ───────────────────────────────────────────────────────────

mod planner {
    use std::time::Instant;

    use egress_core::{ExitId, Point, UserProfile};
    use egress_grid::CellKind;

    use super::helpers::{fire, planner, planner_with, two_exit_floor, RecordingNotifier};

    #[test]
    fn nearest_surviving_exit_is_chosen() {
        let graph = two_exit_floor();
        let mut planner = planner(graph.clone());
        // Fire well clear of both exits: the closer exit (1,1) wins.
        let plan = planner.plan_escape_route(
            &fire(20.0, 20.0, 0, 1.0),
            Point::new(0.0, 0.0, 0),
            UserProfile::Standard,
            Instant::now(),
        );
        let exit = plan.exit.expect("an exit must survive");
        assert_eq!(exit.id, ExitId(0));
        assert!(plan.path.is_reachable());
        assert_eq!(plan.path.nodes.last(), Some(&exit.node));
        assert_eq!(graph.node_kind[exit.node.index()], CellKind::Exit);
        assert!(!plan.needs_assistance);
    }

    #[test]
    fn exit_outside_spread_radius_survives_the_cut() {
        // Fire at (5,5) with radius 3: exit (1,1) sits 4.95 m away — safe —
        // and is still the nearest choice for an occupant at the origin.
        let mut planner = planner(two_exit_floor());
        let plan = planner.plan_escape_route(
            &fire(5.0, 5.0, 0, 3.0),
            Point::new(0.0, 0.0, 0),
            UserProfile::Standard,
            Instant::now(),
        );
        assert_eq!(plan.exit.unwrap().id, ExitId(0));
    }

    #[test]
    fn compromised_exit_falls_back_to_the_farther_one() {
        // Fire at (2.5,2.5) with radius 2 swallows exit (1,1) (1.41 m away);
        // the plan must route to (9,9) instead.
        let mut planner = planner(two_exit_floor());
        let plan = planner.plan_escape_route(
            &fire(2.5, 2.5, 0, 2.0),
            Point::new(0.0, 0.0, 0),
            UserProfile::Standard,
            Instant::now(),
        );
        let exit = plan.exit.expect("the far exit survives");
        assert_eq!(exit.id, ExitId(1));
        assert!(plan.path.is_reachable());
        assert_eq!(plan.path.nodes.last(), Some(&exit.node));
        // Obstacle exclusion: nothing on the path is inside the fire.
        for point in &plan.path.points {
            assert!(point.planar_distance(Point::new(2.5, 2.5, 0)) > 2.0);
        }
    }

    #[test]
    fn no_surviving_exit_reports_failure_value() {
        let mut planner = planner(two_exit_floor());
        let plan = planner.plan_escape_route(
            &fire(5.5, 5.5, 0, 15.0),
            Point::new(0.0, 0.0, 0),
            UserProfile::Disabled,
            Instant::now(),
        );
        assert!(plan.exit.is_none());
        assert!(plan.path.is_empty());
        assert_eq!(plan.path.distance, f32::INFINITY);
        // The failure value still reflects the profile.
        assert!(plan.needs_assistance);
    }

    #[test]
    fn vulnerable_profiles_trigger_the_assistance_signal() {
        let notifier = RecordingNotifier::default();
        let mut planner = planner_with(
            two_exit_floor(),
            notifier.clone(),
            egress_core::PlannerConfig::default(),
        );
        let location = Point::new(0.0, 0.0, 0);

        planner.plan_escape_route(
            &fire(20.0, 20.0, 0, 1.0),
            location,
            UserProfile::Elderly,
            Instant::now(),
        );
        {
            let calls = notifier.0.lock();
            assert_eq!(calls.len(), 1);
            assert_eq!(calls[0].1, UserProfile::Elderly);
        }

        planner.plan_escape_route(
            &fire(20.0, 20.0, 0, 1.0),
            location,
            UserProfile::Standard,
            Instant::now(),
        );
        assert_eq!(notifier.0.lock().len(), 1, "standard profiles stay silent");
    }

    #[test]
    fn off_graph_location_yields_empty_path_but_keeps_exit() {
        let mut planner = planner(two_exit_floor());
        // Floor 3 has no nodes at all.
        let plan = planner.plan_escape_route(
            &fire(20.0, 20.0, 0, 1.0),
            Point::new(0.0, 0.0, 3),
            UserProfile::Standard,
            Instant::now(),
        );
        assert!(plan.exit.is_some());
        assert!(!plan.path.is_reachable());
    }
}

// ── Accessibility filter ──────────────────────────────────────────────────────

mod access {
    use egress_core::{AccessibilityLimits, Point, SearchPolicy, UserProfile};
    use egress_grid::{FloorPlan, GeometryElement};
    use egress_hazard::ObstacleField;
    use egress_spatial::{AStarSearch, GraphConfig, RouteSearch};

    use super::helpers::{anchor, build_graph, exit_at, p, planner};
    use crate::access::{AccessibilityFilter, IssueKind};

    /// 3×3 grid of 2 m cells: every planar edge is 1.6 m wide — compliant.
    fn wide_floor() -> std::sync::Arc<egress_spatial::RouteGraph> {
        let plan = FloorPlan {
            floor: 0,
            elements: vec![anchor(0.0, 0.0), exit_at(4.0, 4.0)],
        };
        build_graph(&[plan], 2.0, 0.0, &GraphConfig::default())
    }

    /// Two wide floors linked by a gentle-slope stair whose 0.17 m steps
    /// still violate the step-height limit.
    fn stepped_building() -> std::sync::Arc<egress_spatial::RouteGraph> {
        let ground = FloorPlan {
            floor: 0,
            elements: vec![
                anchor(0.0, 0.0),
                exit_at(4.0, 4.0),
                GeometryElement::Stair {
                    position: p(4.0, 4.0),
                    to_floor: 1,
                },
            ],
        };
        let upper = FloorPlan {
            floor: 1,
            elements: vec![anchor(0.0, 0.0), exit_at(4.0, 4.0)],
        };
        let config = GraphConfig {
            stair_slope: 0.04,
            ..GraphConfig::default()
        };
        build_graph(&[ground, upper], 2.0, 0.0, &config)
    }

    #[test]
    fn compliant_path_validates_clean() {
        let graph = wide_floor();
        let start = graph.node_at_cell(0, 0, 0).unwrap();
        let goal = graph.node_at_cell(2, 2, 0).unwrap();
        let path = AStarSearch::default().search(
            &graph,
            &ObstacleField::new(),
            start,
            goal,
            &SearchPolicy::default(),
        );
        let validation =
            AccessibilityFilter::new(AccessibilityLimits::default()).validate(&graph, &path);
        assert!(validation.is_valid);
        assert!(validation.issues.is_empty());
        assert_eq!(validation.compliance, 1.0);
    }

    #[test]
    fn narrow_corridors_flag_every_segment() {
        // 1 m cells give 0.8 m corridors — every segment violates width.
        let plan = FloorPlan {
            floor: 0,
            elements: vec![anchor(0.0, 0.0), exit_at(4.0, 4.0)],
        };
        let graph = build_graph(&[plan], 1.0, 0.0, &GraphConfig::default());
        let start = graph.node_at_cell(0, 0, 0).unwrap();
        let goal = graph.node_at_cell(4, 4, 0).unwrap();
        let path = AStarSearch::default().search(
            &graph,
            &ObstacleField::new(),
            start,
            goal,
            &SearchPolicy::default(),
        );
        let filter = AccessibilityFilter::new(AccessibilityLimits::default());
        let validation = filter.validate(&graph, &path);
        assert!(!validation.is_valid);
        assert_eq!(validation.issues.len(), path.segment_count());
        assert!(validation
            .issues
            .iter()
            .all(|i| i.kind == IssueKind::NarrowPath));
        assert_eq!(validation.compliance, 0.0);

        // The same deficit shows up in the difficulty score.
        let difficulty = filter.path_difficulty(&graph, &path);
        assert!((difficulty - (1.2 - 0.8) / 1.2).abs() < 1e-4);

        // And as medium-severity escort obstacles.
        let obstacles = filter.identify_obstacles(&graph, &path);
        assert_eq!(obstacles.len(), path.segment_count());
        assert!(obstacles.iter().all(|o| o.kind == IssueKind::NarrowPath));
    }

    #[test]
    fn stair_steps_flag_high_steps() {
        let graph = stepped_building();
        let start = graph.node_at_cell(0, 0, 0).unwrap();
        let goal = graph.node_at_cell(0, 0, 1).unwrap();
        // The gentle slope passes the steep-slope policy, so the biased
        // search still takes the stair.
        let path = AStarSearch::default().search(
            &graph,
            &ObstacleField::new(),
            start,
            goal,
            &SearchPolicy::accessibility_biased(),
        );
        assert!(path.is_reachable());
        let validation =
            AccessibilityFilter::new(AccessibilityLimits::default()).validate(&graph, &path);
        assert!(!validation.is_valid);
        assert!(validation
            .issues
            .iter()
            .any(|i| i.kind == IssueKind::HighSteps));
        assert!(validation.compliance < 1.0);
    }

    #[test]
    fn invalid_first_pass_replans_strictly_and_reports_full_compliance() {
        let mut planner = planner(stepped_building());
        let plan = planner.plan_accessible_path(
            Point::new(0.0, 0.0, 0),
            Point::new(1.0, 1.0, 1),
            UserProfile::Disabled,
        );
        // The strict pass is assumed compliant, not re-validated.
        assert!(plan.validation.is_valid);
        assert!(plan.validation.issues.is_empty());
        assert_eq!(plan.validation.compliance, 1.0);
        assert_eq!(plan.speed_multiplier, 0.7);
        assert!(plan.assistance_needed);
        // No channels are declared, so strict mode still finds the route.
        assert!(plan.path.is_reachable());
    }

    #[test]
    fn clean_first_pass_skips_the_strict_replan() {
        let mut planner = planner(wide_floor());
        let plan = planner.plan_accessible_path(
            Point::new(0.0, 0.0, 0),
            Point::new(4.0, 4.0, 0),
            UserProfile::Elderly,
        );
        assert!(plan.validation.is_valid);
        assert_eq!(plan.validation.compliance, 1.0);
        assert!(plan.path.is_reachable());
        assert_eq!(plan.speed_multiplier, 0.7);
    }
}

// ── Replanning loop ───────────────────────────────────────────────────────────

mod replan {
    use std::time::{Duration, Instant};

    use egress_core::{PlannerConfig, Point, UserProfile};
    use egress_hazard::{CongestionReport, Severity};

    use super::helpers::{fire, p, planner, planner_with, two_exit_floor};
    use crate::notify::NoopNotifier;
    use crate::replan::{CongestionSource, DynamicUpdater, NoopCongestionSource, ReplanningLoop};

    fn quiet_loop() -> ReplanningLoop<
        egress_spatial::AStarSearch,
        NoopNotifier,
        NoopCongestionSource,
    > {
        ReplanningLoop::new(
            planner(two_exit_floor()),
            NoopCongestionSource,
            fire(2.5, 2.5, 0, 0.5),
            Point::new(0.0, 0.0, 0),
            UserProfile::Standard,
        )
    }

    #[test]
    fn first_tick_always_emits() {
        let mut replan = quiet_loop();
        let update = replan.tick(Instant::now()).expect("first plan is a change");
        assert!(update.path_changed);
        assert_eq!(update.color, "orange");
        assert!(update.path.is_reachable());
        assert_eq!(replan.current_path().unwrap().nodes, update.path.nodes);
    }

    #[test]
    fn quiescent_ticks_stay_silent() {
        let mut replan = quiet_loop();
        let now = Instant::now();
        assert!(replan.tick(now).is_some());
        // The fire keeps growing but the route is unaffected: no events.
        assert!(replan.tick(now + Duration::from_millis(500)).is_none());
        assert!(replan.tick(now + Duration::from_secs(1)).is_none());
    }

    #[test]
    fn fire_growth_is_monotonic_across_ticks() {
        let mut replan = quiet_loop();
        let mut last_radius = replan.fire().spread_radius;
        let now = Instant::now();
        for i in 0..5u64 {
            replan.tick(now + Duration::from_millis(500 * i));
            let radius = replan.fire().spread_radius;
            assert!(radius > last_radius, "radius must grow every tick");
            // The stored zone mirrors the model.
            let zone = &replan.planner().field().fire_zones()[0];
            assert_eq!(zone.radius, radius);
            last_radius = radius;
        }
    }

    /// Feed that reports no congestion on the first poll, then floods the
    /// cell of exit (1,1).
    struct LateFlood {
        polls: usize,
    }

    impl CongestionSource for LateFlood {
        fn current_zones(&mut self, _location: Point) -> Option<Vec<CongestionReport>> {
            self.polls += 1;
            (self.polls > 1).then(|| {
                vec![CongestionReport {
                    polygon: vec![p(1.0, 1.0), p(2.0, 1.0), p(2.0, 2.0), p(1.0, 2.0)],
                    severity: Severity::High,
                    id: None,
                }]
            })
        }
    }

    #[test]
    fn changed_route_emits_an_update() {
        let mut replan = ReplanningLoop::new(
            planner(two_exit_floor()),
            LateFlood { polls: 0 },
            fire(20.0, 20.0, 0, 0.5),
            Point::new(0.0, 0.0, 0),
            UserProfile::Standard,
        );
        let now = Instant::now();
        let first = replan.tick(now).expect("initial plan");
        assert!(first.path.is_reachable());

        // Congestion now covers the chosen exit's node: the route to it
        // vanishes, which is a material change worth an event.
        let second = replan
            .tick(now + Duration::from_millis(500))
            .expect("blocked route is a change");
        assert!(!second.path.is_reachable());
    }

    #[test]
    fn dynamic_updater_runs_and_stops_idempotently() {
        let config = PlannerConfig {
            replan_interval: Duration::from_millis(10),
            ..PlannerConfig::default()
        };
        let replan = ReplanningLoop::new(
            planner_with(two_exit_floor(), NoopNotifier, config),
            NoopCongestionSource,
            fire(2.5, 2.5, 0, 0.5),
            Point::new(0.0, 0.0, 0),
            UserProfile::Standard,
        );

        let (tx, rx) = crossbeam_channel::unbounded();
        let mut updater = DynamicUpdater::new();
        updater.start(replan, move |update| {
            let _ = tx.send(update);
        });
        assert!(updater.is_running());

        // The first plan runs immediately; give the thread a moment.
        let first = rx
            .recv_timeout(Duration::from_secs(1))
            .expect("first update arrives");
        assert!(first.path_changed);

        updater.stop();
        assert!(!updater.is_running());
        // Idempotent: stopping again is a no-op.
        updater.stop();

        assert!(updater.current_path().is_some());
        assert!(!updater.history().is_empty());
    }
}
