//! Unit tests for egress-grid.
//!
//! All fixtures are hand-crafted plans small enough to reason about cell by
//! cell.

mod helpers {
    use egress_core::PlanarPoint;

    use crate::{FloorPlan, GeometryElement, GridConfig, Rasterizer};

    pub fn p(x: f32, y: f32) -> PlanarPoint {
        PlanarPoint::new(x, y)
    }

    pub fn unit_rasterizer() -> Rasterizer {
        Rasterizer::new(GridConfig {
            grid_size: 1.0,
            padding: 0.0,
        })
        .unwrap()
    }

    /// One floor, a horizontal wall from (0,0) to (4,0) and an exit at (4,4).
    pub fn walled_plan() -> FloorPlan {
        FloorPlan {
            floor: 0,
            elements: vec![
                GeometryElement::Wall {
                    points: vec![p(0.0, 0.0), p(4.0, 0.0)],
                },
                GeometryElement::Exit {
                    position: p(4.0, 4.0),
                    label: Some("north stairwell".into()),
                },
            ],
        }
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

mod config {
    use crate::{GridConfig, GridError, Rasterizer};

    #[test]
    fn zero_grid_size_rejected() {
        let result = Rasterizer::new(GridConfig {
            grid_size: 0.0,
            padding: 1.0,
        });
        assert!(matches!(result, Err(GridError::InvalidConfiguration(_))));
    }

    #[test]
    fn negative_padding_rejected() {
        let result = Rasterizer::new(GridConfig {
            grid_size: 1.0,
            padding: -0.5,
        });
        assert!(matches!(result, Err(GridError::InvalidConfiguration(_))));
    }

    #[test]
    fn padding_rounds_up_to_whole_cells() {
        let cfg = GridConfig {
            grid_size: 0.5,
            padding: 1.2,
        };
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.padding_cells(), 3); // ceil(1.2 / 0.5)
    }
}

// ── Rasterization ─────────────────────────────────────────────────────────────

mod raster {
    use super::helpers::{p, unit_rasterizer, walled_plan};
    use crate::{CellKind, FloorPlan, GeometryElement, GridConfig, Rasterizer};

    #[test]
    fn identical_input_produces_identical_grids() {
        let r = unit_rasterizer();
        let plan = walled_plan();
        assert_eq!(r.rasterize_floor(&plan), r.rasterize_floor(&plan));
    }

    #[test]
    fn wall_cells_marked_obstacle() {
        let grid = unit_rasterizer().rasterize_floor(&walled_plan());
        // Bounds (0,0)-(4,4), unit cells, no padding → 5×5 grid.
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 5);
        for gx in 0..=4 {
            assert_eq!(grid.kind(gx, 0), Some(CellKind::Obstacle));
        }
        // A row above the wall stays walkable.
        assert_eq!(grid.kind(2, 1), Some(CellKind::Walkable));
    }

    #[test]
    fn diagonal_wall_rasterizes_contiguously() {
        let r = unit_rasterizer();
        let plan = FloorPlan {
            floor: 0,
            elements: vec![GeometryElement::Wall {
                points: vec![p(0.0, 0.0), p(4.0, 4.0)],
            }],
        };
        let grid = r.rasterize_floor(&plan);
        for i in 0..=4 {
            assert_eq!(grid.kind(i, i), Some(CellKind::Obstacle));
        }
    }

    #[test]
    fn degenerate_wall_marks_single_cell() {
        let r = unit_rasterizer();
        let plan = FloorPlan {
            floor: 0,
            elements: vec![
                GeometryElement::Wall {
                    points: vec![p(2.0, 2.0), p(2.0, 2.0)],
                },
                // Anchor so the grid spans more than one cell.
                GeometryElement::Exit {
                    position: p(0.0, 0.0),
                    label: None,
                },
            ],
        };
        let grid = r.rasterize_floor(&plan);
        assert_eq!(grid.kind(2, 2), Some(CellKind::Obstacle));
        let obstacles = (0..grid.width() as i32)
            .flat_map(|x| (0..grid.height() as i32).map(move |y| (x, y)))
            .filter(|&(x, y)| grid.kind(x, y) == Some(CellKind::Obstacle))
            .count();
        assert_eq!(obstacles, 1);
    }

    #[test]
    fn door_reopens_wall_cells() {
        let r = unit_rasterizer();
        let plan = FloorPlan {
            floor: 0,
            elements: vec![
                GeometryElement::Wall {
                    points: vec![p(0.0, 2.0), p(4.0, 2.0)],
                },
                GeometryElement::Door {
                    center: p(2.0, 2.0),
                    radius: 0.4,
                },
            ],
        };
        let grid = r.rasterize_floor(&plan);
        assert_eq!(grid.kind(2, 2), Some(CellKind::Door));
        // Wall cells away from the door stay blocked.
        assert_eq!(grid.kind(0, 2), Some(CellKind::Obstacle));
    }

    #[test]
    fn exit_wins_over_wall_and_records_site() {
        let r = unit_rasterizer();
        let plan = FloorPlan {
            floor: 0,
            elements: vec![
                GeometryElement::Wall {
                    points: vec![p(0.0, 0.0), p(4.0, 0.0)],
                },
                GeometryElement::Exit {
                    position: p(2.0, 0.0),
                    label: None,
                },
            ],
        };
        let grid = r.rasterize_floor(&plan);
        assert_eq!(grid.kind(2, 0), Some(CellKind::Exit));
        assert_eq!(grid.exits.len(), 1);
        assert_eq!(grid.exits[0].grid_x, 2);
        assert_eq!(grid.exits[0].grid_y, 0);
    }

    #[test]
    fn exit_ids_unique_across_floors() {
        let r = unit_rasterizer();
        let exit = |x: f32, y: f32| GeometryElement::Exit {
            position: p(x, y),
            label: None,
        };
        let plans = vec![
            FloorPlan {
                floor: 0,
                elements: vec![exit(0.0, 0.0), exit(5.0, 5.0)],
            },
            FloorPlan {
                floor: 1,
                elements: vec![exit(0.0, 0.0)],
            },
        ];
        let grids = r.rasterize_building(&plans);
        let ids: Vec<u16> = grids
            .iter()
            .flat_map(|g| g.exits.iter().map(|e| e.id.0))
            .collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn disc_overflow_clips_silently() {
        // Door at the bounds corner with a ceil'd disc radius that pokes
        // past the grid edge: out-of-grid cells are dropped, nothing panics.
        let r = unit_rasterizer();
        let plan = FloorPlan {
            floor: 0,
            elements: vec![
                GeometryElement::Wall {
                    points: vec![p(0.0, 0.0), p(3.0, 0.0)],
                },
                GeometryElement::Door {
                    center: p(0.0, 0.0),
                    radius: 0.3,
                },
            ],
        };
        let grid = r.rasterize_floor(&plan);
        assert_eq!(grid.kind(0, 0), Some(CellKind::Door));
    }

    #[test]
    fn padding_grows_grid_and_shifts_origin() {
        let r = Rasterizer::new(GridConfig {
            grid_size: 1.0,
            padding: 2.0,
        })
        .unwrap();
        let grid = r.rasterize_floor(&walled_plan());
        // 5×5 body plus 2 padding cells per side.
        assert_eq!(grid.width(), 9);
        assert_eq!(grid.height(), 9);
        assert_eq!(grid.transform.origin_x, -2.0);
        assert_eq!(grid.bounds.min_x, -2.0);
        assert_eq!(grid.bounds.max_x, 6.0);
        // The wall now sits 2 cells in.
        assert_eq!(grid.kind(2, 2), Some(crate::CellKind::Obstacle));
    }
}

// ── Accessibility flags ───────────────────────────────────────────────────────

mod accessibility {
    use super::helpers::{p, unit_rasterizer, walled_plan};
    use crate::GeometryElement;

    #[test]
    fn no_channels_means_everything_accessible() {
        let grid = unit_rasterizer().rasterize_floor(&walled_plan());
        assert!(grid.is_accessible(2, 2));
        assert!(grid.is_accessible(0, 4));
    }

    #[test]
    fn channels_restrict_the_flag() {
        let mut plan = walled_plan();
        plan.elements.push(GeometryElement::AccessibleChannel {
            center: p(2.0, 2.0),
            radius: 1.0,
        });
        let grid = unit_rasterizer().rasterize_floor(&plan);
        assert!(grid.is_accessible(2, 2));
        assert!(grid.is_accessible(2, 3));
        assert!(!grid.is_accessible(4, 4));
    }
}

// ── Transform ─────────────────────────────────────────────────────────────────

mod transform {
    use super::helpers::{p, unit_rasterizer, walled_plan};

    #[test]
    fn world_grid_roundtrip_through_cell_center() {
        let grid = unit_rasterizer().rasterize_floor(&walled_plan());
        let center = grid.transform.cell_center(3, 1);
        assert_eq!(grid.transform.world_to_grid(center), (3, 1));
        assert_eq!(center, p(3.5, 1.5));
    }
}
