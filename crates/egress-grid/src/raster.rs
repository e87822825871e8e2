//! Geometry → occupancy-grid rasterization.
//!
//! # Marking order
//!
//! Cells start `Walkable`.  Walls are stamped first (Bresenham along each
//! polyline leg), doors second (filled discs, re-opening wall cells they
//! overlap), exits last (single cells, winning over anything beneath).
//! Accessible channels touch only the parallel flag array, never the kind.
//!
//! Geometry that falls outside the allocated grid is clipped cell-by-cell
//! rather than rejected — upstream CAD data routinely carries strays.

use egress_core::{ExitId, PlanarPoint};

use crate::geometry::{Bounds, FloorPlan, GeometryElement};
use crate::grid::{CellKind, ExitSite, FloorGrid, GridBounds, GridConfig, GridTransform, StairSite};
use crate::GridResult;

/// Converts classified floor plans into [`FloorGrid`]s.
///
/// Construction validates the configuration once; rasterization itself is
/// infallible (bad geometry clips, it does not error).
pub struct Rasterizer {
    config: GridConfig,
}

impl Rasterizer {
    pub fn new(config: GridConfig) -> GridResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Rasterize every floor of a building.
    ///
    /// Exit ids are assigned sequentially across floors so they stay unique
    /// building-wide.
    pub fn rasterize_building(&self, plans: &[FloorPlan]) -> Vec<FloorGrid> {
        let mut next_exit: u16 = 0;
        plans
            .iter()
            .map(|plan| {
                let grid = self.rasterize_with_base(plan, next_exit);
                next_exit += grid.exits.len() as u16;
                grid
            })
            .collect()
    }

    /// Rasterize a single floor plan (exit ids start at 0).
    pub fn rasterize_floor(&self, plan: &FloorPlan) -> FloorGrid {
        self.rasterize_with_base(plan, 0)
    }

    fn rasterize_with_base(&self, plan: &FloorPlan, exit_base: u16) -> FloorGrid {
        let gs = self.config.grid_size;
        let pad_cells = self.config.padding_cells();
        let pad = pad_cells as f32 * gs;

        // A plan with no geometry still produces a (padding-only) grid.
        let bounds = plan.bounds().unwrap_or(Bounds::at(PlanarPoint::default()));

        // +1 so geometry sitting exactly on the max edge lands inside the
        // grid instead of being clipped.
        let body_w = (bounds.width() / gs).ceil() as usize + 1;
        let body_h = (bounds.height() / gs).ceil() as usize + 1;
        let width = body_w + 2 * pad_cells as usize;
        let height = body_h + 2 * pad_cells as usize;

        let transform = GridTransform {
            origin_x: bounds.min_x - pad,
            origin_y: bounds.min_y - pad,
            grid_size: gs,
        };
        let grid_bounds = GridBounds {
            min_x: bounds.min_x - pad,
            min_y: bounds.min_y - pad,
            max_x: bounds.max_x + pad,
            max_y: bounds.max_y + pad,
            grid_width: width,
            grid_height: height,
            grid_size: gs,
        };

        let mut grid = FloorGrid::new(plan.floor, width, height, transform, grid_bounds);

        // Pass 1: walls.
        for element in &plan.elements {
            if let GeometryElement::Wall { points } = element {
                match points.as_slice() {
                    [] => {}
                    [single] => {
                        let (gx, gy) = transform.world_to_grid(*single);
                        grid.set_kind(gx, gy, CellKind::Obstacle);
                    }
                    _ => {
                        for pair in points.windows(2) {
                            let a = transform.world_to_grid(pair[0]);
                            let b = transform.world_to_grid(pair[1]);
                            mark_line(&mut grid, a, b, CellKind::Obstacle);
                        }
                    }
                }
            }
        }

        // Accessibility flags: with no declared channels every walkable cell
        // counts as accessible, so strict-mode search degrades gracefully on
        // buildings that never tagged their channels.
        let has_channels = plan
            .elements
            .iter()
            .any(|e| matches!(e, GeometryElement::AccessibleChannel { .. }));
        if has_channels {
            for element in &plan.elements {
                if let GeometryElement::AccessibleChannel { center, radius } = element {
                    let c = transform.world_to_grid(*center);
                    let r = (radius / gs).ceil() as i32;
                    for_disc(c, r, |gx, gy| grid.set_accessible(gx, gy, true));
                }
            }
        } else {
            grid.fill_accessible(true);
        }

        // Pass 2: doors re-open the walls they punch through.
        for element in &plan.elements {
            if let GeometryElement::Door { center, radius } = element {
                let c = transform.world_to_grid(*center);
                let r = (radius / gs).ceil() as i32;
                for_disc(c, r, |gx, gy| grid.set_kind(gx, gy, CellKind::Door));
            }
        }

        // Pass 3: exits win over everything beneath them.
        for element in &plan.elements {
            match element {
                GeometryElement::Exit { position, label } => {
                    let (gx, gy) = transform.world_to_grid(*position);
                    if grid.in_bounds(gx, gy) {
                        grid.set_kind(gx, gy, CellKind::Exit);
                        let id = ExitId(exit_base + grid.exits.len() as u16);
                        grid.exits.push(ExitSite {
                            id,
                            grid_x: gx,
                            grid_y: gy,
                            position: *position,
                            label: label.clone(),
                        });
                    }
                }
                GeometryElement::Stair { position, to_floor } => {
                    let (gx, gy) = transform.world_to_grid(*position);
                    if grid.in_bounds(gx, gy) {
                        grid.stairs.push(StairSite {
                            grid_x: gx,
                            grid_y: gy,
                            to_floor: *to_floor,
                        });
                    }
                }
                _ => {}
            }
        }

        grid
    }
}

// ── Cell marking primitives ───────────────────────────────────────────────────

/// Integer line rasterization (Bresenham).  Coincident endpoints mark a
/// single cell.  Each touched cell is clipped independently.
fn mark_line(grid: &mut FloorGrid, from: (i32, i32), to: (i32, i32), kind: CellKind) {
    let dx = (to.0 - from.0).abs();
    let dy = (to.1 - from.1).abs();
    let sx = if from.0 < to.0 { 1 } else { -1 };
    let sy = if from.1 < to.1 { 1 } else { -1 };
    let mut err = dx - dy;

    let (mut x, mut y) = from;
    loop {
        grid.set_kind(x, y, kind);
        if (x, y) == to {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}

/// Visit every cell of a filled disc of `radius` cells around `center`.
fn for_disc(center: (i32, i32), radius: i32, mut visit: impl FnMut(i32, i32)) {
    for gy in (center.1 - radius)..=(center.1 + radius) {
        for gx in (center.0 - radius)..=(center.0 + radius) {
            let dx = (gx - center.0) as f32;
            let dy = (gy - center.1) as f32;
            if (dx * dx + dy * dy).sqrt() <= radius as f32 {
                visit(gx, gy);
            }
        }
    }
}
