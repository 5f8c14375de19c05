//! Uniform-grid spatial partitioning.
//!
//! Bodies are bucketed by position into square cells stored in one flat
//! array (`row * columns + column`). A query returns everything in the 3×3
//! block around a point, which turns the all-pairs collision check into an
//! amortized O(1) lookup per target.
//!
//! The grid only ever grows. It tracks the bounding box of every position it
//! has seen; when a position falls outside the allocated cells the backing
//! array is reallocated with padding and every entry is re-bucketed. The
//! origin only moves by whole cells, so entries that shared a cell before a
//! resize still share one afterwards, in the same order.
//!
//! All mutation takes `&mut self`, so traversal and mutation can never
//! overlap. The engine owns the grid on the simulation thread.

use std::collections::BTreeSet;

use hecs::{Entity, World};

use pronav_core::components::RigidBody;
use pronav_core::constants::{DEFAULT_GRID_CELL_SIDE, GRID_GROW_PADDING, MIN_GRID_CELL_SIDE};
use pronav_core::state::GridView;
use pronav_core::types::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
struct GridEntry {
    entity: Entity,
    /// Position the entry was bucketed at.
    position: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    min: Vec2,
    max: Vec2,
}

impl Bounds {
    fn include(&mut self, p: Vec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }
}

/// Near-neighbour index over the non-owning entity handles of moving bodies.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_side: f64,
    /// World position of the top-left corner of cell 0.
    origin: Vec2,
    columns: usize,
    rows: usize,
    cells: Vec<Vec<GridEntry>>,
    bounds: Bounds,
    /// Non-empty cells, so passes can skip the rest.
    occupied: BTreeSet<usize>,
    len: usize,
}

impl SpatialGrid {
    /// Allocate enough cells to cover `extent` (from the origin) plus padding.
    pub fn new(extent: Vec2, cell_side: f64) -> Self {
        let cell_side = if cell_side.is_finite() && cell_side > 0.0 {
            cell_side.max(MIN_GRID_CELL_SIDE)
        } else {
            DEFAULT_GRID_CELL_SIDE
        };
        let extent = extent.max(Vec2::ZERO);
        let columns = (extent.x / cell_side).ceil() as usize + GRID_GROW_PADDING;
        let rows = (extent.y / cell_side).ceil() as usize + GRID_GROW_PADDING;

        Self {
            cell_side,
            origin: Vec2::ZERO,
            columns,
            rows,
            cells: vec![Vec::new(); columns * rows],
            bounds: Bounds {
                min: Vec2::ZERO,
                max: extent,
            },
            occupied: BTreeSet::new(),
            len: 0,
        }
    }

    /// Add a body at `position`, growing the grid first if needed.
    pub fn insert(&mut self, entity: Entity, position: Vec2) {
        if !position.is_finite() {
            log::warn!("grid: ignoring {entity:?} at non-finite position {position:?}");
            return;
        }
        self.ensure_capacity(position);
        self.push_entry(GridEntry { entity, position });
    }

    /// Rebucket every entry from its body's current position and drop
    /// entries whose body is expired or gone. Call once per substep.
    ///
    /// Runs in two phases: collect every live entry with its new position,
    /// then redistribute. No entry is ever compared against a slot another
    /// entry has already moved into.
    pub fn update(&mut self, world: &World) {
        let mut live = Vec::with_capacity(self.len);
        for idx in std::mem::take(&mut self.occupied) {
            for entry in self.cells[idx].drain(..) {
                let Ok(body) = world.get::<&RigidBody>(entry.entity) else {
                    continue;
                };
                if body.expired || !body.position.is_finite() {
                    continue;
                }
                live.push(GridEntry {
                    entity: entry.entity,
                    position: body.position,
                });
            }
        }
        self.len = 0;

        for entry in &live {
            self.ensure_capacity(entry.position);
        }
        for entry in live {
            self.push_entry(entry);
        }
    }

    /// Everything in the 3×3 block of cells around `position`. Each entity
    /// appears at most once.
    pub fn get_nearest(&self, position: Vec2) -> Vec<Entity> {
        let mut found = Vec::new();
        if !position.is_finite() {
            return found;
        }

        let (column, row) = self.cell_coords(position);
        for r in row.saturating_sub(1)..=row.saturating_add(1) {
            if r < 0 || r >= self.rows as i64 {
                continue;
            }
            for c in column.saturating_sub(1)..=column.saturating_add(1) {
                if c < 0 || c >= self.columns as i64 {
                    continue;
                }
                let idx = r as usize * self.columns + c as usize;
                found.extend(self.cells[idx].iter().map(|entry| entry.entity));
            }
        }
        found
    }

    /// Grow the tracked bounds to include `position` and, if the allocated
    /// cells no longer cover them, reallocate and re-bucket.
    pub fn ensure_capacity(&mut self, position: Vec2) {
        // Bounds first: every index below is computed against them.
        self.bounds.include(position);

        let (min_column, min_row) = self.cell_coords(self.bounds.min);
        let (max_column, max_row) = self.cell_coords(self.bounds.max);

        let shift_columns = if min_column < 0 {
            (-min_column) as usize + GRID_GROW_PADDING
        } else {
            0
        };
        let shift_rows = if min_row < 0 {
            (-min_row) as usize + GRID_GROW_PADDING
        } else {
            0
        };
        let needed_columns = (max_column + 1) as usize + shift_columns;
        let needed_rows = (max_row + 1) as usize + shift_rows;

        if shift_columns == 0
            && shift_rows == 0
            && needed_columns <= self.columns
            && needed_rows <= self.rows
        {
            return;
        }

        let grow = |current: usize, needed: usize| {
            if needed > current {
                needed + GRID_GROW_PADDING
            } else {
                current
            }
        };
        let columns = grow(self.columns + shift_columns, needed_columns);
        let rows = grow(self.rows + shift_rows, needed_rows);

        self.origin -= Vec2::new(
            shift_columns as f64 * self.cell_side,
            shift_rows as f64 * self.cell_side,
        );
        self.columns = columns;
        self.rows = rows;

        let old_cells = std::mem::replace(&mut self.cells, vec![Vec::new(); columns * rows]);
        let old_occupied = std::mem::take(&mut self.occupied);
        self.len = 0;
        for idx in old_occupied {
            for &entry in &old_cells[idx] {
                self.push_entry(entry);
            }
        }

        log::debug!(
            "grid: resized to {}x{} cells, origin {:?}, {} entries kept",
            self.columns,
            self.rows,
            self.origin,
            self.len
        );
    }

    /// Empty every bucket. The backing array is kept.
    pub fn clear(&mut self) {
        for idx in std::mem::take(&mut self.occupied) {
            self.cells[idx].clear();
        }
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_side(&self) -> f64 {
        self.cell_side
    }

    pub fn occupied_cells(&self) -> usize {
        self.occupied.len()
    }

    pub fn view(&self) -> GridView {
        GridView {
            columns: self.columns,
            rows: self.rows,
            occupied_cells: self.occupied.len(),
            objects: self.len,
        }
    }

    /// Index of the cell currently holding `entity`.
    pub fn cell_of(&self, entity: Entity) -> Option<usize> {
        self.occupied
            .iter()
            .copied()
            .find(|&idx| self.cells[idx].iter().any(|e| e.entity == entity))
    }

    /// Signed cell coordinates relative to the current origin.
    fn cell_coords(&self, position: Vec2) -> (i64, i64) {
        let offset = (position - self.origin) / self.cell_side;
        (offset.x.floor() as i64, offset.y.floor() as i64)
    }

    /// Only valid for positions already covered by `ensure_capacity`.
    fn push_entry(&mut self, entry: GridEntry) {
        let (column, row) = self.cell_coords(entry.position);
        let idx = row as usize * self.columns + column as usize;
        self.cells[idx].push(entry);
        self.occupied.insert(idx);
        self.len += 1;
    }
}
