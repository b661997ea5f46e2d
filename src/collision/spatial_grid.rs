// Implements a simple uniform spatial grid for broadphase candidate lookup.

use log::debug;

use crate::collision::AABB;
use crate::error::{Error, Result};
use crate::math::vec2::Vec2;

/// Represents a cell in the spatial grid.
#[derive(Debug, Default, Clone)]
struct GridCell {
    entries: Vec<usize>,
}

/// A uniform spatial grid for accelerating overlap queries.
///
/// Entries are plain indices into whatever list the caller keeps; the grid
/// only remembers which cells each index's box touches.
#[derive(Debug)]
pub struct SpatialGrid {
    bounds: AABB,         // The overall area covered by the grid
    inv_cell_size: f64,   // 1.0 / cell_size, cached for performance
    num_cols: usize,      // Number of columns in the grid
    num_rows: usize,      // Number of rows in the grid
    cells: Vec<GridCell>, // Flattened 1D vector representing the 2D grid
}

/// Cell budget used by [`SpatialGrid::new`].
pub const DEFAULT_MAX_CELLS: usize = 1 << 16;

impl SpatialGrid {
    /// Creates a new SpatialGrid holding at most [`DEFAULT_MAX_CELLS`] cells.
    ///
    /// # Arguments
    /// * `bounds` - The AABB defining the world area the grid should cover.
    /// * `cell_size` - The desired size (width/height) for each grid cell.
    pub fn new(bounds: AABB, cell_size: f64) -> Result<Self> {
        Self::with_cell_budget(bounds, cell_size, DEFAULT_MAX_CELLS)
    }

    /// Creates a grid of at most `max_cells` cells.
    ///
    /// Cells start at `cell_size` and double until the grid fits, so sparse
    /// entries spread over a huge area share coarse cells instead of
    /// allocating one per `cell_size` square.
    pub fn with_cell_budget(bounds: AABB, cell_size: f64, max_cells: usize) -> Result<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "grid cell size must be positive, got {cell_size}"
            )));
        }
        let grid_width = bounds.max.x - bounds.min.x;
        let grid_height = bounds.max.y - bounds.min.y;
        if !grid_width.is_finite() || !grid_height.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "grid bounds must have a finite extent, got {bounds:?}"
            )));
        }

        let budget = max_cells.max(1) as f64;
        let mut cell_size = cell_size;
        // Calculate grid dimensions, ensuring at least one cell
        let (mut cols, mut rows) = Self::dimensions(grid_width, grid_height, cell_size);
        while cols * rows > budget {
            cell_size *= 2.0;
            (cols, rows) = Self::dimensions(grid_width, grid_height, cell_size);
        }
        // Both fit in the budget, so neither the casts nor the product overflow.
        let num_cols = cols as usize;
        let num_rows = rows as usize;
        let total_cells = num_cols * num_rows;
        debug!(
            "creating spatial grid: bounds={:?}, cell_size={}, dims={}x{}, total_cells={}",
            bounds, cell_size, num_cols, num_rows, total_cells
        );

        Ok(SpatialGrid {
            bounds,
            inv_cell_size: 1.0 / cell_size,
            num_cols,
            num_rows,
            cells: vec![GridCell::default(); total_cells],
        })
    }

    fn dimensions(width: f64, height: f64, cell_size: f64) -> (f64, f64) {
        (
            (width / cell_size).ceil().max(1.0),
            (height / cell_size).ceil().max(1.0),
        )
    }

    pub fn bounds(&self) -> AABB {
        self.bounds
    }

    // --- Helper Methods ---

    /// Converts world coordinates to grid cell indices (col, row).
    #[inline]
    fn get_cell_indices(&self, point: Vec2) -> (isize, isize) {
        let local_x = point.x - self.bounds.min.x;
        let local_y = point.y - self.bounds.min.y;
        let col = (local_x * self.inv_cell_size).floor() as isize;
        let row = (local_y * self.inv_cell_size).floor() as isize;
        (col, row)
    }

    /// Converts grid cell indices (col, row) to a 1D vector index.
    /// Returns None if the indices are outside the grid bounds.
    #[inline]
    fn get_cell_index_1d(&self, col: isize, row: isize) -> Option<usize> {
        if col >= 0 && col < self.num_cols as isize && row >= 0 && row < self.num_rows as isize {
            Some(col as usize + row as usize * self.num_cols)
        } else {
            None
        }
    }

    /// Determines the range of grid cells overlapped by an AABB, clamped to the grid.
    fn get_cell_range(&self, aabb: &AABB) -> (isize, isize, isize, isize) {
        let (min_col, min_row) = self.get_cell_indices(aabb.min);
        let (max_col, max_row) = self.get_cell_indices(aabb.max);
        let last_col = self.num_cols as isize - 1;
        let last_row = self.num_rows as isize - 1;
        (
            min_col.clamp(0, last_col),
            min_row.clamp(0, last_row),
            max_col.clamp(0, last_col),
            max_row.clamp(0, last_row),
        )
    }

    // --- Public API Methods ---

    /// Inserts an entry's AABB into the grid.
    ///
    /// # Arguments
    /// * `index` - The index of the entry in the caller's list.
    /// * `aabb` - The world-space AABB of the entry.
    pub fn insert(&mut self, index: usize, aabb: &AABB) {
        if !self.bounds.overlaps(aabb) {
            return;
        }
        let (min_col, min_row, max_col, max_row) = self.get_cell_range(aabb);
        for row in min_row..=max_row {
            for col in min_col..=max_col {
                if let Some(index_1d) = self.get_cell_index_1d(col, row) {
                    self.cells[index_1d].entries.push(index);
                }
            }
        }
    }

    /// Returns every entry sharing a cell with `aabb`, ascending and without
    /// duplicates.
    ///
    /// This is a broadphase: the result may contain entries whose boxes do
    /// not actually overlap `aabb`, but never misses one that does.
    pub fn query(&self, aabb: &AABB) -> Vec<usize> {
        let mut found = Vec::new();
        if !self.bounds.overlaps(aabb) {
            return found;
        }
        let (min_col, min_row, max_col, max_row) = self.get_cell_range(aabb);
        for row in min_row..=max_row {
            for col in min_col..=max_col {
                if let Some(index_1d) = self.get_cell_index_1d(col, row) {
                    found.extend_from_slice(&self.cells[index_1d].entries);
                }
            }
        }
        found.sort_unstable();
        found.dedup();
        found
    }
}
