use log::trace;

use crate::collision::{SpatialGrid, AABB};
use crate::error::{Error, Result};
use crate::interaction::{Optimizer, Pairing};
use crate::objects::{Being, Handle};

const CELLS_PER_CANDIDATE: usize = 4;
const MIN_CELLS: usize = 64;

/// Broadphase over a uniform grid rebuilt from the candidates' bounding
/// boxes at the start of every pass.
///
/// Only candidates sharing a grid cell with the body's box are handed to the
/// interactor, in group order. Positions are read once, in `prepare`; a
/// candidate moved by an immediate handler later in the same pass is still
/// looked up where it was.
///
/// The grid holds a few cells per candidate at most; widely scattered
/// candidates get coarser cells rather than a larger grid.
#[derive(Debug)]
pub struct GridOptimizer {
    cell_size: f64,
    grid: Option<SpatialGrid>,
}

impl GridOptimizer {
    pub fn new(cell_size: f64) -> Result<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "grid cell size must be positive, got {cell_size}"
            )));
        }
        Ok(GridOptimizer { cell_size, grid: None })
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }
}

impl<A: Being, B: Being> Optimizer<A, B> for GridOptimizer {
    fn prepare(&mut self, candidates: &[Handle<B>]) -> Result<()> {
        let mut boxes = Vec::with_capacity(candidates.len());
        for handle in candidates {
            boxes.push(handle.lock()?.body().bounding_box());
        }

        let Some(bounds) = boxes.iter().copied().reduce(|mut acc, next| {
            acc.merge(&next);
            acc
        }) else {
            self.grid = None;
            return Ok(());
        };

        let budget = boxes.len().saturating_mul(CELLS_PER_CANDIDATE).max(MIN_CELLS);
        let mut grid = SpatialGrid::with_cell_budget(bounds, self.cell_size, budget)?;
        for (index, aabb) in boxes.iter().enumerate() {
            grid.insert(index, aabb);
        }
        trace!("grid optimizer indexed {} candidates", boxes.len());
        self.grid = Some(grid);
        Ok(())
    }

    fn detect(&mut self, body: &Handle<A>, pairing: &mut Pairing<'_, A, B>) -> Result<()> {
        let Some(grid) = &self.grid else {
            return Ok(());
        };
        // Released before the pairing locks the body again.
        let query: AABB = body.lock()?.body().bounding_box();

        let candidates = pairing.candidates();
        for index in grid.query(&query) {
            if let Some(candidate) = candidates.get(index) {
                pairing.interact(body, candidate)?;
            }
        }
        Ok(())
    }
}
