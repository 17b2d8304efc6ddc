use crate::mesh::{Bounds, UnstructuredGrid};

/// target number of cells per bin when sizing the locator
const CELLS_PER_BIN: f64 = 8.0;
const MAX_BINS_PER_AXIS: usize = 256;

/// Uniform binning of cell bounding boxes, used to find candidate cells for a point
///
/// Each cell is registered in every bin its bounding box overlaps. Axes without extent
/// (a planar mesh) get a single bin.
pub struct CellLocator {
    bounds: Bounds,
    divisions: [usize; 3],
    bins: Vec<Vec<usize>>,
}

impl CellLocator {
    /// bin every cell of `grid`. `tol` inflates each cell box so points on a shared face
    /// find both neighbors
    pub fn build(grid: &UnstructuredGrid, bounds: Bounds, tol: f64) -> Self {
        let divisions = divisions(&bounds, grid.num_cells());
        let num_bins = divisions.iter().product();
        let mut bins = vec![Vec::new(); num_bins];

        let mut locator = Self {
            bounds,
            divisions,
            bins: Vec::new(),
        };

        for (cell, (_, ids)) in grid.cells.iter().enumerate() {
            let Some(cell_bounds) = Bounds::from_points(ids.iter().map(|id| grid.point(*id)))
            else {
                continue;
            };
            let cell_bounds = cell_bounds.inflate(tol);

            let lo = locator.bin_index(cell_bounds.min);
            let hi = locator.bin_index(cell_bounds.max);

            for k in lo[2]..=hi[2] {
                for j in lo[1]..=hi[1] {
                    for i in lo[0]..=hi[0] {
                        bins[locator.flat(i, j, k)].push(cell);
                    }
                }
            }
        }

        locator.bins = bins;

        log::debug!(
            "cell locator with {:?} bins, {} cells, largest bin {}",
            divisions,
            grid.num_cells(),
            locator.bins.iter().map(Vec::len).max().unwrap_or(0)
        );

        locator
    }

    /// cells whose (inflated) bounding box may contain `point`, in ascending id order
    pub fn candidates(&self, point: [f64; 3]) -> &[usize] {
        let [i, j, k] = self.bin_index(point);
        &self.bins[self.flat(i, j, k)]
    }

    pub fn divisions(&self) -> [usize; 3] {
        self.divisions
    }

    /// the bin containing a point, clamped to the locator bounds
    fn bin_index(&self, point: [f64; 3]) -> [usize; 3] {
        let mut out = [0; 3];

        for axis in 0..3 {
            let length = self.bounds.length(axis);
            let n = self.divisions[axis];

            if n == 1 || length <= 0.0 {
                continue;
            }

            let relative = (point[axis] - self.bounds.min[axis]) / length;
            let index = (relative * n as f64).floor();
            out[axis] = if index.is_nan() || index < 0.0 {
                0
            } else {
                (index as usize).min(n - 1)
            };
        }

        out
    }

    fn flat(&self, i: usize, j: usize, k: usize) -> usize {
        i + self.divisions[0] * (j + self.divisions[1] * k)
    }
}

/// Split the bounds into roughly cubic bins holding about `CELLS_PER_BIN` cells each
fn divisions(bounds: &Bounds, num_cells: usize) -> [usize; 3] {
    let lengths = [bounds.length(0), bounds.length(1), bounds.length(2)];
    let active: Vec<f64> = lengths.iter().copied().filter(|l| *l > 0.0).collect();

    if active.is_empty() || num_cells == 0 {
        return [1, 1, 1];
    }

    let target_bins = (num_cells as f64 / CELLS_PER_BIN).max(1.0);
    let volume: f64 = active.iter().product();
    // edge length of a bin such that bins^dim ~ target
    let bin_size = (volume / target_bins).powf(1.0 / active.len() as f64);

    let mut out = [1; 3];
    for axis in 0..3 {
        if lengths[axis] > 0.0 && bin_size > 0.0 {
            let n = (lengths[axis] / bin_size).ceil();
            out[axis] = if n.is_finite() {
                (n as usize).clamp(1, MAX_BINS_PER_AXIS)
            } else {
                1
            };
        }
    }

    out
}
