use super::Bounds;
use crate::array::AttributeTable;

use ndarray::ArrayView3;

/// A regular grid of points: `dimensions` points along each axis starting at `origin`
/// and separated by `spacing`
///
/// Point ids run fastest along x, then y, then z.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub dimensions: [usize; 3],
    pub origin: [f64; 3],
    pub spacing: [f64; 3],
    pub point_data: AttributeTable,
}

impl ImageData {
    pub fn new(dimensions: [usize; 3], origin: [f64; 3], spacing: [f64; 3]) -> Self {
        Self {
            dimensions,
            origin,
            spacing,
            point_data: AttributeTable::new(),
        }
    }

    pub fn num_points(&self) -> usize {
        self.dimensions.iter().product()
    }

    /// the `(i, j, k)` structured index of a point id
    pub fn structured_index(&self, id: usize) -> [usize; 3] {
        let [nx, ny, _] = self.dimensions;
        [id % nx, (id / nx) % ny, id / (nx * ny)]
    }

    pub fn point(&self, id: usize) -> [f64; 3] {
        let ijk = self.structured_index(id);
        let mut out = [0.0; 3];
        for axis in 0..3 {
            out[axis] = self.origin[axis] + ijk[axis] as f64 * self.spacing[axis];
        }
        out
    }

    /// the `WholeExtent` of the grid, `[0, nx - 1, 0, ny - 1, 0, nz - 1]`
    pub fn extent(&self) -> [usize; 6] {
        let [nx, ny, nz] = self.dimensions;
        [
            0,
            nx.saturating_sub(1),
            0,
            ny.saturating_sub(1),
            0,
            nz.saturating_sub(1),
        ]
    }

    pub fn bounds(&self) -> Bounds {
        let mut max = [0.0; 3];
        for axis in 0..3 {
            max[axis] = self.origin[axis]
                + self.dimensions[axis].saturating_sub(1) as f64 * self.spacing[axis];
        }
        Bounds::new(self.origin, max)
    }

    /// view a single component point array as a `(nz, ny, nx)` volume
    pub fn scalar_volume(&self, name: &str) -> Option<ArrayView3<'_, f64>> {
        let array = self.point_data.get(name)?;
        let signal = array.as_signal()?;
        let [nx, ny, nz] = self.dimensions;
        ArrayView3::from_shape((nz, ny, nx), signal).ok()
    }
}
