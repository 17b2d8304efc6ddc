//! Probe an unstructured grid on a regular image grid
//!
//! Every grid point is located inside a cell of the input mesh and all point data arrays
//! are interpolated there with the cell's shape functions. Cell data arrays are carried
//! over as point arrays holding the value of the containing cell. Points that fall outside the
//! mesh receive zeros and are flagged in the `vtkValidPointMask` and `vtkGhostType`
//! arrays, the same two arrays paraview expects from a resampled dataset.

pub mod error;
mod locator;

pub use error::ResampleError;
pub use locator::CellLocator;

use crate::array::{DataArray, ScalarType};
use crate::mesh::{Bounds, CellType, ImageData, UnstructuredGrid};

use std::collections::BTreeMap;

/// name of the array flagging grid points that were found inside the mesh
pub const VALID_POINT_MASK: &str = "vtkValidPointMask";
/// name of the ghost array marking points outside the mesh as hidden
pub const GHOST_ARRAY: &str = "vtkGhostType";
/// ghost array value of a hidden point
const HIDDEN_POINT: f64 = 2.0;
/// probe tolerance as a fraction of the input bounds diagonal
const RELATIVE_TOLERANCE: f64 = 1e-6;

/// Resample a dataset onto a regular grid with `dimensions` points
///
/// By default the grid spans the bounding box of the input; set `bounds` to sample a
/// different region.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampleToImage {
    pub dimensions: [usize; 3],
    pub bounds: Option<Bounds>,
}

impl ResampleToImage {
    pub fn new(dimensions: [usize; 3]) -> Self {
        Self {
            dimensions,
            bounds: None,
        }
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// origin and spacing of the output grid. An axis with a single sample has zero
    /// spacing and sits at the lower bound
    pub fn sampling_geometry(&self, bounds: &Bounds) -> ([f64; 3], [f64; 3]) {
        let mut spacing = [0.0; 3];

        for (axis, spacing) in spacing.iter_mut().enumerate() {
            let dim = self.dimensions[axis];
            if dim > 1 {
                *spacing = bounds.length(axis) / (dim - 1) as f64;
            }
        }

        (bounds.min, spacing)
    }

    pub fn resample(&self, grid: &UnstructuredGrid) -> Result<ImageData, ResampleError> {
        if self.dimensions.iter().any(|d| *d == 0) {
            return Err(error::InvalidDimensions::new(self.dimensions).into());
        }

        let input_bounds = grid.bounds().ok_or(error::EmptyInput)?;
        let sampling_bounds = self.bounds.unwrap_or(input_bounds);

        if !sampling_bounds.is_valid() {
            return Err(error::InvalidBounds::new(sampling_bounds.to_array()).into());
        }

        let (origin, spacing) = self.sampling_geometry(&sampling_bounds);
        let mut image = ImageData::new(self.dimensions, origin, spacing);
        let num_samples = image.num_points();

        let tol = RELATIVE_TOLERANCE * input_bounds.diagonal();
        let locator = CellLocator::build(grid, input_bounds, tol);

        warn_unsupported_cells(grid);

        let inputs: Vec<_> = grid.point_data.iter().collect();
        let mut outputs: Vec<DataArray> = inputs
            .iter()
            .map(|array| zeros_like(array, num_samples))
            .collect();

        // point arrays win over cell arrays of the same name
        let cell_inputs: Vec<_> = grid
            .cell_data
            .iter()
            .filter(|array| {
                let shadowed = grid.point_data.get(array.name()).is_some();
                if shadowed {
                    log::debug!("cell array `{}` is shadowed by a point array", array.name());
                }
                !shadowed
            })
            .collect();
        let mut cell_outputs: Vec<DataArray> = cell_inputs
            .iter()
            .map(|array| zeros_like(array, num_samples))
            .collect();

        let mut mask = vec![0.0; num_samples];
        let mut ghost = vec![HIDDEN_POINT; num_samples];

        let mut weights = Vec::with_capacity(8);
        let mut coordinates = Vec::with_capacity(8);

        for sample in 0..num_samples {
            let x = image.point(sample);

            let Some(cell) = find_cell(grid, &locator, x, tol, &mut coordinates, &mut weights)
            else {
                continue;
            };

            let ids = grid.cells.cell_points(cell);

            for (input, output) in inputs.iter().zip(outputs.iter_mut()) {
                let scalar_type = output.scalar_type();
                let mut row = output.values_mut().row_mut(sample);

                for (w, id) in weights.iter().zip(ids) {
                    row.scaled_add(*w, &input.tuple(*id));
                }

                if !scalar_type.is_floating_point() {
                    row.mapv_inplace(|v| scalar_type.round_trip(v));
                }
            }

            for (input, output) in cell_inputs.iter().zip(cell_outputs.iter_mut()) {
                output
                    .values_mut()
                    .row_mut(sample)
                    .assign(&input.tuple(cell));
            }

            mask[sample] = 1.0;
            ghost[sample] = 0.0;
        }

        let valid = mask.iter().filter(|m| **m > 0.0).count();
        log::info!(
            "resampled {} of {} grid points inside the mesh",
            valid,
            num_samples
        );
        if valid == 0 {
            log::warn!("no grid point fell inside the input mesh, every sample is zero");
        }

        for output in outputs.into_iter().chain(cell_outputs) {
            image.point_data.insert(output);
        }
        image.point_data.set_active_scalars(
            grid.point_data
                .active_scalars()
                .map(|array| array.name().to_string()),
        );

        image
            .point_data
            .insert(DataArray::scalars(VALID_POINT_MASK, ScalarType::Char, mask));
        image
            .point_data
            .insert(DataArray::scalars(GHOST_ARRAY, ScalarType::UnsignedChar, ghost));

        Ok(image)
    }
}

fn zeros_like(array: &DataArray, tuples: usize) -> DataArray {
    DataArray::zeros(
        array.name(),
        array.scalar_type(),
        tuples,
        array.num_components(),
    )
}

/// the lowest id cell among the locator candidates that contains `x`
fn find_cell(
    grid: &UnstructuredGrid,
    locator: &CellLocator,
    x: [f64; 3],
    tol: f64,
    coordinates: &mut Vec<[f64; 3]>,
    weights: &mut Vec<f64>,
) -> Option<usize> {
    locator.candidates(x).iter().copied().find(|cell| {
        let cell_type = grid.cells.cell_type(*cell);
        if !cell_type.supports_probing() {
            return false;
        }

        grid.cell_coordinates(*cell, coordinates);
        cell_type.interpolation_weights(coordinates, x, tol, weights)
    })
}

fn warn_unsupported_cells(grid: &UnstructuredGrid) {
    let mut skipped: BTreeMap<u32, (CellType, usize)> = BTreeMap::new();

    for (cell_type, _) in grid.cells.iter() {
        if !cell_type.supports_probing() {
            skipped.entry(cell_type.id()).or_insert((cell_type, 0)).1 += 1;
        }
    }

    for (cell_type, count) in skipped.values() {
        log::warn!("skipping {count} cells of unsupported type {cell_type} while resampling");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::CellArray;
    use ndarray::Array2;

    /// two triangles covering [0, 2] x [0, 1] with the field f = x + 2y
    fn two_triangles() -> UnstructuredGrid {
        let points = Array2::from_shape_vec(
            (4, 3),
            vec![0., 0., 0., 2., 0., 0., 2., 1., 0., 0., 1., 0.],
        )
        .unwrap();
        let mut cells = CellArray::new();
        cells.push(CellType::Triangle, &[0, 1, 2]);
        cells.push(CellType::Triangle, &[0, 2, 3]);

        let mut grid = UnstructuredGrid::new(points, cells);
        grid.point_data.insert_scalars(DataArray::scalars(
            "v_center_dist",
            ScalarType::Double,
            vec![0., 2., 4., 2.],
        ));
        grid.point_data.insert(DataArray::scalars(
            "id",
            ScalarType::Int,
            vec![0., 1., 2., 3.],
        ));
        grid.cell_data.insert(DataArray::scalars(
            "material",
            ScalarType::Int,
            vec![7., 9.],
        ));
        grid
    }

    #[test]
    fn grid_geometry_from_bounds() {
        let resample = ResampleToImage::new([5, 3, 1]);
        let image = resample.resample(&two_triangles()).unwrap();

        assert_eq!(image.num_points(), 15);
        assert_eq!(image.origin, [0., 0., 0.]);
        assert_eq!(image.spacing, [0.5, 0.5, 0.]);
        assert_eq!(image.point(14), [2., 1., 0.]);
    }

    #[test]
    fn linear_field_is_reproduced() {
        let image = ResampleToImage::new([5, 3, 1])
            .resample(&two_triangles())
            .unwrap();

        let field = image.point_data.get("v_center_dist").unwrap();
        let values = field.as_signal().unwrap();

        for id in 0..image.num_points() {
            let [x, y, _] = image.point(id);
            assert!((values[id] - (x + 2. * y)).abs() < 1e-12, "point {id}");
        }

        let mask = image.point_data.get(VALID_POINT_MASK).unwrap();
        assert!(mask.as_signal().unwrap().iter().all(|m| *m == 1.));
        assert_eq!(
            image.point_data.active_scalars().unwrap().name(),
            "v_center_dist"
        );
    }

    #[test]
    fn integer_arrays_are_rounded() {
        let image = ResampleToImage::new([3, 3, 1])
            .resample(&two_triangles())
            .unwrap();
        let ids = image.point_data.get("id").unwrap().as_signal().unwrap();
        assert!(ids.iter().all(|v| v.fract() == 0.0));
    }

    #[test]
    fn points_outside_are_masked() {
        let bounds = Bounds::new([-1., 0., 0.], [3., 1., 0.]);
        let image = ResampleToImage::new([5, 2, 1])
            .with_bounds(bounds)
            .resample(&two_triangles())
            .unwrap();

        let mask = image.point_data.get(VALID_POINT_MASK).unwrap();
        let ghost = image.point_data.get(GHOST_ARRAY).unwrap();
        let field = image.point_data.get("v_center_dist").unwrap();

        // x = -1 and x = 3 are outside
        assert_eq!(mask.as_signal().unwrap(), &[0., 1., 1., 1., 0., 0., 1., 1., 1., 0.]);
        assert_eq!(ghost.as_signal().unwrap()[0], HIDDEN_POINT);
        assert_eq!(field.as_signal().unwrap()[0], 0.);
        assert_eq!(mask.scalar_type(), ScalarType::Char);
    }

    #[test]
    fn fixed_point_count() {
        let image = ResampleToImage::new([50, 50, 1])
            .resample(&two_triangles())
            .unwrap();
        assert_eq!(image.num_points(), 2500);
        for array in &image.point_data {
            assert_eq!(array.num_tuples(), 2500);
        }
    }

    #[test]
    fn zero_dimension_rejected() {
        let err = ResampleToImage::new([0, 5, 1])
            .resample(&two_triangles())
            .unwrap_err();
        assert!(matches!(err, ResampleError::InvalidDimensions(_)));
        assert_eq!(
            err.to_string(),
            "sampling dimensions must all be at least 1, got [0, 5, 1]"
        );
    }

    #[test]
    fn empty_mesh_rejected() {
        let grid = UnstructuredGrid::new(Array2::zeros((0, 3)), CellArray::new());
        let err = ResampleToImage::new([2, 2, 1]).resample(&grid).unwrap_err();
        assert!(matches!(err, ResampleError::EmptyInput(_)));
    }

    #[test]
    fn inverted_bounds_rejected() {
        let err = ResampleToImage::new([2, 2, 1])
            .with_bounds(Bounds::new([1., 0., 0.], [0., 1., 0.]))
            .resample(&two_triangles())
            .unwrap_err();
        assert!(matches!(err, ResampleError::InvalidBounds(_)));
    }

    #[test]
    fn cell_data_taken_from_containing_cell() {
        let bounds = Bounds::new([-1., 0., 0.], [2., 1., 0.]);
        let image = ResampleToImage::new([4, 2, 1])
            .with_bounds(bounds)
            .resample(&two_triangles())
            .unwrap();

        let material = image.point_data.get("material").unwrap();
        assert_eq!(material.scalar_type(), ScalarType::Int);

        // x = -1 is outside. (0, 1) and (1, 1) lie only in the second triangle, the
        // remaining points are in the first one or on a vertex it shares
        assert_eq!(
            material.as_signal().unwrap(),
            &[0., 7., 7., 7., 0., 9., 9., 7.]
        );
    }

    #[test]
    fn point_array_shadows_cell_array() {
        let mut grid = two_triangles();
        grid.cell_data
            .insert(DataArray::scalars("id", ScalarType::Int, vec![100., 200.]));

        let image = ResampleToImage::new([3, 3, 1]).resample(&grid).unwrap();
        let ids = image.point_data.get("id").unwrap().as_signal().unwrap();
        assert!(ids.iter().all(|v| *v <= 3.0));
    }
}
