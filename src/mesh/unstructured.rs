use super::{Bounds, CellType};
use crate::array::AttributeTable;

use ndarray::Array2;

/// Cell connectivity stored the way VTK 9 stores it: a flat list of point ids and an
/// offset array with `num_cells + 1` entries
#[derive(Debug, Clone, PartialEq)]
pub struct CellArray {
    offsets: Vec<usize>,
    connectivity: Vec<usize>,
    types: Vec<CellType>,
}

impl Default for CellArray {
    fn default() -> Self {
        Self {
            offsets: vec![0],
            connectivity: Vec::new(),
            types: Vec::new(),
        }
    }
}

impl CellArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// build from offsets and connectivity. Returns `None` if the offsets are not
    /// monotonic, do not start at zero, or do not end at the connectivity length
    pub fn from_parts(
        offsets: Vec<usize>,
        connectivity: Vec<usize>,
        types: Vec<CellType>,
    ) -> Option<Self> {
        let valid = offsets.first() == Some(&0)
            && offsets.last() == Some(&connectivity.len())
            && offsets.windows(2).all(|w| w[0] <= w[1])
            && types.len() + 1 == offsets.len();

        if valid {
            Some(Self {
                offsets,
                connectivity,
                types,
            })
        } else {
            None
        }
    }

    pub fn push(&mut self, cell_type: CellType, points: &[usize]) {
        self.connectivity.extend_from_slice(points);
        self.offsets.push(self.connectivity.len());
        self.types.push(cell_type);
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn cell_type(&self, cell: usize) -> CellType {
        self.types[cell]
    }

    pub fn cell_points(&self, cell: usize) -> &[usize] {
        &self.connectivity[self.offsets[cell]..self.offsets[cell + 1]]
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellType, &[usize])> + '_ {
        (0..self.len()).map(move |cell| (self.types[cell], self.cell_points(cell)))
    }

    pub(crate) fn max_point_id(&self) -> Option<usize> {
        self.connectivity.iter().copied().max()
    }
}

/// A point/cell dataset without implicit connectivity
#[derive(Debug, Clone, PartialEq)]
pub struct UnstructuredGrid {
    /// `num_points x 3` point coordinates
    pub points: Array2<f64>,
    pub cells: CellArray,
    pub point_data: AttributeTable,
    pub cell_data: AttributeTable,
}

impl UnstructuredGrid {
    pub fn new(points: Array2<f64>, cells: CellArray) -> Self {
        Self {
            points,
            cells,
            point_data: AttributeTable::new(),
            cell_data: AttributeTable::new(),
        }
    }

    pub fn num_points(&self) -> usize {
        self.points.nrows()
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn point(&self, index: usize) -> [f64; 3] {
        let row = self.points.row(index);
        [row[0], row[1], row[2]]
    }

    /// coordinates of every point of a cell
    pub fn cell_coordinates(&self, cell: usize, out: &mut Vec<[f64; 3]>) {
        out.clear();
        out.extend(self.cells.cell_points(cell).iter().map(|id| self.point(*id)));
    }

    /// bounding box of all points, `None` for a grid without points
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points((0..self.num_points()).map(|i| self.point(i)))
    }
}
