//! container types for the attribute arrays attached to a dataset
//!
//! Every array is stored as a `tuples x components` matrix of `f64` regardless of the
//! type it was stored as on disk. The original [`ScalarType`] is kept alongside so that
//! writers can reproduce it.

mod scalar_type;

pub use scalar_type::ScalarType;

use crate::prelude::*;

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

/// A named array of `tuples x components` values
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    name: String,
    scalar_type: ScalarType,
    values: Array2<f64>,
}

impl DataArray {
    /// construct an array from a flat buffer laid out tuple by tuple
    ///
    /// the buffer length must be a multiple of `components`
    pub fn from_flat(
        name: impl Into<String>,
        scalar_type: ScalarType,
        components: usize,
        buffer: Vec<f64>,
    ) -> Result<Self, ShapeError> {
        let name = name.into();

        if components == 0 || buffer.len() % components != 0 {
            return Err(ShapeError::new(name, components, buffer.len()));
        }

        let tuples = buffer.len() / components;
        let values = Array2::from_shape_vec((tuples, components), buffer)
            .map_err(|_| ShapeError::new(name.clone(), components, tuples * components))?;

        Ok(Self {
            name,
            scalar_type,
            values,
        })
    }

    /// single component array
    pub fn scalars(name: impl Into<String>, scalar_type: ScalarType, values: Vec<f64>) -> Self {
        let values = Array2::from_shape_vec((values.len(), 1), values)
            .unwrap_or_else(|_| unreachable!("a (n, 1) shape always matches n values"));

        Self {
            name: name.into(),
            scalar_type,
            values,
        }
    }

    /// array of `tuples` tuples, all zero
    pub fn zeros(
        name: impl Into<String>,
        scalar_type: ScalarType,
        tuples: usize,
        components: usize,
    ) -> Self {
        Self {
            name: name.into(),
            scalar_type,
            values: Array2::zeros((tuples, components)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scalar_type(&self) -> ScalarType {
        self.scalar_type
    }

    pub fn num_tuples(&self) -> usize {
        self.values.nrows()
    }

    pub fn num_components(&self) -> usize {
        self.values.ncols()
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn tuple(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.index_axis(Axis(0), index)
    }

    pub(crate) fn values_mut(&mut self) -> &mut Array2<f64> {
        &mut self.values
    }

    /// every value of the array in tuple order
    ///
    /// The storage is always in standard layout, so this is a borrow of the underlying
    /// memory and not a copy.
    pub fn as_flat(&self) -> &[f64] {
        self.values
            .as_slice()
            .unwrap_or_else(|| unreachable!("arrays are only ever built in standard layout"))
    }

    /// the values of a single-component array as a 1D signal
    ///
    /// returns `None` if the array has more than one component
    pub fn as_signal(&self) -> Option<&[f64]> {
        if self.num_components() == 1 {
            Some(self.as_flat())
        } else {
            None
        }
    }
}

#[derive(Debug, Constructor, thiserror::Error)]
#[error("array `{name}` cannot be built with {components} components from {values} values")]
pub struct ShapeError {
    name: String,
    components: usize,
    values: usize,
}

/// The arrays attached to the points (or cells) of a dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeTable {
    arrays: Vec<DataArray>,
    active_scalars: Option<String>,
}

impl AttributeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// add an array to the table, replacing any array that has the same name
    pub fn insert(&mut self, array: DataArray) {
        match self.arrays.iter_mut().find(|a| a.name == array.name) {
            Some(existing) => *existing = array,
            None => self.arrays.push(array),
        }
    }

    /// add an array and mark it as the active scalars of the table
    pub fn insert_scalars(&mut self, array: DataArray) {
        let name = array.name.clone();
        self.insert(array);
        self.active_scalars = Some(name);
    }

    /// add an array, making it the active scalars only if no array holds that role yet
    pub(crate) fn insert_scalars_if_unset(&mut self, array: DataArray) {
        if self.active_scalars.is_none() {
            self.insert_scalars(array)
        } else {
            self.insert(array)
        }
    }

    pub fn set_active_scalars(&mut self, name: Option<String>) {
        self.active_scalars = name;
    }

    pub fn get(&self, name: &str) -> Option<&DataArray> {
        self.arrays.iter().find(|a| a.name == name)
    }

    pub fn active_scalars(&self) -> Option<&DataArray> {
        self.active_scalars
            .as_deref()
            .and_then(|name| self.get(name))
    }

    pub fn names(&self) -> Vec<String> {
        self.arrays.iter().map(|a| a.name.clone()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataArray> {
        self.arrays.iter()
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }
}

impl<'a> IntoIterator for &'a AttributeTable {
    type Item = &'a DataArray;
    type IntoIter = std::slice::Iter<'a, DataArray>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// look up the named field in `table` and return it as a flat 1D signal
///
/// This is the single place the pipeline turns a point data array into something
/// the compressor can read. The returned slice borrows the array storage.
pub fn extract_field<'a>(table: &'a AttributeTable, name: &str) -> Result<&'a [f64], Error> {
    let array = table.get(name).ok_or_else(|| Error::FieldNotFound {
        name: name.to_string(),
        available: table.names(),
    })?;

    array.as_signal().ok_or_else(|| Error::NotScalar {
        name: name.to_string(),
        components: array.num_components(),
    })
}
