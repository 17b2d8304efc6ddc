//! # Mesh Information
//!
//! Two kinds of datasets flow through the pipeline. An [`UnstructuredGrid`] is read from
//! disk: an explicit list of points, cells made of point ids, and arrays attached to the
//! points. An [`ImageData`] is produced by the resampler: a regular grid fully described
//! by its dimensions, origin and spacing, with the same kind of point arrays.
//!
//! Both keep their arrays in an [`AttributeTable`](`crate::array::AttributeTable`). Point
//! location inside the linear [`CellType`]s is implemented in this module as well, since
//! it only depends on the geometry of a cell.

mod bounds;
mod cell;
mod image;
mod unstructured;

pub use bounds::Bounds;
pub use cell::CellType;
pub use image::ImageData;
pub use unstructured::{CellArray, UnstructuredGrid};
