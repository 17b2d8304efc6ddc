//! Common traits and types that are useful for working with `resample_compress`
#![allow(unused_imports)]

pub use crate::array::{AttributeTable, DataArray, ScalarType};
pub use crate::compress::{CompressedDataset, Compressor, MeshHierarchy, MultilevelCompressor};
pub use crate::config::{OutputFormat, PipelineConfig};
pub use crate::mesh::{Bounds, CellType, ImageData, UnstructuredGrid};
pub use crate::resample::ResampleToImage;
pub use crate::write_vtk::Encoding;

pub(crate) use crate::parse::ParseError;
pub(crate) use crate::Error;

pub(crate) use derive_more::{Constructor, Display, From};
