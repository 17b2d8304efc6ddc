#![doc = include_str!("../README.md")]

pub mod array;
pub mod compress;
pub mod config;
pub mod mesh;
pub mod parse;
pub mod pipeline;
pub mod prelude;
pub mod resample;
mod utils;
mod write_vtk;
mod write_xml;

pub use array::{extract_field, AttributeTable, DataArray, ScalarType};
pub use compress::{
    CompressError, CompressedDataset, CompressionReport, Compressor, MeshHierarchy,
    MultilevelCompressor,
};
pub use config::{OutputFormat, PipelineConfig};
pub use mesh::{Bounds, CellType, ImageData, UnstructuredGrid};
pub use parse::{read_legacy, read_unstructured_grid, ParseError};
pub use pipeline::{run, run_with, PipelineReport};
pub use resample::{ResampleError, ResampleToImage};
pub use utils::{format_ratio, output_path};
pub use write_vtk::{write_legacy, write_legacy_file, Encoding};
pub use write_xml::{write_inline_dataarray, write_xml, write_xml_file};

pub use ndarray;

/// general purpose error enumeration for possible causes of failure.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("An io error occured: `{0}`")]
    Io(#[from] std::io::Error),
    #[error("Error while parsing legacy VTK: {0}")]
    Parse(#[from] parse::ParseError),
    #[error("field `{name}` not found in point data (available: {})", .available.join(", "))]
    FieldNotFound { name: String, available: Vec<String> },
    #[error("field `{name}` has {components} components, only scalar fields can be compressed")]
    NotScalar { name: String, components: usize },
    #[error("Could not resample the mesh: {0}")]
    Resample(#[from] resample::ResampleError),
    #[error("Compression failed: {0}")]
    Compress(#[from] compress::CompressError),
    #[error("Could not write XML data to file: `{0}`")]
    XmlWrite(#[from] quick_xml::Error),
}

impl Error {
    /// process exit status reported for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Io(_) | Self::XmlWrite(_) => 3,
            Self::Parse(_) => 4,
            Self::FieldNotFound { .. } | Self::NotScalar { .. } => 5,
            Self::Resample(_) => 6,
            Self::Compress(_) => 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_exit_codes() {
        let missing = Error::FieldNotFound {
            name: "v_center_dist".into(),
            available: vec!["pressure".into(), "velocity".into()],
        };
        assert_eq!(missing.exit_code(), 5);
        assert_eq!(
            missing.to_string(),
            "field `v_center_dist` not found in point data (available: pressure, velocity)"
        );

        let io = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(io.exit_code(), 3);

        let resample = Error::from(ResampleError::from(resample::error::EmptyInput));
        assert_eq!(resample.exit_code(), 6);
    }
}
