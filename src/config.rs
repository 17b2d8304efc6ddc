//! settings of a resample and compress run

use crate::write_vtk::Encoding;

/// field compressed when none is configured
pub const DEFAULT_FIELD: &str = "v_center_dist";
pub const DEFAULT_DIMENSIONS: [usize; 3] = [50, 50, 1];
pub const DEFAULT_TOLERANCE: f64 = 1e-6;
/// smoothness 0 bounds the error in the L2 norm
pub const DEFAULT_SMOOTHNESS: f64 = 0.0;

/// file format of the resampled grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// legacy `.vtk` structured points
    #[default]
    Legacy,
    /// VTK XML `.vti` image data
    Xml,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Legacy => "vtk",
            Self::Xml => "vti",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// point data array to compress
    pub field: String,
    /// number of resampling points along x, y and z
    pub dimensions: [usize; 3],
    pub smoothness: f64,
    pub tolerance: f64,
    pub format: OutputFormat,
    pub encoding: Encoding,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            field: DEFAULT_FIELD.to_string(),
            dimensions: DEFAULT_DIMENSIONS,
            smoothness: DEFAULT_SMOOTHNESS,
            tolerance: DEFAULT_TOLERANCE,
            format: OutputFormat::default(),
            encoding: Encoding::default(),
        }
    }
}
