//! error bounded lossy compression of 1D signals
//!
//! [`Compressor`] is the seam between the pipeline and a compression backend. The
//! bundled [`MultilevelCompressor`] implements it with a hierarchical predictor over a
//! [`MeshHierarchy`].

mod encoding;
pub mod error;
mod hierarchy;
mod multilevel;

pub use error::CompressError;
pub use hierarchy::MeshHierarchy;
pub use multilevel::MultilevelCompressor;

/// zlib level accepted by [`MultilevelCompressor::with_compression`]
pub use flate2::Compression;

/// Size of one uncompressed value in bytes
pub const RAW_VALUE_BYTES: usize = std::mem::size_of::<f64>();

/// A backend able to compress a signal on a [`MeshHierarchy`] within a tolerance
///
/// `smoothness` selects the norm the tolerance is measured in: `0` for the root mean
/// square error, infinity for the maximum error. Backends reject the values they cannot
/// honor with [`CompressError::UnsupportedSmoothness`].
pub trait Compressor {
    fn compress(
        &self,
        hierarchy: &MeshHierarchy,
        data: &[f64],
        smoothness: f64,
        tolerance: f64,
    ) -> Result<CompressedDataset, CompressError>;

    fn decompress(&self, dataset: &CompressedDataset) -> Result<Vec<f64>, CompressError>;
}

/// The output of a [`Compressor`]: an opaque byte buffer and the parameters that
/// produced it
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedDataset {
    hierarchy: MeshHierarchy,
    smoothness: f64,
    tolerance: f64,
    buffer: Vec<u8>,
}

impl CompressedDataset {
    pub fn new(hierarchy: MeshHierarchy, smoothness: f64, tolerance: f64, buffer: Vec<u8>) -> Self {
        Self {
            hierarchy,
            smoothness,
            tolerance,
            buffer,
        }
    }

    pub fn hierarchy(&self) -> &MeshHierarchy {
        &self.hierarchy
    }

    pub fn smoothness(&self) -> f64 {
        self.smoothness
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// the compressed bytes
    pub fn data(&self) -> &[u8] {
        &self.buffer
    }

    /// length of the compressed buffer in bytes
    pub fn size(&self) -> usize {
        self.buffer.len()
    }
}

/// sizes before and after compression
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionReport {
    pub raw_bytes: usize,
    pub compressed_bytes: usize,
    pub ratio: f64,
}

impl CompressionReport {
    pub fn new(num_values: usize, dataset: &CompressedDataset) -> Self {
        let raw_bytes = num_values * RAW_VALUE_BYTES;
        let compressed_bytes = dataset.size();

        Self {
            raw_bytes,
            compressed_bytes,
            ratio: raw_bytes as f64 / compressed_bytes as f64,
        }
    }
}

/// root mean square of the pointwise difference, the discrete L2 norm
pub fn l2_error(original: &[f64], reconstructed: &[f64]) -> f64 {
    if original.is_empty() {
        return 0.0;
    }

    let sum: f64 = original
        .iter()
        .zip(reconstructed)
        .map(|(a, b)| (a - b) * (a - b))
        .sum();

    (sum / original.len() as f64).sqrt()
}

/// largest pointwise difference
pub fn linf_error(original: &[f64], reconstructed: &[f64]) -> f64 {
    original
        .iter()
        .zip(reconstructed)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max)
}

/// the error norm a given smoothness bounds
pub fn error_norm(smoothness: f64, original: &[f64], reconstructed: &[f64]) -> f64 {
    if smoothness == f64::INFINITY {
        linf_error(original, reconstructed)
    } else {
        l2_error(original, reconstructed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_from_sizes() {
        let hierarchy = MeshHierarchy::new(100).unwrap();
        let dataset = CompressedDataset::new(hierarchy, 0.0, 1e-6, vec![0; 200]);
        let report = CompressionReport::new(100, &dataset);
        assert_eq!(report.raw_bytes, 800);
        assert_eq!(report.compressed_bytes, 200);
        assert_eq!(report.ratio, 4.0);
    }

    #[test]
    fn norms() {
        let a = [1., 2., 3., 4.];
        let b = [1., 2., 3., 2.];
        assert_eq!(linf_error(&a, &b), 2.0);
        assert_eq!(l2_error(&a, &b), 1.0);
        assert_eq!(error_norm(0.0, &a, &b), 1.0);
        assert_eq!(error_norm(f64::INFINITY, &a, &b), 2.0);
        assert_eq!(l2_error(&[], &[]), 0.0);
    }
}
