//! error bounded multilevel compression of a 1D signal
//!
//! Nodes are visited coarse to fine through a [`MeshHierarchy`]. Each node is predicted
//! by linear interpolation between its two already reconstructed parents and only the
//! quantized prediction residual is stored. Since predictions are made from the
//! reconstructed values, quantization errors do not accumulate across levels and every
//! node ends up within the tolerance of its original value.
//!
//! Stream layout (little endian):
//!
//! ```text
//! b"MLQ1" | smoothness f64 | tolerance f64 | len u64 | outliers u64 | zlib(payload)
//! payload = varint(zigzag(code)) * len | (varint(ordinal delta), f64) * outliers
//! ```

use super::encoding::{unzigzag, write_varint, zigzag, ByteReader};
use super::error::{self, CompressError};
use super::{CompressedDataset, Compressor, MeshHierarchy};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use std::io::{Read, Write};

const MAGIC: &[u8; 4] = b"MLQ1";
const HEADER_LEN: usize = 4 + 8 + 8 + 8 + 8;
/// largest quantization code stored before a node is kept verbatim instead
const MAX_CODE: f64 = (1u64 << 52) as f64;

/// The built-in [`Compressor`]
///
/// Supports smoothness `0` (the bound holds for the root mean square error) and
/// infinity (the bound holds for the maximum error). Both bounds are met by keeping every
/// node within the tolerance.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultilevelCompressor {
    level: Compression,
}

impl MultilevelCompressor {
    pub fn new() -> Self {
        Self::default()
    }

    /// use a specific zlib level for the entropy coding stage
    pub fn with_compression(level: Compression) -> Self {
        Self { level }
    }
}

/// a node of the traversal that is kept verbatim
struct Outlier {
    ordinal: usize,
    value: f64,
}

fn validate(
    hierarchy: &MeshHierarchy,
    len: usize,
    smoothness: f64,
    tolerance: f64,
) -> Result<(), CompressError> {
    if hierarchy.len() != len {
        return Err(error::ShapeMismatch::new(hierarchy.len(), len).into());
    }

    if !tolerance.is_finite() || tolerance <= 0.0 {
        return Err(error::InvalidTolerance::new(tolerance).into());
    }

    if !(smoothness == 0.0 || smoothness == f64::INFINITY) {
        return Err(error::UnsupportedSmoothness::new(smoothness).into());
    }

    Ok(())
}

/// linear interpolation between the reconstructed parents of `node`
fn predict(hierarchy: &MeshHierarchy, recon: &[f64], level: u32, node: usize) -> f64 {
    if level == 0 {
        return if node == 0 { 0.0 } else { recon[0] };
    }

    let (lo, hi) = hierarchy.parents(node, level);
    let t = (node - lo) as f64 / (hi - lo) as f64;
    recon[lo] + (recon[hi] - recon[lo]) * t
}

impl Compressor for MultilevelCompressor {
    fn compress(
        &self,
        hierarchy: &MeshHierarchy,
        data: &[f64],
        smoothness: f64,
        tolerance: f64,
    ) -> Result<CompressedDataset, CompressError> {
        validate(hierarchy, data.len(), smoothness, tolerance)?;

        let quantum = 2.0 * tolerance;
        let mut recon = vec![0.0; data.len()];
        let mut codes = Vec::with_capacity(data.len());
        let mut outliers = Vec::new();

        for (ordinal, (level, node)) in hierarchy.traversal().enumerate() {
            let value = data[node];
            let prediction = predict(hierarchy, &recon, level, node);
            let code = ((value - prediction) / quantum).round();

            let quantized = if code.is_finite() && code.abs() <= MAX_CODE {
                let candidate = prediction + code * quantum;
                // NaN compares false and falls through to an outlier
                if (value - candidate).abs() <= tolerance {
                    Some((code as i64, candidate))
                } else {
                    None
                }
            } else {
                None
            };

            match quantized {
                Some((code, candidate)) => {
                    codes.push(code);
                    recon[node] = candidate;
                }
                None => {
                    codes.push(0);
                    outliers.push(Outlier { ordinal, value });
                    recon[node] = value;
                }
            }
        }

        log::debug!(
            "compressed {} values over {} levels with {} outliers",
            data.len(),
            hierarchy.num_levels(),
            outliers.len()
        );

        let mut payload = Vec::with_capacity(data.len());
        for code in &codes {
            write_varint(zigzag(*code), &mut payload);
        }

        let mut previous = 0;
        for outlier in &outliers {
            write_varint((outlier.ordinal - previous) as u64, &mut payload);
            payload.extend(outlier.value.to_le_bytes());
            previous = outlier.ordinal;
        }

        let mut buffer = Vec::with_capacity(HEADER_LEN + payload.len() / 2);
        buffer.extend(MAGIC);
        buffer.extend(smoothness.to_le_bytes());
        buffer.extend(tolerance.to_le_bytes());
        buffer.extend((data.len() as u64).to_le_bytes());
        buffer.extend((outliers.len() as u64).to_le_bytes());

        let mut encoder = ZlibEncoder::new(buffer, self.level);
        encoder.write_all(&payload)?;
        let buffer = encoder.finish()?;

        Ok(CompressedDataset::new(
            *hierarchy, smoothness, tolerance, buffer,
        ))
    }

    fn decompress(&self, dataset: &CompressedDataset) -> Result<Vec<f64>, CompressError> {
        let hierarchy = dataset.hierarchy();
        let mut reader = ByteReader::new(dataset.data());

        if reader.take(MAGIC.len()) != Some(MAGIC.as_slice()) {
            return Err(error::Corrupt::new("missing MLQ1 magic").into());
        }

        let header = || error::Corrupt::new("truncated header");
        let smoothness = reader.f64_le().ok_or_else(header)?;
        let tolerance = reader.f64_le().ok_or_else(header)?;
        let len = reader.u64_le().ok_or_else(header)? as usize;
        let num_outliers = reader.u64_le().ok_or_else(header)? as usize;

        if len != hierarchy.len() {
            return Err(error::Corrupt::new(format!(
                "buffer holds {len} values but the hierarchy has {} nodes",
                hierarchy.len()
            ))
            .into());
        }
        validate(hierarchy, len, smoothness, tolerance)?;

        let mut payload = Vec::new();
        ZlibDecoder::new(reader.remaining())
            .read_to_end(&mut payload)
            .map_err(|e| error::Corrupt::new(format!("invalid zlib stream: {e}")))?;

        let mut reader = ByteReader::new(&payload);
        let truncated = || error::Corrupt::new("payload ended early");

        let mut codes = Vec::with_capacity(len);
        for _ in 0..len {
            codes.push(unzigzag(reader.varint().ok_or_else(truncated)?));
        }

        // ordinal -> verbatim value, in ascending ordinal order
        let mut outliers = Vec::with_capacity(num_outliers.min(len));
        let mut ordinal = 0usize;
        for _ in 0..num_outliers {
            let delta = reader.varint().ok_or_else(truncated)? as usize;
            ordinal = ordinal
                .checked_add(delta)
                .filter(|o| *o < len)
                .ok_or_else(|| error::Corrupt::new("outlier index out of range"))?;
            outliers.push((ordinal, reader.f64_le().ok_or_else(truncated)?));
        }

        if !reader.remaining().is_empty() {
            return Err(error::Corrupt::new("trailing bytes after payload").into());
        }

        let quantum = 2.0 * tolerance;
        let mut recon = vec![0.0; len];
        let mut outliers = outliers.into_iter().peekable();

        for (ordinal, (level, node)) in hierarchy.traversal().enumerate() {
            recon[node] = match outliers.next_if(|(o, _)| *o == ordinal) {
                Some((_, value)) => value,
                None => {
                    let prediction = predict(hierarchy, &recon, level, node);
                    prediction + codes[ordinal] as f64 * quantum
                }
            };
        }

        Ok(recon)
    }
}
