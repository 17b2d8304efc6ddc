//! the resample and compress run, one step after another

use crate::array::extract_field;
use crate::compress::{CompressionReport, Compressor, MeshHierarchy, MultilevelCompressor};
use crate::config::{OutputFormat, PipelineConfig};
use crate::mesh::ImageData;
use crate::parse::read_unstructured_grid;
use crate::resample::ResampleToImage;
use crate::utils::{format_ratio, output_path};
use crate::{write_vtk, write_xml, Error};

use std::io::Write;
use std::path::{Path, PathBuf};

/// what a finished run produced
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    /// compression of the field on the input mesh
    pub raw: CompressionReport,
    /// compression of the field on the resampled grid
    pub sampled: CompressionReport,
    /// where the resampled grid was written
    pub output: PathBuf,
}

/// Run the pipeline with the built-in compressor, writing the report lines to `out`
pub fn run<W: Write>(input: &Path, config: &PipelineConfig, out: &mut W) -> Result<PipelineReport, Error> {
    run_with(&MultilevelCompressor::new(), input, config, out)
}

/// Run the pipeline with any [`Compressor`]
///
/// 1. read the unstructured grid at `input`
/// 2. compress the configured field and report the ratio
/// 3. resample the grid onto a regular image and write it next to the input
/// 4. compress the resampled field and report the ratio
pub fn run_with<C, W>(
    compressor: &C,
    input: &Path,
    config: &PipelineConfig,
    out: &mut W,
) -> Result<PipelineReport, Error>
where
    C: Compressor,
    W: Write,
{
    log::info!("reading {}", input.display());
    let grid = read_unstructured_grid(input)?;
    log::info!(
        "read {} points and {} cells",
        grid.num_points(),
        grid.num_cells()
    );

    let signal = extract_field(&grid.point_data, &config.field)?;
    log::info!("field `{}` holds {} values", config.field, signal.len());

    let raw = compress(compressor, signal, config)?;
    writeln!(out, "compressed ok")?;
    writeln!(
        out,
        "compression ratio for raw data set is: {}",
        format_ratio(raw.ratio)
    )?;

    let image = ResampleToImage::new(config.dimensions).resample(&grid)?;

    let output = output_path(input, config.format);
    log::info!("writing resampled grid to {}", output.display());
    write_image(&output, &image, config)?;

    let sampled_signal = extract_field(&image.point_data, &config.field)?;
    let sampled = compress(compressor, sampled_signal, config)?;
    writeln!(out, "compressed sampled data ok")?;
    writeln!(
        out,
        "compression ratio for sampled data set is: {}",
        format_ratio(sampled.ratio)
    )?;

    Ok(PipelineReport {
        raw,
        sampled,
        output,
    })
}

/// compress a signal on a hierarchy matching its own length
fn compress<C: Compressor>(
    compressor: &C,
    signal: &[f64],
    config: &PipelineConfig,
) -> Result<CompressionReport, Error> {
    let hierarchy = MeshHierarchy::new(signal.len())?;
    let compressed = compressor.compress(&hierarchy, signal, config.smoothness, config.tolerance)?;
    let report = CompressionReport::new(signal.len(), &compressed);

    log::info!(
        "compressed {} bytes to {} bytes",
        report.raw_bytes,
        report.compressed_bytes
    );

    Ok(report)
}

fn write_image(path: &Path, image: &ImageData, config: &PipelineConfig) -> Result<(), Error> {
    match config.format {
        OutputFormat::Legacy => write_vtk::write_legacy_file(path, image, config.encoding),
        OutputFormat::Xml => write_xml::write_xml_file(path, image, config.encoding),
    }
}
