use clap::{Parser, ValueEnum};
use resample_compress::{pipeline, Encoding, OutputFormat, PipelineConfig};

use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// legacy `.vtk` structured points
    Legacy,
    /// VTK XML `.vti` image data
    Xml,
}

/// Compress a scalar field of an unstructured mesh, resample the mesh onto a regular
/// grid and compress the resampled field, printing both compression ratios
#[derive(Parser, Debug)]
#[command(name = "resample-compress", version)]
struct Args {
    /// legacy VTK file holding an unstructured grid
    filename: PathBuf,

    /// point data array to compress
    #[arg(long, default_value = resample_compress::config::DEFAULT_FIELD)]
    field: String,

    /// number of resampling points along x, y and z
    #[arg(
        long,
        num_args = 3,
        value_names = ["NX", "NY", "NZ"],
        default_values_t = resample_compress::config::DEFAULT_DIMENSIONS
    )]
    dims: Vec<usize>,

    /// error tolerance of the compressor
    #[arg(long, default_value_t = resample_compress::config::DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// norm of the error bound: 0 for L2, inf for the max norm
    #[arg(long, default_value_t = resample_compress::config::DEFAULT_SMOOTHNESS)]
    smoothness: f64,

    #[arg(long, value_enum, default_value_t = Format::Legacy)]
    format: Format,

    /// write binary data instead of ascii (base64 for xml output)
    #[arg(long, default_value_t = false)]
    binary: bool,
}

impl Args {
    fn config(&self) -> PipelineConfig {
        let mut dimensions = resample_compress::config::DEFAULT_DIMENSIONS;
        for (dim, value) in dimensions.iter_mut().zip(&self.dims) {
            *dim = *value;
        }

        PipelineConfig {
            field: self.field.clone(),
            dimensions,
            smoothness: self.smoothness,
            tolerance: self.tolerance,
            format: match self.format {
                Format::Legacy => OutputFormat::Legacy,
                Format::Xml => OutputFormat::Xml,
            },
            encoding: if self.binary {
                Encoding::Binary
            } else {
                Encoding::Ascii
            },
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = args.config();
    log::debug!("running with {config:?}");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match pipeline::run(&args.filename, &config, &mut out) {
        Ok(report) => {
            log::info!("wrote {}", report.output.display());
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}
