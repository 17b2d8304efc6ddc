use crate::config::OutputFormat;

use std::path::{Path, PathBuf};

/// significant digits of the default C++ stream formatting
const SIGNIFICANT_DIGITS: i32 = 6;

/// Format a number the way a default `std::ostream` does (`%g` with six significant
/// digits): `3.14159`, `40`, `1.5e+07`, `1e-05`
pub fn format_ratio(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    // let the scientific formatter do the rounding, then read the exponent back
    let scientific = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            strip_zeros(mantissa),
            sign,
            exponent.abs()
        )
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exponent) as usize;
        strip_zeros(&format!("{value:.decimals$}")).to_string()
    }
}

fn strip_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// The path the resampled grid is written to: the input path with its last four
/// characters (normally the `.vtk` extension) replaced by `Resample.vtk` or
/// `Resample.vti`
///
/// Inputs shorter than four characters are kept whole.
pub fn output_path(input: &Path, format: OutputFormat) -> PathBuf {
    let input = input.to_string_lossy();
    let count = input.chars().count();

    let stem: String = if count < 4 {
        input.into_owned()
    } else {
        input.chars().take(count - 4).collect()
    };

    PathBuf::from(format!("{stem}Resample.{}", format.extension()))
}
