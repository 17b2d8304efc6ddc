//! writing image data to legacy `.vtk` files
//!
//! The output is a `STRUCTURED_POINTS` dataset. The active scalars of the point data
//! are written as a `SCALARS` section and every other array goes into a single
//! `FIELD FieldData` block.

use crate::array::{DataArray, ScalarType};
use crate::mesh::ImageData;
use crate::Error;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// ascii output wraps lines after this many values
const VALUES_PER_LINE: usize = 9;

/// the encoding of the data sections of an output file
///
/// In legacy files `Binary` is raw big endian data. In XML files `Binary` is base64
/// encoded inline data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Ascii,
    Binary,
}

impl Encoding {
    /// the keyword naming the encoding in a legacy header
    pub(crate) fn legacy_keyword(&self) -> &'static str {
        match self {
            Self::Ascii => "ASCII",
            Self::Binary => "BINARY",
        }
    }

    /// the `format` attribute of an inline XML `DataArray`
    pub(crate) fn to_str(&self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Binary => "binary",
        }
    }
}

/// Write image data to `path` as a legacy file, replacing any existing file
pub fn write_legacy_file(path: &Path, image: &ImageData, encoding: Encoding) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_legacy(&mut writer, image, encoding)?;
    writer.flush()?;
    Ok(())
}

/// Write image data as a legacy `STRUCTURED_POINTS` dataset
pub fn write_legacy<W: Write>(mut writer: W, image: &ImageData, encoding: Encoding) -> Result<(), Error> {
    let [nx, ny, nz] = image.dimensions;
    let [sx, sy, sz] = image.spacing;
    let [ox, oy, oz] = image.origin;

    writeln!(writer, "# vtk DataFile Version 5.1")?;
    writeln!(writer, "vtk output")?;
    writeln!(writer, "{}", encoding.legacy_keyword())?;
    writeln!(writer, "DATASET STRUCTURED_POINTS")?;
    writeln!(writer, "DIMENSIONS {nx} {ny} {nz}")?;
    writeln!(writer, "SPACING {} {} {}", float(sx), float(sy), float(sz))?;
    writeln!(writer, "ORIGIN {} {} {}", float(ox), float(oy), float(oz))?;

    let point_data = &image.point_data;
    if point_data.is_empty() {
        return Ok(());
    }

    writeln!(writer, "POINT_DATA {}", image.num_points())?;

    let active = point_data.active_scalars();

    if let Some(scalars) = active {
        writeln!(
            writer,
            "SCALARS {} {} {}",
            encode_name(scalars.name()),
            scalars.scalar_type().legacy_name(),
            scalars.num_components()
        )?;
        writeln!(writer, "LOOKUP_TABLE default")?;
        write_values(&mut writer, scalars, encoding)?;
    }

    let fields: Vec<&DataArray> = point_data
        .iter()
        .filter(|array| Some(array.name()) != active.map(DataArray::name))
        .collect();

    if !fields.is_empty() {
        writeln!(writer, "FIELD FieldData {}", fields.len())?;

        for array in fields {
            writeln!(
                writer,
                "{} {} {} {}",
                encode_name(array.name()),
                array.num_components(),
                array.num_tuples(),
                array.scalar_type().legacy_name()
            )?;
            write_values(&mut writer, array, encoding)?;
        }
    }

    Ok(())
}

fn write_values<W: Write>(writer: &mut W, array: &DataArray, encoding: Encoding) -> Result<(), Error> {
    let scalar_type = array.scalar_type();

    match encoding {
        Encoding::Ascii => {
            let mut buffer = ryu::Buffer::new();
            let mut line = String::new();

            for chunk in array.as_flat().chunks(VALUES_PER_LINE) {
                line.clear();
                for (i, value) in chunk.iter().enumerate() {
                    if i > 0 {
                        line.push(' ');
                    }
                    push_ascii(&mut line, &mut buffer, scalar_type, *value);
                }
                writeln!(writer, "{line}")?;
            }
        }
        Encoding::Binary => {
            let mut bytes = Vec::with_capacity(array.as_flat().len() * scalar_type.size());
            for value in array.as_flat() {
                scalar_type.encode_be(*value, &mut bytes);
            }
            writer.write_all(&bytes)?;
            writeln!(writer)?;
        }
    }

    Ok(())
}

/// format one value the way it is stored: integers without a fraction, floats as the
/// shortest string that round trips in their own precision
fn push_ascii(line: &mut String, buffer: &mut ryu::Buffer, scalar_type: ScalarType, value: f64) {
    match scalar_type {
        ScalarType::Double => line.push_str(buffer.format(value)),
        ScalarType::Float => line.push_str(buffer.format(value as f32)),
        integer => line.push_str(&format_integer(integer.round_trip(value))),
    }
}

fn format_integer(value: f64) -> String {
    if value >= 0.0 {
        (value as u64).to_string()
    } else {
        (value as i64).to_string()
    }
}

fn float(value: f64) -> String {
    let mut buffer = ryu::Buffer::new();
    buffer.format(value).to_string()
}

/// escape the characters a legacy reader would split a name on
pub(crate) fn encode_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());

    for byte in name.bytes() {
        if byte.is_ascii_graphic() && byte != b'%' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{parse_legacy, Dataset};

    fn image() -> ImageData {
        let mut image = ImageData::new([3, 2, 1], [0., 0., 0.], [0.5, 1., 0.]);
        image.point_data.insert_scalars(DataArray::scalars(
            "v_center_dist",
            ScalarType::Double,
            vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6],
        ));
        image.point_data.insert(DataArray::scalars(
            "vtkValidPointMask",
            ScalarType::Char,
            vec![1., 1., 0., 1., 1., 0.],
        ));
        image
    }

    #[test]
    fn ascii_layout() {
        let mut out = Vec::new();
        write_legacy(&mut out, &image(), Encoding::Ascii).unwrap();
        let text = String::from_utf8(out).unwrap();

        let expected = "# vtk DataFile Version 5.1\n\
                        vtk output\n\
                        ASCII\n\
                        DATASET STRUCTURED_POINTS\n\
                        DIMENSIONS 3 2 1\n\
                        SPACING 0.5 1.0 0.0\n\
                        ORIGIN 0.0 0.0 0.0\n\
                        POINT_DATA 6\n\
                        SCALARS v_center_dist double 1\n\
                        LOOKUP_TABLE default\n\
                        0.1 0.2 0.3 0.4 0.5 0.6\n\
                        FIELD FieldData 1\n\
                        vtkValidPointMask 1 6 char\n\
                        1 1 0 1 1 0\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn binary_is_big_endian() {
        let mut out = Vec::new();
        write_legacy(&mut out, &image(), Encoding::Binary).unwrap();

        let marker = b"LOOKUP_TABLE default\n";
        let start = out
            .windows(marker.len())
            .position(|w| w == marker)
            .unwrap()
            + marker.len();
        let first = f64::from_be_bytes(out[start..start + 8].try_into().unwrap());
        assert_eq!(first, 0.1);
    }

    #[test]
    fn read_back() {
        for encoding in [Encoding::Ascii, Encoding::Binary] {
            let mut out = Vec::new();
            write_legacy(&mut out, &image(), encoding).unwrap();

            let Dataset::StructuredPoints(read) = parse_legacy(&out).unwrap() else {
                panic!("expected structured points");
            };
            assert_eq!(read, image(), "{encoding:?}");
        }
    }

    #[test]
    fn names_are_escaped() {
        assert_eq!(encode_name("v center%"), "v%20center%25");
        assert_eq!(encode_name("plain_name"), "plain_name");
    }

    #[test]
    fn ascii_line_wrapping() {
        let mut image = ImageData::new([20, 1, 1], [0.; 3], [1., 0., 0.]);
        image.point_data.insert_scalars(DataArray::scalars(
            "ids",
            ScalarType::Int,
            (0..20).map(|i| i as f64).collect(),
        ));

        let mut out = Vec::new();
        write_legacy(&mut out, &image, Encoding::Ascii).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("0 1 2 3 4 5 6 7 8\n9 10 11 12 13 14 15 16 17\n18 19\n"));
    }
}
