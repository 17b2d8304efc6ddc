//! reading and parsing legacy VTK files
//!
//! Both `ASCII` and `BINARY` (big endian) files are supported, for the
//! `UNSTRUCTURED_GRID` and `STRUCTURED_POINTS` dataset types. Cells may be stored in the
//! classic `CELLS n size` layout or the `OFFSETS` / `CONNECTIVITY` layout written by VTK
//! 9 (file version 5.x). Attribute sections (`SCALARS`, `VECTORS`, `FIELD`, ...) are
//! read into an [`AttributeTable`]; `METADATA` blocks are skipped.

pub mod error;
mod scanner;

pub use error::ParseError;

use crate::array::{AttributeTable, DataArray, ScalarType};
use crate::mesh::{CellArray, CellType, ImageData, UnstructuredGrid};
use crate::prelude::*;
use scanner::Scanner;

use ndarray::Array2;
use std::path::Path;

/// largest id an index section may hold: every integer up to here is exact in an `f64`
const MAX_INDEX: f64 = 9_007_199_254_740_992.0;

/// a dataset read from a legacy file
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    UnstructuredGrid(UnstructuredGrid),
    StructuredPoints(ImageData),
}

impl Dataset {
    fn kind(&self) -> &'static str {
        match self {
            Self::UnstructuredGrid(_) => "UNSTRUCTURED_GRID",
            Self::StructuredPoints(_) => "STRUCTURED_POINTS",
        }
    }
}

/// read in and parse an entire legacy vtk file for a given path
pub fn read_legacy(path: &Path) -> Result<Dataset, Error> {
    let bytes = std::fs::read(path)?;
    let dataset = parse_legacy(&bytes)?;
    Ok(dataset)
}

/// read a legacy file that must contain an unstructured grid
pub fn read_unstructured_grid(path: &Path) -> Result<UnstructuredGrid, Error> {
    match read_legacy(path)? {
        Dataset::UnstructuredGrid(grid) => Ok(grid),
        other => Err(ParseError::from(error::WrongDataset::new("UNSTRUCTURED_GRID", other.kind())).into()),
    }
}

/// read a legacy file that must contain structured points (image data)
pub fn read_image_data(path: &Path) -> Result<ImageData, Error> {
    match read_legacy(path)? {
        Dataset::StructuredPoints(image) => Ok(image),
        other => Err(ParseError::from(error::WrongDataset::new("STRUCTURED_POINTS", other.kind())).into()),
    }
}

/// parse the contents of a legacy vtk file
pub fn parse_legacy(bytes: &[u8]) -> Result<Dataset, ParseError> {
    let mut scanner = Scanner::new(bytes);
    let header = read_header(&mut scanner)?;

    log::debug!(
        "legacy file version {}.{}, {} encoding, title `{}`",
        header.version.0,
        header.version.1,
        if header.binary { "binary" } else { "ascii" },
        header.title
    );

    let mut reader = LegacyReader {
        scanner,
        binary: header.binary,
    };

    reader.expect_keyword("DATASET")?;
    let dataset = reader.rest_of_line()?.trim().to_string();

    match dataset.to_ascii_uppercase().as_str() {
        "UNSTRUCTURED_GRID" => reader.read_unstructured_grid().map(Dataset::UnstructuredGrid),
        "STRUCTURED_POINTS" => reader.read_structured_points().map(Dataset::StructuredPoints),
        _ => Err(error::UnsupportedDataset::new(dataset).into()),
    }
}

struct Header {
    version: (u32, u32),
    title: String,
    binary: bool,
}

fn read_header(scanner: &mut Scanner<'_>) -> Result<Header, ParseError> {
    const MAGIC: &str = "# vtk DataFile Version";

    let first_line = scanner.rest_of_line()?;
    let version = first_line
        .strip_prefix(MAGIC)
        .ok_or_else(|| error::MissingHeader::new(first_line.to_string()))?;

    let version = parse_version(version.trim())
        .ok_or_else(|| error::MissingHeader::new(first_line.to_string()))?;

    let title = scanner.rest_of_line()?.to_string();

    let line = scanner.line();
    let format = scanner
        .next_token()
        .ok_or_else(|| error::UnexpectedEof::new("the file format (ASCII or BINARY)".into()))?;

    let binary = match format.to_ascii_uppercase().as_str() {
        "ASCII" => false,
        "BINARY" => true,
        _ => return Err(error::UnexpectedKeyword::new(line, "ASCII or BINARY", format).into()),
    };

    Ok(Header {
        version,
        title,
        binary,
    })
}

fn parse_version(version: &str) -> Option<(u32, u32)> {
    let (major, minor) = version.split_once('.').unwrap_or((version, "0"));
    Some((major.parse().ok()?, minor.parse().ok()?))
}

/// undo the `%XX` escaping legacy writers apply to array names containing whitespace
fn decode_name(name: &str) -> String {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3])
                .ok()
                .and_then(|h| u8::from_str_radix(h, 16).ok());

            if let Some(byte) = hex {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// which attribute table attribute sections are currently written to
#[derive(Clone, Copy, PartialEq)]
enum Target {
    Dataset,
    Points(usize),
    Cells(usize),
}

struct LegacyReader<'a> {
    scanner: Scanner<'a>,
    binary: bool,
}

/// the pieces of a dataset collected while walking the sections of a file
#[derive(Default)]
struct Sections {
    point_data: AttributeTable,
    cell_data: AttributeTable,
    field_data: AttributeTable,
}

impl Sections {
    fn table(&mut self, target: Target) -> &mut AttributeTable {
        match target {
            Target::Dataset => &mut self.field_data,
            Target::Points(_) => &mut self.point_data,
            Target::Cells(_) => &mut self.cell_data,
        }
    }
}

impl<'a> LegacyReader<'a> {
    fn rest_of_line(&mut self) -> Result<&'a str, ParseError> {
        Ok(self.scanner.rest_of_line()?)
    }

    fn keyword(&mut self, expected: &str) -> Result<String, ParseError> {
        self.scanner
            .next_token()
            .map(|token| token.to_ascii_uppercase())
            .ok_or_else(|| error::UnexpectedEof::new(expected.to_string()).into())
    }

    fn expect_keyword(&mut self, expected: &str) -> Result<(), ParseError> {
        let line = self.scanner.line();
        let keyword = self.keyword(expected)?;
        if keyword != expected {
            return Err(error::UnexpectedKeyword::new(line, expected, keyword).into());
        }
        Ok(())
    }

    /// split the remainder of a keyword line into exactly `N` parameters
    fn parameters<const N: usize>(&mut self, section: &str) -> Result<[&'a str; N], ParseError> {
        let line = self.scanner.line();
        let rest = self.rest_of_line()?;
        let tokens: Vec<&str> = rest.split_ascii_whitespace().collect();

        tokens.try_into().map_err(|tokens: Vec<&str>| {
            error::UnexpectedKeyword::new(
                line,
                format!("{N} parameters after {section}"),
                tokens.join(" "),
            )
            .into()
        })
    }

    fn count(&self, token: &str, section: &str) -> Result<usize, ParseError> {
        token
            .parse()
            .map_err(|_| error::InvalidNumber::new(self.scanner.line(), section, token).into())
    }

    /// `count * width` for a section size taken from the file. A product that does not fit
    /// in memory can never be backed by the file, so it reads as a truncated section
    fn total(&self, count: usize, width: usize, section: &str) -> Result<usize, ParseError> {
        count
            .checked_mul(width)
            .ok_or_else(|| error::UnexpectedEof::new(format!("{count} x {width} values of {section}")).into())
    }

    fn scalar_type(&self, token: &str) -> Result<ScalarType, ParseError> {
        ScalarType::from_legacy_name(token).ok_or_else(|| {
            error::UnsupportedDataType::new(self.scanner.line(), token.to_string()).into()
        })
    }

    /// read `count` values of type `ty`, either as ASCII tokens or as a big endian block
    fn values(&mut self, ty: ScalarType, count: usize, section: &str) -> Result<Vec<f64>, ParseError> {
        if self.binary {
            let width = ty.size();
            let length = count
                .checked_mul(width)
                .ok_or_else(|| error::UnexpectedEof::new(section.to_string()))?;
            let bytes = self
                .scanner
                .take(length)
                .ok_or_else(|| error::UnexpectedEof::new(section.to_string()))?;

            let mut out = Vec::with_capacity(count);
            for chunk in bytes.chunks_exact(width) {
                let value = ty
                    .decode_be(chunk)
                    .ok_or_else(|| error::UnexpectedEof::new(section.to_string()))?;
                out.push(value);
            }
            Ok(out)
        } else {
            // every ascii value takes at least one byte, so the file bounds the allocation
            let mut out = Vec::with_capacity(count.min(self.scanner.remaining_len()));
            for _ in 0..count {
                let token = self
                    .scanner
                    .next_token()
                    .ok_or_else(|| error::UnexpectedEof::new(section.to_string()))?;
                let value: f64 = token.parse().map_err(|_| {
                    error::InvalidNumber::new(self.scanner.line(), section, token)
                })?;
                out.push(value);
            }
            Ok(out)
        }
    }

    fn indices(&mut self, ty: ScalarType, count: usize, section: &str) -> Result<Vec<usize>, ParseError> {
        let line = self.scanner.line();
        self.values(ty, count, section)?
            .into_iter()
            .map(|v| -> Result<usize, ParseError> {
                if v >= 0.0 && v.fract() == 0.0 && v <= MAX_INDEX {
                    Ok(v as usize)
                } else {
                    Err(error::InvalidNumber::new(line, section, v.to_string()).into())
                }
            })
            .collect()
    }

    fn read_unstructured_grid(&mut self) -> Result<UnstructuredGrid, ParseError> {
        let mut points: Option<Array2<f64>> = None;
        let mut cells: Option<(Vec<usize>, Vec<usize>)> = None;
        let mut types: Option<Vec<CellType>> = None;
        let mut sections = Sections::default();
        let mut target = Target::Dataset;

        while !self.scanner.at_end() {
            let line = self.scanner.line();
            let keyword = self.keyword("a section keyword")?;

            match keyword.as_str() {
                "POINTS" => {
                    let [n, ty] = self.parameters::<2>("POINTS")?;
                    let n = self.count(n, "POINTS")?;
                    let ty = self.scalar_type(ty)?;
                    let total = self.total(n, 3, "POINTS")?;
                    let values = self.values(ty, total, "POINTS")?;
                    points = Some(
                        Array2::from_shape_vec((n, 3), values)
                            .map_err(|_| error::LengthMismatch::new("POINTS", total, 0))?,
                    );
                }
                "CELLS" => cells = Some(self.read_cells()?),
                "CELL_TYPES" => {
                    let [n] = self.parameters::<1>("CELL_TYPES")?;
                    let n = self.count(n, "CELL_TYPES")?;
                    let ids = self.indices(ScalarType::Int, n, "CELL_TYPES")?;
                    types = Some(
                        ids.into_iter()
                            .map(|id| CellType::from_id(u32::try_from(id).unwrap_or(u32::MAX)))
                            .collect(),
                    );
                }
                _ => self.read_attribute_section(&keyword, line, &mut target, &mut sections)?,
            }
        }

        let points = points.ok_or_else(|| error::UnexpectedEof::new("the POINTS section".into()))?;
        let num_points = points.nrows();

        let cells = match (cells, types) {
            (Some((offsets, connectivity)), Some(types)) => {
                let num_cells = offsets.len().saturating_sub(1);
                if types.len() != num_cells {
                    return Err(error::LengthMismatch::new("CELL_TYPES", num_cells, types.len()).into());
                }
                CellArray::from_parts(offsets, connectivity, types).ok_or_else(|| {
                    error::UnexpectedKeyword::new(0, "monotonic cell offsets", "invalid offsets")
                })?
            }
            (None, None) => CellArray::new(),
            (Some(_), None) => return Err(error::UnexpectedEof::new("the CELL_TYPES section".into()).into()),
            (None, Some(_)) => return Err(error::UnexpectedEof::new("the CELLS section".into()).into()),
        };

        for (cell, (_, ids)) in cells.iter().enumerate() {
            if let Some(bad) = ids.iter().find(|id| **id >= num_points) {
                return Err(error::InvalidConnectivity::new(cell, *bad, num_points).into());
            }
        }

        check_tuples(&sections.point_data, num_points, "POINT_DATA")?;
        check_tuples(&sections.cell_data, cells.len(), "CELL_DATA")?;

        if !sections.field_data.is_empty() {
            log::debug!(
                "ignoring {} dataset level field arrays",
                sections.field_data.len()
            );
        }

        let mut grid = UnstructuredGrid::new(points, cells);
        grid.point_data = sections.point_data;
        grid.cell_data = sections.cell_data;

        Ok(grid)
    }

    /// returns offsets (with a trailing total) and the flat connectivity
    fn read_cells(&mut self) -> Result<(Vec<usize>, Vec<usize>), ParseError> {
        let [first, second] = self.parameters::<2>("CELLS")?;
        let first = self.count(first, "CELLS")?;
        let second = self.count(second, "CELLS")?;

        if self.scanner.peek_token().map(|t| t.eq_ignore_ascii_case("OFFSETS")) == Some(true) {
            // CELLS <number of offsets> <connectivity size>
            self.expect_keyword("OFFSETS")?;
            let [ty] = self.parameters::<1>("OFFSETS")?;
            let ty = self.scalar_type(ty)?;
            let offsets = self.indices(ty, first, "OFFSETS")?;

            self.expect_keyword("CONNECTIVITY")?;
            let [ty] = self.parameters::<1>("CONNECTIVITY")?;
            let ty = self.scalar_type(ty)?;
            let connectivity = self.indices(ty, second, "CONNECTIVITY")?;

            return Ok((offsets, connectivity));
        }

        // CELLS <number of cells> <total size>, each cell as `npts id id ...`
        let raw = self.indices(ScalarType::Int, second, "CELLS")?;
        // each cell takes at least one entry of `raw`
        let mut offsets = Vec::with_capacity(first.min(raw.len()) + 1);
        let mut connectivity = Vec::with_capacity(second.saturating_sub(first));
        let mut cursor = 0;
        offsets.push(0);

        for _ in 0..first {
            let npts = *raw
                .get(cursor)
                .ok_or_else(|| error::LengthMismatch::new("CELLS", second, cursor))?;
            let start = cursor + 1;
            let end = start
                .checked_add(npts)
                .filter(|end| *end <= second)
                .ok_or_else(|| error::LengthMismatch::new("CELLS", second, start.saturating_add(npts)))?;
            connectivity.extend_from_slice(&raw[start..end]);
            offsets.push(connectivity.len());
            cursor = end;
        }

        if cursor != second {
            return Err(error::LengthMismatch::new("CELLS", second, cursor).into());
        }

        Ok((offsets, connectivity))
    }

    fn read_structured_points(&mut self) -> Result<ImageData, ParseError> {
        let mut dimensions: Option<[usize; 3]> = None;
        let mut origin = [0.0; 3];
        let mut spacing = [1.0; 3];
        let mut sections = Sections::default();
        let mut target = Target::Dataset;

        while !self.scanner.at_end() {
            let line = self.scanner.line();
            let keyword = self.keyword("a section keyword")?;

            match keyword.as_str() {
                "DIMENSIONS" => {
                    let [x, y, z] = self.parameters::<3>("DIMENSIONS")?;
                    dimensions = Some([
                        self.count(x, "DIMENSIONS")?,
                        self.count(y, "DIMENSIONS")?,
                        self.count(z, "DIMENSIONS")?,
                    ]);
                }
                "SPACING" | "ASPECT_RATIO" => spacing = self.triple(&keyword)?,
                "ORIGIN" => origin = self.triple("ORIGIN")?,
                _ => self.read_attribute_section(&keyword, line, &mut target, &mut sections)?,
            }
        }

        let dimensions =
            dimensions.ok_or_else(|| error::UnexpectedEof::new("the DIMENSIONS section".into()))?;

        let [nx, ny, nz] = dimensions;
        let xy = self.total(nx, ny, "DIMENSIONS")?;
        self.total(xy, nz, "DIMENSIONS")?;

        let mut image = ImageData::new(dimensions, origin, spacing);
        check_tuples(&sections.point_data, image.num_points(), "POINT_DATA")?;
        image.point_data = sections.point_data;

        Ok(image)
    }

    fn triple(&mut self, section: &str) -> Result<[f64; 3], ParseError> {
        let line = self.scanner.line();
        let params = self.parameters::<3>(section)?;
        let mut out = [0.0; 3];
        for (value, token) in out.iter_mut().zip(params) {
            *value = token
                .parse()
                .map_err(|_| error::InvalidNumber::new(line, section, token))?;
        }
        Ok(out)
    }

    /// the sections shared by every dataset type: point / cell data and their arrays
    fn read_attribute_section(
        &mut self,
        keyword: &str,
        line: usize,
        target: &mut Target,
        sections: &mut Sections,
    ) -> Result<(), ParseError> {
        let tuples = match *target {
            Target::Dataset => None,
            Target::Points(n) | Target::Cells(n) => Some(n),
        };

        match keyword {
            "POINT_DATA" => {
                let [n] = self.parameters::<1>("POINT_DATA")?;
                *target = Target::Points(self.count(n, "POINT_DATA")?);
            }
            "CELL_DATA" => {
                let [n] = self.parameters::<1>("CELL_DATA")?;
                *target = Target::Cells(self.count(n, "CELL_DATA")?);
            }
            "FIELD" => {
                let [_name, n] = self.parameters::<2>("FIELD")?;
                let n = self.count(n, "FIELD")?;
                for _ in 0..n {
                    if let Some(array) = self.read_field_array()? {
                        sections.table(*target).insert(array);
                    }
                }
            }
            "METADATA" => self.skip_metadata()?,
            "SCALARS" | "VECTORS" | "NORMALS" | "TENSORS" | "TENSORS6" | "TEXTURE_COORDINATES"
            | "GLOBAL_IDS" | "PEDIGREE_IDS" | "COLOR_SCALARS" | "LOOKUP_TABLE" => {
                let tuples = tuples.ok_or_else(|| {
                    error::UnexpectedKeyword::new(line, "POINT_DATA or CELL_DATA", keyword)
                })?;

                match keyword {
                    "SCALARS" => {
                        let array = self.read_scalars(tuples)?;
                        sections.table(*target).insert_scalars_if_unset(array);
                    }
                    "LOOKUP_TABLE" => self.skip_lookup_table()?,
                    _ => {
                        let array = self.read_attribute(keyword, tuples)?;
                        sections.table(*target).insert(array);
                    }
                }
            }
            other => {
                return Err(error::UnexpectedKeyword::new(line, "a section keyword", other).into())
            }
        }

        Ok(())
    }

    fn read_scalars(&mut self, tuples: usize) -> Result<DataArray, ParseError> {
        let line = self.scanner.line();
        let rest = self.rest_of_line()?;
        let params: Vec<&str> = rest.split_ascii_whitespace().collect();

        let (name, ty, components) = match params.as_slice() {
            [name, ty] => (*name, *ty, 1),
            [name, ty, components] => (*name, *ty, self.count(components, "SCALARS")?),
            _ => {
                return Err(
                    error::UnexpectedKeyword::new(line, "SCALARS name type [components]", rest).into(),
                )
            }
        };

        let ty = self.scalar_type(ty)?;

        if self
            .scanner
            .peek_token()
            .map(|t| t.eq_ignore_ascii_case("LOOKUP_TABLE"))
            == Some(true)
        {
            self.scanner.next_token();
            self.rest_of_line()?;
        }

        self.read_array(decode_name(name), ty, components, tuples, "SCALARS")
    }

    fn read_attribute(&mut self, keyword: &str, tuples: usize) -> Result<DataArray, ParseError> {
        let line = self.scanner.line();
        let rest = self.rest_of_line()?;
        let params: Vec<&str> = rest.split_ascii_whitespace().collect();

        let (name, components, ty) = match (keyword, params.as_slice()) {
            ("VECTORS" | "NORMALS", [name, ty]) => (*name, 3, self.scalar_type(ty)?),
            ("TENSORS", [name, ty]) => (*name, 9, self.scalar_type(ty)?),
            ("TENSORS6", [name, ty]) => (*name, 6, self.scalar_type(ty)?),
            ("TEXTURE_COORDINATES", [name, dim, ty]) => {
                (*name, self.count(dim, keyword)?, self.scalar_type(ty)?)
            }
            ("GLOBAL_IDS" | "PEDIGREE_IDS", [name, ty]) => (*name, 1, self.scalar_type(ty)?),
            ("COLOR_SCALARS", [name, n]) => {
                let components = self.count(n, keyword)?;
                return self.read_color_scalars(decode_name(name), components, tuples);
            }
            _ => {
                return Err(error::UnexpectedKeyword::new(
                    line,
                    format!("parameters for {keyword}"),
                    rest,
                )
                .into())
            }
        };

        self.read_array(decode_name(name), ty, components, tuples, keyword)
    }

    /// color scalars are unsigned chars in binary files and floats in [0, 1] in ASCII files
    fn read_color_scalars(
        &mut self,
        name: String,
        components: usize,
        tuples: usize,
    ) -> Result<DataArray, ParseError> {
        let count = self.total(components, tuples, "COLOR_SCALARS")?;
        let values = if self.binary {
            self.values(ScalarType::UnsignedChar, count, "COLOR_SCALARS")?
                .into_iter()
                .map(|v| v / 255.0)
                .collect()
        } else {
            self.values(ScalarType::Float, count, "COLOR_SCALARS")?
        };

        DataArray::from_flat(name, ScalarType::Float, components, values)
            .map_err(|_| error::LengthMismatch::new("COLOR_SCALARS", count, 0).into())
    }

    fn read_array(
        &mut self,
        name: String,
        ty: ScalarType,
        components: usize,
        tuples: usize,
        section: &str,
    ) -> Result<DataArray, ParseError> {
        let count = self.total(components, tuples, section)?;
        let values = self.values(ty, count, section)?;
        DataArray::from_flat(name, ty, components, values)
            .map_err(|_| error::LengthMismatch::new(section, count, 0).into())
    }

    /// one `name components tuples type` array of a FIELD block
    fn read_field_array(&mut self) -> Result<Option<DataArray>, ParseError> {
        let line = self.scanner.line();
        let header = self
            .scanner
            .next_nonempty_line()?
            .ok_or_else(|| error::UnexpectedEof::new("a FIELD array header".into()))?;
        let params: Vec<&str> = header.split_ascii_whitespace().collect();

        match params.as_slice() {
            // arrays that could not be written are marked with just this name
            ["NULL_ARRAY"] => Ok(None),
            [name, components, tuples, ty] => {
                let components = self.count(components, "FIELD")?;
                let tuples = self.count(tuples, "FIELD")?;
                let ty = self.scalar_type(ty)?;
                let array = self.read_array(decode_name(name), ty, components, tuples, "FIELD")?;
                Ok(Some(array))
            }
            _ => Err(error::UnexpectedKeyword::new(
                line,
                "FIELD array `name components tuples type`",
                header,
            )
            .into()),
        }
    }

    fn skip_lookup_table(&mut self) -> Result<(), ParseError> {
        let [_name, size] = self.parameters::<2>("LOOKUP_TABLE")?;
        let size = self.count(size, "LOOKUP_TABLE")?;
        let ty = if self.binary {
            ScalarType::UnsignedChar
        } else {
            ScalarType::Float
        };
        let count = self.total(size, 4, "LOOKUP_TABLE")?;
        self.values(ty, count, "LOOKUP_TABLE")?;
        Ok(())
    }

    /// METADATA blocks are terminated by an empty line
    fn skip_metadata(&mut self) -> Result<(), ParseError> {
        self.rest_of_line()?;
        while self.scanner.has_remaining() {
            if self.rest_of_line()?.trim().is_empty() {
                break;
            }
        }
        Ok(())
    }
}

fn check_tuples(table: &AttributeTable, expected: usize, section: &str) -> Result<(), ParseError> {
    for array in table {
        if array.num_tuples() != expected {
            return Err(error::LengthMismatch::new(
                format!("{section} array `{}`", array.name()),
                expected,
                array.num_tuples(),
            )
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_TRIANGLES: &str = "# vtk DataFile Version 3.0
two triangles
ASCII
DATASET UNSTRUCTURED_GRID
POINTS 4 float
0 0 0  1 0 0  1 1 0
0 1 0
CELLS 2 8
3 0 1 2
3 0 2 3
CELL_TYPES 2
5
5
POINT_DATA 4
SCALARS v_center_dist double 1
LOOKUP_TABLE default
0.0 1.0 2.0 1.0
VECTORS velocity float
1 0 0 1 0 0 1 0 0 1 0 0
FIELD FieldData 1
pressure 1 4 double
4 3 2 1
CELL_DATA 2
SCALARS id int
LOOKUP_TABLE default
0 1
";

    fn unstructured(input: &[u8]) -> UnstructuredGrid {
        match parse_legacy(input).unwrap() {
            Dataset::UnstructuredGrid(grid) => grid,
            other => panic!("unexpected dataset {other:?}"),
        }
    }

    #[test]
    fn ascii_unstructured_grid() {
        let grid = unstructured(TWO_TRIANGLES.as_bytes());

        assert_eq!(grid.num_points(), 4);
        assert_eq!(grid.num_cells(), 2);
        assert_eq!(grid.point(2), [1., 1., 0.]);
        assert_eq!(grid.cells.cell_points(1), &[0, 2, 3]);
        assert_eq!(grid.cells.cell_type(0), CellType::Triangle);

        let field = grid.point_data.get("v_center_dist").unwrap();
        assert_eq!(field.as_signal().unwrap(), &[0., 1., 2., 1.]);
        assert_eq!(field.scalar_type(), ScalarType::Double);
        assert_eq!(grid.point_data.active_scalars().unwrap().name(), "v_center_dist");

        let velocity = grid.point_data.get("velocity").unwrap();
        assert_eq!(velocity.num_components(), 3);
        assert_eq!(velocity.num_tuples(), 4);

        assert_eq!(
            grid.point_data.get("pressure").unwrap().as_signal().unwrap(),
            &[4., 3., 2., 1.]
        );
        assert_eq!(grid.cell_data.get("id").unwrap().num_tuples(), 2);
    }

    #[test]
    fn binary_unstructured_grid() {
        let mut bytes = b"# vtk DataFile Version 3.0\nbinary\nBINARY\nDATASET UNSTRUCTURED_GRID\nPOINTS 3 double\n".to_vec();
        for v in [0f64, 0., 0., 1., 0., 0., 0., 1., 0.] {
            bytes.extend(v.to_be_bytes());
        }
        bytes.extend(b"\nCELLS 1 4\n");
        for v in [3i32, 0, 1, 2] {
            bytes.extend(v.to_be_bytes());
        }
        bytes.extend(b"\nCELL_TYPES 1\n");
        bytes.extend(5i32.to_be_bytes());
        bytes.extend(b"\nPOINT_DATA 3\nSCALARS v_center_dist float\nLOOKUP_TABLE default\n");
        for v in [0.5f32, 1.5, 2.5] {
            bytes.extend(v.to_be_bytes());
        }
        bytes.extend(b"\n");

        let grid = unstructured(&bytes);
        assert_eq!(grid.point(1), [1., 0., 0.]);
        assert_eq!(grid.cells.cell_points(0), &[0, 1, 2]);
        assert_eq!(
            grid.point_data.get("v_center_dist").unwrap().as_signal().unwrap(),
            &[0.5, 1.5, 2.5]
        );
    }

    #[test]
    fn version_5_offsets_layout() {
        let input = "# vtk DataFile Version 5.1
vtk output
ASCII
DATASET UNSTRUCTURED_GRID
POINTS 4 float
0 0 0 1 0 0 1 1 0 0 1 0

METADATA
INFORMATION 0

CELLS 2 7
OFFSETS vtktypeint64
0 3 7
CONNECTIVITY vtktypeint64
0 1 2
0 1 2 3
CELL_TYPES 2
5
9
";
        let grid = unstructured(input.as_bytes());
        assert_eq!(grid.num_cells(), 2);
        assert_eq!(grid.cells.cell_points(1), &[0, 1, 2, 3]);
        assert_eq!(grid.cells.cell_type(1), CellType::Quad);
    }

    #[test]
    fn structured_points() {
        let input = "# vtk DataFile Version 5.1
vtk output
ASCII
DATASET STRUCTURED_POINTS
DIMENSIONS 2 2 1
SPACING 0.5 0.5 0
ORIGIN 1 1 0
POINT_DATA 4
SCALARS u double 1
LOOKUP_TABLE default
1 2 3 4
";
        match parse_legacy(input.as_bytes()).unwrap() {
            Dataset::StructuredPoints(image) => {
                assert_eq!(image.dimensions, [2, 2, 1]);
                assert_eq!(image.spacing, [0.5, 0.5, 0.]);
                assert_eq!(image.point(3), [1.5, 1.5, 0.]);
                assert_eq!(image.point_data.len(), 1);
            }
            other => panic!("unexpected dataset {other:?}"),
        }
    }

    #[test]
    fn missing_header() {
        let err = parse_legacy(b"<VTKFile>").unwrap_err();
        assert!(matches!(err, ParseError::MissingHeader(_)));
    }

    #[test]
    fn bad_connectivity() {
        let input = "# vtk DataFile Version 3.0
t
ASCII
DATASET UNSTRUCTURED_GRID
POINTS 2 float
0 0 0 1 0 0
CELLS 1 3
2 0 5
CELL_TYPES 1
3
";
        let err = parse_legacy(input.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidConnectivity(_)));
    }

    #[test]
    fn truncated_values() {
        let input = "# vtk DataFile Version 3.0\nt\nASCII\nDATASET UNSTRUCTURED_GRID\nPOINTS 2 float\n0 0 0 1\n";
        let err = parse_legacy(input.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof(_)));
    }

    #[test]
    fn unsupported_dataset() {
        let input = "# vtk DataFile Version 3.0\nt\nASCII\nDATASET POLYDATA\n";
        let err = parse_legacy(input.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedDataset(_)));
    }

    fn grid_header(body: &str) -> Vec<u8> {
        format!("# vtk DataFile Version 3.0\nt\nASCII\nDATASET UNSTRUCTURED_GRID\n{body}").into_bytes()
    }

    #[test]
    fn overflowing_point_count() {
        let err = parse_legacy(&grid_header("POINTS 18446744073709551615 float\n0 0 0\n")).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof(_)));

        let mut binary = b"# vtk DataFile Version 3.0\nt\nBINARY\nDATASET UNSTRUCTURED_GRID\n".to_vec();
        binary.extend(b"POINTS 6148914691236517206 double\n");
        binary.extend(0f64.to_be_bytes());
        let err = parse_legacy(&binary).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof(_)));
    }

    #[test]
    fn huge_point_count_on_a_short_file() {
        let err = parse_legacy(&grid_header("POINTS 1000000000000000 float\n0 0 0 1 0 0\n")).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof(_)));
    }

    #[test]
    fn oversized_cell_entries() {
        let body = "POINTS 1 float\n0 0 0\nCELLS 1 2\n1e30 0\nCELL_TYPES 1\n1\n";
        let err = parse_legacy(&grid_header(body)).unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber(_)));

        // a point count running past the end of the CELLS block
        let body = "POINTS 1 float\n0 0 0\nCELLS 1 2\n5 0\nCELL_TYPES 1\n1\n";
        let err = parse_legacy(&grid_header(body)).unwrap_err();
        assert!(matches!(err, ParseError::LengthMismatch(_)));

        let body = "POINTS 1 float\n0 0 0\nCELLS 18446744073709551615 2\n1 0\nCELL_TYPES 1\n1\n";
        let err = parse_legacy(&grid_header(body)).unwrap_err();
        assert!(matches!(err, ParseError::LengthMismatch(_)));
    }

    #[test]
    fn overflowing_attribute_sizes() {
        let body = "POINTS 1 float\n0 0 0\nPOINT_DATA 9223372036854775807\nVECTORS v float\n1 2 3\n";
        let err = parse_legacy(&grid_header(body)).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof(_)));

        let body = "POINTS 1 float\n0 0 0\nPOINT_DATA 9223372036854775807\nCOLOR_SCALARS c 4\n1\n";
        let err = parse_legacy(&grid_header(body)).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof(_)));

        let body = "POINTS 1 float\n0 0 0\nPOINT_DATA 1\nLOOKUP_TABLE t 9223372036854775807\n1\n";
        let err = parse_legacy(&grid_header(body)).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof(_)));

        let body = "POINTS 1 float\n0 0 0\nFIELD FieldData 1\nu 4611686018427387904 4 double\n1\n";
        let err = parse_legacy(&grid_header(body)).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof(_)));
    }

    #[test]
    fn overflowing_dimensions() {
        let input = "# vtk DataFile Version 3.0\nt\nASCII\nDATASET STRUCTURED_POINTS\nDIMENSIONS 4294967296 4294967296 2\n";
        let err = parse_legacy(input.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof(_)));
    }

    #[test]
    fn escaped_names() {
        assert_eq!(decode_name("center%20dist"), "center dist");
        assert_eq!(decode_name("100%"), "100%");
        assert_eq!(decode_name("plain"), "plain");
    }
}
