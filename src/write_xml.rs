//! writing image data to VTK XML `.vti` files
//!
//! Arrays are written inline, either as ascii text or base64 (`format="binary"`). Binary
//! arrays are prefixed with their byte count as a little endian `UInt64`, which is what
//! `header_type="UInt64"` announces to the reader.

use crate::array::{DataArray, ScalarType};
use crate::mesh::ImageData;
use crate::write_vtk::Encoding;
use crate::Error;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write image data to `path` as a `.vti` file, replacing any existing file
pub fn write_xml_file(path: &Path, image: &ImageData, encoding: Encoding) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_xml(&mut writer, image, encoding)?;
    writer.flush()?;
    Ok(())
}

/// Write image data as a VTK XML `ImageData` file
pub fn write_xml<W: Write>(writer: W, image: &ImageData, encoding: Encoding) -> Result<(), Error> {
    let mut writer = Writer::new_with_indent(writer, b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let vtk_file = BytesStart::new("VTKFile").with_attributes([
        ("type", "ImageData"),
        ("version", "1.0"),
        ("byte_order", "LittleEndian"),
        ("header_type", "UInt64"),
    ]);
    writer.write_event(Event::Start(vtk_file))?;

    let extent = join(image.extent().iter().map(|e| e.to_string()));
    let origin = join(image.origin.iter().map(|v| float(*v)));
    let spacing = join(image.spacing.iter().map(|v| float(*v)));

    let image_data = BytesStart::new("ImageData").with_attributes([
        ("WholeExtent", extent.as_str()),
        ("Origin", origin.as_str()),
        ("Spacing", spacing.as_str()),
    ]);
    writer.write_event(Event::Start(image_data))?;

    let piece = BytesStart::new("Piece").with_attributes([("Extent", extent.as_str())]);
    writer.write_event(Event::Start(piece))?;

    let mut point_data = BytesStart::new("PointData");
    if let Some(scalars) = image.point_data.active_scalars() {
        point_data.push_attribute(("Scalars", scalars.name()));
    }
    writer.write_event(Event::Start(point_data))?;

    for array in &image.point_data {
        write_inline_dataarray(&mut writer, array, encoding)?;
    }

    writer.write_event(Event::End(BytesEnd::new("PointData")))?;
    writer.write_event(Event::Empty(BytesStart::new("CellData")))?;
    writer.write_event(Event::End(BytesEnd::new("Piece")))?;
    writer.write_event(Event::End(BytesEnd::new("ImageData")))?;
    writer.write_event(Event::End(BytesEnd::new("VTKFile")))?;

    writer.into_inner().write_all(b"\n")?;

    Ok(())
}

/// write a single array inline in a `DataArray` element
pub fn write_inline_dataarray<W: Write>(
    writer: &mut Writer<W>,
    array: &DataArray,
    encoding: Encoding,
) -> Result<(), Error> {
    let scalar_type = array.scalar_type();
    let components = array.num_components().to_string();

    let header = BytesStart::new("DataArray").with_attributes([
        ("type", scalar_type.xml_name()),
        ("Name", array.name()),
        ("NumberOfComponents", components.as_str()),
        ("format", encoding.to_str()),
    ]);
    writer.write_event(Event::Start(header))?;

    let data = match encoding {
        Encoding::Ascii => ascii_values(array),
        Encoding::Binary => base64_values(array),
    };
    writer.write_event(Event::Text(BytesText::new(&data)))?;

    writer.write_event(Event::End(BytesEnd::new("DataArray")))?;

    Ok(())
}

fn ascii_values(array: &DataArray) -> String {
    let scalar_type = array.scalar_type();
    let mut buffer = ryu::Buffer::new();

    let values: Vec<String> = array
        .as_flat()
        .iter()
        .map(|value| match scalar_type {
            ScalarType::Double => buffer.format(*value).to_string(),
            ScalarType::Float => buffer.format(*value as f32).to_string(),
            integer => format!("{}", integer.round_trip(*value)),
        })
        .collect();

    values.join(" ")
}

fn base64_values(array: &DataArray) -> String {
    let scalar_type = array.scalar_type();
    let values = array.as_flat();
    let num_bytes = values.len() * scalar_type.size();

    let mut byte_data: Vec<u8> = Vec::with_capacity(8 + num_bytes);
    byte_data.extend((num_bytes as u64).to_le_bytes());

    for value in values {
        scalar_type.encode_le(*value, &mut byte_data);
    }

    base64::encode(byte_data.as_slice())
}

fn join<I: Iterator<Item = String>>(items: I) -> String {
    items.collect::<Vec<_>>().join(" ")
}

fn float(value: f64) -> String {
    let mut buffer = ryu::Buffer::new();
    buffer.format(value).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> ImageData {
        let mut image = ImageData::new([2, 2, 1], [1., 2., 0.], [0.5, 0.25, 0.]);
        image.point_data.insert_scalars(DataArray::scalars(
            "v_center_dist",
            ScalarType::Double,
            vec![1.5, 2.5, 3.5, 4.5],
        ));
        image.point_data.insert(DataArray::scalars(
            "vtkGhostType",
            ScalarType::UnsignedChar,
            vec![0., 0., 2., 0.],
        ));
        image
    }

    fn write(encoding: Encoding) -> String {
        let mut out = Vec::new();
        write_xml(&mut out, &image(), encoding).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn ascii_document() {
        let text = write(Encoding::Ascii);

        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(text.contains(
            "<VTKFile type=\"ImageData\" version=\"1.0\" byte_order=\"LittleEndian\" header_type=\"UInt64\">"
        ));
        assert!(text.contains(
            "<ImageData WholeExtent=\"0 1 0 1 0 0\" Origin=\"1.0 2.0 0.0\" Spacing=\"0.5 0.25 0.0\">"
        ));
        assert!(text.contains("<Piece Extent=\"0 1 0 1 0 0\">"));
        assert!(text.contains("<PointData Scalars=\"v_center_dist\">"));
        assert!(text.contains(
            "<DataArray type=\"Float64\" Name=\"v_center_dist\" NumberOfComponents=\"1\" format=\"ascii\">1.5 2.5 3.5 4.5</DataArray>"
        ));
        assert!(text.contains(
            "<DataArray type=\"UInt8\" Name=\"vtkGhostType\" NumberOfComponents=\"1\" format=\"ascii\">0 0 2 0</DataArray>"
        ));
        assert!(text.trim_end().ends_with("</VTKFile>"));
    }

    #[test]
    fn base64_has_byte_count_header() {
        let text = write(Encoding::Binary);
        let start_tag = "Name=\"v_center_dist\" NumberOfComponents=\"1\" format=\"binary\">";
        let start = text.find(start_tag).unwrap() + start_tag.len();
        let end = start + text[start..].find('<').unwrap();

        let bytes = base64::decode(&text[start..end]).unwrap();
        assert_eq!(bytes.len(), 8 + 4 * 8);
        assert_eq!(u64::from_le_bytes(bytes[..8].try_into().unwrap()), 32);
        assert_eq!(f64::from_le_bytes(bytes[8..16].try_into().unwrap()), 1.5);
    }
}
