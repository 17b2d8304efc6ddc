use resample_compress::parse::{parse_legacy, Dataset};
use resample_compress::{
    read_unstructured_grid, write_legacy, write_legacy_file, DataArray, Encoding, ImageData,
    ResampleToImage, ScalarType,
};

use std::path::{Path, PathBuf};

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("static/square.vtk")
}

fn temp_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("resample_compress_rw_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn read_fixture() {
    let grid = read_unstructured_grid(&fixture()).unwrap();

    assert_eq!(grid.num_points(), 9);
    assert_eq!(grid.num_cells(), 8);
    assert_eq!(grid.point(8), [2., 2., 0.]);

    let field = grid.point_data.get("v_center_dist").unwrap();
    assert_eq!(field.scalar_type(), ScalarType::Double);
    assert_eq!(field.as_signal().unwrap()[4], 0.0);

    let velocity = grid.point_data.get("velocity").unwrap();
    assert_eq!(velocity.num_components(), 3);
    assert_eq!(velocity.scalar_type(), ScalarType::Float);

    assert_eq!(grid.cell_data.get("material").unwrap().num_tuples(), 8);
}

#[test]
fn binary_file_matches_ascii() {
    let grid = read_unstructured_grid(&fixture()).unwrap();
    let signal = grid
        .point_data
        .get("v_center_dist")
        .unwrap()
        .as_signal()
        .unwrap();

    // hand built binary version of the same points and field
    let mut bytes = b"# vtk DataFile Version 4.2\nbinary square\nBINARY\nDATASET UNSTRUCTURED_GRID\nPOINTS 9 double\n".to_vec();
    for id in 0..9 {
        for x in grid.point(id) {
            bytes.extend(x.to_be_bytes());
        }
    }
    bytes.extend(b"\nCELLS 8 32\n");
    for (_, ids) in grid.cells.iter() {
        bytes.extend(3i32.to_be_bytes());
        for id in ids {
            bytes.extend((*id as i32).to_be_bytes());
        }
    }
    bytes.extend(b"\nCELL_TYPES 8\n");
    for _ in 0..8 {
        bytes.extend(5i32.to_be_bytes());
    }
    bytes.extend(b"\nPOINT_DATA 9\nSCALARS v_center_dist double 1\nLOOKUP_TABLE default\n");
    for value in signal {
        bytes.extend(value.to_be_bytes());
    }
    bytes.extend(b"\n");

    let Dataset::UnstructuredGrid(binary) = parse_legacy(&bytes).unwrap() else {
        panic!("expected an unstructured grid");
    };

    assert_eq!(binary.points, grid.points);
    assert_eq!(binary.cells, grid.cells);
    assert_eq!(
        binary.point_data.get("v_center_dist").unwrap().as_signal().unwrap(),
        signal
    );
}

#[test]
fn resampled_grid_round_trip() {
    let grid = read_unstructured_grid(&fixture()).unwrap();
    let image = ResampleToImage::new([11, 11, 1]).resample(&grid).unwrap();
    let material = image.point_data.get("material").unwrap();
    assert_eq!(material.num_tuples(), 121);
    assert!(material.as_flat().iter().all(|v| v.fract() == 0.0));

    for (encoding, name) in [(Encoding::Ascii, "ascii.vtk"), (Encoding::Binary, "binary.vtk")] {
        let path = temp_path(name);
        write_legacy_file(&path, &image, encoding).unwrap();

        let read: ImageData = resample_compress::parse::read_image_data(&path).unwrap();
        assert_eq!(read.dimensions, [11, 11, 1]);
        assert_eq!(read.spacing, [0.2, 0.2, 0.0]);
        assert_eq!(
            read.point_data.active_scalars().unwrap().name(),
            "v_center_dist"
        );

        // the writer keeps floats in their own precision, so only the float array may
        // differ from the in-memory image
        for array in &image.point_data {
            let other = read.point_data.get(array.name()).unwrap();
            assert_eq!(other.scalar_type(), array.scalar_type());
            assert_eq!(other.num_components(), array.num_components());

            for (a, b) in array.as_flat().iter().zip(other.as_flat()) {
                assert!((a - b).abs() <= 1e-6 * a.abs().max(1.0), "{}", array.name());
            }
        }
    }
}

#[test]
fn identical_output_bytes() {
    let grid = read_unstructured_grid(&fixture()).unwrap();
    let resample = ResampleToImage::new([50, 50, 1]);

    let mut first = Vec::new();
    write_legacy(&mut first, &resample.resample(&grid).unwrap(), Encoding::Ascii).unwrap();

    let mut second = Vec::new();
    write_legacy(&mut second, &resample.resample(&grid).unwrap(), Encoding::Ascii).unwrap();

    assert_eq!(first, second);
}

#[test]
fn multi_component_field_rejected() {
    let grid = read_unstructured_grid(&fixture()).unwrap();
    let err = resample_compress::extract_field(&grid.point_data, "velocity").unwrap_err();
    assert!(matches!(
        err,
        resample_compress::Error::NotScalar { components: 3, .. }
    ));

    let single = DataArray::scalars("u", ScalarType::Double, vec![1.0]);
    assert_eq!(single.as_signal(), Some([1.0].as_slice()));
}
