use proptest::prelude::*;
use resample_compress::compress::{l2_error, linf_error};
use resample_compress::prelude::*;
use resample_compress::CompressionReport;

fn round_trip(data: &[f64], smoothness: f64, tolerance: f64) -> (CompressedDataset, Vec<f64>) {
    let compressor = MultilevelCompressor::new();
    let hierarchy = MeshHierarchy::new(data.len()).unwrap();
    let compressed = compressor
        .compress(&hierarchy, data, smoothness, tolerance)
        .unwrap();
    let restored = compressor.decompress(&compressed).unwrap();
    (compressed, restored)
}

proptest! {
    #[test]
    fn rms_error_within_tolerance(
        data in prop::collection::vec(-1e6f64..1e6, 1..400),
        exponent in -9i32..0,
    ) {
        let tolerance = 10f64.powi(exponent);
        let (compressed, restored) = round_trip(&data, 0.0, tolerance);

        prop_assert_eq!(restored.len(), data.len());
        prop_assert!(l2_error(&data, &restored) <= tolerance);
        prop_assert_eq!(compressed.hierarchy().len(), data.len());
    }

    #[test]
    fn max_error_within_tolerance(
        data in prop::collection::vec(prop::num::f64::NORMAL, 1..200),
        tolerance in 1e-8f64..10.0,
    ) {
        let (_, restored) = round_trip(&data, f64::INFINITY, tolerance);
        prop_assert!(linf_error(&data, &restored) <= tolerance);
    }

    #[test]
    fn compression_is_deterministic(data in prop::collection::vec(-10f64..10.0, 1..100)) {
        let (a, _) = round_trip(&data, 0.0, 1e-6);
        let (b, _) = round_trip(&data, 0.0, 1e-6);
        prop_assert_eq!(a.data(), b.data());
    }
}

#[test]
fn smooth_field_ratio() {
    let data: Vec<f64> = (0..2500)
        .map(|i| {
            let (x, y) = ((i % 50) as f64 / 49.0, (i / 50) as f64 / 49.0);
            ((x - 0.5).powi(2) + (y - 0.5).powi(2)).sqrt()
        })
        .collect();

    let (compressed, _) = round_trip(&data, 0.0, 1e-6);
    let report = CompressionReport::new(data.len(), &compressed);

    assert_eq!(report.raw_bytes, 20000);
    assert!(report.ratio > 1.0, "ratio {}", report.ratio);
}
