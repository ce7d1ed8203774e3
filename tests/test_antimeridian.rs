use hydrotools::{
    classify_hemisphere, corner_coordinates, read_as_masked_array, shift_for_antimeridian,
    write_raster, Hemisphere, MaskedArray, RasterError,
};
use ndarray::Array2;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Write a 4x3 tile anchored at the given origin with 1 degree pixels.
fn write_tile(dir: &TempDir, name: &str, origin_lon: f64, origin_lat: f64) -> PathBuf {
    let path = dir.path().join(name);
    let data = Array2::from_shape_fn((3, 4), |(row, col)| (row * 4 + col) as f32);
    let geo_transform = [origin_lon, 1.0, 0.0, origin_lat, 0.0, -1.0];
    write_raster(&path, &MaskedArray::from_data(data), &geo_transform, "", None)
        .expect("failed to write tile");
    path
}

#[test]
fn test_eastern_tiles_pass_through() {
    let _ = env_logger::builder().is_test(true).try_init();
    let tiles = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let east = write_tile(&tiles, "tile_E10.tif", 10.0, 50.0);
    let shifted = shift_for_antimeridian(&[&east], output.path()).unwrap();

    assert_eq!(shifted, vec![east]);
    // Nothing written for a passthrough tile
    assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
}

#[test]
fn test_western_tile_is_shifted_by_360_degrees() {
    let tiles = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let west = write_tile(&tiles, "tile_W170.tif", -170.0, 54.0);
    assert_eq!(classify_hemisphere(&west), Hemisphere::West);

    let shifted = shift_for_antimeridian(&[&west], output.path()).unwrap();
    assert_eq!(shifted.len(), 1);
    assert_eq!(shifted[0], output.path().join("tile_W170.vrt"));
    assert!(shifted[0].exists());

    let source_corners = corner_coordinates(&west).unwrap();
    let vrt_corners = corner_coordinates(&shifted[0]).unwrap();

    // Longitudes re-anchored into [180, 360), latitudes untouched
    assert!((vrt_corners.upper_left.0 - (source_corners.upper_left.0 + 360.0)).abs() < 1e-9);
    assert!((vrt_corners.lower_right.0 - (source_corners.lower_right.0 + 360.0)).abs() < 1e-9);
    assert!((vrt_corners.upper_left.1 - source_corners.upper_left.1).abs() < 1e-9);
    assert!((vrt_corners.lower_right.1 - source_corners.lower_right.1).abs() < 1e-9);
    assert!((vrt_corners.upper_left.0 - 190.0).abs() < 1e-9);

    // The virtual raster references the original pixels unchanged
    let source_pixels = read_as_masked_array(&west, 1).unwrap();
    let vrt_pixels = read_as_masked_array(&shifted[0], 1).unwrap();
    assert_eq!(source_pixels, vrt_pixels);
}

#[test]
fn test_mixed_batch_preserves_order() {
    let tiles = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let east = write_tile(&tiles, "tile_E176.tif", 176.0, 54.0);
    let west = write_tile(&tiles, "tile_W178.tif", -178.0, 54.0);

    let shifted = shift_for_antimeridian(&[&east, &west], output.path()).unwrap();
    assert_eq!(shifted.len(), 2);
    assert_eq!(shifted[0], east);
    assert_eq!(shifted[1], output.path().join("tile_W178.vrt"));
}

#[test]
fn test_batch_fails_fast_but_keeps_earlier_output() {
    let tiles = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let good = write_tile(&tiles, "good_W1.tif", -170.0, 54.0);
    // Not a raster at all; corner metadata is unreadable
    let bad = tiles.path().join("bad_W2.tif");
    fs::write(&bad, b"this is not a raster").unwrap();

    let result = shift_for_antimeridian(&[&good, &bad], output.path());
    match result {
        Err(RasterError::CornerCoordinates { path, .. }) => assert_eq!(path, bad),
        other => panic!("expected CornerCoordinates error, got {other:?}"),
    }

    // The virtual raster written before the failure stays on disk
    assert!(output.path().join("good_W1.vrt").exists());
}
