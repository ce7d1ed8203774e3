//! Antimeridian handling for longitude-tiled rasters
//!
//! Western-hemisphere tiles nominally span [-180, 0) and cannot be mosaicked
//! with eastern tiles across the 180/-180 line. Re-anchoring their bounds by
//! +360 degrees makes both sides numerically contiguous in [0, 360). The
//! shift is done through VRT files, so no pixel data is copied or resampled.

use crate::types::{CornerCoords, Hemisphere, RasterError, RasterResult};
use gdal::cpl::CslStringList;
use gdal::Dataset;
use std::ffi::{c_int, CString};
use std::path::{Path, PathBuf};

/// File-name token marking a western-hemisphere tile.
///
/// This is a contract with the upstream tiling scheme (e.g. `dem_tile_W10.tif`)
/// and must match its naming exactly.
pub const WEST_TILE_MARKER: &str = "_W";

/// Classify a raster tile by the hemisphere marker in its file name.
///
/// Only the file-name component is inspected; parent directories never
/// influence the decision.
pub fn classify_hemisphere<P: AsRef<Path>>(raster_path: P) -> Hemisphere {
    let name = raster_path
        .as_ref()
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    if name.contains(WEST_TILE_MARKER) {
        Hemisphere::West
    } else {
        Hemisphere::East
    }
}

/// Read the upper-left and lower-right corner coordinates of a raster.
pub fn corner_coordinates<P: AsRef<Path>>(raster_path: P) -> RasterResult<CornerCoords> {
    let path = raster_path.as_ref();
    let dataset = Dataset::open(path).map_err(|e| RasterError::CornerCoordinates {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let gt = dataset
        .geo_transform()
        .map_err(|e| RasterError::CornerCoordinates {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    let (width, height) = dataset.raster_size();
    let (width, height) = (width as f64, height as f64);

    Ok(CornerCoords {
        upper_left: (gt[0], gt[3]),
        lower_right: (gt[0] + width * gt[1] + height * gt[2], gt[3] + width * gt[4] + height * gt[5]),
    })
}

/// Re-anchor western-hemisphere tiles for antimeridian mosaicking.
///
/// Tiles whose file name carries [`WEST_TILE_MARKER`] get a virtual raster
/// written to `directory/<stem>.vrt` declaring their bounds shifted by +360
/// degrees longitude; all other paths pass through unchanged. The result is
/// order-preserving and the same length as the input.
///
/// Fails fast: the first tile whose corner metadata cannot be read aborts
/// the batch with [`RasterError::CornerCoordinates`]. Virtual rasters
/// already written for earlier tiles are left on disk; re-running after
/// fixing the input overwrites them in place.
pub fn shift_for_antimeridian<P: AsRef<Path>>(
    raster_paths: &[P],
    directory: &Path,
) -> RasterResult<Vec<PathBuf>> {
    let mut shifted_paths = Vec::with_capacity(raster_paths.len());
    for raster_path in raster_paths {
        let path = raster_path.as_ref();
        match classify_hemisphere(path) {
            Hemisphere::East => shifted_paths.push(path.to_path_buf()),
            Hemisphere::West => shifted_paths.push(shift_tile(path, directory)?),
        }
    }
    Ok(shifted_paths)
}

fn shift_tile(path: &Path, directory: &Path) -> RasterResult<PathBuf> {
    let vrt_name = path
        .with_extension("vrt")
        .file_name()
        .map(|name| name.to_os_string())
        .ok_or_else(|| RasterError::Vrt {
            path: path.to_path_buf(),
            reason: "raster path has no file name".to_string(),
        })?;
    let vrt_path = directory.join(vrt_name);

    let corners = corner_coordinates(path)?;
    let bounds = corners.shift_lon(360.0).to_ullr();
    log::debug!(
        "Shifting {} across the antimeridian: bounds {:?} -> {:?}",
        path.display(),
        corners.to_ullr(),
        bounds
    );

    let dataset = Dataset::open(path).map_err(|e| RasterError::CornerCoordinates {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    translate_to_vrt(&dataset, &vrt_path, &bounds)?;

    Ok(vrt_path)
}

struct TranslateOptions {
    options: *mut gdal_sys::GDALTranslateOptions,
}

impl TranslateOptions {
    fn new(args: &[String]) -> RasterResult<Self> {
        let mut argv = CslStringList::new();
        for arg in args {
            argv.add_string(arg)?;
        }
        unsafe {
            Ok(TranslateOptions {
                options: gdal_sys::GDALTranslateOptionsNew(argv.as_ptr(), std::ptr::null_mut()),
            })
        }
    }
}

impl Drop for TranslateOptions {
    fn drop(&mut self) {
        unsafe {
            gdal_sys::GDALTranslateOptionsFree(self.options);
        }
    }
}

/// Write a VRT referencing `source`'s pixels under the given `-a_ullr` bounds.
fn translate_to_vrt(source: &Dataset, vrt_path: &Path, bounds: &[f64; 4]) -> RasterResult<()> {
    let mut args = vec!["-of".to_string(), "VRT".to_string(), "-a_ullr".to_string()];
    args.extend(bounds.iter().map(|value| value.to_string()));
    let options = TranslateOptions::new(&args)?;

    let dest = CString::new(vrt_path.to_string_lossy().as_ref()).map_err(|_| RasterError::Vrt {
        path: vrt_path.to_path_buf(),
        reason: "path contains an interior NUL byte".to_string(),
    })?;

    let mut usage_error: c_int = 0;
    let vrt = unsafe {
        let handle = gdal_sys::GDALTranslate(
            dest.as_ptr(),
            source.c_dataset(),
            options.options,
            &mut usage_error,
        );
        if handle.is_null() {
            return Err(RasterError::Vrt {
                path: vrt_path.to_path_buf(),
                reason: "GDALTranslate returned no dataset".to_string(),
            });
        }
        Dataset::from_c_dataset(handle)
    };
    if usage_error != 0 {
        return Err(RasterError::Vrt {
            path: vrt_path.to_path_buf(),
            reason: "invalid translate arguments".to_string(),
        });
    }

    // Closing the dataset flushes the VRT to disk
    drop(vrt);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_west_tile() {
        assert_eq!(classify_hemisphere("tile_W10.tif"), Hemisphere::West);
        assert_eq!(
            classify_hemisphere("/data/tiles/dem_tile_W154.tif"),
            Hemisphere::West
        );
    }

    #[test]
    fn test_classify_east_tile() {
        assert_eq!(classify_hemisphere("tile_E10.tif"), Hemisphere::East);
        assert_eq!(classify_hemisphere("tile_w10.tif"), Hemisphere::East);
    }

    #[test]
    fn test_marker_in_directory_does_not_classify() {
        assert_eq!(
            classify_hemisphere("/data/batch_W2024/tile_E10.tif"),
            Hemisphere::East
        );
    }

    #[test]
    fn test_classify_empty_path() {
        assert_eq!(classify_hemisphere(""), Hemisphere::East);
    }
}
