//! Masked raster band reading and writing

use crate::types::{MaskedArray, RasterError, RasterResult, ValidityMask};
use gdal::raster::Buffer;
use gdal::{Dataset, DriverManager};
use ndarray::Array2;
use std::path::Path;

/// Read a raster band into memory, masking invalid and NoData values.
///
/// Non-finite pixels (NaN, +/-inf) are always masked. If the band declares a
/// NoData value, pixels exactly equal to it are masked as well; the two
/// masks compound. Masked positions keep the value stored in the file, they
/// are only flagged.
///
/// `band` is 1-indexed, matching GDAL.
pub fn read_as_masked_array<P: AsRef<Path>>(raster_path: P, band: usize) -> RasterResult<MaskedArray> {
    let path = raster_path.as_ref();
    log::debug!("Reading raster values from {}", path.display());

    let dataset = Dataset::open(path).map_err(|e| RasterError::RasterOpen {
        path: path.to_path_buf(),
        source: e,
    })?;

    let band_count = dataset.raster_count() as usize;
    if band < 1 || band > band_count {
        return Err(RasterError::BandIndex {
            band,
            available: band_count,
            path: path.to_path_buf(),
        });
    }

    let rasterband = dataset.rasterband(band as isize)?;
    let nodata = rasterband.no_data_value();

    let (width, height) = dataset.raster_size();
    let buffer = rasterband.read_as::<f32>((0, 0), (width, height), (width, height), None)?;
    let values: Vec<f32> = buffer.data;
    let data = Array2::from_shape_vec((height, width), values)?;

    let mask: ValidityMask = match nodata {
        Some(nodata) => data.mapv(|v| !v.is_finite() || v == nodata as f32),
        None => data.mapv(|v| !v.is_finite()),
    };

    MaskedArray::new(data, mask)
}

/// Write a masked array as a single-band float32 GeoTIFF.
///
/// When a NoData value is given, masked slots are filled with it and the
/// band declares it; otherwise the raw grid is written as-is. An empty
/// `projection` leaves the dataset without a spatial reference.
pub fn write_raster<P: AsRef<Path>>(
    raster_path: P,
    array: &MaskedArray,
    geo_transform: &[f64; 6],
    projection: &str,
    nodata: Option<f64>,
) -> RasterResult<()> {
    let path = raster_path.as_ref();
    log::info!("Writing raster to {}", path.display());

    let (height, width) = array.dim();
    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let mut dataset = driver.create_with_band_type::<f32, _>(path, width as isize, height as isize, 1)?;

    dataset.set_geo_transform(geo_transform)?;
    if !projection.is_empty() {
        dataset.set_projection(projection)?;
    }

    let grid = match nodata {
        Some(sentinel) => array.filled(sentinel as f32),
        None => array.data().clone(),
    };

    let mut rasterband = dataset.rasterband(1)?;
    let mut buffer = Buffer::new((width, height), grid.into_raw_vec());
    rasterband.write((0, 0), (width, height), &mut buffer)?;
    rasterband.set_no_data_value(nodata)?;

    Ok(())
}
