//! hydrotools: Raster Primitives for Hydrological Terrain Analysis
//!
//! This library provides the raster-processing building blocks used when
//! preparing calibrated backscatter and DEM tiles for HAND (Height Above
//! Nearest Drainage) products: radiometric scale conversion between db,
//! amplitude and power, masked reading of raster bands with NoData
//! handling, and antimeridian-aware mosaicking of longitude-tiled rasters
//! through virtual raster files.

pub mod core;
pub mod io;
pub mod types;

// Re-export main types and functions for easier access
pub use types::{
    CornerCoords, Hemisphere, MaskedArray, RasterError, RasterGrid, RasterResult, RasterValue,
    Scale, ValidityMask,
};

pub use crate::core::antimeridian::{
    classify_hemisphere, corner_coordinates, shift_for_antimeridian, WEST_TILE_MARKER,
};
pub use crate::core::scale::{convert_scale, convert_scale_str};
pub use io::raster::{read_as_masked_array, write_raster};

#[cfg(feature = "parallel")]
pub use crate::core::scale::convert_scale_parallel;
