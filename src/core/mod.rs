//! Core raster processing modules

pub mod antimeridian;
pub mod scale;

// Re-export main operations
pub use antimeridian::{classify_hemisphere, corner_coordinates, shift_for_antimeridian, WEST_TILE_MARKER};
pub use scale::{convert_scale, convert_scale_str};

#[cfg(feature = "parallel")]
pub use scale::convert_scale_parallel;
