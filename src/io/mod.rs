//! I/O modules for reading and writing raster data

pub mod raster;

pub use raster::{read_as_masked_array, write_raster};
