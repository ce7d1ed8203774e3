use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Real-valued raster pixel data
pub type RasterValue = f32;

/// 2D raster grid (rows x cols)
pub type RasterGrid = Array2<RasterValue>;

/// Per-pixel validity grid; `true` marks a masked (invalid) pixel
pub type ValidityMask = Array2<bool>;

/// Radiometric scale of a calibrated raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    Db,
    Amplitude,
    Power,
}

impl Scale {
    /// Parse a scale tag as it appears in product metadata and CLI arguments.
    pub fn from_name(name: &str) -> Option<Scale> {
        match name.to_lowercase().as_str() {
            "db" => Some(Scale::Db),
            "amplitude" => Some(Scale::Amplitude),
            "power" => Some(Scale::Power),
            _ => None,
        }
    }
}

impl std::fmt::Display for Scale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scale::Db => write!(f, "db"),
            Scale::Amplitude => write!(f, "amplitude"),
            Scale::Power => write!(f, "power"),
        }
    }
}

/// Longitudinal hemisphere of a raster tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hemisphere {
    East,
    West,
}

/// Georeferenced corner coordinates of a raster (x = longitude, y = latitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CornerCoords {
    pub upper_left: (f64, f64),
    pub lower_right: (f64, f64),
}

impl CornerCoords {
    /// Shift both corners in longitude, leaving latitude untouched.
    pub fn shift_lon(&self, degrees: f64) -> CornerCoords {
        CornerCoords {
            upper_left: (self.upper_left.0 + degrees, self.upper_left.1),
            lower_right: (self.lower_right.0 + degrees, self.lower_right.1),
        }
    }

    /// Bounds in GDAL `-a_ullr` order: ulx, uly, lrx, lry.
    pub fn to_ullr(&self) -> [f64; 4] {
        [
            self.upper_left.0,
            self.upper_left.1,
            self.lower_right.0,
            self.lower_right.1,
        ]
    }
}

/// A raster grid paired with a same-shaped validity mask.
///
/// Masked elements are excluded from arithmetic and keep whatever value the
/// source raster carried; callers must not dereference masked slots without
/// consulting the mask.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedArray {
    data: RasterGrid,
    mask: ValidityMask,
}

impl MaskedArray {
    /// Pair a grid with a validity mask of the same shape.
    pub fn new(data: RasterGrid, mask: ValidityMask) -> RasterResult<MaskedArray> {
        if data.dim() != mask.dim() {
            return Err(RasterError::ShapeMismatch {
                data_shape: data.dim(),
                mask_shape: mask.dim(),
            });
        }
        Ok(MaskedArray { data, mask })
    }

    /// Wrap a grid with every element valid.
    pub fn from_data(data: RasterGrid) -> MaskedArray {
        let mask = ValidityMask::from_elem(data.dim(), false);
        MaskedArray { data, mask }
    }

    /// Grid shape as (rows, cols).
    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn data(&self) -> &RasterGrid {
        &self.data
    }

    pub fn mask(&self) -> &ValidityMask {
        &self.mask
    }

    pub fn is_masked(&self, row: usize, col: usize) -> bool {
        self.mask[[row, col]]
    }

    pub fn count_masked(&self) -> usize {
        self.mask.iter().filter(|&&masked| masked).count()
    }

    /// Apply `f` elementwise to valid elements only.
    ///
    /// Masked slots keep their stored value and stay masked, so transforms
    /// with a restricted domain (log, sqrt) never see pre-masked pixels.
    pub fn map<F>(&self, f: F) -> MaskedArray
    where
        F: Fn(RasterValue) -> RasterValue,
    {
        let data = Zip::from(&self.data)
            .and(&self.mask)
            .map_collect(|&value, &masked| if masked { value } else { f(value) });
        MaskedArray {
            data,
            mask: self.mask.clone(),
        }
    }

    /// Parallel variant of [`map`](Self::map).
    #[cfg(feature = "parallel")]
    pub fn par_map<F>(&self, f: F) -> MaskedArray
    where
        F: Fn(RasterValue) -> RasterValue + Sync + Send,
    {
        let data = Zip::from(&self.data)
            .and(&self.mask)
            .par_map_collect(|&value, &masked| if masked { value } else { f(value) });
        MaskedArray {
            data,
            mask: self.mask.clone(),
        }
    }

    /// Combine two arrays elementwise; the result mask is the union of the
    /// operand masks.
    pub fn zip_with<F>(&self, other: &MaskedArray, f: F) -> RasterResult<MaskedArray>
    where
        F: Fn(RasterValue, RasterValue) -> RasterValue,
    {
        if self.dim() != other.dim() {
            return Err(RasterError::ShapeMismatch {
                data_shape: self.dim(),
                mask_shape: other.dim(),
            });
        }
        let data = Zip::from(&self.data)
            .and(&other.data)
            .map_collect(|&a, &b| f(a, b));
        let mask = Zip::from(&self.mask)
            .and(&other.mask)
            .map_collect(|&a, &b| a || b);
        Ok(MaskedArray { data, mask })
    }

    /// Raw grid with masked slots replaced by `fill`, e.g. a NoData sentinel.
    pub fn filled(&self, fill: RasterValue) -> RasterGrid {
        Zip::from(&self.data)
            .and(&self.mask)
            .map_collect(|&value, &masked| if masked { fill } else { value })
    }
}

/// Error types for raster processing
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("Cannot convert raster of scale {in_scale} to {out_scale}")]
    InvalidScale { in_scale: String, out_scale: String },

    #[error("Failed to open raster {}: {}", .path.display(), .source)]
    RasterOpen {
        path: PathBuf,
        source: gdal::errors::GdalError,
    },

    #[error("Band {} is out of range for {} ({} bands)", .band, .path.display(), .available)]
    BandIndex {
        band: usize,
        available: usize,
        path: PathBuf,
    },

    #[error("Failed to read corner coordinates from {}: {}", .path.display(), .reason)]
    CornerCoordinates { path: PathBuf, reason: String },

    #[error("Failed to create virtual raster {}: {}", .path.display(), .reason)]
    Vrt { path: PathBuf, reason: String },

    #[error("Mask shape {mask_shape:?} does not match data shape {data_shape:?}")]
    ShapeMismatch {
        data_shape: (usize, usize),
        mask_shape: (usize, usize),
    },

    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Result type for raster operations
pub type RasterResult<T> = Result<T, RasterError>;
