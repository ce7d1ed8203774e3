//! Radiometric scale conversion between db, amplitude and power

use crate::types::{MaskedArray, RasterError, RasterResult, RasterValue, Scale};

/// Elementwise conversion for an ordered (from, to) scale pair.
///
/// The diagonal is handled by the callers as an identity no-op; every other
/// pair of the three scales has an entry here, so `None` is the single
/// unsupported-pair branch.
fn conversion(in_scale: Scale, out_scale: Scale) -> Option<fn(RasterValue) -> RasterValue> {
    match (in_scale, out_scale) {
        (Scale::Db, Scale::Power) => Some(|x| 10f32.powf(x / 10.0)),
        (Scale::Db, Scale::Amplitude) => Some(|x| 10f32.powf(x / 20.0)),
        (Scale::Amplitude, Scale::Power) => Some(|x| x * x),
        (Scale::Amplitude, Scale::Db) => Some(|x| 10.0 * (x * x).log10()),
        (Scale::Power, Scale::Amplitude) => Some(|x| x.sqrt()),
        (Scale::Power, Scale::Db) => Some(|x| 10.0 * x.log10()),
        _ => None,
    }
}

/// Convert a calibrated raster between db, amplitude and power.
///
/// Converting a raster to the scale it is already in is a no-op, not an
/// error: a warning is logged and the array is returned unchanged. Masked
/// elements pass through every conversion untouched and stay masked, so the
/// log-based paths never evaluate pre-masked non-positive pixels. Negative
/// or zero values that are *not* masked are the caller's responsibility.
pub fn convert_scale(
    array: MaskedArray,
    in_scale: Scale,
    out_scale: Scale,
) -> RasterResult<MaskedArray> {
    if in_scale == out_scale {
        log::warn!("Nothing to do! {in_scale} is same as {out_scale}.");
        return Ok(array);
    }

    match conversion(in_scale, out_scale) {
        Some(f) => Ok(array.map(f)),
        None => Err(RasterError::InvalidScale {
            in_scale: in_scale.to_string(),
            out_scale: out_scale.to_string(),
        }),
    }
}

/// [`convert_scale`] with scale tags as strings.
///
/// This is the boundary where unrecognized tags from product metadata or
/// user input surface as [`RasterError::InvalidScale`], carrying both
/// requested names.
pub fn convert_scale_str(
    array: MaskedArray,
    in_scale: &str,
    out_scale: &str,
) -> RasterResult<MaskedArray> {
    match (Scale::from_name(in_scale), Scale::from_name(out_scale)) {
        (Some(from), Some(to)) => convert_scale(array, from, to),
        _ => Err(RasterError::InvalidScale {
            in_scale: in_scale.to_string(),
            out_scale: out_scale.to_string(),
        }),
    }
}

/// Parallel variant of [`convert_scale`] for large grids.
#[cfg(feature = "parallel")]
pub fn convert_scale_parallel(
    array: MaskedArray,
    in_scale: Scale,
    out_scale: Scale,
) -> RasterResult<MaskedArray> {
    if in_scale == out_scale {
        log::warn!("Nothing to do! {in_scale} is same as {out_scale}.");
        return Ok(array);
    }

    match conversion(in_scale, out_scale) {
        Some(f) => Ok(array.par_map(f)),
        None => Err(RasterError::InvalidScale {
            in_scale: in_scale.to_string(),
            out_scale: out_scale.to_string(),
        }),
    }
}
