//! Pre-flight checks shared by the packing and unpacking engines.
//!
//! These are pure functions; a failure must stop the calling operation.

use crate::buffer::ChannelArray;
use crate::error::EngineError;

/// Returns true if every array has the same `(width, height)`.
///
/// Zero or one array is trivially a match.
pub fn check_resolution_match(arrays: &[&ChannelArray]) -> bool {
    match arrays.split_first() {
        Some((first, rest)) => rest.iter().all(|a| a.dimensions() == first.dimensions()),
        None => true,
    }
}

/// Returns the element-wise maximum width and height across `arrays`.
///
/// This bounding size need not match any single input.
pub fn get_max_resolution(arrays: &[&ChannelArray]) -> Result<(u32, u32), EngineError> {
    if arrays.is_empty() {
        return Err(EngineError::NoChannels);
    }
    let width = arrays.iter().map(|a| a.width).max().unwrap_or(0);
    let height = arrays.iter().map(|a| a.height).max().unwrap_or(0);
    Ok((width, height))
}

/// Checks that an array is a non-empty 2D plane whose buffer matches its size.
pub fn validate_channel_data(array: &ChannelArray) -> Result<(), EngineError> {
    if array.width == 0 || array.height == 0 {
        return Err(EngineError::InvalidChannelData(format!(
            "channel data cannot be empty, got {}x{}",
            array.width, array.height
        )));
    }
    let expected = array.width as usize * array.height as usize;
    if array.data.len() != expected {
        return Err(EngineError::InvalidChannelData(format!(
            "channel data must be a 2D {}x{} plane ({} values), got {} values",
            array.width,
            array.height,
            expected,
            array.data.len()
        )));
    }
    Ok(())
}

/// Checks that normalized values are finite and within `[0.0, 1.0]`.
pub fn validate_unit_values(values: &[f64]) -> Result<(), EngineError> {
    match values
        .iter()
        .enumerate()
        .find(|(_, v)| !(0.0..=1.0).contains(*v))
    {
        Some((i, v)) => Err(EngineError::InvalidChannelData(format!(
            "value {} at index {} is outside the range 0.0 to 1.0",
            v, i
        ))),
        None => Ok(()),
    }
}

/// Strict check for a set of optional arrays about to be packed.
///
/// Requires at least one array (all of them when `require_all`), validates
/// each, and fails with [`EngineError::ResolutionMismatch`] unless they all
/// share one size. Returns that size.
pub fn validate_arrays_for_packing(
    arrays: &[Option<&ChannelArray>],
    require_all: bool,
) -> Result<(u32, u32), EngineError> {
    let present: Vec<&ChannelArray> = arrays.iter().flatten().copied().collect();
    if present.is_empty() {
        return Err(EngineError::NoChannels);
    }
    if require_all && present.len() != arrays.len() {
        return Err(EngineError::InvalidChannelData(format!(
            "all channels are required, but {} of {} are missing",
            arrays.len() - present.len(),
            arrays.len()
        )));
    }

    for (i, array) in present.iter().enumerate() {
        validate_channel_data(array).map_err(|e| match e {
            EngineError::InvalidChannelData(msg) => {
                EngineError::InvalidChannelData(format!("channel {}: {}", i, msg))
            }
            other => other,
        })?;
    }

    if !check_resolution_match(&present) {
        return Err(EngineError::ResolutionMismatch {
            resolutions: present.iter().map(|a| a.dimensions()).collect(),
        });
    }
    Ok(present[0].dimensions())
}
