//! Batch tensor denormalization for visualization
//!
//! Model inputs are normalized, channels-first, RGB. Turning them back into
//! something displayable means undoing the normalization, swapping to BGR,
//! and optionally moving channels last.

use ndarray::{Array4, Axis, Slice};
use thiserror::Error;

/// Per-channel RGB statistics commonly used to normalize model inputs.
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TensorError {
    #[error("expected a [B, 3, H, W] batch, got {0} channels")]
    BadChannels(usize),
}

/// Undo per-channel normalization on a `[B, C, H, W]` batch: each value
/// becomes `x * std[c] + mean[c]`, then the channel axis is reversed from
/// RGB to BGR.
///
/// With `channels_last` the result is permuted to `[B, H, W, C]`.
pub fn denormalize(
    batch: &Array4<f32>,
    mean: [f32; 3],
    std: [f32; 3],
    channels_last: bool,
) -> Result<Array4<f32>, TensorError> {
    let channels = batch.shape()[1];
    if channels != 3 {
        return Err(TensorError::BadChannels(channels));
    }

    let mut out = batch.clone();
    for (c, mut lane) in out.axis_iter_mut(Axis(1)).enumerate() {
        lane.mapv_inplace(|v| v * std[c] + mean[c]);
    }

    // RGB -> BGR
    let out = out
        .slice_axis(Axis(1), Slice::new(0, None, -1))
        .to_owned();

    if channels_last {
        Ok(out.permuted_axes([0, 2, 3, 1]).as_standard_layout().to_owned())
    } else {
        Ok(out)
    }
}
