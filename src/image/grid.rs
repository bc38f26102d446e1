//! Dense multi-channel pixel grid with normalized `f32` samples.

use super::GrayF32;
use crate::error::{Result, TamperError};
use serde::Serialize;

/// Rec. 601 luminance weights for the RGB → gray conversion.
const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Row-major pixel grid with `channels` interleaved samples per pixel.
///
/// Samples are normalized to `[0, 1]`. Supported channel counts are 1
/// (grayscale), 3 (RGB) and 4 (RGBA, alpha ignored by the gray derivation).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PixelGrid {
    /// Grid width in pixels
    pub w: usize,
    /// Grid height in pixels
    pub h: usize,
    /// Interleaved samples per pixel (1, 3 or 4)
    pub channels: usize,
    /// Backing storage, length `w * h * channels`
    pub data: Vec<f32>,
}

impl PixelGrid {
    /// Wrap an already-decoded bitmap given as normalized `f32` samples.
    ///
    /// Fails with `UnsupportedFormat` for channel counts outside {1, 3, 4}
    /// and `InvalidDimensions` when the sample count does not match
    /// `w * h * channels`.
    pub fn from_samples(w: usize, h: usize, channels: usize, data: Vec<f32>) -> Result<Self> {
        if !matches!(channels, 1 | 3 | 4) {
            return Err(TamperError::UnsupportedFormat { channels });
        }
        let expected = w * h * channels;
        if data.len() != expected {
            return Err(TamperError::InvalidDimensions(format!(
                "{w}x{h}x{channels} grid needs {expected} samples, found {}",
                data.len()
            )));
        }
        Ok(Self {
            w,
            h,
            channels,
            data,
        })
    }

    /// Wrap an already-decoded 8-bit bitmap, scaling samples by 1/255.
    pub fn from_bytes(w: usize, h: usize, channels: usize, bytes: &[u8]) -> Result<Self> {
        let data = bytes.iter().map(|&b| b as f32 / 255.0).collect();
        Self::from_samples(w, h, channels, data)
    }

    #[inline]
    /// Linear index of the first sample of pixel (x, y).
    pub fn idx(&self, x: usize, y: usize) -> usize {
        (y * self.w + x) * self.channels
    }

    #[inline]
    /// All samples of pixel (x, y).
    pub fn pixel(&self, x: usize, y: usize) -> &[f32] {
        let i = self.idx(x, y);
        &self.data[i..i + self.channels]
    }

    #[inline]
    /// Sample of channel `c` at pixel (x, y).
    pub fn sample(&self, x: usize, y: usize, c: usize) -> f32 {
        self.data[self.idx(x, y) + c]
    }

    #[inline]
    /// (w, h, channels) triple used for shape comparisons.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.w, self.h, self.channels)
    }

    /// Grayscale derivation: identity for single-channel grids, Rec. 601
    /// weighted luminance otherwise. Alpha is ignored.
    pub fn to_luma(&self) -> GrayF32 {
        let mut out = GrayF32::new(self.w, self.h);
        if self.channels == 1 {
            out.data.copy_from_slice(&self.data);
            return out;
        }
        for y in 0..self.h {
            let dst = out.row_mut(y);
            for (x, dst_px) in dst.iter_mut().enumerate() {
                let px = self.pixel(x, y);
                *dst_px = px[0] * LUMA_WEIGHTS[0] + px[1] * LUMA_WEIGHTS[1] + px[2] * LUMA_WEIGHTS[2];
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_samples_validates_shape() {
        let grid = PixelGrid::from_samples(2, 2, 1, vec![0.0; 4]).expect("valid grid");
        assert_eq!(grid.shape(), (2, 2, 1));

        let err = PixelGrid::from_samples(2, 2, 1, vec![0.0; 5]).unwrap_err();
        assert!(matches!(err, TamperError::InvalidDimensions(_)));
    }

    #[test]
    fn rejects_unsupported_channel_count() {
        let err = PixelGrid::from_samples(1, 1, 2, vec![0.0; 2]).unwrap_err();
        assert_eq!(err, TamperError::UnsupportedFormat { channels: 2 });
    }

    #[test]
    fn from_bytes_scales_to_unit_range() {
        let grid = PixelGrid::from_bytes(1, 1, 3, &[0, 128, 255]).expect("valid grid");
        assert_eq!(grid.sample(0, 0, 0), 0.0);
        assert!((grid.sample(0, 0, 1) - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(grid.sample(0, 0, 2), 1.0);
    }

    #[test]
    fn luma_uses_rec601_weights() {
        let grid = PixelGrid::from_samples(1, 1, 3, vec![1.0, 0.5, 0.25]).expect("valid grid");
        let luma = grid.to_luma();
        let expected = 0.299 + 0.587 * 0.5 + 0.114 * 0.25;
        assert!((luma.get(0, 0) - expected).abs() < 1e-6);
    }

    #[test]
    fn luma_ignores_alpha() {
        let rgb = PixelGrid::from_samples(1, 1, 3, vec![0.2, 0.4, 0.6]).expect("rgb");
        let rgba = PixelGrid::from_samples(1, 1, 4, vec![0.2, 0.4, 0.6, 0.1]).expect("rgba");
        assert_eq!(rgb.to_luma().get(0, 0), rgba.to_luma().get(0, 0));
    }
}
