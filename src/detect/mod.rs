//! Per-pixel tampering detection between two grids of the same scene.
//!
//! The difference metric is the maximum absolute per-channel difference, so
//! the classification threshold means the same thing for grayscale and
//! color inputs. A pixel is tampered when that difference exceeds
//! `DetectOptions::threshold`.
//!
//! Mask cleanup removes isolated single-pixel detections (true cells with
//! zero true 8-neighbors). The pass reads the input mask and writes a fresh
//! one, so it is order-independent, and a surviving cell always keeps the
//! surviving neighbor that saved it: applying the cleanup twice yields the
//! same mask as applying it once.

use crate::error::{Result, TamperError};
use crate::image::PixelGrid;
use serde::Serialize;
use std::time::Instant;

/// Knobs for the per-pixel classification.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct DetectOptions {
    /// Difference above which a pixel counts as tampered, on the
    /// normalized [0, 1] sample scale.
    pub threshold: f32,
    /// Remove isolated single-pixel detections from the mask.
    pub clean_mask: bool,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            clean_mask: true,
        }
    }
}

/// Binary per-pixel tampering classification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DetectionMask {
    /// Mask width in pixels
    pub w: usize,
    /// Mask height in pixels
    pub h: usize,
    /// Row-major cells, true where a pixel is classified tampered
    pub data: Vec<bool>,
}

impl DetectionMask {
    /// All-false mask of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![false; w * h],
        }
    }

    #[inline]
    /// Cell at (x, y).
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.w + x]
    }

    #[inline]
    /// Set the cell at (x, y).
    pub fn set(&mut self, x: usize, y: usize, v: bool) {
        self.data[y * self.w + x] = v;
    }

    /// Number of tampered cells.
    pub fn count_true(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// Fraction of tampered cells scaled to [0, 100].
    pub fn percentage(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        100.0 * self.count_true() as f32 / self.data.len() as f32
    }

    /// True when the cell has at least one true 8-neighbor.
    fn has_true_neighbor(&self, x: usize, y: usize) -> bool {
        let x0 = x.saturating_sub(1);
        let y0 = y.saturating_sub(1);
        let x1 = (x + 1).min(self.w - 1);
        let y1 = (y + 1).min(self.h - 1);
        for ny in y0..=y1 {
            for nx in x0..=x1 {
                if (nx, ny) != (x, y) && self.get(nx, ny) {
                    return true;
                }
            }
        }
        false
    }

    /// Copy of the mask with isolated true cells cleared. Idempotent.
    pub fn without_isolated(&self) -> Self {
        let mut out = self.clone();
        for y in 0..self.h {
            for x in 0..self.w {
                if self.get(x, y) && !self.has_true_neighbor(x, y) {
                    out.set(x, y, false);
                }
            }
        }
        out
    }
}

/// Detection outcome: the tampered percentage and the pixel mask it was
/// computed from.
#[derive(Clone, Debug, Serialize)]
pub struct Detection {
    /// Tampered fraction in [0, 100]
    pub percentage: f32,
    /// Per-pixel classification
    pub mask: DetectionMask,
    /// Wall-clock time spent classifying
    pub elapsed_ms: f64,
}

/// Compare two same-size grids and classify every pixel.
///
/// Fails with `DimensionMismatch` when the grids differ in width, height or
/// channel count; grids are never resized to fit.
pub fn detect_tampering(
    original: &PixelGrid,
    tampered: &PixelGrid,
    options: &DetectOptions,
) -> Result<Detection> {
    if original.shape() != tampered.shape() {
        return Err(TamperError::DimensionMismatch {
            expected: original.shape(),
            actual: tampered.shape(),
        });
    }

    let start = Instant::now();
    let (w, h) = (original.w, original.h);
    let mut mask = DetectionMask::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let a = original.pixel(x, y);
            let b = tampered.pixel(x, y);
            let mut diff = 0.0f32;
            for (&pa, &pb) in a.iter().zip(b.iter()) {
                diff = diff.max((pa - pb).abs());
            }
            if diff > options.threshold {
                mask.set(x, y, true);
            }
        }
    }

    if options.clean_mask {
        mask = mask.without_isolated();
    }
    let percentage = mask.percentage();
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    Ok(Detection {
        percentage,
        mask,
        elapsed_ms,
    })
}
