//! Local Binary Pattern texture histograms.
//!
//! The classic 8-neighbor LBP: each interior pixel is compared against its
//! 8 neighbors in a fixed clockwise order starting from the top-left; every
//! comparison contributes one bit (1 when neighbor ≥ center), packed
//! MSB-first into an 8-bit code. The histogram counts codes over all
//! interior pixels.
//!
//! Border policy: the outermost 1-pixel frame is skipped entirely (no
//! wrapping, no padding), so the histogram sum is exactly
//! `(w - 2) * (h - 2)`. Buffers narrower or shorter than 3 pixels have no
//! interior and produce an empty histogram.
//!
//! Bins are raw counts; normalization is left to comparison consumers (see
//! [`LbpHistogram::normalized`] and [`chi_square_distance`]).

use crate::image::{GrayF32, PixelGrid};
use rayon::prelude::*;

/// Neighbor offsets in clockwise order starting from the top-left.
/// The first offset maps to the most significant bit of the code.
const NEIGHBORS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
];

/// 256-bin histogram of LBP codes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LbpHistogram {
    bins: [u32; 256],
}

impl Default for LbpHistogram {
    fn default() -> Self {
        Self { bins: [0u32; 256] }
    }
}

impl LbpHistogram {
    /// Raw bin counts indexed by LBP code.
    #[inline]
    pub fn bins(&self) -> &[u32; 256] {
        &self.bins
    }

    /// Count for a single code.
    #[inline]
    pub fn count(&self, code: u8) -> u32 {
        self.bins[code as usize]
    }

    /// Total number of sampled pixels (sum over all bins).
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|&c| c as u64).sum()
    }

    /// L1-normalized view of the histogram. All-zero histograms normalize
    /// to all zeros.
    pub fn normalized(&self) -> [f64; 256] {
        let total = self.total();
        let mut out = [0.0f64; 256];
        if total == 0 {
            return out;
        }
        let inv = 1.0 / total as f64;
        for (dst, &count) in out.iter_mut().zip(self.bins.iter()) {
            *dst = count as f64 * inv;
        }
        out
    }

    fn merge(mut self, other: Self) -> Self {
        for (dst, src) in self.bins.iter_mut().zip(other.bins.iter()) {
            *dst += src;
        }
        self
    }
}

/// Compute the LBP histogram of a pixel grid's grayscale derivation.
pub fn compute_lbp(grid: &PixelGrid) -> LbpHistogram {
    lbp_of_gray(&grid.to_luma())
}

/// Compute the LBP histogram of a single-channel buffer.
///
/// Rows are independent, so interior rows are accumulated in parallel into
/// per-row partial histograms and summed at the join.
pub fn lbp_of_gray(gray: &GrayF32) -> LbpHistogram {
    let (w, h) = (gray.w, gray.h);
    if w < 3 || h < 3 {
        return LbpHistogram::default();
    }

    (1..h - 1)
        .into_par_iter()
        .map(|y| {
            let mut partial = LbpHistogram::default();
            for x in 1..w - 1 {
                let code = lbp_code(gray, x, y);
                partial.bins[code as usize] += 1;
            }
            partial
        })
        .reduce(LbpHistogram::default, LbpHistogram::merge)
}

#[inline]
fn lbp_code(gray: &GrayF32, x: usize, y: usize) -> u8 {
    let center = gray.get(x, y);
    let mut code = 0u8;
    for &(dx, dy) in NEIGHBORS.iter() {
        let nx = (x as isize + dx) as usize;
        let ny = (y as isize + dy) as usize;
        code <<= 1;
        if gray.get(nx, ny) >= center {
            code |= 1;
        }
    }
    code
}

/// Chi-square distance between two histograms, computed on their
/// L1-normalized forms. Zero for identical distributions, symmetric in its
/// arguments.
pub fn chi_square_distance(a: &LbpHistogram, b: &LbpHistogram) -> f64 {
    let pa = a.normalized();
    let pb = b.normalized();
    let mut acc = 0.0f64;
    for (&p, &q) in pa.iter().zip(pb.iter()) {
        let sum = p + q;
        if sum > 0.0 {
            let diff = p - q;
            acc += diff * diff / sum;
        }
    }
    0.5 * acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::PixelGrid;

    fn uniform(w: usize, h: usize, value: f32) -> PixelGrid {
        PixelGrid::from_samples(w, h, 1, vec![value; w * h]).expect("valid grid")
    }

    #[test]
    fn uniform_image_lands_in_one_bin() {
        let grid = uniform(10, 7, 0.5);
        let hist = compute_lbp(&grid);
        // All neighbors equal the center, so every comparison yields 1.
        assert_eq!(hist.count(255), (10 - 2) * (7 - 2));
        assert_eq!(hist.total(), ((10 - 2) * (7 - 2)) as u64);
    }

    #[test]
    fn histogram_sum_matches_interior_pixel_count() {
        let w = 9;
        let h = 6;
        let data: Vec<f32> = (0..w * h).map(|i| (i % 13) as f32 / 13.0).collect();
        let grid = PixelGrid::from_samples(w, h, 1, data).expect("valid grid");
        let hist = compute_lbp(&grid);
        assert_eq!(hist.total(), ((w - 2) * (h - 2)) as u64);
    }

    #[test]
    fn degenerate_sizes_produce_empty_histograms() {
        for (w, h) in [(2, 5), (5, 2), (1, 1)] {
            let hist = compute_lbp(&uniform(w, h, 0.3));
            assert_eq!(hist.total(), 0, "{w}x{h} has no interior pixels");
        }
    }

    #[test]
    fn code_is_msb_first_clockwise_from_top_left() {
        // Center 0.5; only the top-left neighbor is brighter, so only the
        // most significant bit is set (plus nothing else: the remaining
        // neighbors are strictly darker).
        let mut gray = GrayF32::new(3, 3);
        for v in gray.data.iter_mut() {
            *v = 0.1;
        }
        gray.set(1, 1, 0.5);
        gray.set(0, 0, 0.9);
        let hist = lbp_of_gray(&gray);
        assert_eq!(hist.count(0b1000_0000), 1);
        assert_eq!(hist.total(), 1);
    }

    #[test]
    fn chi_square_distance_properties() {
        let a = compute_lbp(&uniform(8, 8, 0.2));
        let mut noisy = vec![0.0f32; 64];
        for (i, v) in noisy.iter_mut().enumerate() {
            *v = ((i * 7) % 11) as f32 / 11.0;
        }
        let b = compute_lbp(&PixelGrid::from_samples(8, 8, 1, noisy).expect("valid grid"));

        assert_eq!(chi_square_distance(&a, &a), 0.0);
        let ab = chi_square_distance(&a, &b);
        let ba = chi_square_distance(&b, &a);
        assert!(ab > 0.0, "different textures must be at positive distance");
        assert!((ab - ba).abs() < 1e-12, "distance must be symmetric");
    }
}
