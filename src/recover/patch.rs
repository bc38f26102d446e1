//! Per-patch reconstruction strategies.
//!
//! Every function here operates on one patch region and returns the edits
//! (linear sample index, new value) to apply to the output grid, never
//! touching samples outside the region's masked pixels.

use super::{AppliedMethod, Confidence, PatchOutcome, RecoveryMethod};
use crate::detect::DetectionMask;
use crate::error::TamperError;
use crate::image::PixelGrid;
use crate::linalg::{low_rank_approximation, solve_linear_system};
use log::warn;
use nalgebra::DMatrix;

/// 4-neighborhood used by the Laplace stencil.
const STENCIL: [(isize, isize); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

/// Rectangular patch in grid coordinates.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PatchRegion {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

/// Shared read-only inputs for patch reconstruction.
pub(crate) struct PatchContext<'a> {
    pub original: &'a PixelGrid,
    pub tampered: &'a PixelGrid,
    pub mask: &'a DetectionMask,
}

/// Partition a `w × h` grid into `patch`-sized tiles, row-major. Edge tiles
/// keep their true (smaller) size.
pub(crate) fn tile(w: usize, h: usize, patch: usize) -> Vec<PatchRegion> {
    let mut regions = Vec::new();
    let mut y = 0;
    while y < h {
        let ph = patch.min(h - y);
        let mut x = 0;
        while x < w {
            let pw = patch.min(w - x);
            regions.push(PatchRegion { x, y, w: pw, h: ph });
            x += patch;
        }
        y += patch;
    }
    regions
}

type Edits = Vec<(usize, f32)>;

/// Reconstruct one patch. Infallible: reconstruction failures degrade to
/// mean fill and are reported through the outcome instead of an error.
pub(crate) fn recover_patch(
    ctx: &PatchContext<'_>,
    region: &PatchRegion,
    method: RecoveryMethod,
) -> (PatchOutcome, Edits) {
    let masked = masked_coords(ctx.mask, region);
    let outcome = |method, confidence| PatchOutcome {
        x: region.x,
        y: region.y,
        w: region.w,
        h: region.h,
        method,
        confidence,
    };

    if masked.is_empty() {
        return (outcome(AppliedMethod::Untouched, Confidence::Normal), vec![]);
    }

    let known = region.w * region.h - masked.len();
    if known == 0 {
        let edits = ring_mean_fill(ctx, region, &masked);
        return (outcome(AppliedMethod::MeanFill, Confidence::Low), edits);
    }

    let attempted = match method {
        RecoveryMethod::BoundaryInterpolation => interpolate_patch(ctx, region, &masked),
        RecoveryMethod::LowRankProjection { rank } => project_patch(ctx, region, &masked, rank),
    };
    match attempted {
        Ok(edits) => {
            let applied = match method {
                RecoveryMethod::BoundaryInterpolation => AppliedMethod::Interpolated,
                RecoveryMethod::LowRankProjection { .. } => AppliedMethod::LowRank,
            };
            (outcome(applied, Confidence::Normal), edits)
        }
        Err(err) => {
            warn!(
                "patch ({}, {}) reconstruction failed ({err}), using mean fill",
                region.x, region.y
            );
            let edits = known_mean_fill(ctx, region, &masked);
            (outcome(AppliedMethod::MeanFill, Confidence::Low), edits)
        }
    }
}

fn masked_coords(mask: &DetectionMask, region: &PatchRegion) -> Vec<(usize, usize)> {
    let mut coords = Vec::new();
    for y in region.y..region.y + region.h {
        for x in region.x..region.x + region.w {
            if mask.get(x, y) {
                coords.push((x, y));
            }
        }
    }
    coords
}

/// Discrete Laplace interpolation: every masked pixel equals the mean of
/// its usable 4-neighbors. Known neighbors contribute boundary values on
/// the right-hand side; masked neighbors inside the region couple unknowns;
/// masked neighbors outside the region (and positions off the grid) drop
/// out of the stencil.
fn interpolate_patch(
    ctx: &PatchContext<'_>,
    region: &PatchRegion,
    masked: &[(usize, usize)],
) -> Result<Edits, TamperError> {
    let n = masked.len();
    let mut local_index = vec![None; region.w * region.h];
    for (i, &(x, y)) in masked.iter().enumerate() {
        local_index[(y - region.y) * region.w + (x - region.x)] = Some(i);
    }
    let in_region = |x: usize, y: usize| {
        x >= region.x && x < region.x + region.w && y >= region.y && y < region.y + region.h
    };

    let grid = ctx.tampered;
    let mut edits = Vec::with_capacity(n * grid.channels);
    for c in 0..grid.channels {
        let mut aug = DMatrix::<f64>::zeros(n, n + 1);
        for (i, &(x, y)) in masked.iter().enumerate() {
            let mut degree = 0.0f64;
            for &(dx, dy) in STENCIL.iter() {
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                if nx < 0 || ny < 0 || nx as usize >= grid.w || ny as usize >= grid.h {
                    continue;
                }
                let (nx, ny) = (nx as usize, ny as usize);
                if ctx.mask.get(nx, ny) {
                    if in_region(nx, ny) {
                        let j = local_index[(ny - region.y) * region.w + (nx - region.x)]
                            .expect("masked in-region neighbor is indexed");
                        aug[(i, j)] -= 1.0;
                        degree += 1.0;
                    }
                    // Masked neighbors outside the region belong to another
                    // patch's system and drop out of this stencil.
                } else {
                    aug[(i, n)] += grid.sample(nx, ny, c) as f64;
                    degree += 1.0;
                }
            }
            if degree == 0.0 {
                return Err(TamperError::SingularSystem { pivot: i });
            }
            aug[(i, i)] += degree;
        }

        let solution = solve_linear_system(&aug)?;
        for (i, &(x, y)) in masked.iter().enumerate() {
            let value = solution[i].clamp(0.0, 1.0) as f32;
            edits.push((grid.idx(x, y) + c, value));
        }
    }
    Ok(edits)
}

/// Low-rank projection: masked pixels are taken from the rank-limited SVD
/// reconstruction of the aligned original-image patch.
fn project_patch(
    ctx: &PatchContext<'_>,
    region: &PatchRegion,
    masked: &[(usize, usize)],
    rank: usize,
) -> Result<Edits, TamperError> {
    let grid = ctx.original;
    let mut edits = Vec::with_capacity(masked.len() * grid.channels);
    for c in 0..grid.channels {
        let patch = DMatrix::from_fn(region.h, region.w, |row, col| {
            grid.sample(region.x + col, region.y + row, c) as f64
        });
        let approx = low_rank_approximation(&patch, rank)?;
        for &(x, y) in masked.iter() {
            let value = approx[(y - region.y, x - region.x)].clamp(0.0, 1.0) as f32;
            edits.push((ctx.tampered.idx(x, y) + c, value));
        }
    }
    Ok(edits)
}

/// Mean of the known pixels inside the region, used when a reconstruction
/// attempt failed.
fn known_mean_fill(
    ctx: &PatchContext<'_>,
    region: &PatchRegion,
    masked: &[(usize, usize)],
) -> Edits {
    let grid = ctx.tampered;
    let mut edits = Vec::with_capacity(masked.len() * grid.channels);
    for c in 0..grid.channels {
        let mut sum = 0.0f64;
        let mut count = 0usize;
        for y in region.y..region.y + region.h {
            for x in region.x..region.x + region.w {
                if !ctx.mask.get(x, y) {
                    sum += grid.sample(x, y, c) as f64;
                    count += 1;
                }
            }
        }
        let mean = if count > 0 { (sum / count as f64) as f32 } else { 0.0 };
        for &(x, y) in masked.iter() {
            edits.push((grid.idx(x, y) + c, mean));
        }
    }
    edits
}

/// Neighbor propagation for fully masked patches: grow a rectangular ring
/// around the region until it contains known pixels, then fill with their
/// mean. Degrades to the global mean of all known pixels, and finally to
/// the grid-wide channel mean when the whole image is masked.
fn ring_mean_fill(
    ctx: &PatchContext<'_>,
    region: &PatchRegion,
    masked: &[(usize, usize)],
) -> Edits {
    let grid = ctx.tampered;
    let mut donors: Vec<(usize, usize)> = Vec::new();
    for radius in 1..=grid.w.max(grid.h) {
        donors = ring_known_pixels(ctx, region, radius);
        if !donors.is_empty() {
            break;
        }
    }

    let mut edits = Vec::with_capacity(masked.len() * grid.channels);
    for c in 0..grid.channels {
        let mean = if donors.is_empty() {
            // Whole image masked: the grid-wide channel mean is the only
            // statistic left.
            let mut sum = 0.0f64;
            for y in 0..grid.h {
                for x in 0..grid.w {
                    sum += grid.sample(x, y, c) as f64;
                }
            }
            (sum / (grid.w * grid.h) as f64) as f32
        } else {
            let sum: f64 = donors
                .iter()
                .map(|&(x, y)| grid.sample(x, y, c) as f64)
                .sum();
            (sum / donors.len() as f64) as f32
        };
        for &(x, y) in masked.iter() {
            edits.push((grid.idx(x, y) + c, mean));
        }
    }
    edits
}

/// Known pixels on the rectangular ring `radius` pixels outside the region,
/// clipped to the grid.
fn ring_known_pixels(
    ctx: &PatchContext<'_>,
    region: &PatchRegion,
    radius: usize,
) -> Vec<(usize, usize)> {
    let grid = ctx.tampered;
    let x0 = region.x.saturating_sub(radius);
    let y0 = region.y.saturating_sub(radius);
    let x1 = (region.x + region.w + radius).min(grid.w);
    let y1 = (region.y + region.h + radius).min(grid.h);
    let inner_x = region.x.saturating_sub(radius - 1);
    let inner_y = region.y.saturating_sub(radius - 1);
    let inner_x1 = (region.x + region.w + radius - 1).min(grid.w);
    let inner_y1 = (region.y + region.h + radius - 1).min(grid.h);

    let mut donors = Vec::new();
    for y in y0..y1 {
        for x in x0..x1 {
            let on_inner = x >= inner_x && x < inner_x1 && y >= inner_y && y < inner_y1;
            if !on_inner && !ctx.mask.get(x, y) {
                donors.push((x, y));
            }
        }
    }
    donors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiling_covers_the_grid_with_ragged_edges() {
        let regions = tile(10, 6, 4);
        assert_eq!(regions.len(), 6);
        let area: usize = regions.iter().map(|r| r.w * r.h).sum();
        assert_eq!(area, 60);
        let last = regions.last().unwrap();
        assert_eq!((last.x, last.y, last.w, last.h), (8, 4, 2, 2));
    }

    #[test]
    fn ring_search_skips_masked_donors() {
        let original = PixelGrid::from_samples(4, 1, 1, vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        let mut mask = DetectionMask::new(4, 1);
        mask.set(0, 0, true);
        mask.set(1, 0, true);
        let ctx = PatchContext {
            original: &original,
            tampered: &original,
            mask: &mask,
        };
        let region = PatchRegion { x: 0, y: 0, w: 1, h: 1 };
        // Radius 1 touches only (1, 0), which is masked.
        assert!(ring_known_pixels(&ctx, &region, 1).is_empty());
        assert_eq!(ring_known_pixels(&ctx, &region, 2), vec![(2, 0)]);
    }
}
