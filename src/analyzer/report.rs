//! Report types assembled by the analyzer.

use crate::detect::DetectionMask;
use crate::image::PixelGrid;
use crate::recover::PatchOutcome;
use serde::Serialize;

/// Wall-clock milliseconds spent in each pipeline stage.
#[derive(Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub lbp_ms: f64,
    pub detect_ms: f64,
    pub recover_ms: f64,
    pub total_ms: f64,
}

/// Full analysis outcome for one image pair.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TamperReport {
    /// Tampered fraction of the pixel grid, in [0, 100]
    pub percentage: f32,
    /// Chi-square distance between the pair's LBP histograms, when computed
    pub lbp_distance: Option<f64>,
    /// Per-pixel tampering classification
    pub mask: DetectionMask,
    /// Tampered grid with masked pixels reconstructed
    pub recovered: PixelGrid,
    /// Per-patch reconstruction provenance
    pub patches: Vec<PatchOutcome>,
    /// Stage timings
    pub timing: TimingBreakdown,
}
