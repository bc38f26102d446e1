#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod analyzer;
pub mod config;
pub mod detect;
pub mod error;
pub mod image;
pub mod lbp;
pub mod linalg;
pub mod recover;

// --- High-level re-exports -------------------------------------------------

// Main entry points: analyzer + report.
pub use crate::analyzer::{AnalyzerParams, TamperAnalyzer, TamperReport, TimingBreakdown};

// Stage-level functions for callers orchestrating the pipeline themselves.
pub use crate::detect::{detect_tampering, DetectOptions, Detection, DetectionMask};
pub use crate::error::{Result, TamperError};
pub use crate::image::PixelGrid;
pub use crate::lbp::{compute_lbp, LbpHistogram};
pub use crate::linalg::{decompose_svd, solve_linear_system, Svd};
pub use crate::recover::{recover_ground_truth, RecoverOptions, Recovery, RecoveryMethod};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use tamper_detector::prelude::*;
///
/// # fn main() {
/// let original = PixelGrid::from_samples(2, 2, 1, vec![0.0; 4]).unwrap();
/// let analyzer = TamperAnalyzer::new(AnalyzerParams::default());
/// let report = analyzer.analyze(&original, &original).unwrap();
/// println!("tampered={:.2}% latency_ms={:.3}", report.percentage, report.timing.total_ms);
/// # }
/// ```
pub mod prelude {
    pub use crate::image::PixelGrid;
    pub use crate::{AnalyzerParams, TamperAnalyzer, TamperReport};
}
