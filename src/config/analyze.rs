use crate::detect::DetectOptions;
use crate::recover::{RecoverOptions, RecoveryMethod};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct AnalyzeToolConfig {
    /// Reference image.
    pub original: PathBuf,
    /// Suspect image of the same scene and resolution.
    pub tampered: PathBuf,
    #[serde(default)]
    pub detect: DetectConfig,
    #[serde(default)]
    pub recover: RecoverConfig,
    pub output: AnalyzeOutputConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DetectConfig {
    /// Classification threshold on the normalized [0, 1] sample scale.
    pub threshold: f32,
    /// Remove isolated single-pixel detections.
    pub clean_mask: bool,
}

impl Default for DetectConfig {
    fn default() -> Self {
        let defaults = DetectOptions::default();
        Self {
            threshold: defaults.threshold,
            clean_mask: defaults.clean_mask,
        }
    }
}

impl DetectConfig {
    pub fn to_options(&self) -> DetectOptions {
        DetectOptions {
            threshold: self.threshold,
            clean_mask: self.clean_mask,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RecoverConfig {
    /// Patch edge length in pixels.
    pub patch: usize,
    /// When set, use low-rank SVD projection at this rank instead of
    /// boundary interpolation.
    pub rank: Option<usize>,
}

impl Default for RecoverConfig {
    fn default() -> Self {
        Self {
            patch: RecoverOptions::default().patch,
            rank: None,
        }
    }
}

impl RecoverConfig {
    pub fn to_options(&self, detect: DetectOptions) -> RecoverOptions {
        let method = match self.rank {
            Some(rank) => RecoveryMethod::LowRankProjection { rank },
            None => RecoveryMethod::BoundaryInterpolation,
        };
        RecoverOptions {
            patch: self.patch,
            method,
            detect,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeOutputConfig {
    #[serde(rename = "report_json")]
    pub report_json: PathBuf,
    #[serde(rename = "mask_image")]
    pub mask_image: PathBuf,
    #[serde(rename = "recovered_image")]
    pub recovered_image: PathBuf,
}

pub fn load_config(path: &Path) -> Result<AnalyzeToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
