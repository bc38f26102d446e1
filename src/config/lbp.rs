use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct LbpToolConfig {
    /// Image whose histogram is computed.
    pub input: PathBuf,
    /// Optional second image to compare against (chi-square distance).
    #[serde(default)]
    pub compare: Option<PathBuf>,
    pub output: LbpOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct LbpOutputConfig {
    #[serde(rename = "histogram_json")]
    pub histogram_json: PathBuf,
}

pub fn load_config(path: &Path) -> Result<LbpToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
