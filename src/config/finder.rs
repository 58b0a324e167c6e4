use crate::finder::FinderParams;
use crate::geometry::HoughGeometry;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Pretty JSON with every event report.
    pub json_out: Option<PathBuf>,
    /// Curvature × azimuth PNG of the last event's Hough space.
    pub hough_png: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    /// JSON array of events, each an array of hits.
    pub events: PathBuf,
    #[serde(default)]
    pub geometry: HoughGeometry,
    #[serde(default)]
    pub finder: FinderParams,
    #[serde(default)]
    pub output: OutputConfig,
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: RuntimeConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    config.geometry.validate()?;
    config.finder.validate()?;
    Ok(config)
}
