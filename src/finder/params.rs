//! Parameter types configuring the finder stages.
//!
//! Defaults match the trigger configuration. Tuning normally starts with the
//! peak and total weight thresholds, then the super-layer coverage.

use crate::cluster::ClusterParams;
use crate::relate::RelatorParams;
use serde::Deserialize;
use std::path::PathBuf;

/// Finder-wide parameters, fixed at construction.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FinderParams {
    /// Axial super layers a track must cover.
    pub min_super_axial: usize,
    /// Stereo super layers a track must cover.
    pub min_super_stereo: usize,
    /// Smallest maximum that still starts a cluster.
    pub min_peak_weight: u16,
    /// Smallest summed cluster weight that is kept.
    pub min_total_weight: u32,
    /// Peak searches per quadrant.
    pub iterations: usize,
    /// Curvature half-width of the suppressed neighbourhood.
    pub curvature_trim: usize,
    /// Azimuth half-width of the suppressed neighbourhood.
    pub azimuth_trim: usize,
    /// Butterfly widening per curvature bin.
    pub butterfly_spread: usize,
    /// Fraction of the peak weight a cell must exceed to enter the centroid.
    pub cog_threshold: f64,
    /// Keeps the Hough dump and per-cluster read-outs in the report.
    pub store_readout: bool,
    pub axial_file: PathBuf,
    pub stereo_file: PathBuf,
}

impl Default for FinderParams {
    fn default() -> Self {
        Self {
            min_super_axial: 4,
            min_super_stereo: 3,
            min_peak_weight: 32,
            min_total_weight: 450,
            iterations: 2,
            curvature_trim: 5,
            azimuth_trim: 4,
            butterfly_spread: 1,
            cog_threshold: 0.85,
            store_readout: false,
            axial_file: PathBuf::from("data/trg/cdc/ndFinderArrayAxialComp.txt.gz"),
            stereo_file: PathBuf::from("data/trg/cdc/ndFinderArrayStereoComp.txt.gz"),
        }
    }
}

impl FinderParams {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.cog_threshold.is_finite() && (0.0..=1.0).contains(&self.cog_threshold)) {
            return Err(format!(
                "cog_threshold must lie in [0, 1], got {}",
                self.cog_threshold
            ));
        }
        Ok(())
    }

    pub fn cluster_params(&self) -> ClusterParams {
        ClusterParams {
            iterations: self.iterations,
            min_peak_weight: self.min_peak_weight,
            min_total_weight: self.min_total_weight,
            curvature_trim: self.curvature_trim,
            azimuth_trim: self.azimuth_trim,
            butterfly_spread: self.butterfly_spread,
        }
    }

    pub fn relator_params(&self) -> RelatorParams {
        RelatorParams {
            min_super_axial: self.min_super_axial,
            min_super_stereo: self.min_super_stereo,
        }
    }
}
