//! Centre-of-gravity parameter estimation for accepted clusters.
//!
//! Cells above `threshold × peak` contribute to a weighted centroid in bin
//! coordinates. The centroid is mapped to bin-centre values of the
//! acceptance ranges and finally to physical track parameters:
//! - curvature: signed inverse radius in 1/cm (`0` stays `0`),
//! - azimuth: radians in (−π, π],
//! - polar: cot θ.

use crate::cluster::Cluster;
use crate::geometry::HoughGeometry;
use crate::hough::{CellIndex, HoughSpace};
use crate::relate::{HitContribution, RelatedCluster};
use nalgebra::Vector3;
use serde::Serialize;

/// Cluster-level read-out kept when diagnostics are enabled.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterReadout {
    pub peak: [usize; 3],
    pub peak_weight: u16,
    pub total_weight: u32,
    pub cells: Vec<[usize; 3]>,
    pub weights: Vec<u16>,
    pub related_hits: Vec<HitContribution>,
    pub centroid_bins: Vector3<f64>,
    pub valid_cells: usize,
}

/// Final output of the finder for one cluster.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackCandidate {
    /// Signed curvature in 1/cm.
    pub curvature: f64,
    /// Azimuth in radians, (−π, π].
    pub azimuth: f64,
    /// cot θ of the polar angle.
    pub polar_slope: f64,
    #[serde(rename = "relatedHitIndices")]
    pub related_hits: Vec<usize>,
    #[serde(skip)]
    pub cluster: Cluster,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readout: Option<ClusterReadout>,
}

/// Weighted centroid of a cluster in bin coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Centroid {
    pub bins: Vector3<f64>,
    pub valid_cells: usize,
}

pub struct ParameterEstimator<'a> {
    geometry: &'a HoughGeometry,
    threshold: f64,
}

impl<'a> ParameterEstimator<'a> {
    pub fn new(geometry: &'a HoughGeometry, threshold: f64) -> Self {
        Self {
            geometry,
            threshold,
        }
    }

    /// Weighted centroid over cells exceeding `threshold × peak` in `space`.
    ///
    /// Azimuth offsets are taken relative to the peak on the ring, so
    /// clusters across the seam average correctly.
    pub fn center_of_gravity(&self, cluster: &Cluster, space: &HoughSpace) -> Centroid {
        let peak_weight = cluster.max_weight(space);
        let cut = self.threshold * peak_weight as f64;
        let n = self.geometry.azimuth_bins as isize;
        let peak_azimuth = cluster.peak.azimuth as isize;

        let mut sum = Vector3::<f64>::zeros();
        let mut total = 0.0f64;
        let mut valid_cells = 0usize;
        for &cell in &cluster.cells {
            let weight = space.get(cell) as f64;
            if weight <= cut {
                continue;
            }
            let mut d_az = (cell.azimuth as isize - peak_azimuth).rem_euclid(n);
            if d_az > n / 2 {
                d_az -= n;
            }
            sum += Vector3::new(cell.curvature as f64, d_az as f64, cell.polar as f64) * weight;
            total += weight;
            valid_cells += 1;
        }

        if total <= 0.0 {
            return Centroid {
                bins: bin_vector(cluster.peak),
                valid_cells: 0,
            };
        }
        let mut bins = sum / total;
        bins.y = (peak_azimuth as f64 + bins.y).rem_euclid(n as f64);
        Centroid { bins, valid_cells }
    }

    /// Bin coordinates → acceptance-range values (curvature, degrees, degrees).
    pub fn bins_to_values(&self, bins: &Vector3<f64>) -> Vector3<f64> {
        let geo = self.geometry;
        Vector3::new(
            geo.curvature_range.bin_to_value(geo.curvature_bins, bins.x),
            geo.azimuth_range_deg.bin_to_value(geo.azimuth_bins, bins.y),
            geo.polar_range_deg.bin_to_value(geo.polar_bins, bins.z),
        )
    }

    /// Signed curvature in 1/cm from an inverse-momentum value.
    pub fn curvature(&self, value: f64) -> f64 {
        if value == 0.0 {
            0.0
        } else {
            -1.0 / self.geometry.track_radius_cm(1.0 / value)
        }
    }

    /// Azimuth in radians from degrees, folded into (−180°, 180°].
    pub fn azimuth(&self, degrees: f64) -> f64 {
        let folded = if degrees > 180.0 { degrees - 360.0 } else { degrees };
        folded.to_radians()
    }

    /// cot θ from a polar angle in degrees.
    pub fn polar_slope(&self, degrees: f64) -> f64 {
        let theta = degrees.to_radians();
        theta.cos() / theta.sin()
    }

    /// Builds the track candidate of an accepted cluster.
    pub fn estimate(
        &self,
        related: RelatedCluster,
        space: &HoughSpace,
        with_readout: bool,
    ) -> TrackCandidate {
        let centroid = self.center_of_gravity(&related.cluster, space);
        let values = self.bins_to_values(&centroid.bins);
        let RelatedCluster {
            cluster,
            contributions,
        } = related;

        let readout = with_readout.then(|| ClusterReadout {
            peak: cluster.peak.as_array(),
            peak_weight: cluster.peak_weight,
            total_weight: cluster.total_weight,
            cells: cluster.cells.iter().map(CellIndex::as_array).collect(),
            weights: cluster.weights.clone(),
            related_hits: contributions,
            centroid_bins: centroid.bins,
            valid_cells: centroid.valid_cells,
        });

        TrackCandidate {
            curvature: self.curvature(values.x),
            azimuth: self.azimuth(values.y),
            polar_slope: self.polar_slope(values.z),
            related_hits: cluster.related_hits.clone(),
            cluster,
            readout,
        }
    }
}

fn bin_vector(cell: CellIndex) -> Vector3<f64> {
    Vector3::new(cell.curvature as f64, cell.azimuth as f64, cell.polar as f64)
}
