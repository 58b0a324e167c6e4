use super::Cluster;
use crate::geometry::HoughGeometry;
use crate::hough::{CellIndex, HoughSpace};
use log::debug;

const QUADRANTS: usize = 4;

/// Cluster shape relative to the peak: (curvature offset, azimuth offset).
///
/// A Hough maximum drifts one azimuth bin up per curvature bin down, so the
/// neighbouring curvature planes are sampled diagonally.
const CLUSTER_SHAPE: [(isize, isize); 5] = [(-1, 1), (0, -1), (0, 0), (0, 1), (1, -1)];

/// Peak search and neighbourhood suppression thresholds.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterParams {
    /// Peak searches per quadrant.
    pub iterations: usize,
    /// A maximum below this ends the quadrant search.
    pub min_peak_weight: u16,
    /// Clusters lighter than this are dropped (their neighbourhood is still erased).
    pub min_total_weight: u32,
    /// Curvature half-width of the erased neighbourhood.
    pub curvature_trim: usize,
    /// Azimuth half-width of the erased neighbourhood at the peak curvature.
    pub azimuth_trim: usize,
    /// Extra azimuth bins per curvature bin on the drift side of the butterfly.
    pub butterfly_spread: usize,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            iterations: 2,
            min_peak_weight: 32,
            min_total_weight: 450,
            curvature_trim: 5,
            azimuth_trim: 4,
            butterfly_spread: 1,
        }
    }
}

/// Quadrant-wise peak finder over a populated Hough space.
pub struct Clusterizer<'a> {
    geometry: &'a HoughGeometry,
    params: &'a ClusterParams,
}

impl<'a> Clusterizer<'a> {
    pub fn new(geometry: &'a HoughGeometry, params: &'a ClusterParams) -> Self {
        Self { geometry, params }
    }

    /// Runs all quadrant searches and returns the kept clusters in quadrant order.
    ///
    /// `space` is not modified; each quadrant works on a private copy.
    pub fn make_clusters(&self, space: &HoughSpace) -> Vec<Cluster> {
        #[cfg(feature = "parallel")]
        {
            self.make_clusters_parallel(space)
        }
        #[cfg(not(feature = "parallel"))]
        {
            self.make_clusters_sequential(space)
        }
    }

    /// Sequential variant: one working copy, restored after each quadrant.
    pub fn make_clusters_sequential(&self, space: &HoughSpace) -> Vec<Cluster> {
        let mut working = space.clone();
        let mut clusters = Vec::new();
        for quadrant in 0..QUADRANTS {
            clusters.extend(self.search_quadrant(quadrant, &mut working));
            working.copy_from(space);
        }
        clusters
    }

    #[cfg(feature = "parallel")]
    fn make_clusters_parallel(&self, space: &HoughSpace) -> Vec<Cluster> {
        use rayon::prelude::*;

        let per_quadrant: Vec<Vec<Cluster>> = (0..QUADRANTS)
            .into_par_iter()
            .map(|quadrant| {
                let mut working = space.clone();
                self.search_quadrant(quadrant, &mut working)
            })
            .collect();
        per_quadrant.into_iter().flatten().collect()
    }

    /// Azimuth bins `[start, end)` searched for maxima in `quadrant`.
    pub fn quadrant_range(&self, quadrant: usize) -> (usize, usize) {
        let n = self.geometry.azimuth_bins;
        let width = self.geometry.quadrant_width();
        let start = (quadrant * width).min(n);
        let end = if quadrant + 1 == QUADRANTS {
            n
        } else {
            ((quadrant + 1) * width).min(n)
        };
        (start, end)
    }

    /// Iterative peak search restricted to one quadrant. Mutates `working`.
    pub fn search_quadrant(&self, quadrant: usize, working: &mut HoughSpace) -> Vec<Cluster> {
        let (start, end) = self.quadrant_range(quadrant);
        let mut clusters = Vec::new();
        for iteration in 0..self.params.iterations {
            let Some((peak, weight)) = working.max_in_azimuth_range(start, end) else {
                break;
            };
            if weight == 0 || weight < self.params.min_peak_weight {
                debug!(
                    "quadrant {quadrant} iteration {iteration}: max {weight} below {}, stopping",
                    self.params.min_peak_weight
                );
                break;
            }
            let mut cluster = self.extract_cluster(working, peak);
            cluster.quadrant = quadrant;
            let heaviest = cluster.weights.iter().copied().max().unwrap_or(0);
            if heaviest > weight {
                // Shoulder of a maximum across the quadrant edge; that
                // quadrant owns the cluster.
                debug!(
                    "quadrant {quadrant} iteration {iteration}: {:?} shoulder of {heaviest}",
                    peak.as_array()
                );
            } else if cluster.total_weight >= self.params.min_total_weight {
                debug!(
                    "quadrant {quadrant} iteration {iteration}: cluster at {:?} peak={} total={}",
                    peak.as_array(),
                    cluster.peak_weight,
                    cluster.total_weight
                );
                clusters.push(cluster);
            } else {
                debug!(
                    "quadrant {quadrant} iteration {iteration}: \
                     cluster at {:?} too light ({} < {})",
                    peak.as_array(),
                    cluster.total_weight,
                    self.params.min_total_weight
                );
            }
            self.suppress_neighborhood(working, peak);
        }
        clusters
    }

    /// Collects the fixed-shape cell set around `peak` with its weights in `space`.
    pub fn extract_cluster(&self, space: &HoughSpace, peak: CellIndex) -> Cluster {
        let curvature_bins = space.curvature_bins() as isize;
        let polar_lo = peak.polar.saturating_sub(1);
        let polar_hi = (peak.polar + 1).min(space.polar_bins().saturating_sub(1));

        let mut cells: Vec<CellIndex> = Vec::with_capacity(CLUSTER_SHAPE.len() * 3);
        for &(dc, da) in &CLUSTER_SHAPE {
            let curvature = peak.curvature as isize + dc;
            if curvature < 0 || curvature >= curvature_bins {
                continue;
            }
            let azimuth = self.geometry.wrap_azimuth(peak.azimuth as isize + da);
            for polar in polar_lo..=polar_hi {
                let cell = CellIndex::new(curvature as usize, azimuth, polar);
                if !cells.contains(&cell) {
                    cells.push(cell);
                }
            }
        }

        let weights: Vec<u16> = cells.iter().map(|&c| space.get(c)).collect();
        let total_weight = weights.iter().map(|&w| w as u32).sum();
        Cluster {
            cells,
            weights,
            peak,
            peak_weight: space.get(peak),
            total_weight,
            quadrant: 0,
            related_hits: Vec::new(),
        }
    }

    /// Azimuth offsets `[lower, upper]` erased at `curvature_offset` from the peak.
    pub fn butterfly_span(&self, curvature_offset: isize) -> (isize, isize) {
        let trim = self.params.azimuth_trim as isize;
        let spread = self.params.butterfly_spread as isize;
        let mut lower = -trim;
        let mut upper = trim;
        if curvature_offset < 0 {
            upper += spread * -curvature_offset;
        } else if curvature_offset > 0 {
            lower -= spread * curvature_offset;
        }
        (lower, upper)
    }

    /// Zeroes the butterfly neighbourhood of `peak` over the full polar range.
    pub fn suppress_neighborhood(&self, space: &mut HoughSpace, peak: CellIndex) {
        let n = space.azimuth_bins() as isize;
        let trim = self.params.curvature_trim;
        let lo = peak.curvature.saturating_sub(trim);
        let hi = (peak.curvature + trim).min(space.curvature_bins().saturating_sub(1));
        for curvature in lo..=hi {
            let offset = curvature as isize - peak.curvature as isize;
            let (lower, upper) = self.butterfly_span(offset);
            let span = (upper - lower + 1).min(n);
            let first = peak.azimuth as isize + lower;
            for k in 0..span {
                let azimuth = self.geometry.wrap_azimuth(first + k);
                space.column_mut(curvature, azimuth).fill(0);
            }
        }
    }
}
