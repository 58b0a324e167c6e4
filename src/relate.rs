//! Relating event hits back to cluster peaks.
//!
//! For a cluster the contribution of every hit is re-evaluated at the peak
//! cell. Per super layer only the best hit survives: candidates are ordered
//! by drift time and the first one with the largest contribution wins. A
//! cluster becomes a track only if enough axial and stereo super layers are
//! represented.

use crate::cluster::Cluster;
use crate::hits::{HitRecord, Orientation};
use crate::hough::CellIndex;
use crate::patterns::CurveLookup;
use log::debug;
use serde::Serialize;

/// Minimum super-layer coverage of an accepted cluster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelatorParams {
    pub min_super_axial: usize,
    pub min_super_stereo: usize,
}

impl Default for RelatorParams {
    fn default() -> Self {
        Self {
            min_super_axial: 4,
            min_super_stereo: 3,
        }
    }
}

/// Weight a single hit deposits at a cluster peak.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HitContribution {
    pub hit_index: usize,
    pub super_layer: usize,
    pub weight: u16,
    pub drift_time: i64,
}

/// Cluster that passed the coverage check together with its chosen hits.
#[derive(Clone, Debug)]
pub struct RelatedCluster {
    pub cluster: Cluster,
    pub contributions: Vec<HitContribution>,
}

pub struct HitClusterRelator<'a> {
    lookup: &'a CurveLookup,
    params: RelatorParams,
}

impl<'a> HitClusterRelator<'a> {
    pub fn new(lookup: &'a CurveLookup, params: RelatorParams) -> Self {
        Self { lookup, params }
    }

    /// Non-zero contributions of `hits` at `peak`, in hit order.
    ///
    /// The super layer is the one of the resolved segment, not the one the
    /// hit claims.
    pub fn contributions_at(&self, hits: &[HitRecord], peak: CellIndex) -> Vec<HitContribution> {
        hits.iter()
            .enumerate()
            .filter_map(|(hit_index, hit)| {
                let placed = self.lookup.resolve(hit)?;
                let weight = placed.weight_at(peak);
                (weight > 0).then_some(HitContribution {
                    hit_index,
                    super_layer: placed.entry.super_layer,
                    weight,
                    drift_time: hit.drift_time,
                })
            })
            .collect()
    }

    /// Keeps one contribution per super layer, ordered by super layer.
    pub fn best_per_super_layer(&self, contributions: &[HitContribution]) -> Vec<HitContribution> {
        let layers = self.lookup.geometry().super_layers();
        let mut by_layer: Vec<Vec<HitContribution>> = vec![Vec::new(); layers];
        for c in contributions {
            if let Some(bucket) = by_layer.get_mut(c.super_layer) {
                bucket.push(*c);
            }
        }
        by_layer
            .into_iter()
            .filter_map(|mut bucket| {
                bucket.sort_by_key(|c| c.drift_time);
                let mut best: Option<HitContribution> = None;
                for c in bucket {
                    if best.map_or(true, |b| c.weight > b.weight) {
                        best = Some(c);
                    }
                }
                best
            })
            .collect()
    }

    /// Whether the selected hits cover enough axial and stereo super layers.
    pub fn has_coverage(&self, selected: &[HitContribution]) -> bool {
        let mapper = self.lookup.mapper();
        let count = |orientation: Orientation| {
            selected
                .iter()
                .filter(|c| mapper.super_layers(orientation).contains(&c.super_layer))
                .count()
        };
        count(Orientation::Axial) >= self.params.min_super_axial
            && count(Orientation::Stereo) >= self.params.min_super_stereo
    }

    /// Annotates `cluster` with its related hits; `None` if coverage is insufficient.
    pub fn relate(&self, mut cluster: Cluster, hits: &[HitRecord]) -> Option<RelatedCluster> {
        let contributions = self.contributions_at(hits, cluster.peak);
        let selected = self.best_per_super_layer(&contributions);
        if !self.has_coverage(&selected) {
            debug!(
                "cluster at {:?} rejected: {} super layers from {} contributing hits",
                cluster.peak.as_array(),
                selected.len(),
                contributions.len()
            );
            return None;
        }
        cluster.related_hits = selected.iter().map(|c| c.hit_index).collect();
        Some(RelatedCluster {
            cluster,
            contributions: selected,
        })
    }

    pub fn relate_all(&self, clusters: Vec<Cluster>, hits: &[HitRecord]) -> Vec<RelatedCluster> {
        clusters
            .into_iter()
            .filter_map(|cluster| self.relate(cluster, hits))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::HoughGeometry;
    use crate::hits::PriorityPosition;
    use crate::patterns::{CompactCurves, PatternLibrary};

    /// Three super layers (axial, stereo, axial), one sector, one segment
    /// per layer per sector, every curve a single run at curvature 1.
    fn lookup() -> CurveLookup {
        let geo = HoughGeometry {
            curvature_bins: 3,
            azimuth_bins: 8,
            polar_bins: 2,
            sectors: 1,
            curve_azimuth_bins: 8,
            compact_azimuth_slots: 4,
            priority_slots: 3,
            cells_per_super_layer: vec![2, 1, 1],
            ..HoughGeometry::default()
        };
        let mut axial = CompactCurves::zeroed(Orientation::Axial, &geo, 3);
        axial.set_run(0, 0, 1, 0, 2, &[3, 1]);
        axial.set_run(0, 1, 1, 0, 2, &[5]);
        axial.set_run(1, 0, 1, 0, 2, &[5]);
        axial.set_run(2, 0, 1, 0, 2, &[2]);
        let mut stereo = CompactCurves::zeroed(Orientation::Stereo, &geo, 1);
        stereo.set_run(0, 0, 1, 1, 2, &[4]);
        let library = PatternLibrary::from_compact(&geo, &axial, &stereo).expect("library");
        CurveLookup::new(geo, library).expect("lookup")
    }

    fn cluster_at(peak: CellIndex) -> Cluster {
        Cluster {
            cells: vec![peak],
            weights: vec![1],
            peak,
            peak_weight: 1,
            total_weight: 1,
            quadrant: 0,
            related_hits: Vec::new(),
        }
    }

    #[test]
    fn one_hit_per_super_layer_with_drift_time_tie_break() {
        let lookup = lookup();
        let relator = HitClusterRelator::new(
            &lookup,
            RelatorParams {
                min_super_axial: 1,
                min_super_stereo: 1,
            },
        );
        let hits = [
            // SL0 segment 0, first wire: weight 3, late.
            HitRecord::new(0, 0, PriorityPosition::First, 30),
            // SL0 segment 0, left wire: weight 5, late.
            HitRecord::new(0, 0, PriorityPosition::Left, 20),
            // SL0 segment 1: weight 5, early → wins the tie.
            HitRecord::new(1, 0, PriorityPosition::First, 10),
            // SL1 stereo: weight 4.
            HitRecord::new(2, 1, PriorityPosition::First, 5),
            // SL2: no priority wire.
            HitRecord::new(3, 2, PriorityPosition::None, 0),
        ];
        let peak = CellIndex::new(1, 2, 1);
        let related = relator.relate(cluster_at(peak), &hits).expect("accepted");
        assert_eq!(related.cluster.related_hits, vec![2, 3]);
        assert_eq!(related.contributions[0].weight, 5);
        assert_eq!(related.contributions[1].super_layer, 1);
    }

    #[test]
    fn stereo_contribution_depends_on_polar_bin() {
        let lookup = lookup();
        let relator = HitClusterRelator::new(&lookup, RelatorParams::default());
        let hits = [HitRecord::new(2, 1, PriorityPosition::First, 0)];
        assert_eq!(relator.contributions_at(&hits, CellIndex::new(1, 2, 0)).len(), 0);
        assert_eq!(relator.contributions_at(&hits, CellIndex::new(1, 2, 1))[0].weight, 4);
    }

    #[test]
    fn insufficient_coverage_rejects_cluster() {
        let lookup = lookup();
        let relator = HitClusterRelator::new(
            &lookup,
            RelatorParams {
                min_super_axial: 2,
                min_super_stereo: 1,
            },
        );
        let hits = [
            HitRecord::new(0, 0, PriorityPosition::First, 0),
            HitRecord::new(2, 1, PriorityPosition::First, 0),
        ];
        assert!(relator.relate(cluster_at(CellIndex::new(1, 2, 1)), &hits).is_none());

        let hits = [
            HitRecord::new(0, 0, PriorityPosition::First, 0),
            HitRecord::new(2, 1, PriorityPosition::First, 0),
            HitRecord::new(3, 2, PriorityPosition::First, 0),
        ];
        let related = relator
            .relate(cluster_at(CellIndex::new(1, 2, 1)), &hits)
            .expect("three layers");
        assert_eq!(related.cluster.related_hits, vec![0, 1, 2]);
    }

    #[test]
    fn super_layer_comes_from_the_segment_id() {
        let lookup = lookup();
        let relator = HitClusterRelator::new(
            &lookup,
            RelatorParams {
                min_super_axial: 2,
                min_super_stereo: 0,
            },
        );
        // Both segments sit in SL0; the second hit claims SL2.
        let hits = [
            HitRecord::new(0, 0, PriorityPosition::First, 0),
            HitRecord::new(1, 2, PriorityPosition::First, 1),
        ];
        let peak = CellIndex::new(1, 2, 0);
        let contributions = relator.contributions_at(&hits, peak);
        assert_eq!(contributions.len(), 2);
        assert!(contributions.iter().all(|c| c.super_layer == 0));
        assert_eq!(relator.best_per_super_layer(&contributions).len(), 1);
        assert!(relator.relate(cluster_at(peak), &hits).is_none());
    }

    #[test]
    fn never_two_hits_from_one_super_layer() {
        let lookup = lookup();
        let relator = HitClusterRelator::new(
            &lookup,
            RelatorParams {
                min_super_axial: 0,
                min_super_stereo: 0,
            },
        );
        let hits: Vec<HitRecord> = (0..6)
            .map(|i| HitRecord::new(i % 2, 0, PriorityPosition::First, 10 - i as i64))
            .collect();
        let related = relator
            .relate(cluster_at(CellIndex::new(1, 2, 0)), &hits)
            .expect("accepted");
        assert_eq!(related.cluster.related_hits.len(), 1);
        // All six weigh 3 or 5; segment 1 weighs 5 and the earliest is hit 5.
        assert_eq!(related.cluster.related_hits, vec![5]);
    }
}
