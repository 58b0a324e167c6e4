//! Peak finding and fixed-shape cluster extraction on the Hough space.
//!
//! The ring is searched quadrant by quadrant. Inside a quadrant the global
//! maximum is located, a 3-plane cluster is carved around it and a
//! curvature-dependent "butterfly" neighbourhood is erased so the next
//! iteration finds a different track. Erasures are private to the quadrant:
//! every quadrant starts from the accumulated space.

mod clusterizer;

pub use clusterizer::{ClusterParams, Clusterizer};

use crate::hough::{CellIndex, HoughSpace};
use serde::Serialize;

/// Track candidate cluster in the Hough space.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    /// Cells in extraction order, without duplicates.
    pub cells: Vec<CellIndex>,
    /// Weights of `cells` in the searched space at extraction time.
    pub weights: Vec<u16>,
    pub peak: CellIndex,
    pub peak_weight: u16,
    pub total_weight: u32,
    /// Quadrant whose search produced the cluster.
    pub quadrant: usize,
    /// Indices into the event hit list, one per super layer at most.
    pub related_hits: Vec<usize>,
}

impl Cluster {
    /// Weights of the cluster cells in `space`.
    pub fn weights_in(&self, space: &HoughSpace) -> Vec<u16> {
        self.cells.iter().map(|&c| space.get(c)).collect()
    }

    /// Largest weight among the cells in `space`.
    pub fn max_weight(&self, space: &HoughSpace) -> u16 {
        self.cells.iter().map(|&c| space.get(c)).max().unwrap_or(0)
    }
}
