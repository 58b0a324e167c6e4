use super::timing::TimingBreakdown;
use crate::estimate::TrackCandidate;
use crate::hough::HoughSpace;
use serde::Serialize;

/// Flattened copy of the post-accumulation Hough space.
///
/// `values` is curvature-major: `(c * azimuth + a) * polar + p`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoughDump {
    pub shape: [usize; 3],
    pub values: Vec<u16>,
}

impl HoughDump {
    pub fn from_space(space: &HoughSpace) -> Self {
        Self {
            shape: space.shape(),
            values: space.as_slice().to_vec(),
        }
    }

    pub fn get(&self, curvature: usize, azimuth: usize, polar: usize) -> Option<u16> {
        let [c, a, p] = self.shape;
        if curvature >= c || azimuth >= a || polar >= p {
            return None;
        }
        self.values.get((curvature * a + azimuth) * p + polar).copied()
    }
}

/// Counters describing how far hits and clusters got through the finder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCounters {
    pub hits: usize,
    pub deposited_hits: usize,
    pub clusters: usize,
    pub related_clusters: usize,
}

/// Result of processing one event.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinderReport {
    pub tracks: Vec<TrackCandidate>,
    pub counters: EventCounters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hough: Option<HoughDump>,
    pub timings: TimingBreakdown,
}
