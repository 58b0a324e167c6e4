//! Dense per-segment weight curves.

use crate::hits::Orientation;

/// Precomputed vote curve of one (segment identity, priority wire) pair,
/// laid out as (curvature × window azimuth × polar).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpandedCurve {
    curvature_bins: usize,
    window: usize,
    polar_bins: usize,
    data: Vec<u8>,
}

impl ExpandedCurve {
    pub fn zeroed(curvature_bins: usize, window: usize, polar_bins: usize) -> Self {
        Self {
            curvature_bins,
            window,
            polar_bins,
            data: vec![0; curvature_bins * window * polar_bins],
        }
    }

    #[inline]
    pub fn shape(&self) -> [usize; 3] {
        [self.curvature_bins, self.window, self.polar_bins]
    }

    #[inline]
    pub fn window(&self) -> usize {
        self.window
    }

    #[inline]
    fn idx(&self, curvature: usize, azimuth: usize, polar: usize) -> usize {
        (curvature * self.window + azimuth) * self.polar_bins + polar
    }

    /// Weight at a window coordinate; zero outside the curve.
    #[inline]
    pub fn get(&self, curvature: usize, azimuth: usize, polar: usize) -> u8 {
        if curvature >= self.curvature_bins || azimuth >= self.window || polar >= self.polar_bins {
            return 0;
        }
        self.data[self.idx(curvature, azimuth, polar)]
    }

    #[inline]
    pub(crate) fn set(&mut self, curvature: usize, azimuth: usize, polar: usize, weight: u8) {
        let i = self.idx(curvature, azimuth, polar);
        self.data[i] = weight;
    }

    /// Polar column at (curvature, window azimuth).
    #[inline]
    pub fn column(&self, curvature: usize, azimuth: usize) -> &[u8] {
        let start = self.idx(curvature, azimuth, 0);
        &self.data[start..start + self.polar_bins]
    }

    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&w| w == 0)
    }

    pub fn total_weight(&self) -> u64 {
        self.data.iter().map(|&w| w as u64).sum()
    }
}

/// All curves of one orientation, indexed by (identity, priority slot).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurveTable {
    orientation: Orientation,
    identities: usize,
    priority_slots: usize,
    curves: Vec<ExpandedCurve>,
}

impl CurveTable {
    pub(crate) fn new(
        orientation: Orientation,
        identities: usize,
        priority_slots: usize,
        curves: Vec<ExpandedCurve>,
    ) -> Self {
        debug_assert_eq!(curves.len(), identities * priority_slots);
        Self {
            orientation,
            identities,
            priority_slots,
            curves,
        }
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[inline]
    pub fn identities(&self) -> usize {
        self.identities
    }

    #[inline]
    pub fn curve(&self, identity: usize, slot: usize) -> Option<&ExpandedCurve> {
        if identity >= self.identities || slot >= self.priority_slots {
            return None;
        }
        self.curves.get(identity * self.priority_slots + slot)
    }
}
