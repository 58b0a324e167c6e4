//! Compact run-length curve tables and their expansion.
//!
//! A compact table is a flat `u16` array nested as
//! `[identity][priority][curvature][slot][polar]`. For every
//! (identity, priority, curvature, polar) the slots hold one azimuth run:
//! slot 0 is the start offset inside the expanded window, slot 1 the run
//! length, slots `2..2 + length` the weights.
//!
//! Axial tables carry a single polar bin because axial wires are blind to
//! the polar angle; expansion replicates that run into every polar bin.

use super::curves::{CurveTable, ExpandedCurve};
use super::error::PatternLoadError;
use crate::geometry::HoughGeometry;
use crate::hits::Orientation;
use log::debug;

const START_SLOT: usize = 0;
const LENGTH_SLOT: usize = 1;
const FIRST_WEIGHT_SLOT: usize = 2;

/// Run-length encoded curves for one orientation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompactCurves {
    orientation: Orientation,
    identities: usize,
    priority_slots: usize,
    curvature_bins: usize,
    slots: usize,
    polar_bins: usize,
    data: Vec<u16>,
}

impl CompactCurves {
    /// Polar bins stored per run for the given orientation.
    pub fn polar_count(orientation: Orientation, geometry: &HoughGeometry) -> usize {
        match orientation {
            Orientation::Axial => 1,
            Orientation::Stereo => geometry.polar_bins,
        }
    }

    /// Number of `u16` values a complete table must contain.
    pub fn expected_len(
        orientation: Orientation,
        geometry: &HoughGeometry,
        identities: usize,
    ) -> usize {
        identities
            * geometry.priority_slots
            * geometry.curvature_bins
            * geometry.compact_azimuth_slots
            * Self::polar_count(orientation, geometry)
    }

    /// Table with every run empty; used to assemble synthetic patterns.
    pub fn zeroed(orientation: Orientation, geometry: &HoughGeometry, identities: usize) -> Self {
        Self {
            orientation,
            identities,
            priority_slots: geometry.priority_slots,
            curvature_bins: geometry.curvature_bins,
            slots: geometry.compact_azimuth_slots,
            polar_bins: Self::polar_count(orientation, geometry),
            data: vec![0; Self::expected_len(orientation, geometry, identities)],
        }
    }

    /// Wraps a decoded value stream, checking its length against the layout.
    pub fn from_values(
        orientation: Orientation,
        geometry: &HoughGeometry,
        identities: usize,
        values: Vec<u16>,
    ) -> Result<Self, PatternLoadError> {
        let expected = Self::expected_len(orientation, geometry, identities);
        if values.len() != expected {
            return Err(PatternLoadError::CountMismatch {
                orientation,
                expected,
                found: values.len(),
            });
        }
        let mut table = Self::zeroed(orientation, geometry, 0);
        table.identities = identities;
        table.data = values;
        Ok(table)
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
    pub fn polar_bins(&self) -> usize {
        self.polar_bins
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.data
    }

    #[inline]
    fn idx(
        &self,
        identity: usize,
        priority: usize,
        curvature: usize,
        slot: usize,
        polar: usize,
    ) -> usize {
        (((identity * self.priority_slots + priority) * self.curvature_bins + curvature)
            * self.slots
            + slot)
            * self.polar_bins
            + polar
    }

    /// Writes one run. Panics if the run does not fit the slot capacity.
    pub fn set_run(
        &mut self,
        identity: usize,
        priority: usize,
        curvature: usize,
        polar: usize,
        start: u16,
        weights: &[u16],
    ) {
        assert!(
            weights.len() + FIRST_WEIGHT_SLOT <= self.slots,
            "run of {} weights exceeds {} slots",
            weights.len(),
            self.slots
        );
        let i = self.idx(identity, priority, curvature, START_SLOT, polar);
        self.data[i] = start;
        let i = self.idx(identity, priority, curvature, LENGTH_SLOT, polar);
        self.data[i] = weights.len() as u16;
        for (k, &w) in weights.iter().enumerate() {
            let i = self.idx(identity, priority, curvature, FIRST_WEIGHT_SLOT + k, polar);
            self.data[i] = w;
        }
    }

    /// Expands every run into a dense curve of the geometry's window.
    pub fn expand(&self, geometry: &HoughGeometry) -> Result<CurveTable, PatternLoadError> {
        let window = geometry.curve_azimuth_bins;
        let dense_polar = geometry.polar_bins;
        let replicate = self.polar_bins == 1;
        if !replicate && self.polar_bins != dense_polar {
            return Err(PatternLoadError::Geometry(format!(
                "{:?} table has {} polar bins, geometry expects {} or 1",
                self.orientation, self.polar_bins, dense_polar
            )));
        }
        if self.curvature_bins != geometry.curvature_bins
            || self.slots != geometry.compact_azimuth_slots
            || self.priority_slots != geometry.priority_slots
        {
            return Err(PatternLoadError::Geometry(format!(
                "{:?} table layout does not match the configured geometry",
                self.orientation
            )));
        }

        let capacity = self.slots - FIRST_WEIGHT_SLOT;
        let mut curves = Vec::with_capacity(self.identities * self.priority_slots);
        for identity in 0..self.identities {
            for priority in 0..self.priority_slots {
                let mut curve = ExpandedCurve::zeroed(self.curvature_bins, window, dense_polar);
                for curvature in 0..self.curvature_bins {
                    for polar in 0..self.polar_bins {
                        let start_at = self.idx(identity, priority, curvature, START_SLOT, polar);
                        let length_at = self.idx(identity, priority, curvature, LENGTH_SLOT, polar);
                        let start = self.data[start_at] as usize;
                        let length = self.data[length_at] as usize;
                        if length == 0 {
                            continue;
                        }
                        if length > capacity {
                            return Err(PatternLoadError::RunOverflow {
                                orientation: self.orientation,
                                identity,
                                priority,
                                curvature,
                                polar,
                                length,
                                capacity,
                            });
                        }
                        if start + length > window {
                            return Err(PatternLoadError::WindowOverflow {
                                orientation: self.orientation,
                                identity,
                                priority,
                                curvature,
                                polar,
                                end: start + length,
                                window,
                            });
                        }
                        for k in 0..length {
                            let at = self.idx(
                                identity,
                                priority,
                                curvature,
                                FIRST_WEIGHT_SLOT + k,
                                polar,
                            );
                            let raw = self.data[at];
                            let weight = u8::try_from(raw).map_err(|_| {
                                PatternLoadError::WeightOverflow {
                                    orientation: self.orientation,
                                    identity,
                                    value: raw,
                                }
                            })?;
                            if replicate {
                                for dense in 0..dense_polar {
                                    curve.set(curvature, start + k, dense, weight);
                                }
                            } else {
                                curve.set(curvature, start + k, polar, weight);
                            }
                        }
                    }
                }
                curves.push(curve);
            }
        }
        debug!(
            "expanded {:?} patterns: identities={} window={} polar={} replicated={}",
            self.orientation, self.identities, window, dense_polar, replicate
        );
        Ok(CurveTable::new(
            self.orientation,
            self.identities,
            self.priority_slots,
            curves,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_geometry() -> HoughGeometry {
        HoughGeometry {
            curvature_bins: 4,
            azimuth_bins: 16,
            polar_bins: 3,
            sectors: 4,
            center_sector: 0,
            curve_azimuth_bins: 8,
            compact_azimuth_slots: 5,
            priority_slots: 3,
            cells_per_super_layer: vec![4, 4],
            ..HoughGeometry::default()
        }
    }

    #[test]
    fn axial_runs_replicate_over_polar() {
        let geo = small_geometry();
        let mut compact = CompactCurves::zeroed(Orientation::Axial, &geo, 1);
        compact.set_run(0, 1, 2, 0, 3, &[1, 4, 2]);
        let table = compact.expand(&geo).expect("expand");
        let curve = table.curve(0, 1).expect("curve");
        for polar in 0..geo.polar_bins {
            assert_eq!(curve.get(2, 3, polar), 1);
            assert_eq!(curve.get(2, 4, polar), 4);
            assert_eq!(curve.get(2, 5, polar), 2);
            assert_eq!(curve.get(2, 6, polar), 0);
        }
        assert_eq!(curve.total_weight(), 3 * 7);
        assert!(table.curve(0, 0).expect("slot 0").is_empty());
    }

    #[test]
    fn stereo_runs_stay_in_their_polar_bin() {
        let geo = small_geometry();
        let mut compact = CompactCurves::zeroed(Orientation::Stereo, &geo, 2);
        compact.set_run(1, 0, 3, 2, 0, &[7]);
        let table = compact.expand(&geo).expect("expand");
        let curve = table.curve(1, 0).expect("curve");
        assert_eq!(curve.get(3, 0, 2), 7);
        assert_eq!(curve.get(3, 0, 1), 0);
        assert_eq!(curve.total_weight(), 7);
    }

    #[test]
    fn expansion_is_repeatable() {
        let geo = small_geometry();
        let mut compact = CompactCurves::zeroed(Orientation::Stereo, &geo, 1);
        compact.set_run(0, 2, 1, 1, 5, &[3, 3]);
        let a = compact.expand(&geo).expect("first");
        let b = compact.expand(&geo).expect("second");
        assert_eq!(a, b);
    }

    #[test]
    fn run_longer_than_slots_is_fatal() {
        let geo = small_geometry();
        let mut values = vec![0u16; CompactCurves::expected_len(Orientation::Axial, &geo, 1)];
        // identity 0, priority 0, curvature 0: start slot then length slot.
        values[0] = 0;
        values[1] = 4;
        let compact =
            CompactCurves::from_values(Orientation::Axial, &geo, 1, values).expect("layout");
        assert!(matches!(
            compact.expand(&geo),
            Err(PatternLoadError::RunOverflow { length: 4, capacity: 3, .. })
        ));
    }

    #[test]
    fn run_past_window_is_fatal() {
        let geo = small_geometry();
        let mut compact = CompactCurves::zeroed(Orientation::Axial, &geo, 1);
        compact.set_run(0, 0, 0, 0, 7, &[1, 1]);
        assert!(matches!(
            compact.expand(&geo),
            Err(PatternLoadError::WindowOverflow { end: 9, window: 8, .. })
        ));
    }

    #[test]
    fn wrong_value_count_is_rejected() {
        let geo = small_geometry();
        let err = CompactCurves::from_values(Orientation::Stereo, &geo, 1, vec![0; 10])
            .expect_err("short table");
        assert!(matches!(err, PatternLoadError::CountMismatch { found: 10, .. }));
    }
}
