use super::space::HoughSpace;
use crate::hits::HitRecord;
use crate::patterns::CurveLookup;

/// Per-event accumulator: zeroed at the start of each event, then fed one
/// hit at a time. Accumulation is plain integer addition, so the result does
/// not depend on hit order.
#[derive(Clone, Debug)]
pub struct HoughSpaceBuilder {
    space: HoughSpace,
    deposited: usize,
}

impl HoughSpaceBuilder {
    pub fn new(lookup: &CurveLookup) -> Self {
        Self {
            space: HoughSpace::for_geometry(lookup.geometry()),
            deposited: 0,
        }
    }

    pub fn reset(&mut self) {
        self.space.reset();
        self.deposited = 0;
    }

    /// Accumulates the hit's curve. Returns `false` when the hit carries no
    /// curve (no priority wire or unknown segment) and the space is untouched.
    pub fn add_hit(&mut self, lookup: &CurveLookup, hit: &HitRecord) -> bool {
        match lookup.resolve(hit) {
            Some(placed) => {
                placed.deposit(&mut self.space);
                self.deposited += 1;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn space(&self) -> &HoughSpace {
        &self.space
    }

    /// Number of hits that contributed a curve since the last reset.
    #[inline]
    pub fn deposited(&self) -> usize {
        self.deposited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::HoughGeometry;
    use crate::hits::{Orientation, PriorityPosition};
    use crate::hough::CellIndex;
    use crate::patterns::{CompactCurves, PatternLibrary};

    /// 2 super layers × 2 segments per sector, 4 sectors of 4 azimuth bins.
    fn geometry() -> HoughGeometry {
        HoughGeometry {
            curvature_bins: 3,
            azimuth_bins: 16,
            polar_bins: 2,
            sectors: 4,
            center_sector: 0,
            curve_azimuth_bins: 6,
            compact_azimuth_slots: 5,
            priority_slots: 3,
            cells_per_super_layer: vec![8, 8],
            ..HoughGeometry::default()
        }
    }

    fn lookup() -> CurveLookup {
        let geo = geometry();
        let mut axial = CompactCurves::zeroed(Orientation::Axial, &geo, 2);
        // identity 0, first wire: run crossing the window end.
        axial.set_run(0, 0, 1, 0, 3, &[1, 2, 3]);
        axial.set_run(1, 2, 0, 0, 0, &[4]);
        let mut stereo = CompactCurves::zeroed(Orientation::Stereo, &geo, 2);
        stereo.set_run(0, 1, 2, 1, 2, &[5, 6]);
        let library = PatternLibrary::from_compact(&geo, &axial, &stereo).expect("library");
        CurveLookup::new(geo, library).expect("lookup")
    }

    #[test]
    fn none_priority_is_a_no_op() {
        let lookup = lookup();
        let mut builder = HoughSpaceBuilder::new(&lookup);
        let before = builder.space().clone();
        let hit = HitRecord::new(0, 0, PriorityPosition::None, 0);
        assert!(!builder.add_hit(&lookup, &hit));
        assert_eq!(builder.space(), &before);
        assert_eq!(builder.deposited(), 0);
    }

    #[test]
    fn unknown_segment_is_skipped() {
        let lookup = lookup();
        let mut builder = HoughSpaceBuilder::new(&lookup);
        let hit = HitRecord::new(99, 0, PriorityPosition::First, 0);
        assert!(!builder.add_hit(&lookup, &hit));
        assert_eq!(builder.space().total_weight(), 0);
    }

    #[test]
    fn azimuth_wraps_at_ring_end() {
        let lookup = lookup();
        let mut builder = HoughSpaceBuilder::new(&lookup);
        // Segment 6 of SL0: sector 3 → offset 12; run covers window bins 3..6
        // → ring bins 15, 0, 1.
        let hit = HitRecord::new(6, 0, PriorityPosition::First, 0);
        assert!(builder.add_hit(&lookup, &hit));
        let space = builder.space();
        for polar in 0..2 {
            assert_eq!(space.get(CellIndex::new(1, 15, polar)), 1);
            assert_eq!(space.get(CellIndex::new(1, 0, polar)), 2);
            assert_eq!(space.get(CellIndex::new(1, 1, polar)), 3);
        }
        assert_eq!(space.total_weight(), 12);

        let placed = lookup.resolve(&hit).expect("placed");
        assert_eq!(placed.offset, 12);
        assert_eq!(placed.weight_at(CellIndex::new(1, 0, 1)), 2);
        assert_eq!(placed.weight_at(CellIndex::new(1, 2, 1)), 0);
    }

    #[test]
    fn accumulation_is_order_independent() {
        let lookup = lookup();
        let hits = [
            HitRecord::new(6, 0, PriorityPosition::First, 0),
            HitRecord::new(3, 0, PriorityPosition::Right, 4),
            HitRecord::new(8, 1, PriorityPosition::Left, 2),
            HitRecord::new(2, 0, PriorityPosition::First, 1),
            HitRecord::new(10, 1, PriorityPosition::Left, 9),
        ];
        let mut forward = HoughSpaceBuilder::new(&lookup);
        for hit in &hits {
            forward.add_hit(&lookup, hit);
        }
        let mut backward = HoughSpaceBuilder::new(&lookup);
        for hit in hits.iter().rev() {
            backward.add_hit(&lookup, hit);
        }
        assert_eq!(forward.space(), backward.space());
        assert!(forward.space().total_weight() > 0);

        forward.reset();
        assert_eq!(forward.space().total_weight(), 0);
    }

    #[test]
    fn stereo_curve_uses_polar_bin() {
        let lookup = lookup();
        let mut builder = HoughSpaceBuilder::new(&lookup);
        // SL1 segment 10: sector 1 (2 per sector) → offset 4, identity 0.
        let hit = HitRecord::new(8 + 2, 1, PriorityPosition::Left, 0);
        assert!(builder.add_hit(&lookup, &hit));
        let space = builder.space();
        assert_eq!(space.get(CellIndex::new(2, 6, 1)), 5);
        assert_eq!(space.get(CellIndex::new(2, 7, 1)), 6);
        assert_eq!(space.get(CellIndex::new(2, 6, 0)), 0);
    }
}
