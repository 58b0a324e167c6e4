//! Owned 3D accumulator in curvature-major layout.
//!
//! Storage is a single contiguous `Vec<u16>` indexed as
//! `(curvature * azimuth_bins + azimuth) * polar_bins + polar`, mirroring the
//! row-major image buffers used elsewhere: one allocation per event, cleared
//! in place between events.

use crate::geometry::HoughGeometry;
use serde::{Deserialize, Serialize};

/// Bin coordinate in the Hough space.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CellIndex {
    pub curvature: usize,
    pub azimuth: usize,
    pub polar: usize,
}

impl CellIndex {
    pub const fn new(curvature: usize, azimuth: usize, polar: usize) -> Self {
        Self {
            curvature,
            azimuth,
            polar,
        }
    }

    pub fn as_array(&self) -> [usize; 3] {
        [self.curvature, self.azimuth, self.polar]
    }
}

/// Dense (curvature × azimuth × polar) weight array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoughSpace {
    curvature_bins: usize,
    azimuth_bins: usize,
    polar_bins: usize,
    data: Vec<u16>,
}

impl HoughSpace {
    /// Zero-initialised space of the given shape.
    pub fn new(curvature_bins: usize, azimuth_bins: usize, polar_bins: usize) -> Self {
        Self {
            curvature_bins,
            azimuth_bins,
            polar_bins,
            data: vec![0; curvature_bins * azimuth_bins * polar_bins],
        }
    }

    pub fn for_geometry(geometry: &HoughGeometry) -> Self {
        Self::new(
            geometry.curvature_bins,
            geometry.azimuth_bins,
            geometry.polar_bins,
        )
    }

    #[inline]
    pub fn shape(&self) -> [usize; 3] {
        [self.curvature_bins, self.azimuth_bins, self.polar_bins]
    }

    #[inline]
    pub fn curvature_bins(&self) -> usize {
        self.curvature_bins
    }

    #[inline]
    pub fn azimuth_bins(&self) -> usize {
        self.azimuth_bins
    }

    #[inline]
    pub fn polar_bins(&self) -> usize {
        self.polar_bins
    }

    #[inline]
    pub fn contains(&self, cell: CellIndex) -> bool {
        cell.curvature < self.curvature_bins
            && cell.azimuth < self.azimuth_bins
            && cell.polar < self.polar_bins
    }

    #[inline]
    fn idx(&self, cell: CellIndex) -> usize {
        debug_assert!(self.contains(cell), "cell {cell:?} outside {:?}", self.shape());
        (cell.curvature * self.azimuth_bins + cell.azimuth) * self.polar_bins + cell.polar
    }

    #[inline]
    pub fn get(&self, cell: CellIndex) -> u16 {
        self.data[self.idx(cell)]
    }

    #[inline]
    pub fn set(&mut self, cell: CellIndex, value: u16) {
        let i = self.idx(cell);
        self.data[i] = value;
    }

    /// Saturating add so pathological events cannot wrap a cell to zero.
    #[inline]
    pub fn add(&mut self, cell: CellIndex, value: u16) {
        let i = self.idx(cell);
        self.data[i] = self.data[i].saturating_add(value);
    }

    /// Polar column at fixed (curvature, azimuth).
    #[inline]
    pub fn column(&self, curvature: usize, azimuth: usize) -> &[u16] {
        let start = (curvature * self.azimuth_bins + azimuth) * self.polar_bins;
        &self.data[start..start + self.polar_bins]
    }

    #[inline]
    pub fn column_mut(&mut self, curvature: usize, azimuth: usize) -> &mut [u16] {
        let start = (curvature * self.azimuth_bins + azimuth) * self.polar_bins;
        &mut self.data[start..start + self.polar_bins]
    }

    /// Zeroes every cell while keeping the allocation.
    pub fn reset(&mut self) {
        self.data.fill(0);
    }

    /// Overwrites this space with `other`, reusing the allocation.
    pub fn copy_from(&mut self, other: &HoughSpace) {
        debug_assert_eq!(self.shape(), other.shape());
        self.data.copy_from_slice(&other.data);
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.data
    }

    pub fn total_weight(&self) -> u64 {
        self.data.iter().map(|&v| v as u64).sum()
    }

    /// Maximum over `azimuth ∈ [start, end)`, all curvature and polar bins.
    ///
    /// Ties keep the first cell in (curvature, azimuth, polar) scan order.
    /// Returns `None` when the range is empty.
    pub fn max_in_azimuth_range(&self, start: usize, end: usize) -> Option<(CellIndex, u16)> {
        let end = end.min(self.azimuth_bins);
        let mut best: Option<(CellIndex, u16)> = None;
        for curvature in 0..self.curvature_bins {
            for azimuth in start..end {
                for (polar, &value) in self.column(curvature, azimuth).iter().enumerate() {
                    if best.map_or(true, |(_, v)| value > v) {
                        best = Some((CellIndex::new(curvature, azimuth, polar), value));
                    }
                }
            }
        }
        best
    }

    /// Sum over the polar axis, giving a (curvature × azimuth) plane in row-major order.
    pub fn polar_projection(&self) -> Vec<u32> {
        let mut plane = vec![0u32; self.curvature_bins * self.azimuth_bins];
        for curvature in 0..self.curvature_bins {
            for azimuth in 0..self.azimuth_bins {
                plane[curvature * self.azimuth_bins + azimuth] = self
                    .column(curvature, azimuth)
                    .iter()
                    .map(|&v| v as u32)
                    .sum();
            }
        }
        plane
    }
}
