//! Hit → (curve, azimuth offset) resolution shared by accumulation and
//! hit-to-cluster relation.

use super::curves::ExpandedCurve;
use super::error::PatternLoadError;
use super::PatternLibrary;
use crate::geometry::HoughGeometry;
use crate::hits::{HitRecord, Orientation};
use crate::hough::{CellIndex, HoughSpace};
use crate::sector::{SectorEntry, SectorMapper};
use log::warn;

/// Read-only context built once at start-up and shared by all events.
#[derive(Clone, Debug)]
pub struct CurveLookup {
    geometry: HoughGeometry,
    mapper: SectorMapper,
    library: PatternLibrary,
}

/// Curve of one hit together with the ring offset it lands at.
#[derive(Clone, Copy, Debug)]
pub struct PlacedCurve<'a> {
    pub curve: &'a ExpandedCurve,
    pub entry: SectorEntry,
    pub offset: usize,
    azimuth_bins: usize,
}

impl CurveLookup {
    pub fn new(geometry: HoughGeometry, library: PatternLibrary) -> Result<Self, PatternLoadError> {
        geometry.validate().map_err(PatternLoadError::Geometry)?;
        let mapper = SectorMapper::new(&geometry);
        for orientation in [Orientation::Axial, Orientation::Stereo] {
            let needed = mapper.identities(orientation);
            let available = library.table(orientation).identities();
            if available < needed {
                return Err(PatternLoadError::Geometry(format!(
                    "{orientation:?} library holds {available} identities, layout needs {needed}"
                )));
            }
        }
        Ok(Self {
            geometry,
            mapper,
            library,
        })
    }

    #[inline]
    pub fn geometry(&self) -> &HoughGeometry {
        &self.geometry
    }

    #[inline]
    pub fn mapper(&self) -> &SectorMapper {
        &self.mapper
    }

    #[inline]
    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    /// Resolves the curve a hit votes with. `None` for hits without a
    /// priority wire and for ids outside the segment layout.
    pub fn resolve(&self, hit: &HitRecord) -> Option<PlacedCurve<'_>> {
        let slot = hit.priority.curve_slot()?;
        let Some(entry) = self.mapper.lookup(hit.global_id) else {
            warn!(
                "skipping hit with segment id {} outside the {}-segment layout",
                hit.global_id,
                self.mapper.len()
            );
            return None;
        };
        if entry.super_layer != hit.super_layer {
            warn!(
                "segment {} belongs to super layer {}, hit claims {}",
                hit.global_id, entry.super_layer, hit.super_layer
            );
        }
        let curve = self.library.curve(entry.orientation, entry.identity, slot)?;
        Some(PlacedCurve {
            curve,
            entry,
            offset: self.geometry.sector_offset(entry.sector),
            azimuth_bins: self.geometry.azimuth_bins,
        })
    }
}

impl PlacedCurve<'_> {
    /// Adds the curve into `space` at its sector offset, wrapping the azimuth.
    pub fn deposit(&self, space: &mut HoughSpace) {
        let [curvature_bins, window, _] = self.curve.shape();
        let curvature_bins = curvature_bins.min(space.curvature_bins());
        for curvature in 0..curvature_bins {
            for w in 0..window {
                let column = self.curve.column(curvature, w);
                if column.iter().all(|&v| v == 0) {
                    continue;
                }
                let azimuth = (w + self.offset) % self.azimuth_bins;
                let target = space.column_mut(curvature, azimuth);
                for (dst, &v) in target.iter_mut().zip(column) {
                    *dst = dst.saturating_add(v as u16);
                }
            }
        }
    }

    /// Contribution of this curve to a single cell.
    #[inline]
    pub fn weight_at(&self, cell: CellIndex) -> u16 {
        let w = (cell.azimuth + self.azimuth_bins - self.offset % self.azimuth_bins)
            % self.azimuth_bins;
        self.curve.get(cell.curvature, w, cell.polar) as u16
    }
}
