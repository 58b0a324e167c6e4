//! Pattern library: precomputed hit → Hough-weight curves.
//!
//! Two tables exist, one per wire orientation. Both arrive in a compact
//! run-length layout ([`compact`]) and are expanded once at start-up into
//! dense per-segment curves ([`curves`]) that are shared read-only by every
//! event. [`lookup`] combines the library with the [`SectorMapper`] so a hit
//! resolves to its curve and azimuth offset in one step.
//!
//! [`SectorMapper`]: crate::sector::SectorMapper

pub mod compact;
pub mod curves;
pub mod error;
pub mod io;
pub mod lookup;

pub use compact::CompactCurves;
pub use curves::{CurveTable, ExpandedCurve};
pub use error::PatternLoadError;
pub use lookup::{CurveLookup, PlacedCurve};

use crate::geometry::HoughGeometry;
use crate::hits::Orientation;
use crate::sector::SectorMapper;
use log::info;
use std::path::Path;
use std::time::Instant;

/// Expanded axial and stereo curve tables.
#[derive(Clone, Debug)]
pub struct PatternLibrary {
    axial: CurveTable,
    stereo: CurveTable,
}

impl PatternLibrary {
    /// Expands both compact tables.
    pub fn from_compact(
        geometry: &HoughGeometry,
        axial: &CompactCurves,
        stereo: &CompactCurves,
    ) -> Result<Self, PatternLoadError> {
        geometry.validate().map_err(PatternLoadError::Geometry)?;
        for (table, orientation) in [(axial, Orientation::Axial), (stereo, Orientation::Stereo)] {
            if table.orientation() != orientation {
                return Err(PatternLoadError::Geometry(format!(
                    "expected a {orientation:?} table, got {:?}",
                    table.orientation()
                )));
            }
        }
        Ok(Self {
            axial: axial.expand(geometry)?,
            stereo: stereo.expand(geometry)?,
        })
    }

    /// Reads and expands both pattern files.
    pub fn load(
        geometry: &HoughGeometry,
        axial_path: &Path,
        stereo_path: &Path,
    ) -> Result<Self, PatternLoadError> {
        geometry.validate().map_err(PatternLoadError::Geometry)?;
        let start = Instant::now();
        let mapper = SectorMapper::new(geometry);
        let axial = io::load_compact_curves(
            axial_path,
            Orientation::Axial,
            mapper.identities(Orientation::Axial),
            geometry,
        )?;
        let stereo = io::load_compact_curves(
            stereo_path,
            Orientation::Stereo,
            mapper.identities(Orientation::Stereo),
            geometry,
        )?;
        let library = Self::from_compact(geometry, &axial, &stereo)?;
        info!(
            "pattern library loaded from {} and {} in {:.1} ms",
            axial_path.display(),
            stereo_path.display(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(library)
    }

    #[inline]
    pub fn table(&self, orientation: Orientation) -> &CurveTable {
        match orientation {
            Orientation::Axial => &self.axial,
            Orientation::Stereo => &self.stereo,
        }
    }

    #[inline]
    pub fn curve(
        &self,
        orientation: Orientation,
        identity: usize,
        slot: usize,
    ) -> Option<&ExpandedCurve> {
        self.table(orientation).curve(identity, slot)
    }
}
