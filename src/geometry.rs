//! Binning and detector-layout descriptor shared by every finder stage.
//!
//! The descriptor is built once (usually via [`HoughGeometry::default`], which
//! describes the Belle II CDC trigger) and passed by reference. Tests construct
//! smaller geometries to keep synthetic pattern tables tiny.

use serde::{Deserialize, Serialize};

/// Speed of light in units of GeV / (T · m).
const SPEED_OF_LIGHT_GEV_PER_TM: f64 = 0.299_792_458;

/// Closed acceptance interval `[lo, hi]` split into equally sized bins.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AcceptanceRange {
    pub lo: f64,
    pub hi: f64,
}

impl AcceptanceRange {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Width of a single bin when the range is split into `bins` slots.
    #[inline]
    pub fn bin_size(&self, bins: usize) -> f64 {
        (self.hi - self.lo) / bins as f64
    }

    /// Maps a (fractional) bin coordinate to the bin-centre value.
    #[inline]
    pub fn bin_to_value(&self, bins: usize, bin: f64) -> f64 {
        self.lo + (bin + 0.5) * self.bin_size(bins)
    }
}

/// Immutable Hough binning and trigger-segment layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughGeometry {
    /// Number of curvature (signed inverse transverse momentum) bins.
    pub curvature_bins: usize,
    /// Number of azimuth bins covering the full ring.
    pub azimuth_bins: usize,
    /// Number of polar-angle bins.
    pub polar_bins: usize,
    /// Number of identical azimuthal repetitions of the segment layout.
    pub sectors: usize,
    /// Sector the pattern curves were generated for.
    pub center_sector: usize,
    /// Azimuth width of one expanded per-hit curve.
    pub curve_azimuth_bins: usize,
    /// Slots of one compact run: start offset, run length, weights.
    pub compact_azimuth_slots: usize,
    /// Number of priority wires carrying an individual curve.
    pub priority_slots: usize,
    /// Trigger segments per super layer over the full ring.
    pub cells_per_super_layer: Vec<usize>,
    pub curvature_range: AcceptanceRange,
    pub azimuth_range_deg: AcceptanceRange,
    pub polar_range_deg: AcceptanceRange,
    pub magnetic_field_tesla: f64,
}

impl Default for HoughGeometry {
    fn default() -> Self {
        Self {
            curvature_bins: 40,
            azimuth_bins: 384,
            polar_bins: 9,
            sectors: 32,
            center_sector: 0,
            curve_azimuth_bins: 384,
            compact_azimuth_slots: 15,
            priority_slots: 3,
            cells_per_super_layer: vec![160, 160, 192, 224, 256, 288, 320, 352, 384],
            curvature_range: AcceptanceRange::new(-4.0, 4.0),
            azimuth_range_deg: AcceptanceRange::new(0.0, 360.0),
            polar_range_deg: AcceptanceRange::new(19.0, 140.0),
            magnetic_field_tesla: 1.5,
        }
    }
}

impl HoughGeometry {
    /// Checks internal consistency. Called once when the finder is built.
    pub fn validate(&self) -> Result<(), String> {
        if self.curvature_bins == 0 || self.azimuth_bins == 0 || self.polar_bins == 0 {
            return Err(format!(
                "Hough space needs at least one bin per axis, got {}x{}x{}",
                self.curvature_bins, self.azimuth_bins, self.polar_bins
            ));
        }
        if self.sectors == 0 || self.azimuth_bins % self.sectors != 0 {
            return Err(format!(
                "{} azimuth bins cannot be split into {} sectors",
                self.azimuth_bins, self.sectors
            ));
        }
        if self.center_sector >= self.sectors {
            return Err(format!(
                "center sector {} outside of {} sectors",
                self.center_sector, self.sectors
            ));
        }
        if self.curve_azimuth_bins == 0 || self.curve_azimuth_bins > self.azimuth_bins {
            return Err(format!(
                "curve window of {} bins does not fit the {}-bin ring",
                self.curve_azimuth_bins, self.azimuth_bins
            ));
        }
        if self.compact_azimuth_slots < 3 {
            return Err(format!(
                "compact runs need start, length and at least one weight slot, got {}",
                self.compact_azimuth_slots
            ));
        }
        if self.priority_slots == 0 {
            return Err("at least one priority slot is required".to_string());
        }
        if self.cells_per_super_layer.is_empty() {
            return Err("segment layout has no super layers".to_string());
        }
        for (sl, &cells) in self.cells_per_super_layer.iter().enumerate() {
            if cells == 0 || cells % self.sectors != 0 {
                return Err(format!(
                    "super layer {sl}: {cells} segments are not a multiple of {} sectors",
                    self.sectors
                ));
            }
        }
        for (name, range) in [
            ("curvature", self.curvature_range),
            ("azimuth", self.azimuth_range_deg),
            ("polar", self.polar_range_deg),
        ] {
            if !(range.lo.is_finite() && range.hi.is_finite() && range.hi > range.lo) {
                return Err(format!(
                    "{name} acceptance range [{}, {}] is empty",
                    range.lo, range.hi
                ));
            }
        }
        if !(self.magnetic_field_tesla.is_finite() && self.magnetic_field_tesla > 0.0) {
            return Err(format!(
                "magnetic field must be positive, got {}",
                self.magnetic_field_tesla
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn bins_per_sector(&self) -> usize {
        self.azimuth_bins / self.sectors
    }

    #[inline]
    pub fn super_layers(&self) -> usize {
        self.cells_per_super_layer.len()
    }

    /// Total number of trigger segments over all super layers.
    pub fn total_cells(&self) -> usize {
        self.cells_per_super_layer.iter().sum()
    }

    /// Azimuth offset at which a curve generated for the centre sector lands
    /// when the hit sits in `sector`.
    #[inline]
    pub fn sector_offset(&self, sector: usize) -> usize {
        let rel = (sector + self.sectors - self.center_sector % self.sectors) % self.sectors;
        rel * self.bins_per_sector()
    }

    /// Wraps a signed azimuth bin onto the ring.
    #[inline]
    pub fn wrap_azimuth(&self, bin: isize) -> usize {
        bin.rem_euclid(self.azimuth_bins as isize) as usize
    }

    /// Azimuth bins per quadrant of the ring (the last quadrant absorbs any remainder).
    #[inline]
    pub fn quadrant_width(&self) -> usize {
        (self.azimuth_bins / 4).max(1)
    }

    /// Track radius in centimetres for a transverse momentum in GeV.
    #[inline]
    pub fn track_radius_cm(&self, pt: f64) -> f64 {
        100.0 * pt / (SPEED_OF_LIGHT_GEV_PER_TM * self.magnetic_field_tesla)
    }
}
