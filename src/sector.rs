//! Global segment id → (orientation, identity within sector, sector) table.
//!
//! The detector repeats the same segment arrangement `sectors` times around
//! the ring, so one pattern curve per segment of a single sector suffices.
//! Identities are numbered super layer by super layer, separately for the
//! axial and the stereo families.

use crate::geometry::HoughGeometry;
use crate::hits::Orientation;

/// Resolved location of one trigger segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectorEntry {
    pub orientation: Orientation,
    /// Index of the segment among all segments of its orientation in one sector.
    pub identity: usize,
    /// Azimuthal repetition the segment belongs to.
    pub sector: usize,
    pub super_layer: usize,
}

/// Static lookup built once from the segment layout.
#[derive(Clone, Debug)]
pub struct SectorMapper {
    entries: Vec<SectorEntry>,
    axial_identities: usize,
    stereo_identities: usize,
    axial_super_layers: Vec<usize>,
    stereo_super_layers: Vec<usize>,
}

impl SectorMapper {
    pub fn new(geometry: &HoughGeometry) -> Self {
        let sectors = geometry.sectors.max(1);
        let mut entries = Vec::with_capacity(geometry.total_cells());
        let mut axial_identities = 0usize;
        let mut stereo_identities = 0usize;
        let mut axial_super_layers = Vec::new();
        let mut stereo_super_layers = Vec::new();

        for (super_layer, &cells) in geometry.cells_per_super_layer.iter().enumerate() {
            let per_sector = cells / sectors;
            let orientation = Orientation::of_super_layer(super_layer);
            let base = match orientation {
                Orientation::Axial => {
                    axial_super_layers.push(super_layer);
                    axial_identities
                }
                Orientation::Stereo => {
                    stereo_super_layers.push(super_layer);
                    stereo_identities
                }
            };
            for rel in 0..cells {
                let (sector, within) = if per_sector == 0 {
                    (0, rel)
                } else {
                    (rel / per_sector, rel % per_sector)
                };
                entries.push(SectorEntry {
                    orientation,
                    identity: base + within,
                    sector,
                    super_layer,
                });
            }
            match orientation {
                Orientation::Axial => axial_identities += per_sector,
                Orientation::Stereo => stereo_identities += per_sector,
            }
        }

        Self {
            entries,
            axial_identities,
            stereo_identities,
            axial_super_layers,
            stereo_super_layers,
        }
    }

    /// Looks up a global segment id; `None` outside the layout.
    #[inline]
    pub fn lookup(&self, global_id: usize) -> Option<SectorEntry> {
        self.entries.get(global_id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct segment identities of one orientation per sector.
    pub fn identities(&self, orientation: Orientation) -> usize {
        match orientation {
            Orientation::Axial => self.axial_identities,
            Orientation::Stereo => self.stereo_identities,
        }
    }

    /// Super layer indices carrying the given orientation.
    pub fn super_layers(&self, orientation: Orientation) -> &[usize] {
        match orientation {
            Orientation::Axial => &self.axial_super_layers,
            Orientation::Stereo => &self.stereo_super_layers,
        }
    }
}
