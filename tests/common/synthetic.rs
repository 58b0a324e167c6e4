//! Small synthetic layouts and pattern tables for integration tests.

use flate2::write::GzEncoder;
use flate2::Compression;
use hough3d_finder::finder::FinderParams;
use hough3d_finder::geometry::HoughGeometry;
use hough3d_finder::hits::{HitRecord, Orientation, PriorityPosition};
use hough3d_finder::patterns::{CompactCurves, PatternLibrary};
use hough3d_finder::sector::SectorMapper;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Five super layers (axial, stereo, axial, stereo, axial) with two segments
/// per sector, four sectors of eight azimuth bins.
pub fn small_geometry() -> HoughGeometry {
    HoughGeometry {
        curvature_bins: 8,
        azimuth_bins: 32,
        polar_bins: 5,
        sectors: 4,
        center_sector: 0,
        curve_azimuth_bins: 16,
        compact_azimuth_slots: 6,
        priority_slots: 3,
        cells_per_super_layer: vec![8, 8, 8, 8, 8],
        ..HoughGeometry::default()
    }
}

/// Zeroed compact tables sized for `geometry`.
pub fn empty_tables(geometry: &HoughGeometry) -> (CompactCurves, CompactCurves) {
    let mapper = SectorMapper::new(geometry);
    (
        CompactCurves::zeroed(
            Orientation::Axial,
            geometry,
            mapper.identities(Orientation::Axial),
        ),
        CompactCurves::zeroed(
            Orientation::Stereo,
            geometry,
            mapper.identities(Orientation::Stereo),
        ),
    )
}

/// Tables where the first-wire curve of the first segment in every super
/// layer peaks at window bin 4, curvature 3 (and polar 2 for stereo).
pub fn track_tables(geometry: &HoughGeometry) -> (CompactCurves, CompactCurves) {
    let (mut axial, mut stereo) = empty_tables(geometry);
    for identity in [0, 2, 4] {
        axial.set_run(identity, 0, 3, 0, 3, &[2, 4, 2]);
        axial.set_run(identity, 0, 2, 0, 4, &[1, 2]);
        axial.set_run(identity, 0, 4, 0, 2, &[2, 1]);
    }
    for identity in [0, 2] {
        stereo.set_run(identity, 0, 3, 2, 3, &[2, 4, 2]);
        stereo.set_run(identity, 0, 3, 1, 4, &[2]);
        stereo.set_run(identity, 0, 3, 3, 4, &[2]);
    }
    (axial, stereo)
}

pub fn library(
    geometry: &HoughGeometry,
    tables: &(CompactCurves, CompactCurves),
) -> PatternLibrary {
    PatternLibrary::from_compact(geometry, &tables.0, &tables.1).expect("library")
}

/// One first-wire hit in the first segment of `sector` for every super layer.
pub fn track_hits(sector: usize) -> Vec<HitRecord> {
    (0..5)
        .map(|super_layer| {
            HitRecord::new(8 * super_layer + 2 * sector, super_layer, PriorityPosition::First, 10)
        })
        .collect()
}

/// Thresholds loose enough for the synthetic track, strict coverage.
pub fn track_params() -> FinderParams {
    FinderParams {
        min_super_axial: 3,
        min_super_stereo: 2,
        min_peak_weight: 10,
        min_total_weight: 100,
        ..FinderParams::default()
    }
}

/// Writes a compact table as gzip-compressed text.
pub fn write_gz_table(path: &Path, table: &CompactCurves) {
    let text = table
        .as_slice()
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    let mut enc = GzEncoder::new(File::create(path).expect("create"), Compression::default());
    enc.write_all(text.as_bytes()).expect("write");
    enc.finish().expect("finish");
}
