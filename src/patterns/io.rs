//! Reading compact pattern tables from disk.
//!
//! Files are whitespace-separated unsigned 16-bit integers, gzip-compressed
//! when the name ends in `.gz`.

use super::compact::CompactCurves;
use super::error::PatternLoadError;
use crate::geometry::HoughGeometry;
use crate::hits::Orientation;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Loads and validates one compact table.
pub fn load_compact_curves(
    path: &Path,
    orientation: Orientation,
    identities: usize,
    geometry: &HoughGeometry,
) -> Result<CompactCurves, PatternLoadError> {
    let text = read_text(path)?;
    let values = parse_values(&text)?;
    CompactCurves::from_values(orientation, geometry, identities, values)
}

fn read_text(path: &Path) -> Result<String, PatternLoadError> {
    let io_err = |source| PatternLoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    let mut text = String::new();
    let compressed = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);
    if compressed {
        GzDecoder::new(BufReader::new(file))
            .read_to_string(&mut text)
            .map_err(io_err)?;
    } else {
        BufReader::new(file)
            .read_to_string(&mut text)
            .map_err(io_err)?;
    }
    Ok(text)
}

/// Parses a whitespace-separated `u16` stream.
pub fn parse_values(text: &str) -> Result<Vec<u16>, PatternLoadError> {
    text.split_whitespace()
        .enumerate()
        .map(|(token_index, token)| {
            token.parse::<u16>().map_err(|_| PatternLoadError::Parse {
                token_index,
                token: token.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn tiny_geometry() -> HoughGeometry {
        HoughGeometry {
            curvature_bins: 2,
            azimuth_bins: 8,
            polar_bins: 2,
            sectors: 2,
            curve_azimuth_bins: 4,
            compact_azimuth_slots: 3,
            priority_slots: 1,
            cells_per_super_layer: vec![2, 2],
            ..HoughGeometry::default()
        }
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_values(" 1 2\n3\t").expect("values"), vec![1, 2, 3]);
        assert!(matches!(
            parse_values("1 -2"),
            Err(PatternLoadError::Parse { token_index: 1, .. })
        ));
        assert!(parse_values("70000").is_err());
    }

    #[test]
    fn loads_gzip_table() {
        let geo = tiny_geometry();
        // axial: 1 identity × 1 prio × 2 curvature × 3 slots × 1 polar
        let text = "1 1 5  0 0 0";
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("axial.txt.gz");
        let mut enc = GzEncoder::new(File::create(&path).expect("create"), Compression::default());
        enc.write_all(text.as_bytes()).expect("write");
        enc.finish().expect("finish");

        let compact = load_compact_curves(&path, Orientation::Axial, 1, &geo).expect("load");
        let table = compact.expand(&geo).expect("expand");
        let curve = table.curve(0, 0).expect("curve");
        assert_eq!(curve.get(0, 1, 0), 5);
        assert_eq!(curve.get(0, 1, 1), 5);
    }

    #[test]
    fn loads_plain_table_and_checks_count() {
        let geo = tiny_geometry();
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("stereo.txt");
        std::fs::write(&path, "0 0 0 0").expect("write");
        let err = load_compact_curves(&path, Orientation::Stereo, 1, &geo).expect_err("short");
        assert!(matches!(
            err,
            PatternLoadError::CountMismatch {
                expected: 12,
                found: 4,
                ..
            }
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let geo = tiny_geometry();
        let err = load_compact_curves(
            Path::new("/nonexistent/axial.gz"),
            Orientation::Axial,
            1,
            &geo,
        )
        .expect_err("missing");
        assert!(matches!(err, PatternLoadError::Io { .. }));
    }
}
