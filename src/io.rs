//! I/O helpers for finder inputs and outputs.
//!
//! - `load_events`: read a JSON array of events, each an array of hits.
//! - `save_hough_projection_png`: write the polar-summed Hough space as an
//!   8-bit grayscale PNG (curvature rows × azimuth columns).
//! - `write_json_file`: pretty-print a serializable value to disk.
use crate::hits::HitRecord;
use crate::hough::HoughSpace;
use image::{GrayImage, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load all events from a JSON file.
pub fn load_events(path: &Path) -> Result<Vec<Vec<HitRecord>>, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read events {}: {e}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse events {}: {e}", path.display()))
}

/// Normalise the polar projection of `space` to [0, 255].
pub fn hough_projection_image(space: &HoughSpace) -> GrayImage {
    let width = space.azimuth_bins();
    let height = space.curvature_bins();
    let plane = space.polar_projection();
    let max = plane.iter().copied().max().unwrap_or(0).max(1) as f64;
    let mut out = GrayImage::new(width as u32, height as u32);
    for (i, &v) in plane.iter().enumerate() {
        let level = (v as f64 / max * 255.0).round().clamp(0.0, 255.0) as u8;
        out.put_pixel((i % width) as u32, (i / width) as u32, Luma([level]));
    }
    out
}

/// Save the polar projection of `space` to a grayscale PNG.
pub fn save_hough_projection_png(space: &HoughSpace, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    hough_projection_image(space)
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hits::PriorityPosition;
    use crate::hough::CellIndex;

    #[test]
    fn events_parse_with_default_priority() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("events.json");
        fs::write(
            &path,
            r#"[[{"globalId": 3, "superLayer": 0, "priority": "left", "driftTime": -2},
                {"globalId": 7, "superLayer": 1, "driftTime": 0}], []]"#,
        )
        .expect("write");
        let events = load_events(&path).expect("events");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0][0], HitRecord::new(3, 0, PriorityPosition::Left, -2));
        assert_eq!(events[0][1].priority, PriorityPosition::None);
        assert!(events[1].is_empty());
    }

    #[test]
    fn projection_is_normalised() {
        let mut space = HoughSpace::new(2, 4, 3);
        space.set(CellIndex::new(1, 3, 0), 4);
        space.set(CellIndex::new(1, 3, 2), 4);
        space.set(CellIndex::new(0, 1, 1), 2);
        let img = hough_projection_image(&space);
        assert_eq!(img.dimensions(), (4, 2));
        assert_eq!(img.get_pixel(3, 1)[0], 255);
        assert_eq!(img.get_pixel(1, 0)[0], 64);
        assert_eq!(img.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn writes_png_and_json_into_new_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let png = dir.path().join("out/nested/hough.png");
        let json = dir.path().join("out/report.json");
        save_hough_projection_png(&HoughSpace::new(2, 4, 1), &png).expect("png");
        write_json_file(&json, &vec![1, 2, 3]).expect("json");
        assert!(png.exists());
        let text = fs::read_to_string(&json).expect("read");
        assert!(text.contains('3'));
    }
}
