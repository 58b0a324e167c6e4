#![doc = include_str!("../README.md")]

// Finder stages, in pipeline order.
pub mod geometry;
pub mod hits;
pub mod sector;
pub mod patterns;
pub mod hough;
pub mod cluster;
pub mod relate;
pub mod estimate;
pub mod finder;

// Reporting and tooling.
pub mod config;
pub mod diagnostics;
pub mod io;

// --- High-level re-exports -------------------------------------------------

pub use crate::estimate::TrackCandidate;
pub use crate::finder::{FinderError, FinderParams, TrackFinder};
pub use crate::geometry::HoughGeometry;
pub use crate::hits::{HitRecord, PriorityPosition};

pub use crate::diagnostics::FinderReport;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use hough3d_finder::prelude::*;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut finder = TrackFinder::from_files(HoughGeometry::default(), FinderParams::default())?;
/// let hits = [HitRecord::new(12, 0, PriorityPosition::First, 3)];
/// let report = finder.process_event(&hits);
/// for track in &report.tracks {
///     println!(
///         "curvature={:.5} azimuth={:.3} cot={:.3}",
///         track.curvature, track.azimuth, track.polar_slope
///     );
/// }
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::{
        FinderParams, FinderReport, HitRecord, HoughGeometry, PriorityPosition, TrackCandidate,
        TrackFinder,
    };
}
