//! Diagnostics data model returned by the finder.
//!
//! [`FinderReport`] bundles the track list with per-event counters, the
//! stage timing trace and, when read-out is enabled, a dump of the
//! accumulated Hough space. Per-cluster read-outs travel with each
//! [`TrackCandidate`](crate::estimate::TrackCandidate).

pub mod report;
pub mod timing;

pub use report::{EventCounters, FinderReport, HoughDump};
pub use timing::{StageTiming, TimingBreakdown};
