//! Track finder orchestrating accumulation, clustering and estimation.
//!
//! Overview
//! - Every hit of the event resolves to a precomputed curve which is added to
//!   the Hough space at the hit's sector offset.
//! - The populated space is searched quadrant by quadrant for maxima; each
//!   maximum yields a fixed-shape cluster and its butterfly neighbourhood is
//!   erased on a private copy before the next search.
//! - Event hits are related back to every cluster peak, one hit per super
//!   layer. Clusters lacking axial or stereo coverage are dropped.
//! - A centre of gravity over the heavy cluster cells gives curvature,
//!   azimuth and polar slope.
//!
//! Modules
//! - [`params`] – configuration knobs with trigger defaults.
//! - `pipeline` – the [`TrackFinder`] implementation.

pub mod params;
mod pipeline;

pub use params::FinderParams;
pub use pipeline::{FinderError, TrackFinder};
