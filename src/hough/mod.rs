//! Hough accumulator and its per-event builder.
//!
//! - [`HoughSpace`] – dense (curvature × azimuth × polar) weight array.
//! - [`HoughSpaceBuilder`] – zeroes the space per event and adds one
//!   pattern curve per hit at the hit's sector offset.

mod builder;
mod space;

pub use builder::HoughSpaceBuilder;
pub use space::{CellIndex, HoughSpace};
