//! Per-event trigger-segment hit records.

use serde::{Deserialize, Serialize};

/// Wire orientation class of a trigger segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Axial,
    Stereo,
}

impl Orientation {
    /// Even super layers are axial, odd ones stereo.
    #[inline]
    pub fn of_super_layer(super_layer: usize) -> Self {
        if super_layer % 2 == 0 {
            Orientation::Axial
        } else {
            Orientation::Stereo
        }
    }
}

/// Which wire of the segment fired first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityPosition {
    #[default]
    None,
    First,
    Left,
    Right,
}

impl PriorityPosition {
    /// Decodes the read-out code (`0` none, `1` right, `2` left, `3` first).
    pub fn from_raw(code: u8) -> Self {
        match code {
            3 => PriorityPosition::First,
            2 => PriorityPosition::Left,
            1 => PriorityPosition::Right,
            _ => PriorityPosition::None,
        }
    }

    /// Index of the pattern curve belonging to this wire, `None` when the
    /// segment carries no usable curve.
    #[inline]
    pub fn curve_slot(self) -> Option<usize> {
        match self {
            PriorityPosition::None => None,
            PriorityPosition::First => Some(0),
            PriorityPosition::Left => Some(1),
            PriorityPosition::Right => Some(2),
        }
    }
}

/// One trigger-segment activation within the event time window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitRecord {
    pub global_id: usize,
    pub super_layer: usize,
    #[serde(default)]
    pub priority: PriorityPosition,
    pub drift_time: i64,
}

impl HitRecord {
    pub fn new(
        global_id: usize,
        super_layer: usize,
        priority: PriorityPosition,
        drift_time: i64,
    ) -> Self {
        Self {
            global_id,
            super_layer,
            priority,
            drift_time,
        }
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        Orientation::of_super_layer(self.super_layer)
    }
}
