use crate::hits::Orientation;
use std::path::PathBuf;

/// Reasons a pattern table cannot be loaded or expanded.
///
/// Every variant is fatal: the finder cannot start without both tables.
#[derive(Debug)]
pub enum PatternLoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        token_index: usize,
        token: String,
    },
    CountMismatch {
        orientation: Orientation,
        expected: usize,
        found: usize,
    },
    RunOverflow {
        orientation: Orientation,
        identity: usize,
        priority: usize,
        curvature: usize,
        polar: usize,
        length: usize,
        capacity: usize,
    },
    WindowOverflow {
        orientation: Orientation,
        identity: usize,
        priority: usize,
        curvature: usize,
        polar: usize,
        end: usize,
        window: usize,
    },
    WeightOverflow {
        orientation: Orientation,
        identity: usize,
        value: u16,
    },
    Geometry(String),
}

impl std::fmt::Display for PatternLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternLoadError::Io { path, source } => {
                write!(f, "failed to read pattern file {}: {source}", path.display())
            }
            PatternLoadError::Parse { token_index, token } => {
                write!(f, "token {token_index} ({token:?}) is not an unsigned 16-bit integer")
            }
            PatternLoadError::CountMismatch {
                orientation,
                expected,
                found,
            } => write!(
                f,
                "{orientation:?} pattern table holds {found} values, expected {expected}"
            ),
            PatternLoadError::RunOverflow {
                orientation,
                identity,
                priority,
                curvature,
                polar,
                length,
                capacity,
            } => write!(
                f,
                "{orientation:?} run (id {identity}, prio {priority}, curvature {curvature}, \
                 polar {polar}) declares {length} weights but only {capacity} slots exist"
            ),
            PatternLoadError::WindowOverflow {
                orientation,
                identity,
                priority,
                curvature,
                polar,
                end,
                window,
            } => write!(
                f,
                "{orientation:?} run (id {identity}, prio {priority}, curvature {curvature}, \
                 polar {polar}) ends at {end}, beyond the {window}-bin window"
            ),
            PatternLoadError::WeightOverflow {
                orientation,
                identity,
                value,
            } => write!(
                f,
                "{orientation:?} curve {identity} carries weight {value} above {}",
                u8::MAX
            ),
            PatternLoadError::Geometry(msg) => write!(f, "invalid geometry: {msg}"),
        }
    }
}

impl std::error::Error for PatternLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PatternLoadError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
