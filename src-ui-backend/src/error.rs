// ============================================================================
// Error Types
// ============================================================================

use eqgraph_iir::FilterId;
use std::path::PathBuf;

/// Errors raised by the editor state and configuration loading.
///
/// Response math and drag mapping never fail: out-of-range results are clamped.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("no filter with id {0}")]
    UnknownFilter(FilterId),

    #[error("no filter is selected")]
    NoSelection,

    #[error("filter {0} has no drag handles")]
    NotDraggable(FilterId),

    #[error("no drag in progress")]
    NoActiveDrag,

    #[error("a drag is already in progress")]
    DragInProgress,

    #[error("the {0} axis does not map onto a usable pixel range")]
    DegenerateAxis(&'static str),

    #[error("failed to read config file {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type EditorResult<T> = Result<T, EditorError>;
