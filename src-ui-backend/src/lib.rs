pub mod config;
pub use config::{CONFIG_ENV_VAR, EditorConfig};

pub mod error;
pub use error::{EditorError, EditorResult};

pub mod scale;
pub use scale::{GraphScales, LinearScale, LogScale, Scale};

pub mod curve;
pub use curve::{CurveSamples, CurveSource, DEFAULT_SAMPLE_STEP_PX, SamplePoint, sample_curve};

pub mod handles;
pub use handles::{HandleKind, HandlePositions, ScreenPoint, apply_drag, handle_positions};

pub mod throttle;
pub use throttle::{DEFAULT_THROTTLE_INTERVAL, UpdateThrottle};

pub mod editor;
pub use editor::{Editor, FilterSink};

pub mod plot;
pub use plot::plot_filter_set;

// Re-export the response model so UI code only needs this crate
pub use eqgraph_iir::{Filter, FilterId, FilterSet, gain_at, preamp_gain, total_gain_at};
