//! Pixel transforms for the graph axes.
//!
//! Frequency runs along a log axis, gain along a linear one. The UI may plug
//! in its own transforms through [`Scale`].

use crate::error::{EditorError, EditorResult};

/// Lowest frequency shown on the graph in Hz
pub const FREQ_AXIS_MIN: f64 = 10.0;
/// Highest frequency shown on the graph in Hz
pub const FREQ_AXIS_MAX: f64 = 20000.0;

/// A monotonic transform between data values and pixels.
pub trait Scale {
    /// Data value to pixel.
    fn forward(&self, value: f64) -> f64;

    /// Pixel to data value.
    fn invert(&self, px: f64) -> f64;

    /// Pixel range `(start, end)` covered by the domain.
    fn range(&self) -> (f64, f64);
}

/// Logarithmic scale. Both domain bounds must be strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LogScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// 10 Hz to 20 kHz over `[0, width_px]`.
    pub fn frequency_axis(width_px: f64) -> Self {
        Self::new((FREQ_AXIS_MIN, FREQ_AXIS_MAX), (0.0, width_px))
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }
}

impl Scale for LogScale {
    fn forward(&self, value: f64) -> f64 {
        let (d0, d1) = (self.domain.0.log10(), self.domain.1.log10());
        let t = (value.log10() - d0) / (d1 - d0);
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = (self.domain.0.log10(), self.domain.1.log10());
        let t = (px - self.range.0) / (self.range.1 - self.range.0);
        10f64.powf(d0 + t * (d1 - d0))
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// Linear scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// `[-range_db, range_db]` over `[height_px, 0]`: positive gain is drawn upwards.
    pub fn gain_axis(height_px: f64, range_db: f64) -> Self {
        Self::new((-range_db, range_db), (height_px, 0.0))
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }
}

impl Scale for LinearScale {
    fn forward(&self, value: f64) -> f64 {
        let t = (value - self.domain.0) / (self.domain.1 - self.domain.0);
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    fn invert(&self, px: f64) -> f64 {
        let t = (px - self.range.0) / (self.range.1 - self.range.0);
        self.domain.0 + t * (self.domain.1 - self.domain.0)
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// The two axes of the EQ graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphScales<F: Scale = LogScale, G: Scale = LinearScale> {
    /// Frequency (Hz) on the horizontal axis
    pub freq: F,
    /// Gain (dB) on the vertical axis
    pub gain: G,
}

impl GraphScales {
    pub fn new(width_px: f64, height_px: f64, gain_range_db: f64) -> Self {
        Self {
            freq: LogScale::frequency_axis(width_px),
            gain: LinearScale::gain_axis(height_px, gain_range_db),
        }
    }
}

impl<F: Scale, G: Scale> GraphScales<F, G> {
    /// Both axes must cover a non-empty, finite pixel range and invert to
    /// finite values at its ends. A zero-sized graph fails this check.
    pub fn validate(&self) -> EditorResult<()> {
        check_axis("frequency", &self.freq)?;
        check_axis("gain", &self.gain)
    }
}

fn check_axis<S: Scale>(name: &'static str, scale: &S) -> EditorResult<()> {
    let (r0, r1) = scale.range();
    let extent = r1 - r0;
    let usable = extent.is_finite()
        && extent != 0.0
        && scale.invert(r0).is_finite()
        && scale.invert(r1).is_finite();
    if usable {
        Ok(())
    } else {
        Err(EditorError::DegenerateAxis(name))
    }
}
