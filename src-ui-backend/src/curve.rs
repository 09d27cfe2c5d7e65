// ============================================================================
// Curve Sampling
// ============================================================================
//
// Produces the (frequency, gain) points of a response curve, one every few
// pixels along the frequency axis. Curves are resampled on every redraw.

use crate::scale::Scale;
use eqgraph_iir::{Filter, FilterSet, gain_at, total_gain_at};
use ndarray::Array1;
use serde::Serialize;

/// Default horizontal distance between two samples, in pixels
pub const DEFAULT_SAMPLE_STEP_PX: f64 = 2.0;

/// One point of a response curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplePoint {
    /// Frequency in Hz
    pub freq: f64,
    /// Gain in dB
    pub gain: f64,
}

/// What a curve shows: the sum of a whole set, or one filter
#[derive(Debug, Clone, Copy)]
pub enum CurveSource<'a> {
    Total(&'a FilterSet),
    Single(&'a Filter),
}

impl CurveSource<'_> {
    pub fn gain_at(&self, freq: f64) -> f64 {
        match self {
            CurveSource::Total(set) => total_gain_at(set, freq),
            CurveSource::Single(filter) => gain_at(filter, freq),
        }
    }
}

/// Lazy sequence of curve samples.
///
/// Finite and exact-sized. Clone it (or call [`CurveSamples::restart`]) to walk
/// the curve again; every pass re-evaluates the filters.
#[derive(Debug, Clone)]
pub struct CurveSamples<'a, S: Scale> {
    source: CurveSource<'a>,
    scale: &'a S,
    start_px: f64,
    step_px: f64,
    index: usize,
    count: usize,
}

/// Samples `source` along the pixel range of `scale`, every `step_px` pixels.
///
/// The first sample sits at the start of the range, the last one at the end of
/// the range when it falls on a step. A step that is not a positive finite
/// number is replaced by [`DEFAULT_SAMPLE_STEP_PX`].
pub fn sample_curve<'a, S: Scale>(
    source: CurveSource<'a>,
    scale: &'a S,
    step_px: f64,
) -> CurveSamples<'a, S> {
    let step_px = if step_px.is_finite() && step_px > 0.0 {
        step_px
    } else {
        DEFAULT_SAMPLE_STEP_PX
    };
    let (r0, r1) = scale.range();
    let (start_px, end_px) = (r0.min(r1), r0.max(r1));
    // tolerate rounding so that the end of the range is not lost
    let count = (((end_px - start_px) / step_px + 1e-9).floor() as usize).saturating_add(1);

    CurveSamples {
        source,
        scale,
        start_px,
        step_px,
        index: 0,
        count,
    }
}

impl<S: Scale> CurveSamples<'_, S> {
    /// Rewind to the first sample.
    pub fn restart(&mut self) {
        self.index = 0;
    }

    /// Collects the remaining samples into frequency and gain arrays.
    pub fn into_arrays(self) -> (Array1<f64>, Array1<f64>) {
        let (freqs, gains): (Vec<f64>, Vec<f64>) = self.map(|p| (p.freq, p.gain)).unzip();
        (Array1::from(freqs), Array1::from(gains))
    }
}

impl<S: Scale> Iterator for CurveSamples<'_, S> {
    type Item = SamplePoint;

    fn next(&mut self) -> Option<SamplePoint> {
        if self.index >= self.count {
            return None;
        }
        let px = self.start_px + self.index as f64 * self.step_px;
        self.index += 1;
        let freq = self.scale.invert(px);
        Some(SamplePoint {
            freq,
            gain: self.source.gain_at(freq),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl<S: Scale> ExactSizeIterator for CurveSamples<'_, S> {}
