#![doc = include_str!("../README.md")]

use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt;

// Constants
/// Sample rate used to evaluate custom biquad coefficients
pub const SRATE: f64 = 48000.0;

/// Lowest editable center frequency in Hz
pub const MIN_FREQ: f64 = 20.0;
/// Highest editable center frequency in Hz
pub const MAX_FREQ: f64 = 20000.0;
/// Lowest editable gain in dB
pub const MIN_DB: f64 = -25.0;
/// Highest editable gain in dB
pub const MAX_DB: f64 = 25.0;
/// Lowest editable Q
pub const MIN_Q: f64 = 0.1;
/// Highest editable Q
pub const MAX_Q: f64 = 20.0;

/// Gain reported for a custom filter whose magnitude is exactly zero.
/// Finite so that curves stay plottable.
pub const SILENCE_DB: f64 = -200.0;

/// Gain reported for a custom filter with a pole on the unit circle
pub const RESONANCE_DB: f64 = 200.0;

/// Shelf sigmoid steepness per unit of Q (in decades)
const SHELF_STEEPNESS: f64 = 5.0;

/// Clamp a frequency into [`MIN_FREQ`], [`MAX_FREQ`].
pub fn clamp_freq(hz: f64) -> f64 {
    hz.clamp(MIN_FREQ, MAX_FREQ)
}

/// Clamp a gain into [`MIN_DB`], [`MAX_DB`].
pub fn clamp_db(db: f64) -> f64 {
    db.clamp(MIN_DB, MAX_DB)
}

/// Clamp a Q into [`MIN_Q`], [`MAX_Q`].
pub fn clamp_q(q: f64) -> f64 {
    q.clamp(MIN_Q, MAX_Q)
}

/// One equalizer filter.
///
/// Serialized with an internal `type` tag (`peaking`, `lowshelf`, `highshelf`,
/// `custom`). Any other tag deserializes to [`Filter::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Filter {
    /// Bell boost/cut around `hz`
    Peaking {
        /// Center frequency in Hz
        hz: f64,
        /// Gain in dB
        db: f64,
        /// Q factor
        q: f64,
    },
    /// Boost/cut below `hz`
    LowShelf {
        /// Corner frequency in Hz
        hz: f64,
        /// Gain in dB
        db: f64,
        /// Q factor (transition steepness)
        q: f64,
    },
    /// Boost/cut above `hz`
    HighShelf {
        /// Corner frequency in Hz
        hz: f64,
        /// Gain in dB
        db: f64,
        /// Q factor (transition steepness)
        q: f64,
    },
    /// Normalized biquad coefficients (a0 is 1)
    Custom {
        b0: f64,
        b1: f64,
        b2: f64,
        a1: f64,
        a2: f64,
    },
    /// Unrecognized filter type
    #[serde(other)]
    Unknown,
}

impl Filter {
    /// Returns the short string representation of the filter type (e.g., "PK").
    pub fn short_name(&self) -> &'static str {
        match self {
            Filter::Peaking { .. } => "PK",
            Filter::LowShelf { .. } => "LS",
            Filter::HighShelf { .. } => "HS",
            Filter::Custom { .. } => "BQ",
            Filter::Unknown => "??",
        }
    }

    /// Returns the long string representation of the filter type (e.g., "Peaking").
    pub fn long_name(&self) -> &'static str {
        match self {
            Filter::Peaking { .. } => "Peaking",
            Filter::LowShelf { .. } => "LowShelf",
            Filter::HighShelf { .. } => "HighShelf",
            Filter::Custom { .. } => "Custom",
            Filter::Unknown => "Unknown",
        }
    }

    /// `(hz, db, q)` for the parametric shapes, `None` for custom and unknown filters.
    pub fn params(&self) -> Option<(f64, f64, f64)> {
        match *self {
            Filter::Peaking { hz, db, q }
            | Filter::LowShelf { hz, db, q }
            | Filter::HighShelf { hz, db, q } => Some((hz, db, q)),
            Filter::Custom { .. } | Filter::Unknown => None,
        }
    }

    /// True for shapes that can be edited by dragging on the graph.
    pub fn has_handles(&self) -> bool {
        self.params().is_some()
    }

    /// True for the shelf shapes, whose displayed gain is halved.
    pub fn is_shelf(&self) -> bool {
        matches!(self, Filter::LowShelf { .. } | Filter::HighShelf { .. })
    }

    /// Same shape with new `(hz, db, q)`. Custom and unknown filters are returned as is.
    pub fn with_params(&self, hz: f64, db: f64, q: f64) -> Filter {
        match self {
            Filter::Peaking { .. } => Filter::Peaking { hz, db, q },
            Filter::LowShelf { .. } => Filter::LowShelf { hz, db, q },
            Filter::HighShelf { .. } => Filter::HighShelf { hz, db, q },
            Filter::Custom { .. } | Filter::Unknown => *self,
        }
    }

    /// Gain in dB at `freq`. See [`gain_at`].
    pub fn gain(&self, freq: f64) -> f64 {
        gain_at(self, freq)
    }

    /// Vectorized version of [`Filter::gain`] over a frequency grid.
    pub fn np_gain(&self, freqs: &Array1<f64>) -> Array1<f64> {
        freqs.mapv(|f| gain_at(self, f))
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Peaking { hz, db, q }
            | Filter::LowShelf { hz, db, q }
            | Filter::HighShelf { hz, db, q } => write!(
                f,
                "Type:{},Freq:{:.1},Q:{:.2},Gain:{:.1}",
                self.short_name(),
                hz,
                q,
                db
            ),
            Filter::Custom { b0, b1, b2, a1, a2 } => write!(
                f,
                "Type:{},b0:{},b1:{},b2:{},a1:{},a2:{}",
                self.short_name(),
                b0,
                b1,
                b2,
                a1,
                a2
            ),
            Filter::Unknown => write!(f, "Type:{}", self.short_name()),
        }
    }
}

/// Computes the gain in dB of `filter` at `freq` (Hz).
///
/// Peaking and shelf shapes are smooth visual models, custom filters are
/// evaluated as a biquad on the unit circle at [`SRATE`].
pub fn gain_at(filter: &Filter, freq: f64) -> f64 {
    match *filter {
        Filter::Peaking { hz, db, q } => peaking_gain(freq, hz, db, q),
        Filter::LowShelf { hz, db, q } => db * (1.0 / (1.0 + shelf_position(freq, hz, q).exp())),
        Filter::HighShelf { hz, db, q } => {
            db * (1.0 / (1.0 + (-shelf_position(freq, hz, q)).exp()))
        }
        Filter::Custom { b0, b1, b2, a1, a2 } => biquad_gain(freq, b0, b1, b2, a1, a2),
        Filter::Unknown => 0.0,
    }
}

fn peaking_gain(freq: f64, hz: f64, db: f64, q: f64) -> f64 {
    if q <= 0.0 {
        return 0.0;
    }
    let x = (freq / hz).log2() * q;
    let gain = db / (1.0 + 4.0 * x * x);
    // never cross the 0 dB baseline
    if db > 0.0 { gain.max(0.0) } else { gain.min(0.0) }
}

/// Distance from the corner in decades, scaled by the shelf steepness.
fn shelf_position(freq: f64, hz: f64, q: f64) -> f64 {
    (freq.log10() - hz.log10()) * (q * SHELF_STEEPNESS)
}

fn biquad_gain(freq: f64, b0: f64, b1: f64, b2: f64, a1: f64, a2: f64) -> f64 {
    let w = 2.0 * PI * freq / SRATE;
    let z1 = Complex64::from_polar(1.0, -w);
    let z2 = Complex64::from_polar(1.0, -2.0 * w);

    let numerator = Complex64::new(b0, 0.0) + z1 * b1 + z2 * b2;
    let denominator = Complex64::new(1.0, 0.0) + z1 * a1 + z2 * a2;

    let magnitude = numerator.norm() / denominator.norm();
    if magnitude.is_nan() || magnitude <= 0.0 {
        return SILENCE_DB;
    }
    (20.0 * magnitude.log10()).min(RESONANCE_DB)
}

/// Stable identifier of a filter inside a [`FilterSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterId(pub u32);

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ordered mapping from [`FilterId`] to [`Filter`].
///
/// Ids are handed out in increasing order, so iteration follows insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    filters: BTreeMap<FilterId, Filter>,
    next_id: u32,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter and returns its freshly allocated id.
    pub fn insert(&mut self, filter: Filter) -> FilterId {
        let id = FilterId(self.next_id);
        self.next_id += 1;
        self.filters.insert(id, filter);
        id
    }

    /// Adds a filter under a caller-chosen id, returning the filter it replaced.
    pub fn insert_with_id(&mut self, id: FilterId, filter: Filter) -> Option<Filter> {
        self.next_id = self.next_id.max(id.0.saturating_add(1));
        self.filters.insert(id, filter)
    }

    pub fn get(&self, id: FilterId) -> Option<&Filter> {
        self.filters.get(&id)
    }

    pub fn get_mut(&mut self, id: FilterId) -> Option<&mut Filter> {
        self.filters.get_mut(&id)
    }

    /// Replaces the filter stored under `id`. Returns the previous filter, or
    /// `None` (and stores nothing) when `id` is unknown.
    pub fn replace(&mut self, id: FilterId, filter: Filter) -> Option<Filter> {
        self.filters
            .get_mut(&id)
            .map(|slot| std::mem::replace(slot, filter))
    }

    pub fn remove(&mut self, id: FilterId) -> Option<Filter> {
        self.filters.remove(&id)
    }

    pub fn contains(&self, id: FilterId) -> bool {
        self.filters.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Iterates `(id, filter)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (FilterId, &Filter)> + '_ {
        self.filters.iter().map(|(id, filter)| (*id, filter))
    }

    pub fn ids(&self) -> impl Iterator<Item = FilterId> + '_ {
        self.filters.keys().copied()
    }

    pub fn filters(&self) -> impl Iterator<Item = &Filter> + '_ {
        self.filters.values()
    }

    /// Total gain in dB at `freq`. See [`total_gain_at`].
    pub fn total_gain(&self, freq: f64) -> f64 {
        total_gain_at(self, freq)
    }

    /// Vectorized version of [`FilterSet::total_gain`] over a frequency grid.
    pub fn np_total_gain(&self, freqs: &Array1<f64>) -> Array1<f64> {
        let mut response = Array1::zeros(freqs.len());
        for filter in self.filters() {
            response += &filter.np_gain(freqs);
        }
        response
    }
}

impl FromIterator<Filter> for FilterSet {
    fn from_iter<I: IntoIterator<Item = Filter>>(iter: I) -> Self {
        let mut set = FilterSet::new();
        for filter in iter {
            set.insert(filter);
        }
        set
    }
}

/// Sum of the per-filter gains (in dB) at `freq`.
///
/// Gains are added in dB rather than multiplied as linear magnitudes. This is
/// the curve the graph shows.
pub fn total_gain_at(set: &FilterSet, freq: f64) -> f64 {
    set.filters().map(|filter| gain_at(filter, freq)).sum()
}

/// Compute preamp gain for a filter set
///
/// # Arguments
/// * `set` - Filters to evaluate
///
/// # Returns
/// * Preamp gain in dB (zero or negative, compensates the largest boost)
pub fn preamp_gain(set: &FilterSet) -> f64 {
    // Generate logarithmic frequency array from 20Hz to 20kHz with 200 points
    let freq = Array1::logspace(10.0, MIN_FREQ.log10(), MAX_FREQ.log10(), 200);
    let spl = set.np_total_gain(&freq);

    let overall = spl.iter().cloned().fold(0.0f64, |acc, x| acc.max(x));
    -overall
}
