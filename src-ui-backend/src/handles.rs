// ============================================================================
// Drag Handles
// ============================================================================
//
// Forward mapping: filter parameters -> handle positions on screen.
// Inverse mapping: dragged handle position -> new filter parameters.
//
// Each parametric filter has a main handle (frequency, gain) and two Q handles
// placed symmetrically around the center frequency in log space, at
// hz / sf and hz * sf with sf = 1 + 1/q.

use crate::scale::{GraphScales, Scale};
use eqgraph_iir::{Filter, clamp_db, clamp_freq, clamp_q};
use serde::{Deserialize, Serialize};

/// Lower bound of the symmetry factor while dragging a Q handle.
/// Keeps Q finite and positive when a handle crosses the center frequency.
pub const MIN_SYMMETRY_FACTOR: f64 = 1.001;

/// Which handle is being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleKind {
    /// Center frequency and gain
    Main,
    /// Q handle below the center frequency
    QLeft,
    /// Q handle above the center frequency
    QRight,
}

/// A position in graph pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Screen positions of the three handles of one filter
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandlePositions {
    pub main: ScreenPoint,
    pub q_left: ScreenPoint,
    pub q_right: ScreenPoint,
}

impl HandlePositions {
    pub fn get(&self, kind: HandleKind) -> ScreenPoint {
        match kind {
            HandleKind::Main => self.main,
            HandleKind::QLeft => self.q_left,
            HandleKind::QRight => self.q_right,
        }
    }
}

/// Spread factor between the center frequency and each Q handle.
pub fn symmetry_factor(q: f64) -> f64 {
    1.0 + 1.0 / q
}

/// Inverse of [`symmetry_factor`], with the factor floored at
/// [`MIN_SYMMETRY_FACTOR`] and the result clamped to the editable Q range.
pub fn q_from_symmetry_factor(factor: f64) -> f64 {
    let factor = factor.max(MIN_SYMMETRY_FACTOR);
    clamp_q(1.0 / (factor - 1.0))
}

/// Gain shown by the main handle.
///
/// Shelves display half their gain: the sigmoid crosses half of its asymptote
/// at the corner frequency, so the handle sits on the curve.
pub fn handle_gain(filter: &Filter) -> Option<f64> {
    let (_, db, _) = filter.params()?;
    Some(if filter.is_shelf() { db / 2.0 } else { db })
}

/// Forward mapping. `None` for filters without handles (custom, unknown).
pub fn handle_positions<F: Scale, G: Scale>(
    filter: &Filter,
    scales: &GraphScales<F, G>,
) -> Option<HandlePositions> {
    let (hz, _, q) = filter.params()?;
    let y = scales.gain.forward(handle_gain(filter)?);
    let factor = symmetry_factor(clamp_q(q));

    Some(HandlePositions {
        main: ScreenPoint::new(scales.freq.forward(hz), y),
        q_left: ScreenPoint::new(scales.freq.forward(hz / factor), y),
        q_right: ScreenPoint::new(scales.freq.forward(hz * factor), y),
    })
}

/// Inverse mapping: the filter after dragging `handle` to `position`.
///
/// Results are clamped into the editable ranges. The main handle moves
/// frequency and gain, Q handles only move Q so the center frequency stays
/// put. Filters without handles are returned unchanged.
pub fn apply_drag<F: Scale, G: Scale>(
    filter: &Filter,
    handle: HandleKind,
    position: ScreenPoint,
    scales: &GraphScales<F, G>,
) -> Filter {
    let Some((hz, db, q)) = filter.params() else {
        log::trace!("ignoring {:?} drag on {}", handle, filter);
        return *filter;
    };

    // a coordinate that does not map to a number leaves its parameter alone
    match handle {
        HandleKind::Main => {
            let raw_hz = scales.freq.invert(position.x);
            let new_hz = if raw_hz.is_nan() { hz } else { clamp_freq(raw_hz) };
            let raw_db = scales.gain.invert(position.y);
            let new_db = if raw_db.is_nan() {
                db
            } else if filter.is_shelf() {
                clamp_db(raw_db * 2.0)
            } else {
                clamp_db(raw_db)
            };
            filter.with_params(new_hz, new_db, q)
        }
        HandleKind::QLeft | HandleKind::QRight => {
            let handle_freq = scales.freq.invert(position.x);
            if handle_freq.is_nan() {
                return *filter;
            }
            let ratio = match handle {
                HandleKind::QLeft => hz / handle_freq,
                _ => handle_freq / hz,
            };
            filter.with_params(hz, db, q_from_symmetry_factor(ratio))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eqgraph_iir::{MAX_DB, MAX_FREQ, MAX_Q, MIN_DB, MIN_FREQ, MIN_Q};

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    fn scales() -> GraphScales {
        GraphScales::new(800.0, 400.0, 25.0)
    }

    #[test]
    fn q_handles_are_symmetric_in_log_frequency() {
        let s = scales();
        let pk = Filter::Peaking { hz: 1000.0, db: 6.0, q: 2.0 };
        let pos = handle_positions(&pk, &s).unwrap();
        assert!(approx_eq(s.freq.invert(pos.q_left.x), 1000.0 / 1.5, 1e-9));
        assert!(approx_eq(s.freq.invert(pos.q_right.x), 1500.0, 1e-9));
        assert!(approx_eq(pos.main.x - pos.q_left.x, pos.q_right.x - pos.main.x, 1e-9));
        assert_eq!(pos.q_left.y, pos.main.y);
        assert_eq!(pos.q_right.y, pos.main.y);
    }

    #[test]
    fn lower_q_spreads_handles_wider() {
        let s = scales();
        let narrow = Filter::Peaking { hz: 1000.0, db: 0.0, q: 4.0 };
        let wide = Filter::Peaking { hz: 1000.0, db: 0.0, q: 0.5 };
        let narrow = handle_positions(&narrow, &s).unwrap();
        let wide = handle_positions(&wide, &s).unwrap();
        assert!(wide.q_right.x - wide.q_left.x > narrow.q_right.x - narrow.q_left.x);
    }

    #[test]
    fn shelf_handle_shows_half_gain() {
        let s = scales();
        let ls = Filter::LowShelf { hz: 100.0, db: 10.0, q: 1.0 };
        let pk = Filter::Peaking { hz: 100.0, db: 5.0, q: 1.0 };
        assert_eq!(handle_gain(&ls), Some(5.0));
        assert_eq!(
            handle_positions(&ls, &s).unwrap().main,
            handle_positions(&pk, &s).unwrap().main
        );
    }

    #[test]
    fn custom_filters_have_no_handles() {
        let s = scales();
        let bq = Filter::Custom { b0: 1.0, b1: 0.0, b2: 0.0, a1: 0.0, a2: 0.0 };
        assert!(handle_positions(&bq, &s).is_none());
        assert!(handle_positions(&Filter::Unknown, &s).is_none());
        let moved = apply_drag(&bq, HandleKind::Main, ScreenPoint::new(10.0, 10.0), &s);
        assert_eq!(moved, bq);
    }

    #[test]
    fn main_drag_moves_frequency_and_gain() {
        let s = scales();
        let pk = Filter::Peaking { hz: 1000.0, db: 0.0, q: 3.0 };
        let target = ScreenPoint::new(s.freq.forward(250.0), s.gain.forward(-7.5));
        let moved = apply_drag(&pk, HandleKind::Main, target, &s);
        let (hz, db, q) = moved.params().unwrap();
        assert!(approx_eq(hz, 250.0, 1e-9));
        assert!(approx_eq(db, -7.5, 1e-9));
        assert_eq!(q, 3.0);
    }

    #[test]
    fn main_drag_on_shelf_doubles_gain() {
        let s = scales();
        let hs = Filter::HighShelf { hz: 5000.0, db: 0.0, q: 1.0 };
        let target = ScreenPoint::new(s.freq.forward(5000.0), s.gain.forward(4.0));
        let (_, db, _) = apply_drag(&hs, HandleKind::Main, target, &s).params().unwrap();
        assert!(approx_eq(db, 8.0, 1e-9));

        // +20 dB on screen would be +40 dB: clamped
        let target = ScreenPoint::new(s.freq.forward(5000.0), s.gain.forward(20.0));
        let (_, db, _) = apply_drag(&hs, HandleKind::Main, target, &s).params().unwrap();
        assert_eq!(db, MAX_DB);
    }

    #[test]
    fn main_drag_is_clamped() {
        let s = scales();
        let pk = Filter::Peaking { hz: 1000.0, db: 0.0, q: 1.0 };
        let far_left_top = ScreenPoint::new(-50.0, -1000.0);
        let (hz, db, _) = apply_drag(&pk, HandleKind::Main, far_left_top, &s).params().unwrap();
        assert_eq!(hz, MIN_FREQ);
        assert_eq!(db, MAX_DB);

        let far_right_bottom = ScreenPoint::new(2000.0, 5000.0);
        let (hz, db, _) = apply_drag(&pk, HandleKind::Main, far_right_bottom, &s)
            .params()
            .unwrap();
        assert_eq!(hz, MAX_FREQ);
        assert_eq!(db, MIN_DB);
    }

    #[test]
    fn q_drag_keeps_center_and_gain() {
        let s = scales();
        let pk = Filter::Peaking { hz: 1000.0, db: 6.0, q: 2.0 };
        let target = ScreenPoint::new(s.freq.forward(2000.0), 0.0);
        let moved = apply_drag(&pk, HandleKind::QRight, target, &s);
        let (hz, db, q) = moved.params().unwrap();
        assert_eq!(hz, 1000.0);
        assert_eq!(db, 6.0);
        assert!(approx_eq(q, 1.0, 1e-9));

        let target = ScreenPoint::new(s.freq.forward(500.0), 0.0);
        let (_, _, q) = apply_drag(&pk, HandleKind::QLeft, target, &s).params().unwrap();
        assert!(approx_eq(q, 1.0, 1e-9));
    }

    #[test]
    fn q_drag_across_center_is_clamped() {
        let s = scales();
        let pk = Filter::Peaking { hz: 1000.0, db: 6.0, q: 2.0 };
        // right handle dragged below the center frequency
        let target = ScreenPoint::new(s.freq.forward(400.0), 0.0);
        let (_, _, q) = apply_drag(&pk, HandleKind::QRight, target, &s).params().unwrap();
        assert_eq!(q, MAX_Q);
        // left handle dragged very far away
        let target = ScreenPoint::new(s.freq.forward(10.0), 0.0);
        let (_, _, q) = apply_drag(&pk, HandleKind::QLeft, target, &s).params().unwrap();
        assert_eq!(q, MIN_Q);
    }

    #[test]
    fn nan_position_keeps_parameters() {
        let s = scales();
        let pk = Filter::Peaking { hz: 1000.0, db: 6.0, q: 2.0 };
        for kind in [HandleKind::Main, HandleKind::QLeft, HandleKind::QRight] {
            let moved = apply_drag(&pk, kind, ScreenPoint::new(f64::NAN, f64::NAN), &s);
            assert_eq!(moved, pk, "{:?}", kind);
        }

        // only the gain coordinate is unusable
        let target = ScreenPoint::new(s.freq.forward(250.0), f64::NAN);
        let (hz, db, _) = apply_drag(&pk, HandleKind::Main, target, &s).params().unwrap();
        assert!(approx_eq(hz, 250.0, 1e-9));
        assert_eq!(db, 6.0);
    }

    #[test]
    fn infinite_position_is_clamped() {
        let s = scales();
        let ls = Filter::LowShelf { hz: 100.0, db: 0.0, q: 1.0 };
        let target = ScreenPoint::new(f64::INFINITY, f64::NEG_INFINITY);
        let (hz, db, q) = apply_drag(&ls, HandleKind::Main, target, &s).params().unwrap();
        assert_eq!(hz, MAX_FREQ);
        assert_eq!(db, MAX_DB);
        assert_eq!(q, 1.0);
    }

    #[test]
    fn q_from_factor_bounds() {
        assert_eq!(q_from_symmetry_factor(1.0), MAX_Q);
        assert_eq!(q_from_symmetry_factor(0.5), MAX_Q);
        assert_eq!(q_from_symmetry_factor(1000.0), MIN_Q);
        assert!(approx_eq(q_from_symmetry_factor(symmetry_factor(0.707)), 0.707, 1e-12));
    }
}
