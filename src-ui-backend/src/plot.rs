use crate::config::EditorConfig;
use crate::curve::{CurveSource, sample_curve};
use crate::handles::handle_positions;
use crate::scale::{FREQ_AXIS_MAX, FREQ_AXIS_MIN, Scale};
use eqgraph_iir::{FilterId, FilterSet};
use plotly::common::{Line, Marker, Mode, Title};
use plotly::layout::{Axis, AxisType};
use plotly::{Layout, Plot, Scatter};

const FILTER_COLORS: [&str; 6] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#9467bd", "#8c564b", "#e377c2",
];

fn filter_color(index: usize) -> &'static str {
    FILTER_COLORS[index % FILTER_COLORS.len()]
}

/// Render the curves of a filter set the way the interactive graph draws them:
/// one thin trace per filter, the summed response in black and, for the
/// selected filter, its three drag handles.
pub fn plot_filter_set(set: &FilterSet, selected: Option<FilterId>, config: &EditorConfig) -> Plot {
    let scales = config.scales();
    let mut plot = Plot::new();

    for (display_idx, (id, filter)) in set.iter().enumerate() {
        let (freqs, gains) =
            sample_curve(CurveSource::Single(filter), &scales.freq, config.sample_step_px)
                .into_arrays();
        let mut line = Line::new().color(filter_color(display_idx)).width(1.0);
        if Some(id) == selected {
            line = line.width(2.5);
        }
        let trace = Scatter::new(freqs.to_vec(), gains.to_vec())
            .mode(Mode::Lines)
            .name(format!("{} {}", filter.short_name(), id))
            .line(line);
        plot.add_trace(trace);
    }

    let (freqs, gains) = sample_curve(CurveSource::Total(set), &scales.freq, config.sample_step_px)
        .into_arrays();
    let total_trace = Scatter::new(freqs.to_vec(), gains.to_vec())
        .mode(Mode::Lines)
        .name("Sum")
        .line(Line::new().color("#000000").width(2.0));
    plot.add_trace(total_trace);

    let handles = selected
        .and_then(|id| set.get(id))
        .and_then(|filter| handle_positions(filter, &scales));
    if let Some(handles) = handles {
        // back to data space so the markers line up with the curves
        let points = [handles.q_left, handles.main, handles.q_right];
        let xs: Vec<f64> = points.iter().map(|p| scales.freq.invert(p.x)).collect();
        let ys: Vec<f64> = points.iter().map(|p| scales.gain.invert(p.y)).collect();
        let handle_trace = Scatter::new(xs, ys)
            .mode(Mode::Markers)
            .name("Handles")
            .marker(Marker::new().color("#d62728").size(10));
        plot.add_trace(handle_trace);
    }

    let layout = Layout::new()
        .width(config.width_px.round() as usize)
        .height(config.height_px.round() as usize)
        .x_axis(
            Axis::new()
                .title(Title::with_text("Frequency (Hz)"))
                .type_(AxisType::Log)
                .range(vec![FREQ_AXIS_MIN.log10(), FREQ_AXIS_MAX.log10()]),
        )
        .y_axis(
            Axis::new()
                .title(Title::with_text("Gain (dB)"))
                .range(vec![-config.gain_range_db, config.gain_range_db]),
        );
    plot.set_layout(layout);
    plot
}
