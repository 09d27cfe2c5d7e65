// ============================================================================
// EQ Graph Editor
// ============================================================================
//
// The editor keeps its own working copy of the filter set. During a drag the
// working copy changes on every pointer move and is what gets drawn; the
// external (committed) state only receives throttled writes through a
// FilterSink, plus one forced write when the drag ends.

use crate::config::EditorConfig;
use crate::curve::{CurveSamples, CurveSource, sample_curve};
use crate::error::{EditorError, EditorResult};
use crate::handles::{HandleKind, HandlePositions, ScreenPoint, apply_drag, handle_positions};
use crate::scale::{GraphScales, LogScale};
use crate::throttle::UpdateThrottle;
use eqgraph_iir::{Filter, FilterId, FilterSet};
use std::time::Instant;

/// Receiver of filter updates: the authoritative, external filter state.
pub trait FilterSink {
    fn write_filter(&mut self, id: FilterId, filter: &Filter);
}

impl FilterSink for FilterSet {
    fn write_filter(&mut self, id: FilterId, filter: &Filter) {
        if self.replace(id, *filter).is_none() {
            log::warn!("dropping update for unknown filter {}", id);
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveDrag {
    id: FilterId,
    handle: HandleKind,
}

/// Interactive editing state for one filter set
#[derive(Debug, Clone)]
pub struct Editor {
    /// Working copy, drawn on screen
    working: FilterSet,
    selected: Option<FilterId>,
    scales: GraphScales,
    sample_step_px: f64,
    throttle: UpdateThrottle,
    drag: Option<ActiveDrag>,
}

impl Editor {
    /// Create an editor over a copy of `committed`.
    pub fn new(committed: &FilterSet, config: &EditorConfig) -> Self {
        Self {
            working: committed.clone(),
            selected: None,
            scales: config.scales(),
            sample_step_px: config.sample_step_px,
            throttle: UpdateThrottle::new(config.throttle_interval()),
            drag: None,
        }
    }

    pub fn working(&self) -> &FilterSet {
        &self.working
    }

    pub fn scales(&self) -> &GraphScales {
        &self.scales
    }

    /// Replace the axes, e.g. after the graph was resized. Axes that cannot
    /// map pixels back to values are refused and the current ones are kept.
    pub fn set_scales(&mut self, scales: GraphScales) -> EditorResult<()> {
        scales.validate()?;
        self.scales = scales;
        Ok(())
    }

    pub fn selected(&self) -> Option<FilterId> {
        self.selected
    }

    pub fn selected_filter(&self) -> Option<&Filter> {
        self.selected.and_then(|id| self.working.get(id))
    }

    pub fn select(&mut self, id: FilterId) -> EditorResult<()> {
        if !self.working.contains(id) {
            return Err(EditorError::UnknownFilter(id));
        }
        self.selected = Some(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Handles of the selected filter, if it has any.
    pub fn handle_positions(&self) -> Option<HandlePositions> {
        handle_positions(self.selected_filter()?, &self.scales)
    }

    /// Summed response of the working copy.
    pub fn total_curve(&self) -> CurveSamples<'_, LogScale> {
        sample_curve(
            CurveSource::Total(&self.working),
            &self.scales.freq,
            self.sample_step_px,
        )
    }

    /// Response of the selected filter alone.
    pub fn selected_curve(&self) -> Option<CurveSamples<'_, LogScale>> {
        let filter = self.selected_filter()?;
        Some(sample_curve(
            CurveSource::Single(filter),
            &self.scales.freq,
            self.sample_step_px,
        ))
    }

    /// Start dragging `handle` of the selected filter.
    pub fn begin_drag(&mut self, handle: HandleKind) -> EditorResult<()> {
        if self.drag.is_some() {
            return Err(EditorError::DragInProgress);
        }
        let id = self.selected.ok_or(EditorError::NoSelection)?;
        let filter = self.working.get(id).ok_or(EditorError::UnknownFilter(id))?;
        if !filter.has_handles() {
            return Err(EditorError::NotDraggable(id));
        }
        log::debug!("begin {:?} drag on {} ({})", handle, id, filter);
        self.throttle.reset();
        self.drag = Some(ActiveDrag { id, handle });
        Ok(())
    }

    /// Move the dragged handle to `position`.
    ///
    /// The working copy is always updated. The new filter is written to `sink`
    /// only when the throttle lets it through.
    pub fn drag_to<S: FilterSink + ?Sized>(
        &mut self,
        position: ScreenPoint,
        now: Instant,
        sink: &mut S,
    ) -> EditorResult<Filter> {
        let drag = self.drag.ok_or(EditorError::NoActiveDrag)?;
        let slot = self
            .working
            .get_mut(drag.id)
            .ok_or(EditorError::UnknownFilter(drag.id))?;
        let updated = apply_drag(slot, drag.handle, position, &self.scales);
        *slot = updated;

        if self.throttle.try_acquire(now) {
            log::debug!("propagating {} = {}", drag.id, updated);
            sink.write_filter(drag.id, &updated);
        }
        Ok(updated)
    }

    /// Finish the drag and reconcile: the final filter is always written.
    pub fn end_drag<S: FilterSink + ?Sized>(&mut self, sink: &mut S) -> EditorResult<Filter> {
        let drag = self.drag.take().ok_or(EditorError::NoActiveDrag)?;
        self.throttle.reset();
        let filter = *self
            .working
            .get(drag.id)
            .ok_or(EditorError::UnknownFilter(drag.id))?;
        log::debug!("end {:?} drag on {}: {}", drag.handle, drag.id, filter);
        sink.write_filter(drag.id, &filter);
        Ok(filter)
    }

    /// Edit a filter outside of a drag (e.g. typed coefficients). Both copies
    /// are updated at once.
    pub fn set_filter<S: FilterSink + ?Sized>(
        &mut self,
        id: FilterId,
        filter: Filter,
        sink: &mut S,
    ) -> EditorResult<()> {
        if self.drag.is_some() {
            return Err(EditorError::DragInProgress);
        }
        if self.working.replace(id, filter).is_none() {
            return Err(EditorError::UnknownFilter(id));
        }
        sink.write_filter(id, &filter);
        Ok(())
    }

    /// Refresh the working copy from the external state. The selection is kept
    /// when the selected filter still exists.
    pub fn sync_from(&mut self, committed: &FilterSet) -> EditorResult<()> {
        if self.drag.is_some() {
            return Err(EditorError::DragInProgress);
        }
        self.working = committed.clone();
        if self.selected.is_some_and(|id| !self.working.contains(id)) {
            self.selected = None;
        }
        Ok(())
    }
}
