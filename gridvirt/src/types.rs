use alloc::vec::Vec;
use core::fmt;

use crate::PaneDiff;

/// Identity of a column, supplied by the caller and mixed into band hashes.
pub type ColumnKey = u64;

/// One row of the caller's (already sorted/filtered/expanded) data model.
///
/// `node_id` must be unique within a row table and `height` must be finite and positive.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowMetric {
    pub node_id: u32,
    pub height: f32,
}

impl RowMetric {
    pub fn new(node_id: u32, height: f32) -> Self {
        Self { node_id, height }
    }
}

/// An opaque per-row render resource handle.
///
/// Ids are issued monotonically by the planner and never reissued once evicted.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BufferId(pub u32);

impl BufferId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BufferId({})", self.0)
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Viewport geometry for one render tick.
///
/// Row values drive the row window; column values drive [`ColumnWindow`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportMetrics {
    pub row_scroll_offset: f32,
    pub row_viewport_height: f32,
    pub row_overscan: f32,
    pub column_scroll_offset: f32,
    pub column_viewport_width: f32,
    pub column_overscan: f32,
}

impl ViewportMetrics {
    pub fn new(
        row_scroll_offset: f32,
        row_viewport_height: f32,
        row_overscan: f32,
        column_scroll_offset: f32,
        column_viewport_width: f32,
        column_overscan: f32,
    ) -> Self {
        Self {
            row_scroll_offset,
            row_viewport_height,
            row_overscan,
            column_scroll_offset,
            column_viewport_width,
            column_overscan,
        }
    }

    /// Replaces NaN, infinite and negative values with `0`.
    ///
    /// A bad frame must never reach the allocator, so this is applied by `plan` before any
    /// window math.
    pub fn sanitized(self) -> Self {
        Self {
            row_scroll_offset: non_negative(self.row_scroll_offset),
            row_viewport_height: non_negative(self.row_viewport_height),
            row_overscan: non_negative(self.row_overscan),
            column_scroll_offset: non_negative(self.column_scroll_offset),
            column_viewport_width: non_negative(self.column_viewport_width),
            column_overscan: non_negative(self.column_overscan),
        }
    }
}

fn non_negative(v: f32) -> f32 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

/// Half-open range of row indexes materialized for the current viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowWindow {
    pub start_index: usize,
    pub end_index: usize, // exclusive
    /// Sum of all row heights in the table (not just the window).
    pub total_height: f64,
}

impl RowWindow {
    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index
    }
}

/// Half-open range of indexes into [`crate::ColumnBandCache::primary_pane`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnWindow {
    pub start_index: usize,
    pub end_index: usize, // exclusive
}

impl ColumnWindow {
    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RowAction {
    /// The row kept the buffer it had in the previous plan.
    Reuse,
    /// The row took a buffer from the free pool.
    Adopt,
    /// The row got a freshly issued buffer id.
    Allocate,
    /// The row left the window; its buffer went back to the free pool.
    Recycle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowPlanEntry {
    pub node_id: u32,
    pub buffer_id: BufferId,
    /// Top edge in content space. For `Recycle` entries this is the last planned position.
    pub top: f32,
    pub height: f32,
    pub action: RowAction,
}

impl RowPlanEntry {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Output of [`crate::RowPlanner::plan`].
///
/// Reuse one instance across frames with [`crate::RowPlanner::plan_into`] to avoid
/// reallocating the entry vectors.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowPlan {
    pub window: RowWindow,
    /// One entry per row in `window`, in row order.
    pub active_rows: Vec<RowPlanEntry>,
    /// Rows that left the window (or the row table) during this plan.
    pub recycled_rows: Vec<RowPlanEntry>,
    /// Buffers permanently discarded by the retention bound during this plan.
    pub evicted_buffers: Vec<BufferId>,
    /// Column band changes since the previous plan.
    pub pane_diff: PaneDiff,
    pub column_window: ColumnWindow,
}

impl RowPlan {
    pub fn clear(&mut self) {
        self.window = RowWindow::default();
        self.active_rows.clear();
        self.recycled_rows.clear();
        self.evicted_buffers.clear();
        self.pane_diff = PaneDiff::default();
        self.column_window = ColumnWindow::default();
    }

    pub fn count(&self, action: RowAction) -> usize {
        match action {
            RowAction::Recycle => self.recycled_rows.len(),
            _ => self
                .active_rows
                .iter()
                .filter(|entry| entry.action == action)
                .count(),
        }
    }
}
