use alloc::vec::Vec;
use core::mem;

use crate::allocator::{Binding, BufferAllocator};
use crate::error::{Error, Result};
use crate::fenwick::Fenwick;
use crate::key::NodeMap;
use crate::telemetry::TelemetryRecorder;
use crate::{
    BufferId, ColumnBandCache, ColumnDefinition, ColumnSlot, PaneDiff, PlannerOptions, RowAction,
    RowMetric, RowPlan, RowPlanEntry, RowWindow, ViewportMetrics, VirtualizationTelemetry,
};

/// Row window planner and buffer-recycling allocator.
///
/// This type is UI-agnostic:
/// - It holds no render resources, only opaque [`BufferId`]s bound to row identities.
/// - Your adapter drives it once per frame with [`ViewportMetrics`] via [`Self::plan`].
/// - Recycled rows and evicted buffers in each [`RowPlan`] are the cue to release whatever
///   the adapter associated with those buffers.
///
/// Not reentrant; intended to be owned by the render thread.
#[derive(Clone, Debug, Default)]
pub struct RowPlanner {
    options: PlannerOptions,
    rows: Vec<RowMetric>,
    index_of: NodeMap<usize>,
    sums: Fenwick,
    allocator: BufferAllocator,

    // Node ids bound by the previous plan, in window order.
    active_nodes: Vec<u32>,
    scratch_nodes: Vec<u32>,
    // Bindings dropped by `set_rows`; reported as recycles by the next plan.
    detached: Vec<(u32, Binding)>,

    columns: ColumnBandCache,
    pending_pane_diff: PaneDiff,

    window: RowWindow,
    telemetry: TelemetryRecorder,
}

impl RowPlanner {
    pub fn new(options: PlannerOptions) -> Self {
        vdebug!(
            retention_multiplier = options.retention_multiplier,
            min_reserve = options.min_reserve,
            "RowPlanner::new"
        );
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &PlannerOptions {
        &self.options
    }

    /// Replaces the options. A tighter retention bound applies from the next plan.
    pub fn set_options(&mut self, options: PlannerOptions) {
        self.options = options;
    }

    /// Replaces the row table.
    ///
    /// Fails without modifying anything if a `node_id` repeats or a height is not finite and
    /// positive. Buffers bound to node ids that are no longer present are unbound right away
    /// and reported as [`RowAction::Recycle`] by the next plan.
    pub fn set_rows(&mut self, rows: &[RowMetric]) -> Result<()> {
        let mut index_of = NodeMap::new();
        for (index, row) in rows.iter().enumerate() {
            check_height(row.node_id, row.height)?;
            if let Some(&first) = index_of.get(&row.node_id) {
                vwarn!(node_id = row.node_id, first, second = index, "set_rows: duplicate node id");
                return Err(Error::DuplicateNodeId {
                    node_id: row.node_id,
                    first,
                    second: index,
                });
            }
            index_of.insert(row.node_id, index);
        }

        for &node_id in &self.active_nodes {
            if index_of.contains_key(&node_id) {
                continue;
            }
            if let Some(binding) = self.allocator.detach(node_id) {
                self.detached.push((node_id, binding));
            }
        }

        self.rows.clear();
        self.rows.extend_from_slice(rows);
        self.index_of = index_of;
        self.sums = Fenwick::from_heights(self.rows.iter().map(|row| row.height));
        vdebug!(
            rows = self.rows.len(),
            detached = self.detached.len(),
            total_height = self.sums.total(),
            "RowPlanner::set_rows"
        );
        Ok(())
    }

    /// Updates the height of a single row in `O(log n)`.
    pub fn set_row_height(&mut self, node_id: u32, height: f32) -> Result<()> {
        check_height(node_id, height)?;
        let index = self.row_index(node_id).ok_or(Error::UnknownRow { node_id })?;
        let row = &mut self.rows[index];
        let delta = f64::from(height) - f64::from(row.height);
        row.height = height;
        self.sums.add(index, delta);
        vtrace!(node_id, index, height, "set_row_height");
        Ok(())
    }

    /// Replaces the column table and returns the band diff for this update.
    ///
    /// Diffs are also accumulated and reported (then reset) by the next plan, so several
    /// updates between frames are never lost.
    pub fn set_columns(
        &mut self,
        definitions: &[ColumnDefinition],
        slots: &[ColumnSlot],
    ) -> Result<PaneDiff> {
        let diff = self.columns.update(definitions, slots)?;
        self.pending_pane_diff.merge(diff);
        Ok(diff)
    }

    /// Same as [`Self::set_columns`].
    pub fn update_columns(
        &mut self,
        definitions: &[ColumnDefinition],
        slots: &[ColumnSlot],
    ) -> Result<PaneDiff> {
        self.set_columns(definitions, slots)
    }

    /// Computes the row window for `viewport` and updates buffer bindings.
    ///
    /// This is a convenience wrapper around [`Self::plan_into`]. For per-frame use, prefer
    /// `plan_into` and reuse the same [`RowPlan`].
    pub fn plan(&mut self, viewport: ViewportMetrics) -> RowPlan {
        let mut out = RowPlan::default();
        self.plan_into(viewport, &mut out);
        out
    }

    /// Same as [`Self::plan`], writing into `out` (cleared first).
    pub fn plan_into(&mut self, viewport: ViewportMetrics, out: &mut RowPlan) {
        let viewport = viewport.sanitized();
        out.clear();

        let window = self.compute_window(&viewport);
        self.telemetry.begin(self.rows.len());

        let mut next_active = mem::take(&mut self.scratch_nodes);
        next_active.clear();

        let mut top = self.sums.prefix_sum(window.start_index);
        for row in &self.rows[window.start_index..window.end_index] {
            let row_top = top as f32;
            let (buffer_id, action) = self.allocator.acquire(row.node_id, row_top, row.height);
            out.active_rows.push(RowPlanEntry {
                node_id: row.node_id,
                buffer_id,
                top: row_top,
                height: row.height,
                action,
            });
            self.telemetry.record(action);
            next_active.push(row.node_id);
            top += f64::from(row.height);
        }

        for &node_id in &self.active_nodes {
            let inside = self
                .index_of
                .get(&node_id)
                .is_some_and(|&index| window.contains(index));
            if inside {
                continue;
            }
            if let Some(binding) = self.allocator.release(node_id) {
                out.recycled_rows.push(recycle_entry(node_id, binding));
                self.telemetry.record(RowAction::Recycle);
            }
        }
        for (node_id, binding) in self.detached.drain(..) {
            self.allocator.recycle(binding.buffer);
            out.recycled_rows.push(recycle_entry(node_id, binding));
            self.telemetry.record(RowAction::Recycle);
        }
        self.scratch_nodes = mem::replace(&mut self.active_nodes, next_active);

        let retain = self.options.retention_bound(window.len());
        let evicted = self.allocator.evict_to(retain, &mut out.evicted_buffers);
        if evicted > 0 {
            vdebug!(
                evicted,
                retain,
                lifetime = self.allocator.evicted(),
                "plan: evicted pooled buffers"
            );
        }

        out.window = window;
        out.pane_diff = mem::take(&mut self.pending_pane_diff);
        out.column_window = self.columns.visible_primary(
            viewport.column_scroll_offset,
            viewport.column_viewport_width,
            viewport.column_overscan,
        );
        self.window = window;
        self.telemetry.finish(
            self.allocator.active_len(),
            self.allocator.free_len(),
            self.allocator.evicted(),
        );
        vtrace!(
            start = window.start_index,
            end = window.end_index,
            recycled = out.recycled_rows.len(),
            free = self.allocator.free_len(),
            "RowPlanner::plan"
        );
    }

    fn compute_window(&self, viewport: &ViewportMetrics) -> RowWindow {
        let count = self.rows.len();
        let total_height = self.sums.total();
        if count == 0 {
            return RowWindow {
                start_index: 0,
                end_index: 0,
                total_height,
            };
        }

        let scroll = f64::from(viewport.row_scroll_offset);
        let overscan = f64::from(viewport.row_overscan);
        let low = scroll - overscan;
        let high = scroll + f64::from(viewport.row_viewport_height) + overscan;

        // First row whose bottom edge is below `low`.
        let start_index = self.sums.count_at_or_below(low).min(count);
        // First row whose top edge is at or past `high`.
        let end_index = if high <= 0.0 {
            0
        } else {
            (self.sums.count_below(high) + 1).min(count)
        };

        RowWindow {
            start_index,
            end_index: end_index.max(start_index),
            total_height,
        }
    }

    /// Drops the row table, every binding and the free pool.
    ///
    /// Nothing is reported as recycled: the caller is expected to drop all per-buffer
    /// resources alongside. Column state and the lifetime eviction count are kept.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.index_of.clear();
        self.sums = Fenwick::default();
        self.allocator.clear();
        self.active_nodes.clear();
        self.detached.clear();
        self.window = RowWindow::default();
        self.telemetry.reset(self.allocator.evicted());
        vdebug!("RowPlanner::clear");
    }

    pub fn telemetry(&self) -> VirtualizationTelemetry {
        self.telemetry.snapshot()
    }

    pub fn rows(&self) -> &[RowMetric] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn total_height(&self) -> f64 {
        self.sums.total()
    }

    /// The window computed by the most recent plan.
    pub fn window(&self) -> RowWindow {
        self.window
    }

    pub fn columns(&self) -> &ColumnBandCache {
        &self.columns
    }

    pub fn row_index(&self, node_id: u32) -> Option<usize> {
        self.index_of.get(&node_id).copied()
    }

    /// Top edge of the row at `index` in content space.
    pub fn row_top(&self, index: usize) -> Option<f32> {
        (index < self.rows.len()).then(|| self.sums.prefix_sum(index) as f32)
    }

    /// Index of the row covering `offset` (clamped to the table).
    pub fn index_at_offset(&self, offset: f32) -> Option<usize> {
        let last = self.rows.len().checked_sub(1)?;
        Some(self.sums.count_at_or_below(f64::from(offset)).min(last))
    }

    pub fn buffer_for(&self, node_id: u32) -> Option<BufferId> {
        self.allocator.buffer_for(node_id)
    }

    /// Returns the row identity currently bound to `buffer`.
    pub fn node_for_buffer(&self, buffer: BufferId) -> Result<u32> {
        self.allocator
            .node_for(buffer)
            .ok_or(Error::InvalidBuffer { id: buffer })
    }

    pub fn is_bound(&self, node_id: u32) -> bool {
        self.allocator.is_bound(node_id)
    }
}

fn check_height(node_id: u32, height: f32) -> Result<()> {
    if height.is_finite() && height > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidRowHeight { node_id, height })
    }
}

fn recycle_entry(node_id: u32, binding: Binding) -> RowPlanEntry {
    RowPlanEntry {
        node_id,
        buffer_id: binding.buffer,
        top: binding.top,
        height: binding.height,
        action: RowAction::Recycle,
    }
}
