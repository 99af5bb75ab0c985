use alloc::collections::BTreeMap;

use gridvirt::{
    BufferId, ColumnDefinition, ColumnSlot, DirtyRegion, DirtyTree, FrozenBand, PaneDiff,
    PlannerOptions, Result, RowAction, RowMetric, RowPlan, RowPlanEntry, RowPlanner, SceneNodeId,
    ViewportMetrics,
};

use crate::{RowAnchor, apply_anchor, capture_anchor};

/// Output of [`FrameController::tick`].
#[derive(Clone, Copy, Debug)]
pub struct FrameDamage<'a> {
    pub plan: &'a RowPlan,
    /// Union of everything marked since the previous tick, or `None` if nothing changed.
    pub damage: Option<DirtyRegion>,
}

#[derive(Clone, Copy, Debug)]
struct RowSlot {
    node: SceneNodeId,
    top: f32,
    height: f32,
}

/// Drives a [`RowPlanner`] and a [`DirtyTree`] together, one `tick` per frame.
///
/// Scene layout: a root node with one child per [`FrozenBand`] and one child per bound buffer.
/// A buffer's scene node lives as long as the buffer does; it survives recycling and adoption
/// and is disposed when the planner evicts the buffer.
///
/// Coordinates are content-space: rows span `[top, top + height]`, columns span their solved
/// `[offset, offset + width]`.
#[derive(Clone, Debug)]
pub struct FrameController {
    planner: RowPlanner,
    tree: DirtyTree,
    root: SceneNodeId,
    bands: [SceneNodeId; 3],
    buffers: BTreeMap<BufferId, RowSlot>,
    band_extents: [Option<(f32, f32)>; 3],
    plan: RowPlan,
}

impl Default for FrameController {
    fn default() -> Self {
        Self::new(PlannerOptions::default())
    }
}

impl FrameController {
    pub fn new(options: PlannerOptions) -> Self {
        Self::from_planner(RowPlanner::new(options))
    }

    pub fn from_planner(planner: RowPlanner) -> Self {
        let mut tree = DirtyTree::new();
        let root = tree.create_root();
        let bands = FrozenBand::ALL.map(|_| {
            let node = tree.create_root();
            // `node` and `root` were just created; re-parenting cannot fail.
            let _ = tree.set_parent(node, Some(root));
            node
        });
        Self {
            planner,
            tree,
            root,
            bands,
            buffers: BTreeMap::new(),
            band_extents: [None; 3],
            plan: RowPlan::default(),
        }
    }

    pub fn planner(&self) -> &RowPlanner {
        &self.planner
    }

    /// The scene tree. Callers may hang their own nodes under [`Self::root`].
    pub fn tree(&self) -> &DirtyTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DirtyTree {
        &mut self.tree
    }

    pub fn root(&self) -> SceneNodeId {
        self.root
    }

    pub fn band_node(&self, band: FrozenBand) -> SceneNodeId {
        self.bands[band as usize]
    }

    /// Scene node of a buffer the planner has handed out and not yet evicted.
    pub fn buffer_node(&self, buffer: BufferId) -> Option<SceneNodeId> {
        self.buffers.get(&buffer).map(|slot| slot.node)
    }

    /// The plan computed by the most recent tick.
    pub fn last_plan(&self) -> &RowPlan {
        &self.plan
    }

    pub fn set_rows(&mut self, rows: &[RowMetric]) -> Result<()> {
        self.planner.set_rows(rows)
    }

    pub fn set_row_height(&mut self, node_id: u32, height: f32) -> Result<()> {
        self.planner.set_row_height(node_id, height)
    }

    pub fn set_columns(
        &mut self,
        definitions: &[ColumnDefinition],
        slots: &[ColumnSlot],
    ) -> Result<PaneDiff> {
        self.planner.set_columns(definitions, slots)
    }

    /// Plans `viewport` and returns the damage accumulated since the previous tick.
    ///
    /// Marked as dirty:
    /// - rows that were allocated or adopted, or whose geometry changed while reused;
    /// - the old extent of recycled rows that still overlaps the row viewport;
    /// - the old and new extent of every band whose columns changed.
    pub fn tick(&mut self, viewport: ViewportMetrics) -> Result<FrameDamage<'_>> {
        self.planner.plan_into(viewport, &mut self.plan);
        let vp = viewport.sanitized();
        let min_x = vp.column_scroll_offset;
        let max_x = min_x + vp.column_viewport_width;
        let view_top = vp.row_scroll_offset;
        let view_bottom = view_top + vp.row_viewport_height;

        for entry in &self.plan.recycled_rows {
            if entry.bottom() > view_top && entry.top < view_bottom {
                self.tree
                    .mark_dirty_bounds(self.root, min_x, max_x, entry.top, entry.bottom())?;
            }
        }

        for &buffer in &self.plan.evicted_buffers {
            if let Some(slot) = self.buffers.remove(&buffer) {
                self.tree.dispose_node(slot.node)?;
            }
        }
        if !self.plan.evicted_buffers.is_empty() {
            vdebug!(
                disposed = self.plan.evicted_buffers.len(),
                live = self.buffers.len(),
                "tick: disposed scene nodes of evicted buffers"
            );
        }

        for entry in &self.plan.active_rows {
            let node = match self.buffers.get(&entry.buffer_id) {
                Some(slot) => slot.node,
                None => self.tree.create_node(Some(self.root))?,
            };
            if needs_repaint(self.buffers.get(&entry.buffer_id), entry) {
                self.tree
                    .mark_dirty_bounds(node, min_x, max_x, entry.top, entry.bottom())?;
            }
            self.buffers.insert(
                entry.buffer_id,
                RowSlot {
                    node,
                    top: entry.top,
                    height: entry.height,
                },
            );
        }

        let diff = self.plan.pane_diff;
        for band in FrozenBand::ALL {
            if !diff.changed(band) {
                continue;
            }
            let index = band as usize;
            let current = pane_extent(self.planner.columns().pane(band));
            for (left, right) in [self.band_extents[index], current].into_iter().flatten() {
                self.tree
                    .mark_dirty_bounds(self.bands[index], left, right, view_top, view_bottom)?;
            }
            self.band_extents[index] = current;
        }

        let damage = self.tree.try_take_dirty(self.root)?;
        for band in self.bands {
            self.tree.clear(band)?;
        }
        for slot in self.buffers.values() {
            self.tree.clear(slot.node)?;
        }
        vtrace!(
            active = self.plan.active_rows.len(),
            recycled = self.plan.recycled_rows.len(),
            damaged = damage.is_some(),
            "FrameController::tick"
        );
        Ok(FrameDamage {
            plan: &self.plan,
            damage,
        })
    }

    /// Marks a point inside the row currently bound to `buffer`.
    ///
    /// Fails with [`gridvirt::Error::InvalidBuffer`] if the buffer is not bound to a row.
    pub fn mark_cell_dirty(&mut self, buffer: BufferId, x: f32, y: f32) -> Result<()> {
        let node = self.bound_node(buffer)?;
        self.tree.mark_dirty(node, x, y)
    }

    /// Marks a rectangle inside the row currently bound to `buffer`.
    pub fn mark_row_dirty(
        &mut self,
        buffer: BufferId,
        min_x: f32,
        max_x: f32,
        min_y: f32,
        max_y: f32,
    ) -> Result<()> {
        let node = self.bound_node(buffer)?;
        self.tree.mark_dirty_bounds(node, min_x, max_x, min_y, max_y)
    }

    /// Drains damage marked since the last tick without planning.
    pub fn take_damage(&mut self) -> Result<Option<DirtyRegion>> {
        self.tree.try_take_dirty(self.root)
    }

    pub fn capture_anchor(&self, scroll_offset: f32) -> Option<RowAnchor> {
        capture_anchor(&self.planner, scroll_offset)
    }

    pub fn apply_anchor(&self, anchor: &RowAnchor) -> Option<f32> {
        apply_anchor(&self.planner, anchor)
    }

    /// Clears the planner and disposes every buffer scene node.
    ///
    /// Column state is kept, so band extents stay as they were.
    pub fn clear(&mut self) -> Result<()> {
        self.planner.clear();
        for (_, slot) in core::mem::take(&mut self.buffers) {
            self.tree.dispose_node(slot.node)?;
        }
        self.plan.clear();
        self.tree.clear(self.root)?;
        for band in self.bands {
            self.tree.clear(band)?;
        }
        Ok(())
    }

    fn bound_node(&self, buffer: BufferId) -> Result<SceneNodeId> {
        self.planner.node_for_buffer(buffer)?;
        self.buffer_node(buffer)
            .ok_or(gridvirt::Error::InvalidBuffer { id: buffer })
    }
}

fn needs_repaint(previous: Option<&RowSlot>, entry: &RowPlanEntry) -> bool {
    match entry.action {
        RowAction::Allocate | RowAction::Adopt => true,
        RowAction::Reuse => {
            previous.is_none_or(|slot| slot.top != entry.top || slot.height != entry.height)
        }
        RowAction::Recycle => false,
    }
}

fn pane_extent(pane: &[gridvirt::ColumnSpan]) -> Option<(f32, f32)> {
    let first = pane.first()?;
    let last = pane.last()?;
    Some((first.offset, last.end()))
}
