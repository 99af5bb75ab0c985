use gridvirt::RowPlanner;

/// Scroll position expressed relative to a row identity instead of an absolute offset.
///
/// Capture before `set_rows`, apply after, and the row that was at the top of the viewport
/// stays there even if rows above it changed.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowAnchor {
    pub node_id: u32,
    /// Distance from the anchored row's top edge to the scroll offset.
    pub offset_in_viewport: f32,
}

/// Anchors the row covering `scroll_offset`.
///
/// Returns `None` for an empty row table.
pub fn capture_anchor(planner: &RowPlanner, scroll_offset: f32) -> Option<RowAnchor> {
    let scroll = if scroll_offset.is_finite() {
        scroll_offset.max(0.0)
    } else {
        0.0
    };
    let index = planner.index_at_offset(scroll)?;
    let node_id = planner.rows()[index].node_id;
    let top = planner.row_top(index)?;
    Some(RowAnchor {
        node_id,
        offset_in_viewport: (scroll - top).max(0.0),
    })
}

/// Returns the scroll offset that puts `anchor` back where it was captured.
///
/// Returns `None` when the anchored row is no longer in the table.
pub fn apply_anchor(planner: &RowPlanner, anchor: &RowAnchor) -> Option<f32> {
    let index = planner.row_index(anchor.node_id)?;
    let top = planner.row_top(index)?;
    vtrace!(node_id = anchor.node_id, index, top, "apply_anchor");
    Some((top + anchor.offset_in_viewport).max(0.0))
}
