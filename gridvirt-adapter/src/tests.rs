use crate::*;

use alloc::vec::Vec;
use gridvirt::{
    BufferId, ColumnDefinition, ColumnSlot, DirtyRegion, Error, ErrorKind, FrozenBand,
    PlannerOptions, RowAction, RowMetric, RowPlanner, ViewportMetrics,
};

fn uniform_rows(ids: impl IntoIterator<Item = u32>, height: f32) -> Vec<RowMetric> {
    ids.into_iter().map(|id| RowMetric::new(id, height)).collect()
}

fn viewport(scroll: f32, height: f32) -> ViewportMetrics {
    ViewportMetrics::new(scroll, height, 0.0, 0.0, 320.0, 0.0)
}

fn three_bands() -> Vec<ColumnDefinition> {
    [FrozenBand::Leading, FrozenBand::Primary, FrozenBand::Trailing]
        .into_iter()
        .enumerate()
        .map(|(i, band)| ColumnDefinition::new(i as u64 + 1, 80.0).frozen(band))
        .collect()
}

fn region(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> DirtyRegion {
    DirtyRegion::from_bounds(min_x, max_x, min_y, max_y)
}

#[test]
fn anchor_survives_rows_inserted_above() {
    let mut planner = RowPlanner::default();
    planner.set_rows(&uniform_rows(1..=100, 10.0)).unwrap();

    let anchor = capture_anchor(&planner, 255.0).unwrap();
    assert_eq!(anchor.node_id, 26);
    assert_eq!(anchor.offset_in_viewport, 5.0);

    let mut rows = uniform_rows(1000..1005, 10.0);
    rows.extend(uniform_rows(1..=100, 10.0));
    planner.set_rows(&rows).unwrap();
    assert_eq!(apply_anchor(&planner, &anchor), Some(305.0));

    planner.set_rows(&uniform_rows(11..=100, 10.0)).unwrap();
    assert_eq!(apply_anchor(&planner, &anchor), Some(155.0));
}

#[test]
fn anchor_is_none_without_rows_or_after_removal() {
    let mut planner = RowPlanner::default();
    assert_eq!(capture_anchor(&planner, 0.0), None);

    planner.set_rows(&uniform_rows(1..=10, 10.0)).unwrap();
    let anchor = capture_anchor(&planner, f32::NAN).unwrap();
    assert_eq!(anchor.node_id, 1);
    assert_eq!(anchor.offset_in_viewport, 0.0);

    planner.set_rows(&uniform_rows(2..=10, 10.0)).unwrap();
    assert_eq!(apply_anchor(&planner, &anchor), None);
}

#[test]
fn first_tick_damages_rows_and_every_band() {
    let mut c = FrameController::default();
    c.set_rows(&uniform_rows(1..=100, 24.0)).unwrap();
    let slots = [
        ColumnSlot::new(0.0, 40.0),
        ColumnSlot::new(40.0, 200.0),
        ColumnSlot::new(240.0, 80.0),
    ];
    c.set_columns(&three_bands(), &slots).unwrap();

    let frame = c.tick(viewport(0.0, 240.0)).unwrap();
    assert_eq!(frame.plan.active_rows.len(), 10);
    assert_eq!(frame.damage, Some(region(0.0, 320.0, 0.0, 240.0)));

    for entry in &c.last_plan().active_rows {
        assert!(c.buffer_node(entry.buffer_id).is_some());
    }
    // root + three bands + one node per bound buffer
    assert_eq!(c.tree().len(), 4 + 10);

    let frame = c.tick(viewport(0.0, 240.0)).unwrap();
    assert_eq!(frame.plan.count(RowAction::Reuse), 10);
    assert_eq!(frame.damage, None);
}

#[test]
fn scrolling_damages_only_rows_entering_the_window() {
    let mut c = FrameController::default();
    c.set_rows(&uniform_rows(1..=100, 24.0)).unwrap();
    c.tick(viewport(0.0, 240.0)).unwrap();

    let frame = c.tick(viewport(120.0, 240.0)).unwrap();
    assert_eq!(frame.plan.recycled_rows.len(), 5);
    assert_eq!(frame.damage, Some(region(0.0, 320.0, 240.0, 360.0)));

    let frame = c.tick(viewport(480.0, 240.0)).unwrap();
    assert_eq!(frame.plan.count(RowAction::Adopt), 5);
    assert_eq!(frame.plan.count(RowAction::Allocate), 5);
    assert_eq!(frame.damage, Some(region(0.0, 320.0, 480.0, 720.0)));

    // Adopted buffers keep the scene node they had before recycling.
    assert_eq!(c.tree().len(), 4 + 20);
}

#[test]
fn reused_rows_that_moved_are_repainted() {
    let mut c = FrameController::default();
    c.set_rows(&uniform_rows(1..=10, 10.0)).unwrap();
    c.tick(viewport(0.0, 50.0)).unwrap();

    c.set_row_height(3, 20.0).unwrap();
    let frame = c.tick(viewport(0.0, 50.0)).unwrap();
    assert_eq!(frame.plan.window.end_index, 4);
    assert_eq!(frame.plan.count(RowAction::Reuse), 4);
    // Rows 1 and 2 did not move; row 3 grew, row 4 moved, row 5 left the window.
    assert_eq!(frame.damage, Some(region(0.0, 320.0, 20.0, 50.0)));
}

#[test]
fn band_changes_damage_old_and_new_extents() {
    let mut c = FrameController::default();
    c.set_rows(&uniform_rows(1..=100, 24.0)).unwrap();
    let defs = three_bands();
    c.set_columns(
        &defs,
        &[
            ColumnSlot::new(0.0, 40.0),
            ColumnSlot::new(40.0, 200.0),
            ColumnSlot::new(240.0, 80.0),
        ],
    )
    .unwrap();
    c.tick(viewport(0.0, 240.0)).unwrap();

    c.set_columns(
        &defs,
        &[
            ColumnSlot::new(0.0, 40.0),
            ColumnSlot::new(40.0, 260.0),
            ColumnSlot::new(300.0, 80.0),
        ],
    )
    .unwrap();
    let frame = c.tick(viewport(0.0, 240.0)).unwrap();
    assert!(!frame.plan.pane_diff.leading_changed);
    assert!(frame.plan.pane_diff.primary_changed);
    assert!(frame.plan.pane_diff.trailing_changed);
    assert_eq!(frame.damage, Some(region(40.0, 380.0, 0.0, 240.0)));

    // Band nodes are drained together with the root.
    let primary = c.band_node(FrozenBand::Primary);
    assert_eq!(c.tree().peek_dirty(primary).unwrap(), None);
}

#[test]
fn evicted_buffers_lose_their_scene_nodes() {
    let options = PlannerOptions::new().retention_multiplier(0).min_reserve(0);
    let mut c = FrameController::new(options);
    c.set_rows(&uniform_rows(1..=10, 10.0)).unwrap();

    let frame = c.tick(viewport(0.0, 50.0)).unwrap();
    assert_eq!(frame.damage, Some(region(0.0, 320.0, 0.0, 50.0)));
    assert_eq!(c.tree().len(), 4 + 5);
    let first = c.buffer_node(BufferId(1)).unwrap();

    let frame = c.tick(viewport(60.0, 10.0)).unwrap();
    assert_eq!(frame.plan.evicted_buffers.len(), 5);
    assert_eq!(frame.damage, Some(region(0.0, 320.0, 60.0, 70.0)));
    assert_eq!(c.tree().len(), 4 + 1);
    assert_eq!(c.buffer_node(BufferId(1)), None);
    assert!(!c.tree().contains(first));
    assert_eq!(c.planner().telemetry().evicted, 5);
}

#[test]
fn explicit_marks_route_to_bound_buffers() {
    let mut c = FrameController::default();
    c.set_rows(&uniform_rows(1..=10, 10.0)).unwrap();
    c.tick(viewport(0.0, 50.0)).unwrap();

    c.mark_row_dirty(BufferId(1), 4.0, 12.0, 2.0, 8.0).unwrap();
    c.mark_cell_dirty(BufferId(2), 30.0, 15.0).unwrap();
    assert_eq!(c.take_damage().unwrap(), Some(region(4.0, 30.0, 2.0, 15.0)));
    assert_eq!(c.take_damage().unwrap(), None);

    let err = c.mark_cell_dirty(BufferId(99), 0.0, 0.0).unwrap_err();
    assert!(matches!(err, Error::InvalidBuffer { id } if id == BufferId(99)));
    assert_eq!(err.kind(), ErrorKind::InvalidHandle);

    // Buffer 1 goes back to the pool once row 1 scrolls away.
    c.tick(viewport(60.0, 40.0)).unwrap();
    assert!(c.mark_row_dirty(BufferId(1), 0.0, 1.0, 0.0, 1.0).is_err());
}

#[test]
fn marks_between_ticks_are_reported_by_the_next_tick() {
    let mut c = FrameController::default();
    c.set_rows(&uniform_rows(1..=10, 10.0)).unwrap();
    c.tick(viewport(0.0, 50.0)).unwrap();

    c.mark_cell_dirty(BufferId(3), 100.0, 25.0).unwrap();
    let frame = c.tick(viewport(0.0, 50.0)).unwrap();
    assert_eq!(frame.damage, Some(DirtyRegion::point(100.0, 25.0)));
}

#[test]
fn clear_disposes_buffer_nodes_and_keeps_columns() {
    let mut c = FrameController::default();
    c.set_rows(&uniform_rows(1..=10, 10.0)).unwrap();
    c.set_columns(&three_bands(), &[ColumnSlot::new(0.0, 10.0); 3])
        .unwrap();
    c.tick(viewport(0.0, 50.0)).unwrap();

    c.clear().unwrap();
    assert_eq!(c.tree().len(), 4);
    assert_eq!(c.buffer_node(BufferId(1)), None);
    assert_eq!(c.planner().columns().spans().len(), 3);
    assert_eq!(c.take_damage().unwrap(), None);

    c.set_rows(&uniform_rows(1..=10, 10.0)).unwrap();
    let frame = c.tick(viewport(0.0, 50.0)).unwrap();
    assert_eq!(frame.plan.active_rows[0].buffer_id, BufferId(6));
    assert_eq!(frame.damage, Some(region(0.0, 320.0, 0.0, 50.0)));
}

#[test]
fn controller_anchor_helpers_delegate_to_planner() {
    let mut c = FrameController::default();
    c.set_rows(&uniform_rows(1..=50, 20.0)).unwrap();
    let anchor = c.capture_anchor(130.0).unwrap();
    assert_eq!(anchor.node_id, 7);
    assert_eq!(anchor.offset_in_viewport, 10.0);

    let mut rows = uniform_rows([100, 101], 20.0);
    rows.extend(uniform_rows(1..=50, 20.0));
    c.set_rows(&rows).unwrap();
    assert_eq!(c.apply_anchor(&anchor), Some(170.0));
}
