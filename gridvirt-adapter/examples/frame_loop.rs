// Example: drive a planner and dirty tree from a single per-frame tick.
use gridvirt::{ColumnDefinition, ColumnSlot, FrozenBand, RowMetric, ViewportMetrics};
use gridvirt_adapter::FrameController;

fn main() {
    let mut frames = FrameController::default();
    let rows: Vec<RowMetric> = (1..=5_000).map(|id| RowMetric::new(id, 22.0)).collect();
    frames.set_rows(&rows).expect("node ids are unique");

    let columns = [
        ColumnDefinition::new(1, 48.0).frozen(FrozenBand::Leading),
        ColumnDefinition::new(2, 240.0),
        ColumnDefinition::new(3, 240.0),
    ];
    let slots = [
        ColumnSlot::new(0.0, 48.0),
        ColumnSlot::new(48.0, 240.0),
        ColumnSlot::new(288.0, 240.0),
    ];
    frames.set_columns(&columns, &slots).expect("one slot per column");

    for scroll in [0.0, 0.0, 44.0, 1_100.0] {
        let viewport = ViewportMetrics::new(scroll, 440.0, 44.0, 0.0, 640.0, 0.0);
        let frame = frames.tick(viewport).expect("controller owns every node it marks");
        println!(
            "scroll={scroll} rows={} recycled={} damage={:?}",
            frame.plan.active_rows.len(),
            frame.plan.recycled_rows.len(),
            frame.damage
        );
    }

    // A cell edit inside a visible row.
    let buffer = frames.last_plan().active_rows[3].buffer_id;
    frames
        .mark_cell_dirty(buffer, 300.0, 1_200.0)
        .expect("buffer is bound");
    println!("edit damage={:?}", frames.take_damage());
}
