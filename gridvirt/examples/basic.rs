// Example: plan a scrolling window and watch buffers get recycled.
use gridvirt::{RowMetric, RowPlanner, ViewportMetrics};

fn main() {
    let rows: Vec<RowMetric> = (1..=10_000).map(|id| RowMetric::new(id, 24.0)).collect();
    let mut planner = RowPlanner::default();
    planner.set_rows(&rows).expect("node ids are unique");

    for scroll in [0.0, 120.0, 2_400.0, 2_400.0] {
        let plan = planner.plan(ViewportMetrics::new(scroll, 480.0, 48.0, 0.0, 800.0, 0.0));
        println!(
            "scroll={scroll} window={:?} recycled={}",
            (plan.window.start_index, plan.window.end_index),
            plan.recycled_rows.len()
        );
        println!("  {:?}", planner.telemetry());
    }
}
