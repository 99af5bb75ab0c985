// Example: keep the top visible row in place while a subtree above it expands.
use gridvirt::{RowMetric, RowPlanner};
use gridvirt_adapter::{apply_anchor, capture_anchor};

fn main() {
    let collapsed: Vec<RowMetric> = (1..=200).map(|id| RowMetric::new(id, 20.0)).collect();
    let mut planner = RowPlanner::default();
    planner.set_rows(&collapsed).expect("node ids are unique");

    let scroll = 1_010.0;
    let anchor = capture_anchor(&planner, scroll).expect("rows are present");
    println!("anchored {anchor:?}");

    // Node 3 expands into twelve children.
    let mut expanded = Vec::with_capacity(collapsed.len() + 12);
    expanded.extend_from_slice(&collapsed[..3]);
    expanded.extend((10_000..10_012).map(|id| RowMetric::new(id, 20.0)));
    expanded.extend_from_slice(&collapsed[3..]);
    planner.set_rows(&expanded).expect("node ids are unique");

    let restored = apply_anchor(&planner, &anchor).expect("anchored row still present");
    println!("scroll {scroll} -> {restored}");
}
