// Example: detect which column panes changed between two layouts.
use gridvirt::{ColumnBandCache, ColumnDefinition, ColumnSlot, FrozenBand};

fn main() {
    let defs = [
        ColumnDefinition::new(1, 48.0).frozen(FrozenBand::Leading),
        ColumnDefinition::new(2, 160.0),
        ColumnDefinition::new(3, 160.0),
        ColumnDefinition::new(4, 64.0).frozen(FrozenBand::Trailing),
    ];
    let mut slots = [
        ColumnSlot::new(0.0, 48.0),
        ColumnSlot::new(48.0, 160.0),
        ColumnSlot::new(208.0, 160.0),
        ColumnSlot::new(368.0, 64.0),
    ];

    let mut cache = ColumnBandCache::new();
    println!("first:     {:?}", cache.update(&defs, &slots).expect("lengths match"));
    println!("unchanged: {:?}", cache.update(&defs, &slots).expect("lengths match"));

    slots[2].width = 200.0;
    slots[3].offset = 408.0;
    println!("resized:   {:?}", cache.update(&defs, &slots).expect("lengths match"));
    println!("primary pane: {:?}", cache.primary_pane());
}
