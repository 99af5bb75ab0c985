// Example: damage marked on leaves is visible (and drainable) at every ancestor.
use gridvirt::DirtyTree;

fn main() -> Result<(), gridvirt::Error> {
    let mut tree = DirtyTree::new();
    let root = tree.create_node(None)?;
    let branch = tree.create_node(Some(root))?;
    let leaf = tree.create_node(Some(branch))?;

    tree.mark_dirty(branch, 12.0, 18.0)?;
    tree.mark_dirty_bounds(leaf, -4.0, 24.0, 28.0, 52.0)?;

    println!("root:   {:?}", tree.try_take_dirty(root)?);
    println!("root:   {:?}", tree.try_take_dirty(root)?);
    println!("branch: {:?}", tree.try_take_dirty(branch)?);
    println!("leaf:   {:?}", tree.try_take_dirty(leaf)?);

    tree.dispose_node(leaf)?;
    println!("stale mark: {:?}", tree.mark_dirty(leaf, 0.0, 0.0));
    Ok(())
}
