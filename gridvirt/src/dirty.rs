//! Hierarchical damage tracking.
//!
//! A [`DirtyTree`] is a forest of scene nodes stored in a flat arena. Every node owns an
//! independent pending [`DirtyRegion`]. Marking a node expands its own rectangle *and* the
//! rectangle of every ancestor in the same call, so a renderer can ask any subtree root "what
//! changed below you?" in O(1) and consume the answer.
//!
//! Ancestors and descendants keep separate accumulators: draining the root does not clear the
//! pending state of its children, and vice versa.

use alloc::vec::Vec;
use core::fmt;

use crate::error::{Error, Result};

/// Axis-aligned damage rectangle (inclusive bounds).
///
/// The region is empty iff `min_x > max_x`; see [`DirtyRegion::EMPTY`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirtyRegion {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Default for DirtyRegion {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl DirtyRegion {
    /// Identity element of [`Self::union`].
    pub const EMPTY: Self = Self {
        min_x: f32::INFINITY,
        max_x: f32::NEG_INFINITY,
        min_y: f32::INFINITY,
        max_y: f32::NEG_INFINITY,
    };

    pub fn point(x: f32, y: f32) -> Self {
        Self {
            min_x: x,
            max_x: x,
            min_y: y,
            max_y: y,
        }
    }

    /// Builds a region from bounds, swapping inverted pairs.
    pub fn from_bounds(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            min_x: min_x.min(max_x),
            max_x: min_x.max(max_x),
            min_y: min_y.min(max_y),
            max_y: min_y.max(max_y),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x
    }

    pub fn union(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Self {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn include_point(&mut self, x: f32, y: f32) {
        *self = self.union(Self::point(x, y));
    }

    pub fn width(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    pub fn height(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }

    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    pub fn intersects(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }
}

/// Generational handle to a node in a [`DirtyTree`].
///
/// Disposing a node bumps its slot's generation, so stale handles are rejected instead of
/// aliasing whatever node reuses the slot.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneNodeId {
    index: u32,
    generation: u32,
}

impl SceneNodeId {
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for SceneNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SceneNodeId({}v{})", self.index, self.generation)
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    alive: bool,
    parent: Option<SceneNodeId>,
    pending: Option<DirtyRegion>,
}

/// Arena of scene nodes with per-node pending damage.
#[derive(Clone, Debug, Default)]
pub struct DirtyTree {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    alive: usize,
}

impl DirtyTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a node, optionally attached under `parent`.
    pub fn create_node(&mut self, parent: Option<SceneNodeId>) -> Result<SceneNodeId> {
        if let Some(p) = parent {
            self.check(p)?;
        }
        Ok(self.alloc(parent))
    }

    /// Allocates a parentless node.
    pub fn create_root(&mut self) -> SceneNodeId {
        self.alloc(None)
    }

    fn alloc(&mut self, parent: Option<SceneNodeId>) -> SceneNodeId {
        let id = if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.alive = true;
            slot.parent = parent;
            slot.pending = None;
            SceneNodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                alive: true,
                parent,
                pending: None,
            });
            SceneNodeId {
                index,
                generation: 0,
            }
        };
        self.alive += 1;
        id
    }

    /// Invalidates `id`. Its children are not disposed; they become roots.
    pub fn dispose_node(&mut self, id: SceneNodeId) -> Result<()> {
        self.check(id)?;
        let slot = &mut self.slots[id.index as usize];
        slot.alive = false;
        slot.parent = None;
        slot.pending = None;
        self.free_list.push(id.index);
        self.alive -= 1;
        Ok(())
    }

    /// Re-attaches `id` under `parent` (or detaches it with `None`).
    pub fn set_parent(&mut self, id: SceneNodeId, parent: Option<SceneNodeId>) -> Result<()> {
        self.check(id)?;
        if let Some(p) = parent {
            self.check(p)?;
            let mut cur = Some(p);
            while let Some(node) = cur {
                if node == id {
                    return Err(Error::ParentCycle { id, parent: p });
                }
                cur = self.live_parent(node);
            }
        }
        self.slots[id.index as usize].parent = parent;
        Ok(())
    }

    /// Expands the pending rectangle of `id` and all its ancestors to include `(x, y)`.
    pub fn mark_dirty(&mut self, id: SceneNodeId, x: f32, y: f32) -> Result<()> {
        self.mark_region(id, DirtyRegion::point(x, y))
    }

    /// Expands the pending rectangle of `id` and all its ancestors to include the given bounds.
    pub fn mark_dirty_bounds(
        &mut self,
        id: SceneNodeId,
        min_x: f32,
        max_x: f32,
        min_y: f32,
        max_y: f32,
    ) -> Result<()> {
        self.mark_region(id, DirtyRegion::from_bounds(min_x, max_x, min_y, max_y))
    }

    /// Unions `region` into `id` and every live ancestor. O(depth).
    pub fn mark_region(&mut self, id: SceneNodeId, region: DirtyRegion) -> Result<()> {
        self.check(id)?;
        if region.is_empty() {
            return Ok(());
        }
        let mut cur = Some(id);
        while let Some(node) = cur {
            let slot = &mut self.slots[node.index as usize];
            slot.pending = Some(slot.pending.unwrap_or(DirtyRegion::EMPTY).union(region));
            cur = self.live_parent(node);
        }
        Ok(())
    }

    /// Returns and clears the pending rectangle of `id`. O(1).
    pub fn try_take_dirty(&mut self, id: SceneNodeId) -> Result<Option<DirtyRegion>> {
        self.check(id)?;
        Ok(self.slots[id.index as usize].pending.take())
    }

    /// Discards the pending rectangle of `id` without returning it. O(1).
    pub fn clear(&mut self, id: SceneNodeId) -> Result<()> {
        self.check(id)?;
        self.slots[id.index as usize].pending = None;
        Ok(())
    }

    /// Discards pending state on every live node.
    pub fn clear_all(&mut self) {
        for slot in &mut self.slots {
            slot.pending = None;
        }
    }

    pub fn is_dirty(&self, id: SceneNodeId) -> Result<bool> {
        self.check(id)?;
        Ok(self.slots[id.index as usize].pending.is_some())
    }

    pub fn peek_dirty(&self, id: SceneNodeId) -> Result<Option<DirtyRegion>> {
        self.check(id)?;
        Ok(self.slots[id.index as usize].pending)
    }

    pub fn parent(&self, id: SceneNodeId) -> Result<Option<SceneNodeId>> {
        self.check(id)?;
        Ok(self.live_parent(id))
    }

    pub fn contains(&self, id: SceneNodeId) -> bool {
        self.check(id).is_ok()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.alive
    }

    pub fn is_empty(&self) -> bool {
        self.alive == 0
    }

    fn check(&self, id: SceneNodeId) -> Result<()> {
        match self.slots.get(id.index as usize) {
            Some(slot) if slot.alive && slot.generation == id.generation => Ok(()),
            _ => Err(Error::InvalidNode { id }),
        }
    }

    // A parent disposed after its children were created no longer counts as an ancestor.
    fn live_parent(&self, id: SceneNodeId) -> Option<SceneNodeId> {
        let parent = self.slots[id.index as usize].parent?;
        self.check(parent).is_ok().then_some(parent)
    }
}
