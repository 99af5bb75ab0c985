use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::key::{BufferMap, NodeMap};
use crate::{BufferId, RowAction};

/// Where a bound buffer was last planned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Binding {
    pub(crate) buffer: BufferId,
    pub(crate) top: f32,
    pub(crate) height: f32,
}

/// Assigns opaque buffer ids to row identities and recycles them through a bounded pool.
///
/// Invariants:
/// - a node id is bound to at most one buffer, and a buffer to at most one node id;
/// - a buffer is either bound or in `free`, never both;
/// - ids are issued from `next_id` and never reissued, so an evicted id is gone for good.
#[derive(Clone, Debug)]
pub(crate) struct BufferAllocator {
    bound: NodeMap<Binding>,
    owners: BufferMap<u32>,
    // Front is the oldest recycled buffer, back the most recent.
    free: VecDeque<BufferId>,
    next_id: u32,
    evicted: u64,
}

impl Default for BufferAllocator {
    fn default() -> Self {
        Self {
            bound: NodeMap::new(),
            owners: BufferMap::new(),
            free: VecDeque::new(),
            next_id: 1,
            evicted: 0,
        }
    }
}

impl BufferAllocator {
    /// Binds `node_id` for this plan, preferring its existing buffer, then a pooled one, then a
    /// fresh id.
    pub(crate) fn acquire(&mut self, node_id: u32, top: f32, height: f32) -> (BufferId, RowAction) {
        if let Some(binding) = self.bound.get_mut(&node_id) {
            binding.top = top;
            binding.height = height;
            return (binding.buffer, RowAction::Reuse);
        }

        let (buffer, action) = match self.free.pop_back() {
            Some(buffer) => (buffer, RowAction::Adopt),
            None => {
                let buffer = BufferId(self.next_id);
                self.next_id = self.next_id.wrapping_add(1);
                (buffer, RowAction::Allocate)
            }
        };
        self.bound.insert(
            node_id,
            Binding {
                buffer,
                top,
                height,
            },
        );
        self.owners.insert(buffer, node_id);
        (buffer, action)
    }

    /// Unbinds `node_id` and returns its buffer to the pool.
    pub(crate) fn release(&mut self, node_id: u32) -> Option<Binding> {
        let binding = self.detach(node_id)?;
        self.free.push_back(binding.buffer);
        Some(binding)
    }

    /// Unbinds `node_id` without pooling the buffer yet.
    ///
    /// The caller is responsible for handing the buffer to [`Self::recycle`] later.
    pub(crate) fn detach(&mut self, node_id: u32) -> Option<Binding> {
        let binding = self.bound.remove(&node_id)?;
        self.owners.remove(&binding.buffer);
        Some(binding)
    }

    pub(crate) fn recycle(&mut self, buffer: BufferId) {
        debug_assert!(
            !self.owners.contains_key(&buffer),
            "recycling a bound buffer ({buffer})"
        );
        self.free.push_back(buffer);
    }

    /// Discards the oldest pooled buffers until at most `retain` remain.
    ///
    /// Returns the number of buffers discarded; each one is also appended to `evicted_out`.
    pub(crate) fn evict_to(&mut self, retain: usize, evicted_out: &mut Vec<BufferId>) -> usize {
        let mut n = 0usize;
        while self.free.len() > retain {
            let Some(buffer) = self.free.pop_front() else {
                break;
            };
            evicted_out.push(buffer);
            n += 1;
        }
        self.evicted = self.evicted.saturating_add(n as u64);
        n
    }

    pub(crate) fn buffer_for(&self, node_id: u32) -> Option<BufferId> {
        self.bound.get(&node_id).map(|binding| binding.buffer)
    }

    pub(crate) fn node_for(&self, buffer: BufferId) -> Option<u32> {
        self.owners.get(&buffer).copied()
    }

    pub(crate) fn is_bound(&self, node_id: u32) -> bool {
        self.bound.contains_key(&node_id)
    }

    pub(crate) fn active_len(&self) -> usize {
        self.bound.len()
    }

    pub(crate) fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Lifetime count of discarded buffers.
    pub(crate) fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Drops every binding and the whole pool.
    ///
    /// Id issuance and the eviction counter are kept so ids stay unique for the allocator's
    /// lifetime.
    pub(crate) fn clear(&mut self) {
        self.bound.clear();
        self.owners.clear();
        self.free.clear();
    }
}
