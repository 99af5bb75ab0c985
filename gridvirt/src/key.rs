#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

/// Map keyed by the caller's row identity (`RowMetric::node_id`).
#[cfg(feature = "std")]
pub(crate) type NodeMap<V> = HashMap<u32, V>;
#[cfg(not(feature = "std"))]
pub(crate) type NodeMap<V> = BTreeMap<u32, V>;

/// Map keyed by an allocator-issued [`crate::BufferId`].
#[cfg(feature = "std")]
pub(crate) type BufferMap<V> = HashMap<crate::BufferId, V>;
#[cfg(not(feature = "std"))]
pub(crate) type BufferMap<V> = BTreeMap<crate::BufferId, V>;
