//! Virtualization and change tracking for large hierarchical grid/tree UIs.
//!
//! For a frame driver that wires these pieces together (and scroll anchoring), see the
//! `gridvirt-adapter` crate.
//!
//! This crate answers two questions per frame, without re-evaluating the whole data set:
//!
//! - *Which rows are materialized, and with which buffers?* [`RowPlanner`] computes the
//!   overscanned row window from prefix sums over row heights and binds opaque
//!   [`BufferId`]s to row identities, recycling them through a bounded free pool.
//! - *What must be repainted?* [`ColumnBandCache`] detects per-band column changes via an
//!   incremental hash, and [`DirtyTree`] aggregates damage rectangles up a node hierarchy so
//!   any subtree can be drained in O(1).
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - row metrics in render order (sorting, filtering and expansion already applied)
//! - pre-solved column slots
//! - viewport scroll offsets and extents
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod allocator;
mod columns;
mod dirty;
mod error;
mod fenwick;
mod key;
mod options;
mod planner;
mod telemetry;
mod types;


pub use columns::{
    ColumnBandCache, ColumnDefinition, ColumnSlot, ColumnSpan, FrozenBand, PaneDiff,
};
pub use dirty::{DirtyRegion, DirtyTree, SceneNodeId};
pub use error::{Error, ErrorKind, Result};
pub use options::{DEFAULT_MIN_RESERVE, DEFAULT_RETENTION_MULTIPLIER, PlannerOptions};
pub use planner::RowPlanner;
pub use telemetry::VirtualizationTelemetry;
pub use types::{
    BufferId, ColumnKey, ColumnWindow, RowAction, RowMetric, RowPlan, RowPlanEntry, RowWindow,
    ViewportMetrics,
};
