//! Frame driver and scroll anchoring for the `gridvirt` crate.
//!
//! `gridvirt` keeps the planner and the dirty tree independent of each other. Most renderers
//! want the same glue on top:
//!
//! - [`FrameController`] runs one plan per frame, keeps one scene node per bound buffer and
//!   turns row churn and column band changes into a single damage rectangle.
//! - [`RowAnchor`] keeps the first visible row in place when rows above it are inserted,
//!   removed or resized (expand/collapse in a tree grid).
//!
//! No UI toolkit bindings live here.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod anchor;
mod controller;

#[cfg(test)]
mod tests;

pub use anchor::{RowAnchor, apply_anchor, capture_anchor};
pub use controller::{FrameController, FrameDamage};
