//! Frozen-band partitioning and change detection for pre-solved columns.
//!
//! Columns are grouped into three bands (leading frozen, scrolling primary, trailing frozen).
//! Each [`ColumnBandCache::update`] recomputes one `(count, hash)` snapshot per band in a
//! single pass and compares it with the previous one, so callers learn which panes need to be
//! repainted without keeping (or comparing) the previous column array.

use alloc::vec::Vec;

use crate::error::{Error, Result};
use crate::{ColumnKey, ColumnWindow};

/// Golden-ratio increment used by the band hash combinator.
const GOLDEN: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrozenBand {
    Leading,
    #[default]
    Primary,
    Trailing,
}

impl FrozenBand {
    pub const ALL: [FrozenBand; 3] = [Self::Leading, Self::Primary, Self::Trailing];

    fn slot(self) -> usize {
        match self {
            Self::Leading => 0,
            Self::Primary => 1,
            Self::Trailing => 2,
        }
    }
}

/// Sizing constraints for one column.
///
/// Only `frozen` and `key` are read here; the sizing fields belong to the external layout
/// solver that produces [`ColumnSlot`]s.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnDefinition {
    pub min_width: f32,
    pub preferred_width: f32,
    pub max_width: f32,
    pub weight: f32,
    pub margin_leading: f32,
    pub margin_trailing: f32,
    pub frozen: FrozenBand,
    pub key: ColumnKey,
}

impl ColumnDefinition {
    /// A column preferring `preferred_width`, unconstrained otherwise.
    pub fn new(key: ColumnKey, preferred_width: f32) -> Self {
        Self {
            min_width: 0.0,
            preferred_width,
            max_width: f32::INFINITY,
            weight: 1.0,
            margin_leading: 0.0,
            margin_trailing: 0.0,
            frozen: FrozenBand::Primary,
            key,
        }
    }

    pub fn frozen(mut self, band: FrozenBand) -> Self {
        self.frozen = band;
        self
    }
}

/// A solved column position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnSlot {
    pub offset: f32,
    pub width: f32,
}

impl ColumnSlot {
    pub fn new(offset: f32, width: f32) -> Self {
        Self { offset, width }
    }
}

/// A column definition joined with its solved slot.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnSpan {
    pub offset: f32,
    pub width: f32,
    pub frozen: FrozenBand,
    pub key: ColumnKey,
}

impl ColumnSpan {
    pub fn end(&self) -> f32 {
        self.offset + self.width
    }
}

/// Which bands changed since the previous update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaneDiff {
    pub leading_changed: bool,
    pub primary_changed: bool,
    pub trailing_changed: bool,
}

impl PaneDiff {
    pub const ALL: Self = Self {
        leading_changed: true,
        primary_changed: true,
        trailing_changed: true,
    };

    pub fn any(&self) -> bool {
        self.leading_changed || self.primary_changed || self.trailing_changed
    }

    pub fn changed(&self, band: FrozenBand) -> bool {
        match band {
            FrozenBand::Leading => self.leading_changed,
            FrozenBand::Primary => self.primary_changed,
            FrozenBand::Trailing => self.trailing_changed,
        }
    }

    /// ORs `other` into `self`.
    pub fn merge(&mut self, other: PaneDiff) {
        self.leading_changed |= other.leading_changed;
        self.primary_changed |= other.primary_changed;
        self.trailing_changed |= other.trailing_changed;
    }

    fn set(&mut self, band: FrozenBand, changed: bool) {
        match band {
            FrozenBand::Leading => self.leading_changed = changed,
            FrozenBand::Primary => self.primary_changed = changed,
            FrozenBand::Trailing => self.trailing_changed = changed,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct BandSnapshot {
    count: usize,
    hash: u64,
}

impl BandSnapshot {
    fn mix(&mut self, index: usize, span: &ColumnSpan) {
        let contribution = column_contribution(index, span);
        let h = self.hash;
        self.hash = h
            ^ contribution
                .wrapping_add(GOLDEN)
                .wrapping_add(h << 6)
                .wrapping_add(h >> 2);
        self.count += 1;
    }
}

/// Folds `{index, offset, width, key}` into one word.
///
/// Offsets and widths are hashed by bit pattern, so `0.0` and `-0.0` are distinct changes.
fn column_contribution(index: usize, span: &ColumnSpan) -> u64 {
    let mut c = index as u64;
    for word in [
        u64::from(span.offset.to_bits()),
        u64::from(span.width.to_bits()),
        span.key,
    ] {
        c ^= word
            .wrapping_add(GOLDEN)
            .wrapping_add(c << 6)
            .wrapping_add(c >> 2);
    }
    c
}

/// Column spans plus per-band change detection.
#[derive(Clone, Debug, Default)]
pub struct ColumnBandCache {
    spans: Vec<ColumnSpan>,
    snapshots: Option<[BandSnapshot; 3]>,
    last_diff: PaneDiff,
}

impl ColumnBandCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the column table and reports which bands changed.
    ///
    /// The first call after construction (or [`Self::clear`]) reports every band as changed.
    pub fn update(
        &mut self,
        definitions: &[ColumnDefinition],
        slots: &[ColumnSlot],
    ) -> Result<PaneDiff> {
        if definitions.len() != slots.len() {
            vwarn!(
                definitions = definitions.len(),
                slots = slots.len(),
                "ColumnBandCache::update: length mismatch"
            );
            return Err(Error::ColumnSlotMismatch {
                definitions: definitions.len(),
                slots: slots.len(),
            });
        }

        self.spans.clear();
        self.spans.reserve(definitions.len());
        let mut next = [BandSnapshot::default(); 3];
        for (index, (def, slot)) in definitions.iter().zip(slots).enumerate() {
            let span = ColumnSpan {
                offset: slot.offset,
                width: slot.width,
                frozen: def.frozen,
                key: def.key,
            };
            next[def.frozen.slot()].mix(index, &span);
            self.spans.push(span);
        }

        let mut diff = PaneDiff::default();
        for band in FrozenBand::ALL {
            let changed = match &self.snapshots {
                Some(prev) => prev[band.slot()] != next[band.slot()],
                None => true,
            };
            diff.set(band, changed);
        }
        self.snapshots = Some(next);
        self.last_diff = diff;
        vdebug!(
            columns = self.spans.len(),
            leading = diff.leading_changed,
            primary = diff.primary_changed,
            trailing = diff.trailing_changed,
            "ColumnBandCache::update"
        );
        Ok(diff)
    }

    /// Same as [`Self::update`].
    pub fn update_columns(
        &mut self,
        definitions: &[ColumnDefinition],
        slots: &[ColumnSlot],
    ) -> Result<PaneDiff> {
        self.update(definitions, slots)
    }

    pub fn spans(&self) -> &[ColumnSpan] {
        &self.spans
    }

    pub fn last_diff(&self) -> PaneDiff {
        self.last_diff
    }

    /// Number of columns tagged with `band`, regardless of their position.
    pub fn band_count(&self, band: FrozenBand) -> usize {
        self.snapshots
            .as_ref()
            .map_or(0, |snapshots| snapshots[band.slot()].count)
    }

    /// The first `band_count(Leading)` spans.
    ///
    /// The pane accessors assume the caller ordered columns as
    /// `[Leading.., Primary.., Trailing..]`. Misordered input yields misattributed slices but
    /// never panics.
    pub fn leading_pane(&self) -> &[ColumnSpan] {
        let (lead, _) = self.pane_bounds();
        &self.spans[..lead]
    }

    pub fn primary_pane(&self) -> &[ColumnSpan] {
        let (lead, trail) = self.pane_bounds();
        &self.spans[lead..trail]
    }

    /// The last `band_count(Trailing)` spans.
    pub fn trailing_pane(&self) -> &[ColumnSpan] {
        let (_, trail) = self.pane_bounds();
        &self.spans[trail..]
    }

    pub fn pane(&self, band: FrozenBand) -> &[ColumnSpan] {
        match band {
            FrozenBand::Leading => self.leading_pane(),
            FrozenBand::Primary => self.primary_pane(),
            FrozenBand::Trailing => self.trailing_pane(),
        }
    }

    /// `(lead_end, trail_start)` with `lead_end <= trail_start <= len`.
    fn pane_bounds(&self) -> (usize, usize) {
        let len = self.spans.len();
        let lead = self.band_count(FrozenBand::Leading).min(len);
        let trail = len
            .saturating_sub(self.band_count(FrozenBand::Trailing))
            .max(lead);
        (lead, trail)
    }

    /// Returns the primary columns intersecting `[scroll - overscan, scroll + width + overscan)`.
    ///
    /// Indexes are relative to [`Self::primary_pane`], whose offsets are expected to be
    /// ascending.
    pub fn visible_primary(&self, scroll: f32, width: f32, overscan: f32) -> ColumnWindow {
        let pane = self.primary_pane();
        let low = scroll - overscan;
        let high = scroll + width + overscan;
        if pane.is_empty() || high <= low {
            return ColumnWindow::default();
        }
        let start_index = pane.partition_point(|span| span.end() <= low);
        let end_index = pane.partition_point(|span| span.offset < high).max(start_index);
        ColumnWindow {
            start_index,
            end_index,
        }
    }

    pub fn clear(&mut self) {
        self.spans.clear();
        self.snapshots = None;
        self.last_diff = PaneDiff::default();
    }
}
