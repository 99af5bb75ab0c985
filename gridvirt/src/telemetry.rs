use crate::RowAction;

/// Per-plan counters describing allocator behavior.
///
/// All fields except `evicted` describe the most recent `plan` call; `evicted` is cumulative
/// over the planner's lifetime and never decreases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualizationTelemetry {
    pub rows_total: usize,
    pub window_length: usize,
    pub reused: usize,
    pub adopted: usize,
    pub allocated: usize,
    pub recycled: usize,
    pub active_buffers: usize,
    pub free_buffers: usize,
    pub evicted: u64,
}

impl VirtualizationTelemetry {
    /// `reused + adopted + allocated == window_length`.
    pub fn is_consistent(&self) -> bool {
        self.reused + self.adopted + self.allocated == self.window_length
    }
}

/// Incrementally builds [`VirtualizationTelemetry`] while a plan runs.
#[derive(Clone, Debug, Default)]
pub(crate) struct TelemetryRecorder {
    current: VirtualizationTelemetry,
}

impl TelemetryRecorder {
    /// Resets the per-call counters. The lifetime eviction count is left alone.
    pub(crate) fn begin(&mut self, rows_total: usize) {
        self.current = VirtualizationTelemetry {
            rows_total,
            evicted: self.current.evicted,
            ..VirtualizationTelemetry::default()
        };
    }

    pub(crate) fn record(&mut self, action: RowAction) {
        let t = &mut self.current;
        match action {
            RowAction::Reuse => t.reused += 1,
            RowAction::Adopt => t.adopted += 1,
            RowAction::Allocate => t.allocated += 1,
            RowAction::Recycle => t.recycled += 1,
        }
        if action != RowAction::Recycle {
            t.window_length += 1;
        }
    }

    pub(crate) fn finish(&mut self, active_buffers: usize, free_buffers: usize, evicted: u64) {
        let t = &mut self.current;
        t.active_buffers = active_buffers;
        t.free_buffers = free_buffers;
        t.evicted = evicted;
        debug_assert!(t.is_consistent(), "telemetry out of balance: {t:?}");
    }

    /// Replaces the snapshot after `clear`, keeping lifetime counters.
    pub(crate) fn reset(&mut self, evicted: u64) {
        self.current = VirtualizationTelemetry {
            evicted,
            ..VirtualizationTelemetry::default()
        };
    }

    pub(crate) fn snapshot(&self) -> VirtualizationTelemetry {
        self.current
    }
}
