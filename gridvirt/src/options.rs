/// Default multiple of the window length kept in the free pool.
pub const DEFAULT_RETENTION_MULTIPLIER: usize = 6;

/// Default floor for the free pool, regardless of window length.
pub const DEFAULT_MIN_RESERVE: usize = 128;

/// Configuration for [`crate::RowPlanner`].
///
/// After every plan the free pool is trimmed to
/// `max(window_length * retention_multiplier, min_reserve)` buffers, discarding the oldest
/// first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerOptions {
    pub retention_multiplier: usize,
    pub min_reserve: usize,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            retention_multiplier: DEFAULT_RETENTION_MULTIPLIER,
            min_reserve: DEFAULT_MIN_RESERVE,
        }
    }
}

impl PlannerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn retention_multiplier(mut self, multiplier: usize) -> Self {
        self.retention_multiplier = multiplier;
        self
    }

    pub fn min_reserve(mut self, min_reserve: usize) -> Self {
        self.min_reserve = min_reserve;
        self
    }

    /// Maximum free pool size allowed after a plan with `window_length` active rows.
    pub fn retention_bound(&self, window_length: usize) -> usize {
        window_length
            .saturating_mul(self.retention_multiplier)
            .max(self.min_reserve)
    }
}
