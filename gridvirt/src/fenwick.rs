use alloc::vec::Vec;
use core::cmp;

/// Prefix sums over row heights.
///
/// Heights are accumulated as `f64` so long tables of `f32` rows don't lose the sub-pixel part
/// of each row.
#[derive(Clone, Debug, Default)]
pub(crate) struct Fenwick {
    tree: Vec<f64>, // 1-indexed
    total: f64,
    max_bit: usize,
}

impl Fenwick {
    pub(crate) fn from_heights(heights: impl ExactSizeIterator<Item = f32>) -> Self {
        let n = heights.len();
        let mut tree = alloc::vec![0.0f64; n + 1];
        let mut total = 0.0f64;
        for (i, h) in (1..=n).zip(heights) {
            let v = f64::from(h);
            total += v;
            tree[i] += v;
            let j = i + lsb(i);
            if j <= n {
                tree[j] += tree[i];
            }
        }
        Self {
            tree,
            total,
            max_bit: highest_power_of_two_leq(n),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tree.len().saturating_sub(1)
    }

    pub(crate) fn add(&mut self, index: usize, delta: f64) {
        let n = self.len();
        if index >= n {
            return;
        }
        self.total += delta;
        let mut i = index + 1;
        while i <= n {
            self.tree[i] += delta;
            i += lsb(i);
        }
    }

    /// Sum of the first `count` heights, i.e. the top edge of row `count`.
    pub(crate) fn prefix_sum(&self, count: usize) -> f64 {
        let mut i = cmp::min(count, self.len());
        let mut sum = 0.0f64;
        while i > 0 {
            sum += self.tree[i];
            i &= i - 1;
        }
        sum
    }

    pub(crate) fn total(&self) -> f64 {
        self.total
    }

    /// Returns the largest `k` such that `prefix_sum(k) <= target` (`0` when none).
    ///
    /// With positive heights this is the number of rows that end at or before `target`.
    pub(crate) fn count_at_or_below(&self, target: f64) -> usize {
        self.descend(target, |node, rest| node <= rest)
    }

    /// Returns the largest `k` such that `prefix_sum(k) < target` (`0` when none).
    ///
    /// With positive heights this is the number of rows that start before `target`, minus
    /// one when `target > 0`.
    pub(crate) fn count_below(&self, target: f64) -> usize {
        self.descend(target, |node, rest| node < rest)
    }

    fn descend(&self, mut target: f64, take: impl Fn(f64, f64) -> bool) -> usize {
        let n = self.len();
        if n == 0 {
            return 0;
        }

        let mut idx = 0usize;
        let mut bit = self.max_bit;
        while bit != 0 {
            let next = idx + bit;
            if next <= n && take(self.tree[next], target) {
                target -= self.tree[next];
                idx = next;
            }
            bit >>= 1;
        }
        idx
    }
}

fn lsb(i: usize) -> usize {
    i & i.wrapping_neg()
}

fn highest_power_of_two_leq(n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let mut p = 1usize;
    while p <= n / 2 {
        p <<= 1;
    }
    p
}
