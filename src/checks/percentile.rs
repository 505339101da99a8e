use std::time::Duration;

/// Value at rank `ceil(p * n / 100)` of an ascending slice.
///
/// Returns zero for an empty slice. `percentile` is clamped to 1..=100.
#[must_use]
pub fn nearest_rank(sorted: &[Duration], percentile: u8) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let p = u64::from(percentile.clamp(1, 100));
    let n = u64::try_from(sorted.len()).unwrap_or(u64::MAX);
    let rank = p.saturating_mul(n).saturating_add(99).checked_div(100).unwrap_or(0).max(1);
    let idx = usize::try_from(rank.saturating_sub(1)).unwrap_or(usize::MAX);
    sorted
        .get(idx)
        .or_else(|| sorted.last())
        .copied()
        .unwrap_or(Duration::ZERO)
}

/// Latency samples sorted ascending, reduced once at finalization.
#[derive(Debug, Clone, Default)]
pub struct LatencySamples {
    sorted: Vec<Duration>,
}

impl LatencySamples {
    #[must_use]
    pub fn from_unsorted(mut samples: Vec<Duration>) -> Self {
        samples.sort_unstable();
        Self { sorted: samples }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    #[must_use]
    pub fn percentile(&self, percentile: u8) -> Duration {
        nearest_rank(&self.sorted, percentile)
    }

    #[must_use]
    pub fn min(&self) -> Duration {
        self.sorted.first().copied().unwrap_or(Duration::ZERO)
    }

    #[must_use]
    pub fn max(&self) -> Duration {
        self.sorted.last().copied().unwrap_or(Duration::ZERO)
    }

    #[must_use]
    pub fn avg(&self) -> Duration {
        let count = u128::try_from(self.sorted.len()).unwrap_or(u128::MAX);
        if count == 0 {
            return Duration::ZERO;
        }
        let total_us = self
            .sorted
            .iter()
            .fold(0u128, |total, sample| total.saturating_add(sample.as_micros()));
        let avg_us = total_us.checked_div(count).unwrap_or(0);
        Duration::from_micros(u64::try_from(avg_us).unwrap_or(u64::MAX))
    }
}
