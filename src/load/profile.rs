use std::time::Duration;

/// One ramp stage: move linearly to `target` workers over `duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSpec {
    pub duration: Duration,
    pub target: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilePoint {
    Active(u64),
    Finished,
}

/// Ordered stage list. The ramp starts from zero workers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadProfile {
    stages: Vec<StageSpec>,
}

impl LoadProfile {
    #[must_use]
    pub const fn new(stages: Vec<StageSpec>) -> Self {
        Self { stages }
    }

    #[must_use]
    pub fn stages(&self) -> &[StageSpec] {
        &self.stages
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.stages
            .iter()
            .fold(Duration::ZERO, |total, stage| total.saturating_add(stage.duration))
    }

    #[must_use]
    pub fn peak_target(&self) -> u64 {
        self.stages
            .iter()
            .map(|stage| stage.target)
            .max()
            .unwrap_or(0)
    }

    /// Rounded worker target after `elapsed` run time.
    ///
    /// Interpolates from the previous stage's target (zero before the first
    /// stage) to the current stage's target.
    #[must_use]
    pub fn target_at(&self, elapsed: Duration) -> ProfilePoint {
        let mut stage_start = Duration::ZERO;
        let mut from = 0u64;
        for stage in &self.stages {
            let stage_end = stage_start.saturating_add(stage.duration);
            if elapsed < stage_end {
                let into_stage = elapsed.saturating_sub(stage_start);
                return ProfilePoint::Active(interpolate(
                    from,
                    stage.target,
                    into_stage,
                    stage.duration,
                ));
            }
            from = stage.target;
            stage_start = stage_end;
        }
        ProfilePoint::Finished
    }

    /// Index of the stage running at `elapsed`, if any.
    #[must_use]
    pub fn stage_index_at(&self, elapsed: Duration) -> Option<usize> {
        let mut stage_end = Duration::ZERO;
        for (idx, stage) in self.stages.iter().enumerate() {
            stage_end = stage_end.saturating_add(stage.duration);
            if elapsed < stage_end {
                return Some(idx);
            }
        }
        None
    }
}

fn interpolate(from: u64, to: u64, elapsed: Duration, span: Duration) -> u64 {
    let span_us = span.as_micros();
    if span_us == 0 {
        return to;
    }
    let elapsed_us = elapsed.as_micros().min(span_us);

    let span_i128 = i128::try_from(span_us).unwrap_or(i128::MAX);
    let elapsed_i128 = i128::try_from(elapsed_us).unwrap_or(span_i128);
    let delta = i128::from(to).saturating_sub(i128::from(from));

    // Round half up: floor((2 * delta * elapsed + span) / (2 * span)).
    let numerator = delta
        .saturating_mul(elapsed_i128)
        .saturating_mul(2)
        .saturating_add(span_i128);
    let step = numerator
        .checked_div_euclid(span_i128.saturating_mul(2))
        .unwrap_or(0);
    let value = i128::from(from).saturating_add(step);
    if value < 0 {
        0
    } else {
        u64::try_from(value).unwrap_or(u64::MAX)
    }
}
