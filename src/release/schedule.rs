use crate::error::{Result, RolloutError};
use chrono::{DateTime, Local, TimeDelta};

/// Rollout timing: an offset before the first branch and a cyclic list of
/// intervals between consecutive branches.
///
/// With intervals `[d0, d1, .., dk-1]`, branch `i` starts
/// `d0 + d1 + .. + d(i-1)` (indices taken modulo `k`) after the release time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploySchedule {
    offset: TimeDelta,
    intervals: Vec<TimeDelta>,
}

impl DeploySchedule {
    /// Parse both durations before anything is scheduled.
    ///
    /// # Arguments
    /// * `interval_text` - Comma separated durations, e.g. `"10m,5m,1m"`
    /// * `offset_text` - A single duration, optionally negative (`"-5m"`)
    ///
    /// # Returns
    /// * `Err(RolloutError::Schedule)` - If any duration is malformed
    pub fn parse(interval_text: &str, offset_text: &str) -> Result<Self> {
        let intervals = interval_text
            .split(',')
            .map(|text| {
                parse_duration(text)
                    .map_err(|e| RolloutError::schedule(format!("error parsing interval: {}", e)))
            })
            .collect::<Result<Vec<_>>>()?;

        let offset = parse_duration(offset_text)
            .map_err(|e| RolloutError::schedule(format!("error parsing offset: {}", e)))?;

        Self::new(offset, intervals)
    }

    pub fn new(offset: TimeDelta, intervals: Vec<TimeDelta>) -> Result<Self> {
        if intervals.is_empty() {
            return Err(RolloutError::schedule("missing required interval durations"));
        }
        Ok(DeploySchedule { offset, intervals })
    }

    pub fn offset(&self) -> TimeDelta {
        self.offset
    }

    /// Interval following branch `index`
    pub fn interval_after(&self, index: usize) -> TimeDelta {
        self.intervals[index % self.intervals.len()]
    }

    /// Wait before branch `index`; zero for the first branch
    pub fn interval_before(&self, index: usize) -> TimeDelta {
        match index {
            0 => TimeDelta::zero(),
            i => self.interval_after(i - 1),
        }
    }

    /// Moment the first branch is deployed
    pub fn release_time(&self, now: DateTime<Local>) -> DateTime<Local> {
        now + self.offset
    }

    /// Start time of each of `branch_count` branches
    pub fn start_times(
        &self,
        release_time: DateTime<Local>,
        branch_count: usize,
    ) -> Vec<DateTime<Local>> {
        let mut start = release_time;
        (0..branch_count)
            .map(|i| {
                start += self.interval_before(i);
                start
            })
            .collect()
    }
}

/// Parse a duration such as `25m`, `1h30m` or `-5m`
pub fn parse_duration(text: &str) -> Result<TimeDelta> {
    let text = text.trim();
    let (negative, magnitude) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let duration = humantime::parse_duration(magnitude)
        .map_err(|e| RolloutError::schedule(format!("invalid duration '{}': {}", text, e)))?;
    let delta = TimeDelta::from_std(duration)
        .map_err(|_| RolloutError::schedule(format!("duration '{}' is out of range", text)))?;

    Ok(if negative { -delta } else { delta })
}
