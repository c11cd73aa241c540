use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Time span assigned to one transcript line, by position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptionInterval {
    pub start: Duration,
    pub end: Duration,
}

impl CaptionInterval {
    pub fn width(&self) -> Duration {
        self.end.saturating_sub(self.start)
    }
}

/// Split `duration` into `line_count` equal, contiguous intervals
///
/// Boundaries are computed in whole nanoseconds from the start, so
/// `intervals[i].end == intervals[i + 1].start` holds exactly and the last
/// interval ends exactly at `duration`. A zero duration yields zero-width
/// intervals.
pub fn compute_intervals(line_count: usize, duration: Duration) -> Vec<CaptionInterval> {
    (0..line_count)
        .map(|index| CaptionInterval {
            start: boundary(index, line_count, duration),
            end: boundary(index + 1, line_count, duration),
        })
        .collect()
}

/// Offset of the `index`-th boundary out of `line_count` slices
#[allow(clippy::cast_precision_loss)]
fn boundary(index: usize, line_count: usize, duration: Duration) -> Duration {
    if index >= line_count {
        return duration;
    }

    let total = duration.as_nanos();

    match total.checked_mul(index as u128) {
        Some(scaled) => from_nanos(scaled / line_count as u128),
        None => duration.mul_f64(index as f64 / line_count as f64),
    }
}

fn from_nanos(nanos: u128) -> Duration {
    let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
    #[allow(clippy::cast_possible_truncation)]
    let subsec = (nanos % NANOS_PER_SEC) as u32;

    Duration::new(secs, subsec)
}
