use std::fmt;
use std::time::Duration;

use crate::timer::{CaptionInterval, compute_intervals};

/// One timed caption unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    /// 1-based sequence number
    pub index: usize,
    pub interval: CaptionInterval,
    pub text: String,
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(
            f,
            "{} --> {}",
            format_timestamp(self.interval.start),
            format_timestamp(self.interval.end)
        )?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// An ordered list of cues, immutable once built
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SrtDocument {
    cues: Vec<Cue>,
}

impl SrtDocument {
    /// Pair each line with its evenly-divided interval, in order
    pub fn build<S: AsRef<str>>(lines: &[S], duration: Duration) -> Self {
        let cues = lines
            .iter()
            .zip(compute_intervals(lines.len(), duration))
            .enumerate()
            .map(|(position, (line, interval))| Cue {
                index: position + 1,
                interval,
                text: line.as_ref().to_owned(),
            })
            .collect();

        Self { cues }
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}

impl fmt::Display for SrtDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cues.iter().try_for_each(|cue| write!(f, "{cue}"))
    }
}

/// Render transcript lines as SRT text
///
/// An empty transcript renders as the empty string regardless of duration.
pub fn render<S: AsRef<str>>(lines: &[S], duration: Duration) -> String {
    SrtDocument::build(lines, duration).to_string()
}

/// Format an offset as `HH:MM:SS,mmm`
///
/// Rounds to the nearest millisecond. Hours are not wrapped at 24, so a
/// 25 hour offset renders as `25:00:00,000`.
pub fn format_timestamp(offset: Duration) -> String {
    let total_millis = (offset.as_nanos() + 500_000) / 1_000_000;

    let millis = total_millis % 1000;
    let total_secs = total_millis / 1000;
    let secs = total_secs % 60;
    let mins = (total_secs / 60) % 60;
    let hours = total_secs / 3600;

    format!("{hours:02}:{mins:02}:{secs:02},{millis:03}")
}
