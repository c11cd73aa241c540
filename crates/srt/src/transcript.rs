use serde::{Deserialize, Serialize};

use crate::SrtDocument;

/// Ordered caption lines, one per recognized segment
///
/// Insertion order is reading order, which is also chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    lines: Vec<String>,
}

impl Transcript {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Build the SRT document spreading these lines over `duration`
    pub fn to_srt(&self, duration: std::time::Duration) -> SrtDocument {
        SrtDocument::build(&self.lines, duration)
    }
}

impl From<Vec<String>> for Transcript {
    fn from(lines: Vec<String>) -> Self {
        Self::new(lines)
    }
}

impl<S: Into<String>> FromIterator<S> for Transcript {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
