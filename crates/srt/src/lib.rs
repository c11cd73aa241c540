//! SubRip (SRT) caption generation
//!
//! Turns an ordered transcript into timed SRT cues by spreading the lines
//! evenly across a known total duration. Everything here is pure: no I/O,
//! no clocks, no randomness.

#![allow(clippy::must_use_candidate)]

mod document;
mod timer;
mod transcript;

pub use document::{Cue, SrtDocument, format_timestamp, render};
pub use timer::{CaptionInterval, compute_intervals};
pub use transcript::Transcript;

/// MIME type used when serving SRT artifacts
pub const SRT_CONTENT_TYPE: &str = "application/x-subrip";

/// File extension of SRT artifacts, without the leading dot
pub const SRT_EXTENSION: &str = "srt";
