use serde::{Deserialize, Serialize};
use srt::Transcript;

/// Result payload of a finished long-running recognition
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongRunningRecognizeResponse {
    /// Sequential segments of the audio; absent when nothing was recognized
    #[serde(default)]
    pub results: Vec<SpeechRecognitionResult>,
}

/// One recognized segment
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechRecognitionResult {
    /// Candidate transcriptions, most likely first
    #[serde(default)]
    pub alternatives: Vec<SpeechRecognitionAlternative>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechRecognitionAlternative {
    #[serde(default)]
    pub transcript: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// Flatten recognition results into caption lines
///
/// Takes the top-ranked alternative of each segment, in segment order, one
/// line per segment. Segments without alternatives, or whose top alternative
/// is blank, contribute nothing; a blank line would end an SRT cue early.
pub fn normalize(response: LongRunningRecognizeResponse) -> Transcript {
    response
        .results
        .into_iter()
        .filter_map(|result| result.alternatives.into_iter().next())
        .map(|alternative| alternative.transcript.trim().to_owned())
        .filter(|line| !line.is_empty())
        .collect()
}
