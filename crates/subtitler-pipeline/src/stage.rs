use std::fmt;

/// Stage a pipeline failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedStage {
    Extraction,
    Storage,
    Transcription,
    Captioning,
}

impl FailedStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Extraction => "extraction",
            Self::Storage => "storage",
            Self::Transcription => "transcription",
            Self::Captioning => "captioning",
        }
    }
}

impl fmt::Display for FailedStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a conversion currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStage {
    Received,
    AudioExtracted,
    AudioStored,
    Transcribed,
    Captioned,
    Failed(FailedStage),
}

impl ConversionStage {
    /// Successor on the success path
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Received => Some(Self::AudioExtracted),
            Self::AudioExtracted => Some(Self::AudioStored),
            Self::AudioStored => Some(Self::Transcribed),
            Self::Transcribed => Some(Self::Captioned),
            Self::Captioned | Self::Failed(_) => None,
        }
    }

    /// Stage that is blamed if the step out of this state fails
    pub fn pending_work(self) -> Option<FailedStage> {
        match self {
            Self::Received => Some(FailedStage::Extraction),
            Self::AudioExtracted => Some(FailedStage::Storage),
            Self::AudioStored => Some(FailedStage::Transcription),
            Self::Transcribed => Some(FailedStage::Captioning),
            Self::Captioned | Self::Failed(_) => None,
        }
    }
}

impl fmt::Display for ConversionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Received => f.write_str("received"),
            Self::AudioExtracted => f.write_str("audio-extracted"),
            Self::AudioStored => f.write_str("audio-stored"),
            Self::Transcribed => f.write_str("transcribed"),
            Self::Captioned => f.write_str("captioned"),
            Self::Failed(stage) => write!(f, "failed({stage})"),
        }
    }
}

/// In-flight state of one upload's conversion
///
/// Lives only as long as the request that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    asset_name: String,
    stage: ConversionStage,
}

impl ConversionRequest {
    pub fn new(asset_name: impl Into<String>) -> Self {
        Self {
            asset_name: asset_name.into(),
            stage: ConversionStage::Received,
        }
    }

    pub fn asset_name(&self) -> &str {
        &self.asset_name
    }

    pub fn stage(&self) -> ConversionStage {
        self.stage
    }

    /// Move to the next success-path stage; no-op once terminal
    pub fn advance(&mut self) -> ConversionStage {
        if let Some(next) = self.stage.next() {
            tracing::info!(asset = %self.asset_name, from = %self.stage, to = %next, "conversion stage complete");
            self.stage = next;
        }
        self.stage
    }

    /// Enter the terminal failed state, blaming whatever work was pending
    pub fn fail(&mut self) -> ConversionStage {
        if let Some(stage) = self.stage.pending_work() {
            self.stage = ConversionStage::Failed(stage);
        }
        self.stage
    }
}
