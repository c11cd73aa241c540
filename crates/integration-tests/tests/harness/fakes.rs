//! In-process stand-ins for ffmpeg, object storage and speech recognition

use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use speech::{Transcriber, TranscriptionError};
use srt::Transcript;
use subtitler_pipeline::{AudioExtractor, ExtractionError};
use subtitler_storage::{ObjectStore, ObjectUri};

/// Copies the upload as "audio", or fails with a fixed exit code
pub struct ScriptedExtractor {
    exit_code: Option<i32>,
    calls: AtomicUsize,
}

impl ScriptedExtractor {
    pub fn new(exit_code: Option<i32>) -> Self {
        Self {
            exit_code,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioExtractor for ScriptedExtractor {
    async fn extract(&self, input: &Path, output: &Path) -> Result<(), ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(code) = self.exit_code {
            return Err(ExtractionError::Exited { code: Some(code) });
        }

        tokio::fs::copy(input, output)
            .await
            .map(|_| ())
            .map_err(|source| ExtractionError::Io {
                path: output.to_path_buf(),
                source,
            })
    }
}

/// Keeps persisted objects in memory
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemoryObjectStore {
    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().iter().map(|(key, _)| key.clone()).collect()
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, bytes)| bytes.clone())
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn persist(&self, local_path: &Path, key: &str) -> subtitler_storage::Result<ObjectUri> {
        let bytes = tokio::fs::read(local_path)
            .await
            .map_err(|e| subtitler_storage::StorageError::ConnectionError(e.to_string()))?;

        self.objects.lock().unwrap().push((key.to_owned(), bytes));

        Ok(ObjectUri::new("mem", self.bucket(), key))
    }

    fn name(&self) -> &str {
        "memory"
    }

    fn bucket(&self) -> &str {
        "test-bucket"
    }
}

/// Returns a canned transcript, or a canned recognition error
pub struct ScriptedTranscriber {
    result: Result<Vec<String>, String>,
    received: Mutex<Vec<ObjectUri>>,
}

impl ScriptedTranscriber {
    pub fn new(result: Result<Vec<String>, String>) -> Self {
        Self {
            result,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn received(&self) -> Vec<ObjectUri> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn transcribe(&self, audio: &ObjectUri) -> speech::Result<Transcript> {
        self.received.lock().unwrap().push(audio.clone());

        match &self.result {
            Ok(lines) => Ok(Transcript::from(lines.clone())),
            Err(message) => Err(TranscriptionError::OperationFailed {
                code: 3,
                message: message.clone(),
            }),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
