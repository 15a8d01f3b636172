#![allow(dead_code)]

use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};

use aacify::ffmpeg::{TranscodeError, Transcoder};
use aacify::item::{Episode, UpdatePayload};
use aacify::records::{RecordStore, RecordStoreError, RecordsResult};
use aacify::store::{ObjectStore, StoreError, StoreResult};

pub fn episode(id: &str, audio: &str, dubbing: Option<&str>) -> Episode {
    Episode {
        id: id.to_string(),
        audio_file: audio.to_string(),
        dubbing_file: dubbing.map(|d| d.to_string()),
    }
}

/// In-memory object store recording every fetch and upload
#[derive(Clone, Default)]
pub struct FakeStore {
    pub fetched: Arc<Mutex<Vec<String>>>,
    pub uploaded: Arc<Mutex<Vec<(String, String)>>>,
    /// Keys whose download fails with NotFound
    pub fail_fetch_keys: Vec<String>,
    pub fail_put: bool,
}

impl FakeStore {
    pub fn fetched_keys(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn uploaded_keys(&self) -> Vec<(String, String)> {
        self.uploaded.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn fetch_to_file(&self, key: &str, dest: &Path) -> StoreResult<()> {
        if self.fail_fetch_keys.iter().any(|k| k == key) {
            return Err(StoreError::NotFound(key.to_string()));
        }
        tokio::fs::write(dest, b"mp3-bytes").await?;
        self.fetched.lock().unwrap().push(key.to_string());
        Ok(())
    }

    async fn put_file(&self, key: &str, src: &Path, content_type: &str) -> StoreResult<()> {
        if self.fail_put {
            return Err(StoreError::UploadFailed("store unreachable".to_string()));
        }
        if !src.exists() {
            return Err(StoreError::UploadFailed(format!(
                "missing local file: {}",
                src.display()
            )));
        }
        self.uploaded
            .lock()
            .unwrap()
            .push((key.to_string(), content_type.to_string()));
        Ok(())
    }
}

/// Transcoder fake that writes a marker output file instead of invoking ffmpeg
#[derive(Clone, Default)]
pub struct FakeTranscoder {
    pub fail: bool,
    /// Input file names (e.g. "dubbing_input.mp3") that fail to transcode
    pub fail_input_names: Vec<String>,
    pub invocations: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        let input_name = input
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.invocations.lock().unwrap().push(input_name.clone());

        if self.fail || self.fail_input_names.iter().any(|n| *n == input_name) {
            return Err(TranscodeError::Launch(std::io::Error::other(
                "simulated ffmpeg failure",
            )));
        }

        tokio::fs::write(output, b"aac-bytes")
            .await
            .map_err(TranscodeError::Launch)?;
        Ok(())
    }
}

/// Record store fake capturing updates as serialized payloads
#[derive(Clone, Default)]
pub struct FakeRecords {
    pub candidates: Vec<Episode>,
    pub updates: Arc<Mutex<Vec<(String, serde_json::Value)>>>,
    pub fail_update: bool,
}

impl FakeRecords {
    pub fn recorded_updates(&self) -> Vec<(String, serde_json::Value)> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for FakeRecords {
    async fn fetch_candidates(&self, _language: &str) -> RecordsResult<Vec<Episode>> {
        Ok(self.candidates.clone())
    }

    async fn update(&self, id: &str, payload: &UpdatePayload) -> RecordsResult<()> {
        if self.fail_update {
            return Err(RecordStoreError::Decode(
                "simulated record store failure".to_string(),
            ));
        }
        let value = serde_json::to_value(payload)
            .map_err(|e| RecordStoreError::Decode(e.to_string()))?;
        self.updates.lock().unwrap().push((id.to_string(), value));
        Ok(())
    }
}
