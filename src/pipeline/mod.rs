use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ffmpeg::{TranscodeError, Transcoder};
use crate::item::{Episode, UpdatePayload};
use crate::records::{RecordStore, RecordStoreError};
use crate::store::{self, ObjectStore, StoreError};

/// Content type for uploaded AAC audio
pub const AUDIO_CONTENT_TYPE: &str = "audio/mp4";

/// Classified failure of one episode's migration
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("transfer: {0}")]
    Transfer(#[from] StoreError),

    #[error("transcode: {0}")]
    Transcode(#[from] TranscodeError),

    #[error("record update: {0}")]
    RecordUpdate(#[from] RecordStoreError),

    #[error("workspace: {0}")]
    Workspace(std::io::Error),
}

/// Settings shared by every pipeline invocation
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Destination namespace under which transcoded objects are stored
    pub namespace: String,
    /// Public base URL of the object store
    pub public_base: String,
    /// Parent directory for per-item scoped workspaces
    pub work_dir: PathBuf,
}

/// Drives one episode through download, transcode, upload and record update.
///
/// Every invocation owns a scoped temporary workspace which is removed on
/// all exit paths. Failures are classified and returned; nothing escapes
/// the pipeline boundary unclassified.
pub struct ItemPipeline<S, T, R> {
    store: S,
    transcoder: T,
    records: R,
    settings: PipelineSettings,
}

impl<S, T, R> ItemPipeline<S, T, R>
where
    S: ObjectStore,
    T: Transcoder,
    R: RecordStore,
{
    pub fn new(store: S, transcoder: T, records: R, settings: PipelineSettings) -> Self {
        Self {
            store,
            transcoder,
            records,
            settings,
        }
    }

    /// Migrate one episode. The record is updated only if every required
    /// stage (and the dubbing branch, when present) succeeded.
    pub async fn process(&self, episode: &Episode) -> Result<(), ItemError> {
        tokio::fs::create_dir_all(&self.settings.work_dir)
            .await
            .map_err(ItemError::Workspace)?;

        let workspace = tempfile::Builder::new()
            .prefix(&format!("{}-", episode.id))
            .tempdir_in(&self.settings.work_dir)
            .map_err(ItemError::Workspace)?;

        let result = self.run_stages(episode, workspace.path()).await;

        if let Err(e) = workspace.close() {
            warn!("[{}] Failed to remove workspace: {e}", episode.id);
        }

        result
    }

    async fn run_stages(&self, episode: &Episode, workspace: &Path) -> Result<(), ItemError> {
        let mut payload = UpdatePayload::default();

        info!("⏳ [{}] Migrating primary audio", episode.id);
        let url = self
            .migrate_locator(episode, &episode.audio_file, workspace, "input.mp3", "output.m4a", None)
            .await?;
        payload.audio_file = Some(url);

        // The dubbing branch is all-or-nothing with the primary: a record
        // holding a new primary URL but a stale dubbing URL is never written.
        if let Some(dubbing) = &episode.dubbing_file {
            info!("⏳ [{}] Migrating dubbing audio", episode.id);
            let url = self
                .migrate_locator(
                    episode,
                    dubbing,
                    workspace,
                    "dubbing_input.mp3",
                    "dubbing_output.m4a",
                    Some("dubbing"),
                )
                .await?;
            payload.dubbing_file = Some(url);
        }

        self.records.update(&episode.id, &payload).await?;
        info!("✅ [{}] Record updated", episode.id);

        Ok(())
    }

    /// Download one locator, transcode it and upload the result. Returns the
    /// public URL of the uploaded object.
    async fn migrate_locator(
        &self,
        episode: &Episode,
        locator: &str,
        workspace: &Path,
        input_name: &str,
        output_name: &str,
        suffix: Option<&str>,
    ) -> Result<String, ItemError> {
        let key = store::key_from_url(locator)?;
        let input = workspace.join(input_name);
        let output = workspace.join(output_name);

        debug!("[{}] Downloading {key}", episode.id);
        self.store.fetch_to_file(&key, &input).await?;

        debug!("[{}] Transcoding {}", episode.id, input.display());
        self.transcoder.transcode(&input, &output).await?;

        let dest_key = store::destination_key(&self.settings.namespace, &episode.id, suffix);
        debug!("[{}] Uploading {dest_key}", episode.id);
        self.store
            .put_file(&dest_key, &output, AUDIO_CONTENT_TYPE)
            .await?;

        Ok(store::public_url(&self.settings.public_base, &dest_key))
    }
}
