use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::config::{RecordsConfig, StoreConfig};
use crate::ffmpeg::{AudioSettings, FfmpegTranscoder};
use crate::pipeline::{ItemPipeline, PipelineSettings};
use crate::records::{RecordStore, SupabaseStore};
use crate::store::S3Store;
use crate::worker::WorkerPool;

/// Command to migrate every matching episode
pub struct RunCommand {
    language: String,
    namespace: String,
    concurrency: usize,
    work_dir: PathBuf,
}

impl RunCommand {
    pub fn new(language: String, namespace: String, concurrency: usize, work_dir: PathBuf) -> Self {
        Self {
            language,
            namespace,
            concurrency,
            work_dir,
        }
    }

    pub async fn execute(&self) -> Result<()> {
        let store_config = StoreConfig::from_env()?;
        let records_config = RecordsConfig::from_env()?;

        let store = S3Store::new(&store_config);
        let records = SupabaseStore::new(&records_config)?;
        let transcoder = FfmpegTranscoder::new(AudioSettings::from_env());

        info!("🔎 Querying candidate episodes (language: {})", self.language);
        let episodes = records
            .fetch_candidates(&self.language)
            .await
            .context("failed to load the candidate set")?;

        if episodes.is_empty() {
            info!("Nothing to migrate for language `{}`.", self.language);
            info!("🏁 Finished: 0/0 done, 0 failed");
            return Ok(());
        }

        info!(
            "▶️ Migrating {} episodes with {} workers",
            episodes.len(),
            self.concurrency
        );

        let settings = PipelineSettings {
            namespace: self.namespace.clone(),
            public_base: store_config.public_base.clone(),
            work_dir: self.work_dir.clone(),
        };
        let pipeline = ItemPipeline::new(store, transcoder, records, settings);
        let pool = WorkerPool::new(pipeline, self.concurrency);

        let counters = pool.run(episodes).await;

        info!(
            "🏁 Finished: {}/{} done, {} failed",
            counters.done, counters.total, counters.failed
        );

        Ok(())
    }
}
