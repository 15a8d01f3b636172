use anyhow::{Context, Result};
use tracing::info;

use crate::config::RecordsConfig;
use crate::records::{RecordStore, SupabaseStore};

/// Command to list the episodes a run would migrate, without side effects
pub struct PlanCommand {
    language: String,
}

impl PlanCommand {
    pub fn new(language: String) -> Self {
        Self { language }
    }

    pub async fn execute(&self) -> Result<()> {
        let records_config = RecordsConfig::from_env()?;
        let records = SupabaseStore::new(&records_config)?;

        info!("🔎 Querying candidate episodes (language: {})", self.language);
        let episodes = records
            .fetch_candidates(&self.language)
            .await
            .context("failed to load the candidate set")?;

        for episode in &episodes {
            let dubbing = if episode.has_dubbing() {
                " (+ dubbing)"
            } else {
                ""
            };
            info!("  {} {}{}", episode.id, episode.audio_file, dubbing);
        }

        info!("✅ {} episodes would be migrated.", episodes.len());
        Ok(())
    }
}
