use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

use crate::config::RecordsConfig;
use crate::item::{Episode, UpdatePayload};

pub type RecordsResult<T> = Result<T, RecordStoreError>;

/// Errors from the record store gateway
#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("record store request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("record store returned {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("failed to decode record store response: {0}")]
    Decode(String),
}

/// Gateway to the episode records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Query the candidate set: episodes whose primary or dubbing locator
    /// still points at an .mp3 object and whose language set contains the
    /// target tag.
    async fn fetch_candidates(&self, language: &str) -> RecordsResult<Vec<Episode>>;

    /// Apply a partial column update to one episode
    async fn update(&self, id: &str, payload: &UpdatePayload) -> RecordsResult<()>;
}

/// Supabase (PostgREST) record store client
pub struct SupabaseStore {
    http: Client,
    base_url: String,
    service_key: String,
    table: String,
}

impl SupabaseStore {
    pub fn new(config: &RecordsConfig) -> RecordsResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("aacify/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: format!("{}/rest/v1", config.url.trim_end_matches('/')),
            service_key: config.service_key.clone(),
            table: config.table.clone(),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/{}", self.base_url, self.table)
    }
}

#[async_trait]
impl RecordStore for SupabaseStore {
    async fn fetch_candidates(&self, language: &str) -> RecordsResult<Vec<Episode>> {
        debug!("Querying candidates for language tag `{language}`");

        let language_filter = format!("cs.{{{language}}}");
        let response = self
            .http
            .get(self.table_url())
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .query(&[
                ("select", "id,audio_file,audioFile_dubbing"),
                ("or", "(audio_file.like.*.mp3,audioFile_dubbing.like.*.mp3)"),
                ("language", language_filter.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RecordStoreError::Api { status, body });
        }

        response
            .json::<Vec<Episode>>()
            .await
            .map_err(|e| RecordStoreError::Decode(e.to_string()))
    }

    async fn update(&self, id: &str, payload: &UpdatePayload) -> RecordsResult<()> {
        debug!("Updating record {id}");

        let response = self
            .http
            .patch(self.table_url())
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "return=minimal")
            .query(&[("id", format!("eq.{id}"))])
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RecordStoreError::Api { status, body });
        }

        Ok(())
    }
}
